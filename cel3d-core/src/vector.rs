/// Vector helpers on top of nalgebra
///
/// nalgebra already provides add, sub, scalar multiply, `dot`, `cross`,
/// `norm` and `normalize`. What it lacks is the fixed-precision equality
/// used to compare rotated positions and a normalization that refuses
/// zero-length input.
use nalgebra::{Vector2, Vector3};

pub type Vec2 = Vector2<f64>;
pub type Vec3 = Vector3<f64>;

/// Decimal places used by `approx_eq`.
pub const DEFAULT_PRECISION: i32 = 8;

/// Lengths below this are treated as zero by `try_unit`.
const UNIT_EPSILON: f64 = 1e-12;

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

pub trait VectorExt: Sized {
    type Tuple;

    /// Component-wise equality after rounding to `digits` decimal places
    fn equals_with_precision(&self, other: &Self, digits: i32) -> bool;

    fn approx_eq(&self, other: &Self) -> bool {
        self.equals_with_precision(other, DEFAULT_PRECISION)
    }

    fn to_tuple(&self) -> Self::Tuple;

    /// Unit vector in the same direction, or `None` for a zero-length vector
    fn try_unit(&self) -> Option<Self>;
}

impl VectorExt for Vec2 {
    type Tuple = (f64, f64);

    fn equals_with_precision(&self, other: &Self, digits: i32) -> bool {
        self.iter()
            .zip(other.iter())
            .all(|(a, b)| round_to(*a, digits) == round_to(*b, digits))
    }

    fn to_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn try_unit(&self) -> Option<Self> {
        self.try_normalize(UNIT_EPSILON)
    }
}

impl VectorExt for Vec3 {
    type Tuple = (f64, f64, f64);

    fn equals_with_precision(&self, other: &Self, digits: i32) -> bool {
        self.iter()
            .zip(other.iter())
            .all(|(a, b)| round_to(*a, digits) == round_to(*b, digits))
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    fn try_unit(&self) -> Option<Self> {
        self.try_normalize(UNIT_EPSILON)
    }
}
