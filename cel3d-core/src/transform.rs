/// Cumulative Euler rotation and the recompute-from-origin transform
use nalgebra::Matrix3;

use crate::vector::Vec3;

/// Rotation accumulated around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Rotation matrix `Rz(z) * Ry(y) * Rx(x)`, written out row by row.
    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        let (sa, ca) = self.z.sin_cos();
        let (sb, cb) = self.y.sin_cos();
        let (sc, cc) = self.x.sin_cos();

        Matrix3::new(
            ca * cb, ca * sb * sc - sa * cc, ca * sb * cc + sa * sc,
            sa * cb, sa * sb * sc + ca * cc, sa * sb * cc - ca * sc,
            -sb,     cb * sc,                cb * cc,
        )
    }

    /// Images of the world x, y and z axes under this rotation.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let m = self.matrix();
        (
            m.column(0).into_owned(),
            m.column(1).into_owned(),
            m.column(2).into_owned(),
        )
    }
}

/// Rotate `origin` by the full accumulated `angle`.
///
/// Always applied to the never-rotated vector, so error stays bounded by a
/// single matrix application no matter how many frames have passed.
pub fn rotate_vector(origin: &Vec3, angle: &RotationState) -> Vec3 {
    angle.matrix() * origin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::VectorExt;
    use nalgebra::Rotation3;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state, RotationState::new(0.0, 0.0, 0.0));

        state.rotate(0.1, 0.2, 0.3);
        state.rotate(0.1, 0.0, -0.3);
        assert!((state.x - 0.2).abs() < 1e-12);
        assert!((state.y - 0.2).abs() < 1e-12);
        assert!(state.z.abs() < 1e-12);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = RotationState::zero().matrix();
        assert!((matrix - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_matches_zyx_composition() {
        let angle = RotationState::new(0.4, -1.1, 2.3);
        let expected = Rotation3::from_euler_angles(angle.x, angle.y, angle.z);
        assert!((angle.matrix() - expected.matrix()).norm() < 1e-12);
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let angle = RotationState::new(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        let v = rotate_vector(&Vec3::new(1.0, 0.0, 0.0), &angle);
        assert!(v.approx_eq(&Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let angle = RotationState::new(0.7, 0.2, -1.9);
        let (i, j, k) = angle.basis();
        for v in [&i, &j, &k] {
            assert!((v.norm() - 1.0).abs() < 1e-12);
        }
        assert!(i.dot(&j).abs() < 1e-12);
        assert!(j.dot(&k).abs() < 1e-12);
        assert!(k.dot(&i).abs() < 1e-12);
        assert!(i.cross(&j).approx_eq(&k));
    }
}
