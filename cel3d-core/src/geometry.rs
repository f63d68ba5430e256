/// Geometry primitives: rotatable points, triangles and meshes
use crate::transform::{rotate_vector, RotationState};
use crate::vector::{Vec3, VectorExt};

/// A vertex that remembers where it started.
///
/// `position` is recomputed from `origin` and the accumulated angle on
/// every rotate call, never rotated incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    origin: Vec3,
    angle: RotationState,
    position: Vec3,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let origin = Vec3::new(x, y, z);
        Self {
            origin,
            angle: RotationState::zero(),
            position: origin,
        }
    }

    pub fn origin(&self) -> &Vec3 {
        &self.origin
    }

    pub fn angle(&self) -> &RotationState {
        &self.angle
    }

    /// Current (rotated) position
    pub fn position(&self) -> &Vec3 {
        &self.position
    }

    /// Add to the cumulative angle and recompute the position from the origin
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.angle.rotate(dx, dy, dz);
        self.position = rotate_vector(&self.origin, &self.angle);
    }
}

impl From<[f64; 3]> for Point {
    fn from(v: [f64; 3]) -> Self {
        Point::new(v[0], v[1], v[2])
    }
}

/// A triangle face owning its three points.
///
/// The normal follows the vertex order, so every triangle of a mesh must be
/// declared with the same winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    points: [Point; 3],
}

impl Triangle {
    pub fn new(v1: [f64; 3], v2: [f64; 3], v3: [f64; 3]) -> Self {
        Self::from_points(v1.into(), v2.into(), v3.into())
    }

    pub fn from_points(p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            points: [p1, p2, p3],
        }
    }

    pub fn points(&self) -> &[Point; 3] {
        &self.points
    }

    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        for point in &mut self.points {
            point.rotate(dx, dy, dz);
        }
    }

    /// Unit normal `(v1->v2) x (v1->v3)`, or `None` for a zero-area triangle
    pub fn normal(&self) -> Option<Vec3> {
        let [p1, p2, p3] = &self.points;
        let edge1 = p2.position() - p1.position();
        let edge2 = p3.position() - p1.position();

        edge1.cross(&edge2).try_unit()
    }
}

/// Two triangles covering the quad `v1 v2 v3 v4`, split along `v2-v4`
pub fn quad(v1: [f64; 3], v2: [f64; 3], v3: [f64; 3], v4: [f64; 3]) -> [Triangle; 2] {
    [Triangle::new(v1, v2, v4), Triangle::new(v2, v3, v4)]
}

/// An ordered list of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        for triangle in &mut self.triangles {
            triangle.rotate(dx, dy, dz);
        }
    }

    /// Uniformly scale every vertex about the origin.
    ///
    /// Resets accumulated rotation, so call it before animating.
    pub fn scaled(self, factor: f64) -> Self {
        let triangles = self
            .triangles
            .into_iter()
            .map(|t| {
                let [a, b, c] = t.points().clone().map(|p| (p.origin() * factor).into());
                Triangle::new(a, b, c)
            })
            .collect();
        Self { triangles }
    }

    /// Cube from its eight corners: 1-4 around one face, 5-8 the opposite
    /// face with 5 behind 1, 6 behind 2 and so on.
    #[allow(clippy::too_many_arguments)]
    pub fn cube(
        v1: [f64; 3],
        v2: [f64; 3],
        v3: [f64; 3],
        v4: [f64; 3],
        v5: [f64; 3],
        v6: [f64; 3],
        v7: [f64; 3],
        v8: [f64; 3],
    ) -> Self {
        let faces = [
            quad(v1, v2, v3, v4),
            quad(v2, v6, v7, v3),
            quad(v5, v1, v4, v8),
            quad(v5, v6, v2, v1),
            quad(v4, v3, v7, v8),
            quad(v6, v5, v8, v7),
        ];
        Self {
            triangles: faces.into_iter().flatten().collect(),
        }
    }

    /// One triangle per face of the tetrahedron `v1 v2 v3 v4`
    pub fn tetrahedron(v1: [f64; 3], v2: [f64; 3], v3: [f64; 3], v4: [f64; 3]) -> Self {
        Self {
            triangles: vec![
                Triangle::new(v1, v2, v3),
                Triangle::new(v1, v2, v4),
                Triangle::new(v1, v3, v4),
                Triangle::new(v2, v3, v4),
            ],
        }
    }

    /// Axis-aligned cube centred on the origin
    pub fn unit_cube(half: f64) -> Self {
        let h = half;
        Self::cube(
            [-h, h, h],
            [h, h, h],
            [h, -h, h],
            [-h, -h, h],
            [-h, h, -h],
            [h, h, -h],
            [h, -h, -h],
            [-h, -h, -h],
        )
    }

    pub fn unit_tetrahedron() -> Self {
        Self::tetrahedron(
            [0.0, 1.0, 1.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
            [0.0, 0.0, -1.0],
        )
    }
}

impl From<Vec<Triangle>> for Mesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl IntoIterator for Mesh {
    type Item = Triangle;
    type IntoIter = std::vec::IntoIter<Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_zero_rotation_keeps_origin() {
        let mut p = Point::new(1.5, -2.0, 0.25);
        for _ in 0..100 {
            p.rotate(0.0, 0.0, 0.0);
        }
        assert_eq!(p.position(), p.origin());
    }

    #[test]
    fn test_full_turn_closes() {
        let mut p = Point::new(1.0, 2.0, 3.0);
        let step = 2.0 * PI / 36.0;
        for _ in 0..36 {
            p.rotate(step, 0.0, 0.0);
        }
        assert!(p.position().approx_eq(p.origin()));
        assert_ne!(p.angle().x, 0.0);
    }

    #[test]
    fn test_rotation_does_not_drift() {
        let mut p = Point::new(-1.0, 1.0, 1.0);
        let step = 2.0 * PI / 3600.0;
        for _ in 0..3600 {
            p.rotate(step, step, step);
        }
        assert!(p.position().equals_with_precision(p.origin(), 9));
    }

    #[test]
    fn test_origin_is_never_mutated() {
        let mut p = Point::new(0.0, 1.0, 0.0);
        p.rotate(0.3, 0.2, 0.1);
        assert_eq!(p.origin(), &Vec3::new(0.0, 1.0, 0.0));
        assert!((p.position().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normal_follows_winding() {
        let t = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(t.normal().unwrap().approx_eq(&Vec3::new(0.0, 0.0, 1.0)));

        let flipped = Triangle::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        assert!(flipped.normal().unwrap().approx_eq(&Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_degenerate_triangle_has_no_normal() {
        let t = Triangle::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert!(t.normal().is_none());
    }

    #[test]
    fn test_normal_rotates_with_points() {
        let mut t = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        t.rotate(PI / 2.0, 0.0, 0.0);
        assert!(t.normal().unwrap().approx_eq(&Vec3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn test_quad_uses_fixed_diagonal() {
        let [a, b] = quad([0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(a.points()[2].origin(), &Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(b.points()[0].origin(), &Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(a.normal(), b.normal());
    }

    #[test]
    fn test_cube_and_tetrahedron_sizes() {
        let cube = Mesh::unit_cube(1.0);
        assert_eq!(cube.len(), 12);
        assert!(cube.triangles().iter().all(|t| t.normal().is_some()));
        assert_eq!(Mesh::unit_tetrahedron().len(), 4);
    }

    #[test]
    fn test_cube_winding_is_consistent() {
        // Every face normal of a convex solid points the same way relative
        // to the centre, so its dot with the face centroid has one sign.
        let cube = Mesh::unit_cube(1.0);
        let signs: Vec<bool> = cube
            .triangles()
            .iter()
            .map(|t| {
                let c = t.points().iter().map(|p| p.position()).sum::<Vec3>() / 3.0;
                t.normal().unwrap().dot(&c) > 0.0
            })
            .collect();
        assert!(signs.iter().all(|s| *s == signs[0]));
    }

    #[test]
    fn test_mesh_scaled_and_rotated() {
        let mut mesh = Mesh::unit_cube(1.0).scaled(2.0);
        assert_eq!(mesh.triangles()[0].points()[0].origin(), &Vec3::new(-2.0, 2.0, 2.0));
        mesh.rotate(0.0, PI, 0.0);
        let p = mesh.triangles()[0].points()[0].position();
        assert!(p.approx_eq(&Vec3::new(2.0, 2.0, -2.0)));
    }
}
