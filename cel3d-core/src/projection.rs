/// Camera, viewport and perspective projection
use crate::geometry::Triangle;
use crate::transform::RotationState;
use crate::vector::{Vec2, Vec3};

/// Character-cell canvas the scene is projected onto
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    /// Width of a terminal cell divided by its height
    pub font_ratio: f64,
    /// Viewed aspect ratio after font correction
    pub ratio: f64,
    pub center: Vec2,
}

impl Viewport {
    pub fn new(width: usize, height: usize, font_ratio: f64) -> Self {
        Self {
            width,
            height,
            font_ratio,
            ratio: font_ratio * width as f64 / height as f64,
            center: Vec2::new(width as f64 / 2.0, height as f64 / 2.0),
        }
    }

    /// Map a projection-plane point to pixel space
    pub fn map(&self, p: &Vec2) -> Vec2 {
        self.center + p.component_mul(&self.center)
    }

    /// Map a pixel-space point back to the projection plane
    pub fn inv_map(&self, p: &Vec2) -> Vec2 {
        (p - self.center).component_div(&self.center)
    }

    pub fn on_canvas(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64
    }
}

/// Camera position, orientation and projection constants
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    rotation: RotationState,
    i: Vec3,
    j: Vec3,
    k: Vec3,
    pub near: f64,
    pub far: f64,
    /// Field of view in radians
    pub fov: f64,
    /// `1 / tan(fov / 2)` along x, scaled by the aspect ratio along y
    pub cot_fov: Vec2,
}

impl Camera {
    pub fn new(position: Vec3, near: f64, far: f64, fov_degrees: f64, viewport: &Viewport) -> Self {
        let fov = fov_degrees.to_radians();
        let cot = 1.0 / (fov / 2.0).tan();
        let rotation = RotationState::zero();
        let (i, j, k) = rotation.basis();

        Self {
            position,
            rotation,
            i,
            j,
            k,
            near,
            far,
            fov,
            cot_fov: Vec2::new(cot, cot * viewport.ratio),
        }
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Orientation axes: right, up and forward (view direction)
    pub fn basis(&self) -> (&Vec3, &Vec3, &Vec3) {
        (&self.i, &self.j, &self.k)
    }

    pub fn forward(&self) -> &Vec3 {
        &self.k
    }

    /// Add to the cumulative angle and rederive the basis from the world axes
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.rotation.rotate(dx, dy, dz);
        let (i, j, k) = self.rotation.basis();
        self.i = i;
        self.j = j;
        self.k = k;
    }

    /// World position expressed along the camera axes; `z` is depth
    pub fn to_camera_space(&self, p: &Vec3) -> Vec3 {
        let r = p - self.position;
        Vec3::new(r.dot(&self.i), r.dot(&self.j), r.dot(&self.k))
    }

    pub fn in_range(&self, depth: f64) -> bool {
        depth >= self.near && depth <= self.far
    }

    /// Perspective divide of a camera-space point onto the projection plane
    pub fn project(&self, r: &Vec3) -> Vec2 {
        let inv_k = 1.0 / r.z;
        Vec2::new(r.x * inv_k * self.cot_fov.x, r.y * inv_k * self.cot_fov.y)
    }
}

/// A triangle accepted for rasterization
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedTriangle {
    /// Vertex positions in pixel space, unrounded
    pub raster: [Vec2; 3],
}

/// Why a triangle was skipped before rasterization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Some vertex lies outside `[near, far]`
    OutOfRange,
    /// No vertex lands on the canvas
    OffCanvas,
}

/// Project all three vertices, rejecting the triangle as a whole.
///
/// The depth test runs before the divide, so an accepted vertex always has
/// depth of at least `near`.
pub fn project_triangle(
    triangle: &Triangle,
    camera: &Camera,
    viewport: &Viewport,
) -> Result<ProjectedTriangle, Rejection> {
    let mut camera_space = [Vec3::zeros(); 3];
    for (slot, point) in camera_space.iter_mut().zip(triangle.points()) {
        *slot = camera.to_camera_space(point.position());
        if !camera.in_range(slot.z) {
            return Err(Rejection::OutOfRange);
        }
    }

    let raster = camera_space.map(|r| viewport.map(&camera.project(&r)));
    if !raster.iter().any(|p| viewport.on_canvas(p.x, p.y)) {
        return Err(Rejection::OffCanvas);
    }

    Ok(ProjectedTriangle { raster })
}
