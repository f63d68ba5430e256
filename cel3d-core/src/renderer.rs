/// Frame pipeline: project, cull, rasterize, shade and serialize
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::framebuffer::{BlendMode, FrameBuffer};
use crate::geometry::{Mesh, Triangle};
use crate::projection::{project_triangle, Camera, Rejection, Viewport};
use crate::raster::triangle_spans;
use crate::shading::{shade, Light, Palette, Shade};
use crate::vector::Vec3;

/// What happened to the triangles of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
    pub out_of_range: usize,
    pub off_canvas: usize,
    pub degenerate: usize,
}

/// Camera, canvas and the scene's triangles, drawn in insertion order
pub struct Renderer {
    viewport: Viewport,
    camera: Camera,
    light: Light,
    palette: Palette,
    blend: BlendMode,
    triangles: Vec<Triangle>,
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        Self::with_viewport(config, config.viewport())
    }

    /// Build from `config` but render onto `viewport`
    pub fn with_viewport(config: &RenderConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;
        if viewport.width == 0 || viewport.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "viewport must be non-empty, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        let palette = Palette::parse(&config.shading.palette)?;

        let cam = &config.camera;
        let camera = Camera::new(Vec3::from(cam.position), cam.near, cam.far, cam.fov, &viewport);

        let light = Light::new(Vec3::from(config.shading.light));
        if light.direction().is_none() {
            log::warn!("Light direction is zero; drawing flat silhouettes without lighting");
        }

        log::info!(
            "Renderer {}x{} camera at {:?} near={} far={} fov={}",
            viewport.width,
            viewport.height,
            cam.position,
            cam.near,
            cam.far,
            cam.fov
        );

        Ok(Self {
            viewport,
            camera,
            light,
            palette,
            blend: config.shading.blend,
            triangles: Vec::new(),
        })
    }

    pub fn add(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn extend(&mut self, mesh: Mesh) {
        self.triangles.extend(mesh);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Scene geometry, for the driver to rotate between frames
    pub fn triangles_mut(&mut self) -> &mut [Triangle] {
        &mut self.triangles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn rotate_camera(&mut self, dx: f64, dy: f64, dz: f64) {
        self.camera.rotate(dx, dy, dz);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Render one frame into a fresh buffer
    pub fn render(&self) -> (FrameBuffer, FrameStats) {
        let mut frame =
            FrameBuffer::with_blend(self.viewport.width, self.viewport.height, self.blend);
        let mut stats = FrameStats::default();

        for triangle in &self.triangles {
            let projected = match project_triangle(triangle, &self.camera, &self.viewport) {
                Ok(projected) => projected,
                Err(Rejection::OutOfRange) => {
                    stats.out_of_range += 1;
                    continue;
                }
                Err(Rejection::OffCanvas) => {
                    stats.off_canvas += 1;
                    continue;
                }
            };

            let Some(normal) = triangle.normal() else {
                stats.degenerate += 1;
                continue;
            };

            let fill = match shade(&self.light, &normal, self.camera.forward()) {
                Shade::Culled => {
                    stats.culled += 1;
                    continue;
                }
                Shade::Fill(fill) => fill,
            };

            let (spans, top, bottom) =
                triangle_spans(&projected.raster, self.viewport.width, self.viewport.height);
            for (y, from, to) in spans.rows(top, bottom) {
                frame.fill_span(y, from, to, fill);
            }
            stats.drawn += 1;
        }

        log::trace!("Frame: {:?}", stats);
        (frame, stats)
    }

    /// Render one frame as text, rows joined by newlines
    pub fn draw(&self) -> String {
        let (frame, _) = self.render();
        frame.to_text(&self.palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(light: [f64; 3]) -> Renderer {
        let mut config = RenderConfig::default();
        config.viewport.width = Some(40);
        config.viewport.height = Some(30);
        config.shading.light = light;
        Renderer::new(&config).unwrap()
    }

    #[test]
    fn test_empty_scene_is_blank() {
        let r = renderer([0.0, 1.0, 1.0]);
        let (frame, stats) = r.render();
        assert_eq!(frame.filled(), 0);
        assert_eq!(stats, FrameStats::default());
        let text = r.draw();
        assert_eq!(text.lines().count(), 30);
        assert!(text.lines().all(|l| l.len() == 40 && l.trim().is_empty()));
    }

    #[test]
    fn test_counts_rejections() {
        let mut r = renderer([0.0, 0.0, 1.0]);
        // Behind the camera
        r.add(Triangle::new([0.0, 0.0, -20.0], [1.0, 0.0, -20.0], [0.0, 1.0, -20.0]));
        // Far off to the side
        r.add(Triangle::new([90.0, 0.0, 0.0], [91.0, 0.0, 0.0], [90.0, 1.0, 0.0]));
        // Zero area
        r.add(Triangle::new([0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [2.0, 2.0, 0.0]));
        let (frame, stats) = r.render();
        assert_eq!(frame.filled(), 0);
        assert_eq!(stats.out_of_range, 1);
        assert_eq!(stats.off_canvas, 1);
        assert_eq!(stats.degenerate, 1);
        assert_eq!(stats.drawn, 0);
    }

    #[test]
    fn test_zero_light_draws_faintest_glyph() {
        let mut r = renderer([0.0, 0.0, 0.0]);
        assert!(r.light().direction().is_none());
        r.add(Triangle::new([-2.0, -2.0, 0.0], [2.0, -2.0, 0.0], [0.0, 2.0, 0.0]));
        let (frame, stats) = r.render();
        assert_eq!(stats.drawn, 1);
        assert!(frame.rows().flatten().all(|&c| c == 0 || c == 1));
        assert!(frame.filled() > 0);
    }

    #[test]
    fn test_camera_rotation_moves_scene_out_of_view() {
        let mut r = renderer([0.0, 0.0, 1.0]);
        r.extend(Mesh::unit_cube(1.0));
        assert!(r.render().1.drawn > 0);

        r.rotate_camera(0.0, std::f64::consts::PI, 0.0);
        let (frame, stats) = r.render();
        assert_eq!(frame.filled(), 0);
        assert_eq!(stats.out_of_range, 12);
    }
}
