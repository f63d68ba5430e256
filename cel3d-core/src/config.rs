/// TOML configuration for the renderer, the scene and the animation
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::framebuffer::BlendMode;
use crate::geometry::Mesh;
use crate::projection::Viewport;
use crate::shading::Palette;
use crate::stl;

pub const DEFAULT_WIDTH: usize = 100;
pub const DEFAULT_HEIGHT: usize = 44;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub shading: ShadingConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportConfig {
    /// Columns; the driver falls back to the terminal width when unset
    pub width: Option<usize>,
    /// Rows; the driver falls back to the terminal height when unset
    pub height: Option<usize>,
    #[serde(default = "default_font_ratio")]
    pub font_ratio: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            font_ratio: default_font_ratio(),
        }
    }
}

// Terminal cells are roughly 44 units wide for every 90 tall
fn default_font_ratio() -> f64 {
    44.0 / 90.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f64; 3],
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default = "default_far")]
    pub far: f64,
    /// Field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            near: default_near(),
            far: default_far(),
            fov: default_fov(),
        }
    }
}

fn default_camera_position() -> [f64; 3] {
    [0.0, 0.0, -10.0]
}
fn default_near() -> f64 {
    1.0
}
fn default_far() -> f64 {
    100.0
}
fn default_fov() -> f64 {
    60.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShadingConfig {
    /// Light direction; all zeros disables lighting
    #[serde(default = "default_light")]
    pub light: [f64; 3],
    /// Exactly 14 glyphs, blank first
    #[serde(default = "default_palette")]
    pub palette: String,
    #[serde(default)]
    pub blend: BlendMode,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            light: default_light(),
            palette: default_palette(),
            blend: BlendMode::default(),
        }
    }
}

fn default_light() -> [f64; 3] {
    [0.0, 1.0, 1.0]
}
fn default_palette() -> String {
    " .,-~:;=!*#$@@".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Radians added to every mesh point's angle per frame
    #[serde(default = "default_spin")]
    pub spin: [f64; 3],
    /// Radians added to the camera's angle per frame
    #[serde(default)]
    pub camera_spin: [f64; 3],
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            spin: default_spin(),
            camera_spin: [0.0; 3],
        }
    }
}

fn default_fps() -> f64 {
    15.0
}
fn default_spin() -> [f64; 3] {
    [0.1, 0.0, 0.1]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Cube,
    Tetrahedron,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    #[serde(default)]
    pub shape: Shape,
    /// Load the mesh from an STL file instead of a built-in shape
    pub stl: Option<PathBuf>,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            stl: None,
            scale: default_scale(),
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

impl SceneConfig {
    pub fn load_mesh(&self) -> Result<Mesh> {
        let mesh = match &self.stl {
            Some(path) => {
                log::debug!("Loading STL mesh from {}", path.display());
                stl::parse_stl(&fs::read(path)?)?
            }
            None => match self.shape {
                Shape::Cube => Mesh::unit_cube(1.0),
                Shape::Tetrahedron => Mesh::unit_tetrahedron(),
            },
        };
        log::debug!("Scene mesh has {} triangles", mesh.len());

        if self.scale == 1.0 {
            Ok(mesh)
        } else {
            Ok(mesh.scaled(self.scale))
        }
    }
}

impl RenderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let vp = &self.viewport;
        if vp.width == Some(0) || vp.height == Some(0) {
            return Err(Error::invalid("viewport width and height must be positive"));
        }
        if !(vp.font_ratio > 0.0 && vp.font_ratio.is_finite()) {
            return Err(Error::invalid("font_ratio must be positive"));
        }

        let cam = &self.camera;
        if !(cam.near > 0.0 && cam.near < cam.far && cam.far.is_finite()) {
            return Err(Error::invalid(format!(
                "clip range needs 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(Error::invalid(format!(
                "fov must lie strictly between 0 and 180 degrees, got {}",
                cam.fov
            )));
        }
        if cam.position.iter().chain(&self.shading.light).any(|v| !v.is_finite()) {
            return Err(Error::invalid("camera position and light must be finite"));
        }

        Palette::parse(&self.shading.palette)?;

        let fps = self.animation.fps;
        if !(fps > 0.0 && fps.is_finite() && (1.0 / fps).is_finite()) {
            return Err(Error::invalid(format!("fps must be positive, got {}", fps)));
        }
        if !(self.scene.scale > 0.0 && self.scene.scale.is_finite()) {
            return Err(Error::invalid("scene scale must be positive"));
        }
        Ok(())
    }

    /// Viewport with unset dimensions taken from `fallback`
    pub fn viewport_or(&self, fallback: (usize, usize)) -> Viewport {
        Viewport::new(
            self.viewport.width.unwrap_or(fallback.0),
            self.viewport.height.unwrap_or(fallback.1),
            self.viewport.font_ratio,
        )
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport_or((DEFAULT_WIDTH, DEFAULT_HEIGHT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::parse("").unwrap();
        let viewport = config.viewport();
        assert_eq!((viewport.width, viewport.height), (100, 44));
        assert_eq!(config.camera.position, [0.0, 0.0, -10.0]);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.shading.light, [0.0, 1.0, 1.0]);
        assert_eq!(config.shading.blend, BlendMode::Overwrite);
        assert_eq!(config.animation.fps, 15.0);
        assert_eq!(config.scene.shape, Shape::Cube);
    }

    #[test]
    fn test_parse_sections() {
        let config = RenderConfig::parse(
            r#"
            [viewport]
            width = 300
            height = 120

            [camera]
            position = [0.0, 0.0, -4.0]
            near = 2.0

            [shading]
            light = [0.0, 0.0, 0.0]
            blend = "average"

            [scene]
            shape = "tetrahedron"
            scale = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.viewport_or((1, 1)).width, 300);
        assert_eq!(config.camera.near, 2.0);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.shading.blend, BlendMode::Average);
        assert_eq!(config.scene.shape, Shape::Tetrahedron);
        assert_eq!(config.scene.load_mesh().unwrap().len(), 4);
    }

    #[test]
    fn test_terminal_fallback_only_fills_unset() {
        let config = RenderConfig::parse("[viewport]\nwidth = 80\n").unwrap();
        let viewport = config.viewport_or((200, 50));
        assert_eq!((viewport.width, viewport.height), (80, 50));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        for bad in [
            "[viewport]\nwidth = 0",
            "[camera]\nnear = 0.0",
            "[camera]\nnear = 5.0\nfar = 5.0",
            "[camera]\nfov = 180.0",
            "[camera]\nfov = 0.0",
            "[shading]\npalette = \"abc\"",
            "[animation]\nfps = 0.0",
            "[animation]\nfps = 1e-320",
            "[scene]\nscale = -1.0",
        ] {
            assert!(
                matches!(RenderConfig::parse(bad), Err(Error::InvalidConfig(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            RenderConfig::parse("[camera]\nfov = \"wide\""),
            Err(Error::ConfigParse(_))
        ));
        assert!(matches!(
            RenderConfig::parse("[camera]\nzoom = 2.0"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            RenderConfig::load("/nonexistent/cel3d.toml"),
            Err(Error::Io(_))
        ));
    }
}
