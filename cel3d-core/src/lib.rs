//! cel3d Core Library - triangle meshes rendered to a character grid
//!
//! This library holds the whole rendering pipeline: cumulative rotation,
//! perspective projection, culling, edge walking, span fill and glyph
//! shading. It performs no terminal I/O.

pub mod config;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod projection;
pub mod raster;
pub mod renderer;
pub mod shading;
pub mod stl;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use framebuffer::{BlendMode, FrameBuffer};
pub use geometry::{Mesh, Point, Triangle};
pub use projection::{Camera, Viewport};
pub use renderer::{FrameStats, Renderer};
pub use shading::{Light, Palette, Shade};
pub use transform::RotationState;
pub use vector::{Vec2, Vec3, VectorExt};
