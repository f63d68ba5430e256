/// Flat shading, facing/illumination culling and the glyph palette
use crate::error::{Error, Result};
use crate::vector::{Vec3, VectorExt};

pub const PALETTE_SIZE: usize = 14;

/// Highest index shading can produce
pub const MAX_SHADE: u8 = (PALETTE_SIZE - 1) as u8;

/// Shades from blank (unfilled) to densest
pub const DEFAULT_GLYPHS: [char; PALETTE_SIZE] = [
    ' ', '.', ',', '-', '~', ':', ';', '=', '!', '*', '#', '$', '@', '@',
];

/// Fourteen glyphs indexed by shade; index 0 marks an unfilled cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    glyphs: [char; PALETTE_SIZE],
}

impl Palette {
    pub fn new(glyphs: [char; PALETTE_SIZE]) -> Self {
        Self { glyphs }
    }

    pub fn parse(glyphs: &str) -> Result<Self> {
        let chars: Vec<char> = glyphs.chars().collect();
        let glyphs: [char; PALETTE_SIZE] = chars.try_into().map_err(|chars: Vec<char>| {
            Error::invalid(format!(
                "palette needs exactly {} glyphs, got {}",
                PALETTE_SIZE,
                chars.len()
            ))
        })?;
        Ok(Self { glyphs })
    }

    /// Glyph for a shade index; indices past the end use the densest glyph
    pub fn glyph(&self, index: u8) -> char {
        self.glyphs[(index as usize).min(PALETTE_SIZE - 1)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_GLYPHS)
    }
}

/// Directional light, or none at all
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Light {
    direction: Option<Vec3>,
}

impl Light {
    /// Normalizes `direction`; a zero vector means no light
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.try_unit(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Option<&Vec3> {
        self.direction.as_ref()
    }
}

/// Shading decision for one triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Culled,
    Fill(u8),
}

/// Glyph index for a face from its normal and the camera's forward axis.
///
/// The face is culled when the lit side faces away from the camera, that
/// is when `light . n` and `forward . n` have opposite signs (a zero on
/// either side counts as both). Without a light every face gets the
/// faintest glyph.
pub fn shade(light: &Light, normal: &Vec3, forward: &Vec3) -> Shade {
    let Some(direction) = light.direction() else {
        return Shade::Fill(1);
    };

    let intensity = direction.dot(normal);
    let facing = normal.dot(forward);

    if (intensity >= 0.0 && facing < 0.0) || (intensity <= 0.0 && facing > 0.0) {
        return Shade::Culled;
    }

    let level = (intensity.abs() * f64::from(MAX_SHADE - 1)).floor() as u8 + 1;
    Shade::Fill(level.min(MAX_SHADE))
}
