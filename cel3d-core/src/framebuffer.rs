/// Per-frame grid of palette indices
use serde::Deserialize;

use crate::shading::Palette;

/// How a fill combines with a cell that is already filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Last writer wins
    #[default]
    Overwrite,
    /// Integer running average of every fill that landed on the cell
    Average,
}

/// Shade indices for one frame, row-major, all zero (blank) at creation.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<u8>,
    /// Number of fills per cell, only maintained in `Average` mode
    overlap: Vec<u16>,
    blend: BlendMode,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_blend(width, height, BlendMode::Overwrite)
    }

    pub fn with_blend(width: usize, height: usize, blend: BlendMode) -> Self {
        let size = width * height;
        let overlap = match blend {
            BlendMode::Overwrite => Vec::new(),
            BlendMode::Average => vec![0; size],
        };
        Self {
            width,
            height,
            cells: vec![0; size],
            overlap,
            blend,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write a shade into a cell. Coordinates off the canvas are ignored.
    pub fn put(&mut self, x: i64, y: i64, shade: u8) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        match self.blend {
            BlendMode::Overwrite => self.cells[i] = shade,
            BlendMode::Average => {
                let count = u32::from(self.overlap[i]);
                let total = u32::from(self.cells[i]) * count + u32::from(shade);
                self.cells[i] = (total / (count + 1)) as u8;
                self.overlap[i] = self.overlap[i].saturating_add(1);
            }
        }
    }

    /// Fill columns `from..=to` of row `y`
    pub fn fill_span(&mut self, y: i64, from: i64, to: i64, shade: u8) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        let from = from.max(0);
        let to = to.min(self.width as i64 - 1);
        for x in from..=to {
            self.put(x, y, shade);
        }
    }

    /// Number of cells holding a non-blank shade
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| **c != 0).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Render through the palette, rows joined by newlines
    pub fn to_text(&self, palette: &Palette) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                out.push('\n');
            }
            out.extend(row.iter().map(|&c| palette.glyph(c)));
        }
        out
    }
}
