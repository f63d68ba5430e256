/// Edge walking and min/max span fill
use std::collections::BTreeMap;

use crate::vector::Vec2;

/// Slopes at or above this magnitude are walked row by row
pub const STEEP_SLOPE: f64 = 0.98;

/// Round half to even onto the pixel grid
pub fn to_pixel(v: f64) -> i64 {
    v.round_ties_even() as i64
}

/// Pixels strictly between two pixel-space points, on a `width` x `height`
/// canvas.
///
/// Shallow lines step through whole columns and solve for the row, steep
/// ones step through rows. Horizontal edges yield nothing: both endpoints
/// share a row and the vertices already cover it.
///
/// The walk never leaves the canvas by more than one cell. Columns past
/// either side collapse onto column `-1` or `width`, one sample per row the
/// edge crosses there, so spans running off the canvas still reach its
/// border.
pub fn edge_pixels(p1: &Vec2, p2: &Vec2, width: usize, height: usize) -> Vec<(i64, i64)> {
    let delta = p1 - p2;
    let slope = if delta.x != 0.0 {
        delta.y / delta.x
    } else {
        f64::INFINITY
    };

    if slope == 0.0 {
        return Vec::new();
    }

    let (width, height) = (width as i64, height as i64);

    if slope.abs() < STEEP_SLOPE {
        let (a, b) = (to_pixel(p1.x), to_pixel(p2.x));
        let (lo, hi) = (a.min(b).saturating_add(1), a.max(b));
        if lo >= hi {
            return Vec::new();
        }
        let intercept = p1.y - slope * p1.x;
        let row = |x: i64| to_pixel(slope * x as f64 + intercept);

        let mut pixels = Vec::new();
        if lo < 0 {
            let last = hi.min(0) - 1;
            pixels.extend(rows_between(row(lo), row(last), height).map(|y| (-1, y)));
        }
        pixels.extend((lo.max(0)..hi.min(width)).map(|x| (x, row(x))));
        if hi > width {
            let first = lo.max(width);
            pixels.extend(rows_between(row(first), row(hi - 1), height).map(|y| (width, y)));
        }
        pixels
    } else {
        let (a, b) = (to_pixel(p1.y), to_pixel(p2.y));
        let lo = a.min(b).saturating_add(1).max(-1);
        let hi = a.max(b).min(height + 1);
        let column = |y: f64| {
            if slope.is_infinite() {
                p1.x
            } else {
                y / slope + (p1.x - p1.y / slope)
            }
        };
        (lo..hi).map(|y| (to_pixel(column(y as f64)), y)).collect()
    }
}

/// Rows from `a` to `b` inclusive, limited to `[-1, height]`.
///
/// A shallow edge moves less than one row per column, so the rows it
/// crosses over a run of columns are contiguous.
fn rows_between(a: i64, b: i64, height: i64) -> std::ops::RangeInclusive<i64> {
    a.min(b).max(-1)..=a.max(b).min(height)
}

/// Horizontal extent of a shape, row by row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spans {
    rows: BTreeMap<i64, (i64, i64)>,
}

impl Spans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen the span of row `y` to include column `x`
    pub fn add(&mut self, x: i64, y: i64) {
        self.rows
            .entry(y)
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(x);
                *hi = (*hi).max(x);
            })
            .or_insert((x, x));
    }

    pub fn get(&self, y: i64) -> Option<(i64, i64)> {
        self.rows.get(&y).copied()
    }

    /// Rows in `[top, bottom]` that received at least one sample, in order
    pub fn rows(&self, top: i64, bottom: i64) -> impl Iterator<Item = (i64, i64, i64)> + '_ {
        self.rows
            .range(top..=bottom)
            .map(|(y, (lo, hi))| (*y, *lo, *hi))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Spans covering a projected triangle, with its vertex row range.
///
/// This is a min/max fill over the vertex and edge samples, so a nearly
/// degenerate triangle can spill past its true edges.
pub fn triangle_spans(raster: &[Vec2; 3], width: usize, height: usize) -> (Spans, i64, i64) {
    let mut spans = Spans::new();
    for p in raster {
        spans.add(to_pixel(p.x), to_pixel(p.y));
    }
    for (a, b) in [(0, 1), (1, 2), (0, 2)] {
        for (x, y) in edge_pixels(&raster[a], &raster[b], width, height) {
            spans.add(x, y);
        }
    }

    let rows = raster.iter().map(|p| to_pixel(p.y));
    let top = rows.clone().min().unwrap_or(0);
    let bottom = rows.max().unwrap_or(-1);
    (spans, top, bottom)
}
