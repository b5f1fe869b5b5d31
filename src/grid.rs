//! Regular `cols × rows` tiling of the image bounds.

use crate::zone::{Rect, Size};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
    /// Replace existing zones instead of refusing to generate.
    pub clear: bool,
}

impl GridSpec {
    pub fn new(cols: u32, rows: u32, clear: bool) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            clear,
        }
    }

    /// Builds a spec from raw text fields. Anything that is not a positive
    /// integer becomes 1.
    pub fn from_input(cols: &str, rows: &str, clear: bool) -> Self {
        Self::new(coerce_dimension(cols), coerce_dimension(rows), clear)
    }

    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(4, 3, false)
    }
}

fn coerce_dimension(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.floor())
        .filter(|v| *v >= 1.0)
        .map_or(1, |v| v.min(u32::MAX as f64) as u32)
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    pub label: String,
    pub rect: Rect,
}

/// Cells in row-major order, labeled `"Zone {row}-{col}"` (1-based).
pub fn generate(spec: &GridSpec, bounds: Size) -> Vec<GridCell> {
    let cols = spec.cols.max(1);
    let rows = spec.rows.max(1);
    let xs = edges(bounds.width, cols);
    let ys = edges(bounds.height, rows);

    let mut cells = Vec::with_capacity(spec.cell_count());
    for r in 0..rows as usize {
        for c in 0..cols as usize {
            cells.push(GridCell {
                row: r as u32 + 1,
                col: c as u32 + 1,
                label: format!("Zone {}-{}", r + 1, c + 1),
                rect: Rect::new(xs[c], ys[r], xs[c + 1] - xs[c], ys[r + 1] - ys[r]),
            });
        }
    }
    cells
}

/// `n + 1` cut positions from 0 to `extent`. Extents are taken as the
/// difference of neighbouring cuts, which makes `x + width` land exactly on
/// the next cell's origin.
fn edges(extent: f64, n: u32) -> Vec<f64> {
    (0..=n).map(|i| extent * i as f64 / n as f64).collect()
}
