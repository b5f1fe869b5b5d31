use serde::{Deserialize, Serialize};

/// Drawn rectangles smaller than this (in image pixels) on either side are dropped.
pub const MIN_DRAW_SIZE: f64 = 4.0;

pub type ZoneId = u32;

// ── Geometry ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in image-pixel space, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Rectangle spanned by two corners, whatever the drag direction.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (a.0 - b.0).abs(),
            height: (a.1 - b.1).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: (f64, f64)) -> bool {
        p.0 >= self.x && p.0 <= self.right() && p.1 >= self.y && p.1 <= self.bottom()
    }

    /// Strict AABB overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn is_drawable(&self) -> bool {
        self.width >= MIN_DRAW_SIZE && self.height >= MIN_DRAW_SIZE
    }
}

// ── Zone ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub label: String,
    pub rect: Rect,
    pub class: Option<String>,
}

impl Zone {
    pub fn new(id: ZoneId, label: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            label: label.into(),
            rect,
            class: None,
        }
    }

    pub fn default_label(id: ZoneId) -> String {
        format!("Zone {id}")
    }
}
