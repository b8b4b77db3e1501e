use serde::Serialize;

use super::geometry::BoundingBox;

/// Square drawing surface; labels must stay inside the inset region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub size: f32,
    pub center: (f32, f32),
    pub boundary_margin: f32,
}

impl Canvas {
    pub fn new(size: f32, boundary_margin: f32) -> Self {
        Self {
            size,
            center: (size * 0.5, size * 0.5),
            boundary_margin,
        }
    }

    pub fn contains(&self, bounds: &BoundingBox) -> bool {
        bounds.contained_in(self.boundary_margin, self.size - self.boundary_margin)
    }
}

/// The top-ranked entry, pinned to the canvas center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterLabel {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutItem {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Placed {
        x: f32,
        y: f32,
        rotation: f32,
        /// Rotated bounds before the collision margin is applied.
        bounds: BoundingBox,
    },
    Unplaced,
}

impl Placement {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub item: LayoutItem,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnplacedReason {
    /// Text metrics could not measure the label.
    Metrics,
    /// Spiral and fallback ring found no free spot.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnplacedLabel {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub reason: UnplacedReason,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub canvas: Canvas,
    pub center: Option<CenterLabel>,
    /// Placed labels in placement order (largest first).
    pub labels: Vec<PlacedLabel>,
    pub unplaced: Vec<UnplacedLabel>,
    /// Reserved footprints including margins; the center box comes first.
    pub boxes: Vec<BoundingBox>,
}

impl Layout {
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            canvas,
            center: None,
            labels: Vec::new(),
            unplaced: Vec::new(),
            boxes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.center.is_none()
    }
}
