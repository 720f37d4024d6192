use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pixel size of one input item (e.g. a photograph). Only the aspect ratio
/// matters to the packer; the item itself is never mutated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ItemSize {
    pub w: f64,
    pub h: f64,
}

impl ItemSize {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned rectangle in canvas-local pixels. `x,y` is top-left, y grows
/// downward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// An item's footprint in whole grid blocks.
///
/// Immutable value: every "force"/"reduce" operation on [`BlockSizer`] returns
/// a fresh `BlockDims` instead of mutating a shared instance.
///
/// [`BlockSizer`]: crate::packer::block::BlockSizer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockDims {
    pub w: usize,
    pub h: usize,
}

impl BlockDims {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h }
    }
}

/// A committed placement within one page: origin cell plus the block footprint
/// actually used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedSlot {
    /// Origin column (0-based, leftmost column of the footprint).
    pub col: usize,
    /// Origin row (0-based, topmost row of the footprint).
    pub row: usize,
    pub dims: BlockDims,
}

/// Canvas/grid parameters the winning layout was computed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutMeta {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub columns: usize,
    pub rows: usize,
    pub spacing: f64,
    pub outer_gutters: bool,
    /// Scale ratio of the winning variant (1.0 = unscaled).
    pub scale: f64,
    /// Number of items in the input sequence.
    pub num_items: usize,
}

/// Final layout: pixel rectangle per input index, plus metadata.
///
/// Indices of items dropped due to grid saturation are absent from `frames`;
/// callers must tolerate missing keys (e.g. hide the item).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub frames: BTreeMap<usize, Rect>,
    pub meta: LayoutMeta,
}

/// Statistics about how well a layout fills the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Total number of input items.
    pub num_items: usize,
    /// Items that received a rectangle.
    pub num_placed: usize,
    /// Items omitted because the grid saturated.
    pub num_dropped: usize,
    /// Sum of emitted rectangle areas.
    pub covered_area: f64,
    /// Canvas area (width * height).
    pub canvas_area: f64,
    /// covered_area / canvas_area (0.0 to 1.0). Higher is better.
    pub coverage: f64,
}

impl Layout {
    pub fn frame(&self, index: usize) -> Option<&Rect> {
        self.frames.get(&index)
    }

    /// Computes fill statistics for this layout.
    pub fn stats(&self) -> LayoutStats {
        let num_placed = self.frames.len();
        let covered_area: f64 = self.frames.values().map(|r| r.w * r.h).sum();
        let canvas_area = self.meta.canvas_width * self.meta.canvas_height;
        let coverage = if canvas_area > 0.0 {
            covered_area / canvas_area
        } else {
            0.0
        };
        LayoutStats {
            num_items: self.meta.num_items,
            num_placed,
            num_dropped: self.meta.num_items.saturating_sub(num_placed),
            covered_area,
            canvas_area,
            coverage,
        }
    }
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Items: {}, Placed: {}, Dropped: {}, Coverage: {:.2}%",
            self.num_items,
            self.num_placed,
            self.num_dropped,
            self.coverage * 100.0,
        )
    }
}
