//! Core library for mosaic grid layouts.
//!
//! Given a fixed canvas divided into a uniform block grid, the planner
//! assigns every aspect-ratio-carrying item (e.g. a photo) a pixel rectangle
//! that respects its aspect ratio as closely as the grid allows while filling
//! the canvas:
//!
//! - `BlockSizer` converts continuous aspect ratios into whole-block
//!   footprints
//! - `PagePacker` greedily places footprints onto per-column fill heights
//! - `compute_placements` probes several globally-scaled variants of the item
//!   set and keeps the best-filling page
//!
//! Quick example:
//! ```ignore
//! use mosaic_layout_core::{ItemSize, MosaicConfig, compute_placements};
//! # fn main() -> mosaic_layout_core::Result<()> {
//! let cfg = MosaicConfig::builder()
//!     .with_canvas(1200.0, 900.0)
//!     .with_grid(4, 3)
//!     .spacing(4.0)
//!     .build();
//! let items = vec![ItemSize::new(1600.0, 1200.0), ItemSize::new(800.0, 1200.0)];
//! let layout = compute_placements(&items, &cfg)?;
//! println!("placed {} of {}", layout.frames.len(), items.len());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod planner;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use planner::*;

/// Convenience prelude for common types and functions.
/// Importing `mosaic_layout_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{MosaicConfig, MosaicConfigBuilder};
    pub use crate::export::{to_json_array, to_json_hash};
    pub use crate::model::{BlockDims, ItemSize, Layout, LayoutStats, PlacedSlot, Rect};
    pub use crate::packer::{BlockSizer, ColumnSpan, PagePacker, PageState};
    pub use crate::planner::compute_placements;
    pub use crate::{MosaicError, Result};
}
