use crate::config::MosaicConfig;
use crate::model::{BlockDims, ItemSize};

/// Converts an item's pixel aspect ratio into a block-unit footprint.
///
/// All results are clamped to `[1, columns]` x `[1, rows]`; degenerate item
/// sizes collapse to a single block instead of signaling.
#[derive(Debug, Clone, Copy)]
pub struct BlockSizer {
    block_w: f64,
    block_h: f64,
    columns: usize,
    rows: usize,
}

impl BlockSizer {
    pub fn new(cfg: &MosaicConfig) -> Self {
        let (block_w, block_h) = cfg.block_size();
        Self {
            block_w,
            block_h,
            columns: cfg.columns,
            rows: cfg.rows,
        }
    }

    #[inline]
    fn clamp_w(&self, blocks: f64) -> usize {
        clamp_blocks(blocks, self.columns)
    }

    #[inline]
    fn clamp_h(&self, blocks: f64) -> usize {
        clamp_blocks(blocks, self.rows)
    }

    /// Block width from the item's raw pixel width (integer division by the
    /// rounded block width).
    pub fn width_blocks(&self, item: ItemSize) -> usize {
        if item.w <= 0.0 || item.h <= 0.0 {
            return 1;
        }
        let divisor = self.block_w.round().max(1.0);
        self.clamp_w((item.w.round() / divisor).floor())
    }

    /// Block height from the item's raw pixel height.
    pub fn height_blocks(&self, item: ItemSize) -> usize {
        if item.w <= 0.0 || item.h <= 0.0 {
            return 1;
        }
        let divisor = self.block_h.round().max(1.0);
        self.clamp_h((item.h.round() / divisor).floor())
    }

    /// Block height that preserves the item's aspect ratio once its width is
    /// forced to `width` blocks.
    pub fn height_for_width(&self, item: ItemSize, width: usize) -> usize {
        if item.h <= 0.0 {
            return 1;
        }
        let ratio = item.w / item.h;
        let pixel_w = (self.block_w * width as f64).floor();
        let pixel_h = pixel_w / ratio;
        self.clamp_h((pixel_h / self.block_h).round())
    }

    /// Block width that preserves the item's aspect ratio once its height is
    /// forced to `height` blocks.
    pub fn width_for_height(&self, item: ItemSize, height: usize) -> usize {
        if item.h <= 0.0 {
            return 1;
        }
        let ratio = item.w / item.h;
        let pixel_h = (self.block_h * height as f64).floor();
        let pixel_w = pixel_h * ratio;
        self.clamp_w((pixel_w / self.block_w).round())
    }

    /// Initial footprint for an item. Portrait items size their height first
    /// and derive width from it; everything else sizes width first.
    pub fn block_size(&self, item: ItemSize) -> BlockDims {
        if item.h > item.w {
            let h = self.height_blocks(item);
            BlockDims::new(self.width_for_height(item, h), h)
        } else {
            let w = self.width_blocks(item);
            BlockDims::new(w, self.height_for_width(item, w))
        }
    }

    /// Footprint with width pinned to `width` and height recomputed.
    pub fn force_width(&self, item: ItemSize, width: usize) -> BlockDims {
        BlockDims::new(width, self.height_for_width(item, width))
    }

    /// Footprint with height pinned to `height` and width recomputed.
    pub fn force_height(&self, item: ItemSize, height: usize) -> BlockDims {
        BlockDims::new(self.width_for_height(item, height), height)
    }

    /// Shrinks the footprint by one block along its larger dimension (ties
    /// shrink width; never below 1), recomputing the other dimension from the
    /// shrunk one so the retry loop in the packer converges.
    pub fn reduce(&self, item: ItemSize, dims: BlockDims) -> BlockDims {
        if dims.w >= dims.h {
            self.force_width(item, dims.w.saturating_sub(1).max(1))
        } else {
            self.force_height(item, dims.h.saturating_sub(1).max(1))
        }
    }
}

#[inline]
fn clamp_blocks(blocks: f64, bound: usize) -> usize {
    if !blocks.is_finite() || blocks < 1.0 {
        return 1;
    }
    (blocks as usize).clamp(1, bound.max(1))
}
