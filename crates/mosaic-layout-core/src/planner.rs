use crate::config::MosaicConfig;
use crate::error::Result;
use crate::model::{ItemSize, Layout, LayoutMeta, Rect};
use crate::packer::{PagePacker, PageState};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Computes the placement of `items` on the configured canvas.
///
/// The planner probes `max(columns, rows)` globally-scaled variants of the
/// item set (scale ratios `s/max_dim` for `s = max_dim..=1`, in that order),
/// packs each variant, and keeps the page that fills every column — or, when
/// none does, the page that places the most items. On a placed-count tie the
/// later variant (smaller scale) wins; the variant order is part of the
/// output contract and is preserved under the `parallel` feature.
///
/// Items dropped due to grid saturation are absent from the returned mapping.
#[instrument(skip_all, fields(items = items.len()))]
pub fn compute_placements(items: &[ItemSize], cfg: &MosaicConfig) -> Result<Layout> {
    cfg.validate()?;

    if items.is_empty() {
        return Ok(empty_layout(cfg));
    }

    let max_dim = cfg.max_dim();
    let variants: Vec<(f64, Vec<ItemSize>)> = (1..=max_dim)
        .rev()
        .map(|step| {
            let ratio = step as f64 / max_dim as f64;
            (ratio, scale_variant(items, cfg, ratio))
        })
        .collect();

    let packer = PagePacker::new(cfg);
    let pages = pack_variants(&packer, &variants, cfg);

    let full: Vec<&(f64, PageState)> = pages
        .iter()
        .filter(|(_, page)| page.is_saturated(cfg.rows))
        .collect();
    let candidates: Vec<&(f64, PageState)> = if full.is_empty() {
        pages.iter().collect()
    } else {
        full
    };

    // Most placed items wins; `>=` lets later candidates (smaller ratios)
    // take ties, matching stable-sort-ascending-then-take-last.
    let mut best = candidates[0];
    for cand in &candidates[1..] {
        if cand.1.num_placed() >= best.1.num_placed() {
            best = cand;
        }
    }
    debug!(
        scale = best.0,
        placed = best.1.num_placed(),
        full = best.1.is_saturated(cfg.rows),
        "selected variant"
    );

    Ok(frames_for_page(&best.1, best.0, items.len(), cfg))
}

#[cfg(feature = "parallel")]
fn pack_variants(
    packer: &PagePacker,
    variants: &[(f64, Vec<ItemSize>)],
    cfg: &MosaicConfig,
) -> Vec<(f64, PageState)> {
    if cfg.parallel {
        // Ordered collect keeps the generation order, so tie-breaks match the
        // sequential path bit for bit.
        variants
            .par_iter()
            .map(|(ratio, sizes)| (*ratio, packer.layout_page(sizes)))
            .collect()
    } else {
        variants
            .iter()
            .map(|(ratio, sizes)| (*ratio, packer.layout_page(sizes)))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn pack_variants(
    packer: &PagePacker,
    variants: &[(f64, Vec<ItemSize>)],
    _cfg: &MosaicConfig,
) -> Vec<(f64, PageState)> {
    variants
        .iter()
        .map(|(ratio, sizes)| (*ratio, packer.layout_page(sizes)))
        .collect()
}

/// One scaled copy of the item set: each item is first normalized to fit the
/// canvas (preserving aspect ratio, never scaling up), then multiplied by
/// `ratio`.
fn scale_variant(items: &[ItemSize], cfg: &MosaicConfig, ratio: f64) -> Vec<ItemSize> {
    items
        .iter()
        .map(|&item| {
            let n = normalize_to_canvas(item, cfg);
            ItemSize::new(n.w * ratio, n.h * ratio)
        })
        .collect()
}

fn normalize_to_canvas(item: ItemSize, cfg: &MosaicConfig) -> ItemSize {
    if item.w <= 0.0 || item.h <= 0.0 {
        // Degenerate sizes collapse to 1x1 blocks later; leave them alone.
        return item;
    }
    let aspect = item.w / item.h;
    if item.w > item.h {
        if item.w > cfg.canvas_width {
            ItemSize::new(cfg.canvas_width, cfg.canvas_width / aspect)
        } else {
            item
        }
    } else if item.h > cfg.canvas_height {
        ItemSize::new(cfg.canvas_height * aspect, cfg.canvas_height)
    } else {
        item
    }
}

/// Converts the winning page's slots into pixel rectangles, honoring spacing
/// and the outer-gutter rule.
fn frames_for_page(page: &PageState, scale: f64, num_items: usize, cfg: &MosaicConfig) -> Layout {
    let (bw, bh) = cfg.block_size();
    let g = cfg.spacing;
    let edge = if cfg.outer_gutters { 1.0 } else { 0.0 };

    let mut frames = BTreeMap::new();
    for (&index, slot) in page.slots() {
        let w = slot.dims.w as f64;
        let h = slot.dims.h as f64;
        let x = slot.col as f64 * bw + g * (w + edge);
        let y = slot.row as f64 * bh + g * (h + edge);
        let rect_w = bw * w - g * (w - edge);
        let rect_h = bh * h - g * (h - edge);
        frames.insert(index, Rect::new(x, y, rect_w, rect_h));
    }

    Layout {
        frames,
        meta: meta_for(cfg, scale, num_items),
    }
}

fn empty_layout(cfg: &MosaicConfig) -> Layout {
    Layout {
        frames: BTreeMap::new(),
        meta: meta_for(cfg, 1.0, 0),
    }
}

fn meta_for(cfg: &MosaicConfig, scale: f64, num_items: usize) -> LayoutMeta {
    LayoutMeta {
        canvas_width: cfg.canvas_width,
        canvas_height: cfg.canvas_height,
        columns: cfg.columns,
        rows: cfg.rows,
        spacing: cfg.spacing,
        outer_gutters: cfg.outer_gutters,
        scale,
        num_items,
    }
}
