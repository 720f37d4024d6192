use super::block::BlockSizer;
use super::grid::{ColumnSpan, PageState};
use crate::config::MosaicConfig;
use crate::model::{BlockDims, ItemSize, PlacedSlot};
use tracing::trace;

/// Maximum tolerated difference between the tallest and shortest column
/// before new items are pre-shrunk to fit the flattest region.
const STAIRCASE_THRESHOLD: usize = 2;

/// Greedy placer: processes items in input order into a fresh [`PageState`],
/// assigning each the lowest available column span and shrinking it when no
/// span is wide enough.
#[derive(Debug, Clone, Copy)]
pub struct PagePacker {
    columns: usize,
    rows: usize,
    sizer: BlockSizer,
}

impl PagePacker {
    pub fn new(cfg: &MosaicConfig) -> Self {
        Self {
            columns: cfg.columns,
            rows: cfg.rows,
            sizer: BlockSizer::new(cfg),
        }
    }

    pub fn sizer(&self) -> &BlockSizer {
        &self.sizer
    }

    /// Lays out `items` onto one page. Never fails: items that no longer fit
    /// once the grid saturates are simply omitted from the result.
    pub fn layout_page(&self, items: &[ItemSize]) -> PageState {
        let mut page = PageState::new(self.columns);
        if self.columns == 0 || self.rows == 0 {
            return page;
        }

        for (index, &item) in items.iter().enumerate() {
            let mut dims = self.sizer.block_size(item);

            // A tall staircase forces awkward placements later; cap the item
            // to the flattest region before it leans into a tall column.
            if page.largest_column_height() - page.smallest_column_height() > STAIRCASE_THRESHOLD {
                let ideal = page.widest_span_at_smallest_height();
                if dims.w > ideal.count {
                    dims = self.sizer.force_width(item, ideal.count);
                }
            }

            if page.is_saturated(self.rows) {
                return page;
            }

            loop {
                match self.best_span(&page, dims.w) {
                    Some(span) => {
                        let slot = self.fit_to_span(item, dims, span);
                        trace!(index, ?slot, "placed");
                        page.set_slot(index, slot);
                        break;
                    }
                    None => {
                        // No span is wide enough; shrink and retry. Width
                        // bottoms out at 1, which always fits somewhere on a
                        // non-saturated page.
                        dims = self.sizer.reduce(item, dims);
                    }
                }
            }
        }

        page
    }

    /// The lowest span at least `width` columns wide and not yet at the row
    /// limit; ties go to the leftmost.
    fn best_span(&self, page: &PageState, width: usize) -> Option<ColumnSpan> {
        page.spans()
            .into_iter()
            .filter(|s| s.count >= width && s.height < self.rows)
            .min_by_key(|s| (s.height, s.start))
    }

    /// Final footprint inside `span`: width forced to the effective width,
    /// height capped so the slot never crosses the bottom row.
    fn fit_to_span(&self, item: ItemSize, dims: BlockDims, span: ColumnSpan) -> PlacedSlot {
        let width = dims.w.min(span.count);
        let mut dims = self.sizer.force_width(item, width);
        if span.height + dims.h > self.rows {
            dims = self.sizer.force_height(item, (self.rows - span.height).max(1));
            // force_height re-derives width from the aspect ratio, which may
            // exceed the chosen span; clamp so footprints stay disjoint.
            if dims.w > width {
                dims = BlockDims::new(width, dims.h);
            }
        }
        PlacedSlot {
            col: span.start,
            row: span.height,
            dims,
        }
    }
}
