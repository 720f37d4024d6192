use crate::model::PlacedSlot;
use std::collections::BTreeMap;

/// A maximal contiguous run of columns sharing the same fill height.
/// Ephemeral; recomputed by the packer for every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    /// First column of the run.
    pub start: usize,
    /// Number of columns in the run.
    pub count: usize,
    /// Shared fill height in blocks.
    pub height: usize,
}

/// One packing attempt: per-column fill heights plus the slots committed so
/// far, keyed by item index.
///
/// Invariants: placed footprints never overlap, and no column height exceeds
/// the row count the packer was configured with.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    heights: Vec<usize>,
    slots: BTreeMap<usize, PlacedSlot>,
}

impl PageState {
    pub fn new(columns: usize) -> Self {
        Self {
            heights: vec![0; columns],
            slots: BTreeMap::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.heights.len()
    }

    pub fn height_for_column(&self, column: usize) -> usize {
        self.heights[column]
    }

    /// The maximal run of equal-height columns starting at `start`.
    pub fn span_starting_at(&self, start: usize) -> ColumnSpan {
        let height = self.heights[start];
        let count = self.heights[start..]
            .iter()
            .take_while(|&&h| h == height)
            .count();
        ColumnSpan {
            start,
            count,
            height,
        }
    }

    /// Partition of all columns into maximal equal-height spans, left to
    /// right.
    pub fn spans(&self) -> Vec<ColumnSpan> {
        let mut out = Vec::new();
        let mut start = 0;
        while start < self.heights.len() {
            let span = self.span_starting_at(start);
            start += span.count;
            out.push(span);
        }
        out
    }

    pub fn largest_column_height(&self) -> usize {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    pub fn smallest_column_height(&self) -> usize {
        self.heights.iter().copied().min().unwrap_or(0)
    }

    /// Among all spans, the one at minimal height; ties go to the widest,
    /// then to the leftmost.
    pub fn widest_span_at_smallest_height(&self) -> ColumnSpan {
        let mut best = ColumnSpan {
            start: 0,
            count: 0,
            height: usize::MAX,
        };
        for span in self.spans() {
            if span.height < best.height || (span.height == best.height && span.count > best.count)
            {
                best = span;
            }
        }
        best
    }

    /// True once every column has reached `rows`.
    pub fn is_saturated(&self, rows: usize) -> bool {
        !self.heights.is_empty() && self.heights.iter().all(|&h| h >= rows)
    }

    /// Commits `slot` for the item at `index`, raising every spanned column
    /// by the slot's block height.
    pub fn set_slot(&mut self, index: usize, slot: PlacedSlot) {
        for h in &mut self.heights[slot.col..slot.col + slot.dims.w] {
            *h += slot.dims.h;
        }
        self.slots.insert(index, slot);
    }

    pub fn slots(&self) -> &BTreeMap<usize, PlacedSlot> {
        &self.slots
    }

    pub fn num_placed(&self) -> usize {
        self.slots.len()
    }
}
