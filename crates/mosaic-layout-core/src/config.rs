use serde::{Deserialize, Serialize};

/// Mosaic canvas and grid configuration.
///
/// The canvas is divided into `columns` x `rows` uniform blocks; `spacing`
/// pixels separate neighboring items, and `outer_gutters` adds one extra
/// spacing unit along the outside edges of the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MosaicConfig {
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Number of grid columns.
    pub columns: usize,
    /// Number of grid rows.
    pub rows: usize,
    /// Inter-item spacing in pixels.
    pub spacing: f64,
    /// Add a spacing unit at the outer edge of the grid.
    pub outer_gutters: bool,
    /// Evaluate scale variants in parallel when the `parallel` feature is on.
    /// Variant order (and therefore tie-breaks) is preserved either way.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024.0,
            canvas_height: 768.0,
            columns: 4,
            rows: 3,
            spacing: 2.0,
            outer_gutters: false,
            parallel: false,
        }
    }
}

impl MosaicConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - Canvas dimensions are non-positive or non-finite
    /// - Columns or rows are zero
    /// - Spacing is negative, non-finite, or leaves no room for blocks
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::MosaicError;

        if !self.canvas_width.is_finite()
            || !self.canvas_height.is_finite()
            || self.canvas_width <= 0.0
            || self.canvas_height <= 0.0
        {
            return Err(MosaicError::InvalidDimensions {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }

        if self.columns == 0 || self.rows == 0 {
            return Err(MosaicError::InvalidConfig(format!(
                "grid must have at least 1 column and 1 row, got {}x{}",
                self.columns, self.rows
            )));
        }

        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(MosaicError::InvalidConfig(format!(
                "spacing must be a finite non-negative number, got {}",
                self.spacing
            )));
        }

        let (bw, bh) = self.block_size();
        if bw <= 0.0 || bh <= 0.0 {
            return Err(MosaicError::InvalidConfig(format!(
                "spacing ({}) leaves no room for blocks on a {}x{} canvas",
                self.spacing, self.canvas_width, self.canvas_height
            )));
        }

        Ok(())
    }

    /// Pixel size of one grid block `(width, height)`.
    ///
    /// Each axis subtracts the spacing budget first: `n` gutters between and
    /// around items, plus 2 extra when `outer_gutters` is set. Zero
    /// columns/rows degrade to a 1px block instead of dividing by zero; that
    /// path is a guard, not defined behavior (see `validate`).
    pub fn block_size(&self) -> (f64, f64) {
        let outer_extra = if self.outer_gutters { 2 } else { 0 };
        let bw = if self.columns == 0 {
            1.0
        } else {
            let gutter_total = (self.columns + outer_extra) as f64 * self.spacing;
            (self.canvas_width - gutter_total) / self.columns as f64
        };
        let bh = if self.rows == 0 {
            1.0
        } else {
            let gutter_total = (self.rows + outer_extra) as f64 * self.spacing;
            (self.canvas_height - gutter_total) / self.rows as f64
        };
        (bw, bh)
    }

    /// The larger of the two grid dimensions; the planner probes this many
    /// scale variants.
    pub fn max_dim(&self) -> usize {
        self.columns.max(self.rows)
    }

    /// Create a fluent builder for `MosaicConfig`.
    pub fn builder() -> MosaicConfigBuilder {
        MosaicConfigBuilder::new()
    }
}

/// Builder for `MosaicConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct MosaicConfigBuilder {
    cfg: MosaicConfig,
}

impl MosaicConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: MosaicConfig::default(),
        }
    }
    pub fn with_canvas(mut self, w: f64, h: f64) -> Self {
        self.cfg.canvas_width = w;
        self.cfg.canvas_height = h;
        self
    }
    pub fn with_grid(mut self, columns: usize, rows: usize) -> Self {
        self.cfg.columns = columns;
        self.cfg.rows = rows;
        self
    }
    pub fn spacing(mut self, v: f64) -> Self {
        self.cfg.spacing = v;
        self
    }
    pub fn outer_gutters(mut self, v: bool) -> Self {
        self.cfg.outer_gutters = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> MosaicConfig {
        self.cfg
    }
}
