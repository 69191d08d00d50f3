//! Engine hyperparameters, fixed at construction.

use super::DetectError;

/// Detection scan configuration.
///
/// The window/block/cell geometry defines the feature-descriptor granularity
/// and must match what the classifier was trained on, or detection silently
/// degrades; `validate` catches the arithmetically impossible combinations.
/// Level count and scale factor set how many pyramid levels are scanned and
/// by what ratio. The hit threshold is the minimum accepted confidence; the
/// group threshold is the minimum cluster population kept by the engine's
/// internal grouping (0 disables grouping).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Detection window, pixels (width, height).
    pub win_size: (u32, u32),
    /// Feature block, pixels.
    pub block_size: (u32, u32),
    /// Step between blocks inside a window, pixels.
    pub block_stride: (u32, u32),
    /// Histogram cell, pixels.
    pub cell_size: (u32, u32),
    /// Orientation histogram bins per cell.
    pub nbins: u32,
    /// Number of pyramid levels scanned.
    pub levels: u32,
    /// Multiplicative downscale between consecutive levels.
    pub scale_factor: f64,
    /// Step between detection windows, pixels.
    pub win_stride: (u32, u32),
    /// Minimum classifier confidence accepted as a candidate.
    pub hit_threshold: f32,
    /// Minimum cluster population for the internal grouping pass.
    pub group_threshold: u32,
    /// Canonical working resolution the engine is calibrated for.
    pub input_size: (u32, u32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            win_size: (48, 96),
            block_size: (16, 16),
            block_stride: (8, 8),
            cell_size: (8, 8),
            nbins: 9,
            levels: 13,
            scale_factor: 1.1,
            win_stride: (8, 8),
            hit_threshold: 0.9,
            group_threshold: 2,
            input_size: (640, 480),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), DetectError> {
        let invalid = |msg: &str| Err(DetectError::InvalidConfig(msg.to_string()));

        if self.win_size.0 == 0 || self.win_size.1 == 0 {
            return invalid("window size must be non-zero");
        }
        if self.block_size.0 == 0 || self.block_size.1 == 0 {
            return invalid("block size must be non-zero");
        }
        if self.block_stride.0 == 0 || self.block_stride.1 == 0 {
            return invalid("block stride must be non-zero");
        }
        if self.cell_size.0 == 0 || self.cell_size.1 == 0 {
            return invalid("cell size must be non-zero");
        }
        if self.win_size.0 < self.block_size.0 || self.win_size.1 < self.block_size.1 {
            return invalid("window must be at least one block");
        }
        if (self.win_size.0 - self.block_size.0) % self.block_stride.0 != 0
            || (self.win_size.1 - self.block_size.1) % self.block_stride.1 != 0
        {
            return invalid("window minus block must be a multiple of block stride");
        }
        if self.block_size.0 % self.cell_size.0 != 0 || self.block_size.1 % self.cell_size.1 != 0 {
            return invalid("block size must be a multiple of cell size");
        }
        if self.nbins == 0 {
            return invalid("histogram bin count must be non-zero");
        }
        if self.levels == 0 {
            return invalid("at least one pyramid level is required");
        }
        if !(self.scale_factor > 1.0) {
            return invalid("scale factor must exceed 1.0");
        }
        if self.win_stride.0 == 0 || self.win_stride.1 == 0 {
            return invalid("window stride must be non-zero");
        }
        if !self.hit_threshold.is_finite() {
            return invalid("hit threshold must be finite");
        }
        if self.input_size.0 < self.win_size.0 || self.input_size.1 < self.win_size.1 {
            return invalid("working resolution must fit the detection window");
        }
        Ok(())
    }
}
