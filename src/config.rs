use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::BoardLayout;

pub const DEFAULT_RENDER_SIZE: f32 = 480.0;
pub const DEFAULT_GRID_FRACTION: f32 = 0.78;
pub const DEFAULT_FRAMES_PER_WAVE: u32 = 6;

/// Host-supplied layout and animation settings.
///
/// Missing fields fall back to the defaults, so `{}` is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Side length of the square playfield in pointer units.
    pub render_size: f32,
    /// Share of `render_size` covered by the 8x8 grid.
    pub grid_fraction: f32,
    /// Idle frames after each flip wave; 0 reveals one wave per frame.
    pub frames_per_wave: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            render_size: DEFAULT_RENDER_SIZE,
            grid_fraction: DEFAULT_GRID_FRACTION,
            frames_per_wave: DEFAULT_FRAMES_PER_WAVE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("render size must be positive and finite, got {0}")]
    RenderSize(f32),
    #[error("grid fraction must be in (0, 1], got {0}")]
    GridFraction(f32),
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<BoardLayout, ConfigError> {
        if !self.render_size.is_finite() || self.render_size <= 0.0 {
            return Err(ConfigError::RenderSize(self.render_size));
        }
        if !(self.grid_fraction > 0.0 && self.grid_fraction <= 1.0) {
            return Err(ConfigError::GridFraction(self.grid_fraction));
        }
        Ok(BoardLayout::new(self.render_size, self.grid_fraction))
    }
}
