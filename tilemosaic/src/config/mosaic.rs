//! Grid arithmetic configuration.

use super::defaults::{
    DEFAULT_PARALLEL_FETCHES, DEFAULT_TARGET_SIZE, DEFAULT_TILE_SIZE, DEFAULT_TRIM_MARGIN,
    MIN_TARGET_SIZE,
};
use super::file::ConfigFileError;

/// Configuration shared by the calculator, padder and assembler.
///
/// # Example
///
/// ```
/// use tilemosaic::config::MosaicConfig;
///
/// let config = MosaicConfig::default();
/// assert_eq!(config.tile_size(), 256);
/// assert_eq!(config.target_size(), 2);
///
/// let config = MosaicConfig::new()
///     .with_tile_size(512)
///     .with_trim_margin(10)
///     .with_parallel_fetches(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicConfig {
    tile_size: u32,
    trim_margin: u32,
    target_size: u32,
    parallel_fetches: usize,
}

impl MosaicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile edge length in pixels. Must be even; padding crops half tiles.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Minimum pixel distance between a point and the mosaic edge.
    pub fn with_trim_margin(mut self, trim_margin: u32) -> Self {
        self.trim_margin = trim_margin;
        self
    }

    /// Side length of the padded square in tiles.
    pub fn with_target_size(mut self, target_size: u32) -> Self {
        self.target_size = target_size;
        self
    }

    /// Tiles fetched concurrently. `1` fetches sequentially.
    pub fn with_parallel_fetches(mut self, parallel_fetches: usize) -> Self {
        self.parallel_fetches = parallel_fetches;
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn trim_margin(&self) -> u32 {
        self.trim_margin
    }

    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    pub fn parallel_fetches(&self) -> usize {
        self.parallel_fetches
    }

    /// Checks the values that the grid arithmetic depends on.
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        let invalid = |key: &str, value: String, reason: &str| {
            Err(ConfigFileError::InvalidValue {
                section: "mosaic".to_string(),
                key: key.to_string(),
                value,
                reason: reason.to_string(),
            })
        };

        if self.tile_size == 0 || self.tile_size % 2 != 0 {
            return invalid(
                "tile_size",
                self.tile_size.to_string(),
                "must be a positive even number of pixels",
            );
        }
        if self.target_size < MIN_TARGET_SIZE {
            return invalid(
                "target_size",
                self.target_size.to_string(),
                "must be at least 2 tiles",
            );
        }
        if self.trim_margin >= self.tile_size {
            return invalid(
                "trim_margin",
                self.trim_margin.to_string(),
                "must be smaller than the tile size",
            );
        }
        if self.parallel_fetches == 0 {
            return invalid("parallel_fetches", "0".to_string(), "must be at least 1");
        }
        Ok(())
    }
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            trim_margin: DEFAULT_TRIM_MARGIN,
            target_size: DEFAULT_TARGET_SIZE,
            parallel_fetches: DEFAULT_PARALLEL_FETCHES,
        }
    }
}
