//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::mosaic::MosaicConfig;
use super::settings::*;
use crate::logging::{DEFAULT_FILTER, DEFAULT_LOG_FILE};

// =============================================================================
// Mosaic defaults
// =============================================================================

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default minimum distance in pixels between a point and the mosaic edge.
pub const DEFAULT_TRIM_MARGIN: u32 = 5;

/// Default side length, in tiles, of the padded square.
pub const DEFAULT_TARGET_SIZE: u32 = 2;

/// Smallest usable target: padding halves the grid on each side.
pub const MIN_TARGET_SIZE: u32 = 2;

/// Default number of tiles fetched concurrently.
pub const DEFAULT_PARALLEL_FETCHES: usize = 4;

// =============================================================================
// Tile source defaults
// =============================================================================

/// Default tile server.
pub const DEFAULT_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Default lowest zoom considered when fitting points.
pub const DEFAULT_MIN_ZOOM: u8 = 2;

/// Default highest zoom considered when fitting points.
pub const DEFAULT_MAX_ZOOM: u8 = 18;

/// Default HTTP timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = crate::provider::DEFAULT_TIMEOUT_SECS;

/// Default tile cache location (`<platform cache dir>/tilemosaic/tiles`).
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(config_directory)
        .join("tilemosaic")
        .join("tiles")
}

// =============================================================================
// Output defaults
// =============================================================================

/// Default image format written for each level.
pub const DEFAULT_IMAGE_FORMAT: &str = "png";

/// Default number of refinement levels after the base mosaic.
pub const DEFAULT_REFINEMENT_LEVELS: u32 = 1;

/// Default folder for rendered mosaics (`~/.tilemosaic/images`).
pub fn default_image_folder() -> PathBuf {
    config_directory().join("images")
}

/// Default log folder (`~/.tilemosaic/logs`).
pub fn default_log_directory() -> PathBuf {
    config_directory().join("logs")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            tiles: TilesSettings {
                url_template: DEFAULT_URL_TEMPLATE.to_string(),
                api_key: None,
                cache_dir: Some(default_cache_dir()),
                min_zoom: DEFAULT_MIN_ZOOM,
                max_zoom: DEFAULT_MAX_ZOOM,
                timeout: DEFAULT_FETCH_TIMEOUT_SECS,
            },
            mosaic: MosaicConfig::default(),
            output: OutputSettings {
                image_folder: default_image_folder(),
                font: None,
                format: DEFAULT_IMAGE_FORMAT.to_string(),
                refinement_levels: DEFAULT_REFINEMENT_LEVELS,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
                filter: DEFAULT_FILTER.to_string(),
            },
        }
    }
}
