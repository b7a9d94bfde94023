//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use super::mosaic::MosaicConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Tile server and cache settings
    pub tiles: TilesSettings,
    /// Grid arithmetic settings
    pub mosaic: MosaicConfig,
    /// Where and how mosaics are written
    pub output: OutputSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Tile source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    /// URL template with `{z}`, `{x}`, `{y}` and optionally `{key}`
    pub url_template: String,
    /// API key substituted for `{key}`
    pub api_key: Option<String>,
    /// Disk cache directory (None = no disk cache)
    pub cache_dir: Option<PathBuf>,
    /// Lowest zoom level used when fitting points
    pub min_zoom: u8,
    /// Highest zoom level used when fitting points
    pub max_zoom: u8,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Folder that receives rendered mosaics
    pub image_folder: PathBuf,
    /// TrueType/OpenType font for route labels
    pub font: Option<PathBuf>,
    /// Image format (file extension) of the final images
    pub format: String,
    /// Refinement levels rendered after the base mosaic
    pub refinement_levels: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log directory
    pub directory: PathBuf,
    /// Log file name inside `directory`
    pub file: String,
    /// Filter used when `RUST_LOG` is unset
    pub filter: String,
}
