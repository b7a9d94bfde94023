//! Configuration for tilemosaic components.
//!
//! - [`MosaicConfig`]: grid arithmetic settings (tile size, trim margin,
//!   target square, fetch parallelism), built in code
//! - [`ConfigFile`]: the user's `~/.tilemosaic/config.ini`, which embeds a
//!   `MosaicConfig` in its `[mosaic]` section
//!
//! # Example
//!
//! ```
//! use tilemosaic::config::{ConfigFile, MosaicConfig};
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.mosaic, MosaicConfig::default());
//! ```

mod defaults;
mod file;
mod mosaic;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use mosaic::MosaicConfig;
pub use settings::{ConfigFile, LoggingSettings, OutputSettings, TilesSettings};
