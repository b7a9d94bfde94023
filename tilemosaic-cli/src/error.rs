//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilemosaic::config::ConfigFileError;
use tilemosaic::provider::ProviderError;
use tilemosaic::MosaicError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to set up the tile source
    Provider(ProviderError),
    /// Grid computation or rendering failed
    Mosaic(MosaicError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Mosaic(MosaicError::TileFetchFailed { .. }) => {
                eprintln!();
                eprintln!("Check that:");
                eprintln!("  1. url_template in config.ini points at a reachable tile server");
                eprintln!("  2. api_key is set if the template contains {{key}}");
            }
            CliError::Mosaic(MosaicError::MalformedBoundingBox(_)) => {
                eprintln!();
                eprintln!("The points span more tiles than the target size allows.");
                eprintln!("Try a lower --min-zoom or a larger --target-size.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Provider(e) => write!(f, "Failed to create tile source: {}", e),
            CliError::Mosaic(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Provider(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        CliError::Mosaic(e)
    }
}
