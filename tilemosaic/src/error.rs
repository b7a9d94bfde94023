//! Library-wide error type.
//!
//! Every public operation of the bounding-box, padding and mosaic layers
//! returns [`MosaicError`]. Module-local errors (coordinate parsing, tile
//! providers, raster operations) convert into it with `?`.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigFileError;
use crate::coord::CoordError;
use crate::provider::ProviderError;
use crate::raster::RasterError;

/// Errors surfaced by tile-grid arithmetic and mosaic orchestration.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// No tiles were supplied to a computation that needs at least one.
    #[error("No tiles supplied")]
    EmptyInput,

    /// A coordinate could not be parsed or normalized.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),

    /// A coordinate was projected onto a grid that does not contain its tile.
    #[error("Tile ({x}, {y}) at zoom {zoom} is not part of the bounding box")]
    TileNotInBoundingBox { x: u32, y: u32, zoom: u8 },

    /// A tile reference and a bounding box disagree on the zoom level.
    #[error("Zoom mismatch: expected zoom {expected}, found zoom {found}")]
    ZoomMismatch { expected: u8, found: u8 },

    /// The requested zoom level is outside what the grid or provider supports.
    #[error("Zoom level {0} is out of range")]
    InvalidZoom(u8),

    /// A tile could not be fetched.
    #[error("Failed to fetch tile ({x}, {y}) at zoom {zoom}: {reason}")]
    TileFetchFailed {
        x: u32,
        y: u32,
        zoom: u8,
        reason: String,
    },

    /// Decoding, compositing, cropping or writing a raster failed.
    #[error("Image operation failed: {0}")]
    ImageOperationFailed(#[from] RasterError),

    /// A bounding box violates its invariants or cannot be padded.
    #[error("Malformed bounding box: {0}")]
    MalformedBoundingBox(String),

    /// The operation was cancelled through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// A configuration value is unusable.
    #[error("{0}")]
    Config(#[from] ConfigFileError),

    /// Filesystem error outside of raster encoding.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MosaicError {
    /// Builds a [`MosaicError::TileFetchFailed`] from a provider error.
    pub fn fetch_failed(x: u32, y: u32, zoom: u8, err: &ProviderError) -> Self {
        MosaicError::TileFetchFailed {
            x,
            y,
            zoom,
            reason: err.to_string(),
        }
    }

    /// Whether a caller may reasonably retry the operation.
    ///
    /// Only I/O-shaped failures qualify; arithmetic and input errors never do.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MosaicError::TileFetchFailed { .. }
                | MosaicError::ImageOperationFailed(_)
                | MosaicError::Io { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type MosaicResult<T> = Result<T, MosaicError>;
