//! Tile source types and traits

use std::fmt;

/// Errors that can occur while fetching a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed
    HttpError(String),
    /// Tile indices outside the grid of the requested zoom level
    UnsupportedCoordinates { x: u32, y: u32, zoom: u8 },
    /// Zoom level not supported by this source
    UnsupportedZoom(u8),
    /// Invalid response data from the tile server
    InvalidResponse(String),
    /// Source-specific error (misconfiguration, missing key, ...)
    ProviderSpecific(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::UnsupportedCoordinates { x, y, zoom } => {
                write!(
                    f,
                    "Tile ({}, {}) at zoom {} not supported by provider",
                    x, y, zoom
                )
            }
            ProviderError::UnsupportedZoom(zoom) => {
                write!(f, "Zoom level {} not supported by provider", zoom)
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ProviderError::ProviderSpecific(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Trait for slippy-map tile sources.
///
/// Implementors return the encoded raster bytes (PNG, JPEG, ...) of one tile
/// addressed by column, row and zoom level.
pub trait TileSource: Send + Sync {
    /// Fetches the tile at column `x`, row `y`.
    ///
    /// # Returns
    ///
    /// Raw encoded image data or an error.
    fn fetch_tile(&self, x: u32, y: u32, zoom: u8) -> Result<Vec<u8>, ProviderError>;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the minimum supported zoom level.
    fn min_zoom(&self) -> u8;

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8;

    /// Checks if this source supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}

impl<T: TileSource + ?Sized> TileSource for std::sync::Arc<T> {
    fn fetch_tile(&self, x: u32, y: u32, zoom: u8) -> Result<Vec<u8>, ProviderError> {
        (**self).fetch_tile(x, y, zoom)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn min_zoom(&self) -> u8 {
        (**self).min_zoom()
    }

    fn max_zoom(&self) -> u8 {
        (**self).max_zoom()
    }
}

/// Validates tile indices against the grid size of `zoom`.
pub(crate) fn check_indices(x: u32, y: u32, zoom: u8) -> Result<(), ProviderError> {
    let count = crate::coord::tile_count(zoom);
    if x >= count || y >= count {
        return Err(ProviderError::UnsupportedCoordinates { x, y, zoom });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl TileSource for Fixed {
        fn fetch_tile(&self, _x: u32, _y: u32, _zoom: u8) -> Result<Vec<u8>, ProviderError> {
            Ok(vec![7])
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn min_zoom(&self) -> u8 {
            2
        }

        fn max_zoom(&self) -> u8 {
            10
        }
    }

    #[test]
    fn test_supports_zoom_range() {
        let source = Fixed;
        assert!(!source.supports_zoom(1));
        assert!(source.supports_zoom(2));
        assert!(source.supports_zoom(10));
        assert!(!source.supports_zoom(11));
    }

    #[test]
    fn test_arc_delegates() {
        let source = std::sync::Arc::new(Fixed);
        assert_eq!(source.name(), "fixed");
        assert_eq!(source.fetch_tile(0, 0, 3), Ok(vec![7]));
    }

    #[test]
    fn test_check_indices() {
        assert!(check_indices(3, 3, 2).is_ok());
        assert_eq!(
            check_indices(4, 0, 2),
            Err(ProviderError::UnsupportedCoordinates { x: 4, y: 0, zoom: 2 })
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProviderError::UnsupportedZoom(21).to_string(),
            "Zoom level 21 not supported by provider"
        );
        assert_eq!(
            ProviderError::ProviderSpecific("no key".into()).to_string(),
            "Provider error: no key"
        );
    }
}
