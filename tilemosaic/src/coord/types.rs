//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels supported by the slippy-map tile scheme
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 20;

/// A geographic coordinate expressed as a tile plus a pixel inside that tile.
///
/// `x` and `y` range over `0..2^zoom`. The X axis wraps around the
/// antimeridian, the Y axis stops at the poles. `x_offset` and `y_offset`
/// are in `0..tile_size` for the tile size the reference was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRef {
    /// Column index (east-west), 0 at the antimeridian
    pub x: u32,
    /// Row index (north-south), 0 at the north pole edge
    pub y: u32,
    /// Pixel column of the coordinate within the tile
    pub x_offset: u32,
    /// Pixel row of the coordinate within the tile
    pub y_offset: u32,
    /// Zoom level the indices belong to
    pub zoom: u8,
}

impl TileRef {
    /// Creates a tile reference from raw parts.
    pub fn new(x: u32, y: u32, x_offset: u32, y_offset: u32, zoom: u8) -> Self {
        Self {
            x,
            y,
            x_offset,
            y_offset,
            zoom,
        }
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "z{}/{}/{} (+{},+{})",
            self.zoom, self.x, self.y, self.x_offset, self.y_offset
        )
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside -90..=90 or not a finite number
    InvalidLatitude(f64),
    /// Longitude is not a finite number
    InvalidLongitude(f64),
    /// Zoom level is outside valid range (0 to 20)
    InvalidZoom(u8),
    /// Text could not be parsed as decimal degrees
    Unparseable(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(f, "Invalid latitude: {} (must be between -90 and 90)", lat)
            }
            CoordError::InvalidLongitude(lon) => {
                write!(f, "Invalid longitude: {} (must be a finite number)", lon)
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::Unparseable(text) => {
                write!(f, "Cannot parse '{}' as decimal degrees", text)
            }
        }
    }
}

impl std::error::Error for CoordError {}
