//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and slippy-map tile references, plus the index arithmetic used when a tile
//! grid grows: columns wrap around the antimeridian, rows stop at the poles.

mod types;

pub use types::{CoordError, TileRef, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM};

use std::f64::consts::PI;

/// Number of tiles along one axis at the given zoom level.
#[inline]
pub fn tile_count(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Converts geographic coordinates to a tile reference.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees. Values between the Web Mercator limit
///   (±85.05112878) and the poles are clamped to the limit.
/// * `lon` - Longitude in degrees. Any finite value is wrapped into
///   `-180.0..180.0`, so 180° lands in column 0.
/// * `zoom` - Zoom level (0 to 20)
/// * `tile_size` - Tile edge length in pixels, used to scale the offsets
///
/// # Returns
///
/// A `Result` containing the tile reference or an error if inputs are invalid.
pub fn to_tile(lat: f64, lon: f64, zoom: u8, tile_size: u32) -> Result<TileRef, CoordError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !lon.is_finite() {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let count = tile_count(zoom);
    let n = count as f64;

    let lon = normalize_longitude(lon);
    let fx = (lon + 180.0) / 360.0 * n;

    let lat_rad = lat.clamp(MIN_LAT, MAX_LAT).to_radians();
    // asinh(tan) == ln(tan + sec)
    let fy = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;

    let (x, x_offset) = split_index(fx, count, tile_size);
    let (y, y_offset) = split_index(fy, count, tile_size);

    Ok(TileRef {
        x,
        y,
        x_offset,
        y_offset,
        zoom,
    })
}

/// Splits a fractional tile position into the tile index and pixel offset.
fn split_index(position: f64, count: u32, tile_size: u32) -> (u32, u32) {
    // Negative values saturate to 0 in the cast.
    let index = (position.floor() as u32).min(count - 1);
    let offset = ((position - index as f64) * tile_size as f64).floor() as u32;
    (index, offset.min(tile_size.saturating_sub(1)))
}

/// Wraps a longitude into `-180.0..180.0`.
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Converts tile indices back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner. Passing
/// `x == 2^zoom` or `y == 2^zoom` yields the far east or far south edge of
/// the map, which is how grid edges are reported.
#[inline]
pub fn tile_to_lat_lon(x: u32, y: u32, zoom: u8) -> (f64, f64) {
    let n = 2.0_f64.powi(zoom as i32);

    let lon = x as f64 / n * 360.0 - 180.0;

    let fy = y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * fy)).sinh().atan();

    (lat_rad.to_degrees(), lon)
}

/// Steps one column east, wrapping to 0 past the last column.
#[inline]
pub fn increment_x(index: u32, zoom: u8) -> u32 {
    let next = index + 1;
    if next >= tile_count(zoom) {
        0
    } else {
        next
    }
}

/// Steps one column west, wrapping to the last column below 0.
#[inline]
pub fn decrement_x(index: u32, zoom: u8) -> u32 {
    if index == 0 {
        tile_count(zoom) - 1
    } else {
        index - 1
    }
}

/// Steps one row south. Returns `None` past the bottom row of the map.
#[inline]
pub fn increment_y(index: u32, zoom: u8) -> Option<u32> {
    let next = index + 1;
    (next < tile_count(zoom)).then_some(next)
}

/// Steps one row north. Returns `None` above the top row of the map.
#[inline]
pub fn decrement_y(index: u32) -> Option<u32> {
    index.checked_sub(1)
}

/// Parses a latitude/longitude pair given as text.
///
/// Both values are decimal degrees and may carry a hemisphere letter as a
/// prefix or suffix (`51.47N`, `W0.45`). A hemisphere letter combined with a
/// minus sign is rejected as ambiguous.
pub fn parse_coordinate(lat: &str, lon: &str) -> Result<(f64, f64), CoordError> {
    let lat = parse_degrees(lat, 'N', 'S')?;
    let lon = parse_degrees(lon, 'E', 'W')?;
    Ok((lat, lon))
}

fn parse_degrees(text: &str, positive: char, negative: char) -> Result<f64, CoordError> {
    let unparseable = || CoordError::Unparseable(text.to_string());
    let trimmed = text.trim();

    let mut sign = 1.0;
    let mut digits = trimmed;
    for hemisphere in [positive, negative] {
        let upper = hemisphere;
        let lower = hemisphere.to_ascii_lowercase();
        if let Some(rest) = digits
            .strip_suffix(upper)
            .or_else(|| digits.strip_suffix(lower))
            .or_else(|| digits.strip_prefix(upper))
            .or_else(|| digits.strip_prefix(lower))
        {
            digits = rest.trim();
            if hemisphere == negative {
                sign = -1.0;
            }
            break;
        }
    }

    let has_hemisphere = digits.len() != trimmed.len();
    if has_hemisphere && (digits.starts_with('-') || digits.starts_with('+')) {
        return Err(unparseable());
    }

    let value: f64 = digits.parse().map_err(|_| unparseable())?;
    if !value.is_finite() {
        return Err(unparseable());
    }
    Ok(sign * value)
}

#[cfg(test)]
mod tests;
