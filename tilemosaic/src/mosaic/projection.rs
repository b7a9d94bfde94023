//! Tile references to mosaic pixels.

use crate::bbox::BoundingBox;
use crate::coord::{to_tile, TileRef};
use crate::error::{MosaicError, MosaicResult};
use crate::raster::PixelPoint;

/// Absolute pixel position of `tile` in the mosaic of `bbox`.
///
/// `x = column_position(tile.x) * tile_size + tile.x_offset`, where the
/// column position counts from the west edge; likewise for `y`.
///
/// # Errors
///
/// `ZoomMismatch` if the tile and box disagree on zoom,
/// `TileNotInBoundingBox` if the tile's column or row is not in the box.
pub fn project_to_pixel(
    tile: &TileRef,
    bbox: &BoundingBox,
    tile_size: u32,
) -> MosaicResult<PixelPoint> {
    if tile.zoom != bbox.zoom() {
        return Err(MosaicError::ZoomMismatch {
            expected: bbox.zoom(),
            found: tile.zoom,
        });
    }

    let not_found = || MosaicError::TileNotInBoundingBox {
        x: tile.x,
        y: tile.y,
        zoom: tile.zoom,
    };
    let column = bbox.column_position(tile.x).ok_or_else(not_found)?;
    let row = bbox.row_position(tile.y).ok_or_else(not_found)?;

    Ok(PixelPoint::new(
        column as u32 * tile_size + tile.x_offset,
        row as u32 * tile_size + tile.y_offset,
    ))
}

/// Projects geographic `(lat, lon)` points at the box's zoom.
pub fn project_points(
    points: &[(f64, f64)],
    bbox: &BoundingBox,
    tile_size: u32,
) -> MosaicResult<Vec<PixelPoint>> {
    points
        .iter()
        .map(|&(lat, lon)| {
            let tile = to_tile(lat, lon, bbox.zoom(), tile_size)?;
            project_to_pixel(&tile, bbox, tile_size)
        })
        .collect()
}
