//! Bounding box calculation.
//!
//! Grows a [`BoundingBox`] until it covers a set of tile references, then
//! makes one pass over the edges so that no reference renders closer than
//! the trim margin to the outside of the mosaic.

use std::sync::Arc;

use crate::bbox::BoundingBox;
use crate::coord::{tile_count, to_tile, TileRef, MAX_ZOOM};
use crate::error::MosaicError;
use crate::log::Logger;
use crate::{log_debug, log_trace};

/// Computes minimal covering tile grids.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tilemosaic::bbox::BoundingBoxCalculator;
/// use tilemosaic::coord::TileRef;
/// use tilemosaic::log::NoOpLogger;
///
/// let calculator = BoundingBoxCalculator::new(256, 5, Arc::new(NoOpLogger));
/// let tiles = [TileRef::new(5, 5, 2, 2, 8), TileRef::new(5, 5, 250, 250, 8)];
/// let bbox = calculator.compute(&tiles, 8).unwrap();
///
/// assert_eq!(bbox.x_axis(), &[4, 5]);
/// assert_eq!(bbox.y_axis(), &[4, 5]);
/// ```
pub struct BoundingBoxCalculator {
    tile_size: u32,
    trim_margin: u32,
    logger: Arc<dyn Logger>,
}

/// Sides flagged by the margin pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct MarginSides {
    north: bool,
    south: bool,
    west: bool,
    east: bool,
}

impl BoundingBoxCalculator {
    /// Creates a calculator.
    ///
    /// # Arguments
    ///
    /// * `tile_size` - Tile edge length in pixels
    /// * `trim_margin` - Minimum pixel distance between any reference and the
    ///   outer edge of the grid
    /// * `logger` - Logger for diagnostic output
    pub fn new(tile_size: u32, trim_margin: u32, logger: Arc<dyn Logger>) -> Self {
        Self {
            tile_size,
            trim_margin,
            logger,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn trim_margin(&self) -> u32 {
        self.trim_margin
    }

    /// Computes the covering grid for `tiles` at `zoom`.
    ///
    /// Fails with [`MosaicError::EmptyInput`] when `tiles` is empty, with
    /// [`MosaicError::ZoomMismatch`] when a reference belongs to another zoom
    /// and with [`MosaicError::MalformedBoundingBox`] when an index is off
    /// the map.
    pub fn compute(&self, tiles: &[TileRef], zoom: u8) -> Result<BoundingBox, MosaicError> {
        let first = tiles.first().ok_or(MosaicError::EmptyInput)?;
        if zoom > MAX_ZOOM {
            return Err(MosaicError::InvalidZoom(zoom));
        }
        if let Some(other) = tiles.iter().find(|t| t.zoom != zoom) {
            return Err(MosaicError::ZoomMismatch {
                expected: zoom,
                found: other.zoom,
            });
        }
        let count = tile_count(zoom);
        if let Some(off) = tiles.iter().find(|t| t.x >= count || t.y >= count) {
            return Err(MosaicError::MalformedBoundingBox(format!(
                "tile ({}, {}) is outside the {}x{} grid at zoom {}",
                off.x, off.y, count, count, zoom
            )));
        }

        let mut bbox = BoundingBox::single(first.x, first.y, zoom);
        for tile in &tiles[1..] {
            include_tile(&mut bbox, tile);
        }
        log_trace!(self.logger, "Covering grid before margin pass: {}", bbox);

        self.apply_margin(&mut bbox, tiles);
        log_debug!(
            self.logger,
            "Bounding box for {} tiles: {}",
            tiles.len(),
            bbox
        );

        Ok(bbox)
    }

    /// Converts `(lat, lon)` points at `zoom` and computes their grid.
    pub fn compute_for_points(
        &self,
        points: &[(f64, f64)],
        zoom: u8,
    ) -> Result<BoundingBox, MosaicError> {
        let tiles = self.tiles_for_points(points, zoom)?;
        self.compute(&tiles, zoom)
    }

    /// Converts `(lat, lon)` points to tile references at `zoom`.
    pub fn tiles_for_points(
        &self,
        points: &[(f64, f64)],
        zoom: u8,
    ) -> Result<Vec<TileRef>, MosaicError> {
        points
            .iter()
            .map(|&(lat, lon)| to_tile(lat, lon, zoom, self.tile_size).map_err(MosaicError::from))
            .collect()
    }

    /// Highest zoom in `min_zoom..=max_zoom` whose grid fits in
    /// `target × target` tiles and can still be padded to that size.
    ///
    /// A level with no more than `target` columns is only taken when the
    /// grid is already a square of `target` tiles. Falls back to `min_zoom`
    /// when no level qualifies.
    pub fn select_zoom(
        &self,
        points: &[(f64, f64)],
        min_zoom: u8,
        max_zoom: u8,
        target: usize,
    ) -> Result<(u8, BoundingBox), MosaicError> {
        if points.is_empty() {
            return Err(MosaicError::EmptyInput);
        }
        if min_zoom > max_zoom {
            return Err(MosaicError::InvalidZoom(min_zoom));
        }

        for zoom in (min_zoom..=max_zoom).rev() {
            let bbox = self.compute_for_points(points, zoom)?;
            if bbox.width() > target || bbox.height() > target {
                continue;
            }
            let paddable = (target as u64) < u64::from(tile_count(zoom));
            if paddable || (bbox.is_square() && bbox.width() == target) {
                log_debug!(self.logger, "Selected zoom {} for {} points", zoom, points.len());
                return Ok((zoom, bbox));
            }
            log_trace!(
                self.logger,
                "Zoom {} has too few columns to pad to {} tiles",
                zoom,
                target
            );
        }

        let bbox = self.compute_for_points(points, min_zoom)?;
        Ok((min_zoom, bbox))
    }

    /// Single pass over the edges.
    ///
    /// Edges are read once before any extension. Each side grows by at most
    /// one row or column and the pass is not repeated afterwards, so a margin
    /// wider than a tile can still leave a reference inside the margin.
    fn apply_margin(&self, bbox: &mut BoundingBox, tiles: &[TileRef]) {
        let (north, south, west, east) = (bbox.north(), bbox.south(), bbox.west(), bbox.east());
        let mut sides = MarginSides::default();

        for tile in tiles {
            if tile.y == north && tile.y_offset < self.trim_margin {
                sides.north = true;
            }
            if tile.y == south && self.distance_to_far_edge(tile.y_offset) < self.trim_margin {
                sides.south = true;
            }
            if tile.x == west && tile.x_offset < self.trim_margin {
                sides.west = true;
            }
            if tile.x == east && self.distance_to_far_edge(tile.x_offset) < self.trim_margin {
                sides.east = true;
            }
        }

        if sides.north && !bbox.extend_north() {
            log_debug!(self.logger, "Margin: no row north of {} at the pole", north);
        }
        if sides.south && !bbox.extend_south() {
            log_debug!(self.logger, "Margin: no row south of {} at the pole", south);
        }
        if sides.west && !bbox.extend_west() {
            log_debug!(self.logger, "Margin: grid already spans every column");
        }
        if sides.east && !bbox.extend_east() {
            log_debug!(self.logger, "Margin: grid already spans every column");
        }
    }

    fn distance_to_far_edge(&self, offset: u32) -> u32 {
        self.tile_size.saturating_sub(offset)
    }
}

/// Grows `bbox` so that it contains `tile`.
fn include_tile(bbox: &mut BoundingBox, tile: &TileRef) {
    if tile.y < bbox.north() {
        for _ in tile.y..bbox.north() {
            bbox.extend_north();
        }
    } else if tile.y > bbox.south() {
        for _ in bbox.south()..tile.y {
            bbox.extend_south();
        }
    }

    if !bbox.contains_column(tile.x) {
        let count = tile_count(bbox.zoom());
        let east_distance = (tile.x + count - bbox.east()) % count;
        let west_distance = (bbox.west() + count - tile.x) % count;

        // Ties go east.
        if east_distance <= west_distance {
            for _ in 0..east_distance {
                bbox.extend_east();
            }
        } else {
            for _ in 0..west_distance {
                bbox.extend_west();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NoOpLogger;

    fn calculator(margin: u32) -> BoundingBoxCalculator {
        BoundingBoxCalculator::new(256, margin, Arc::new(NoOpLogger))
    }

    fn centered(x: u32, y: u32, zoom: u8) -> TileRef {
        TileRef::new(x, y, 128, 128, zoom)
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            calculator(5).compute(&[], 4),
            Err(MosaicError::EmptyInput)
        ));
    }

    #[test]
    fn test_zoom_mismatch() {
        let tiles = [centered(1, 1, 4), centered(1, 1, 5)];
        assert!(matches!(
            calculator(5).compute(&tiles, 4),
            Err(MosaicError::ZoomMismatch {
                expected: 4,
                found: 5
            })
        ));
    }

    #[test]
    fn test_single_centered_tile() {
        let bbox = calculator(5).compute(&[centered(3, 9, 5)], 5).unwrap();
        assert_eq!(bbox.x_axis(), &[3]);
        assert_eq!(bbox.y_axis(), &[9]);
    }

    #[test]
    fn test_extends_north_and_south() {
        let tiles = [centered(3, 5, 5), centered(3, 2, 5), centered(3, 7, 5)];
        let bbox = calculator(5).compute(&tiles, 5).unwrap();
        assert_eq!(bbox.y_axis(), &[2, 3, 4, 5, 6, 7]);
        assert_eq!(bbox.x_axis(), &[3]);
    }

    #[test]
    fn test_extends_east_and_west() {
        let tiles = [centered(5, 5, 5), centered(8, 5, 5), centered(3, 5, 5)];
        let bbox = calculator(5).compute(&tiles, 5).unwrap();
        assert_eq!(bbox.x_axis(), &[3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_wrap_tie_breaks_east() {
        // 16 columns: 8 steps east or 8 steps west; east wins.
        let tiles = [centered(0, 3, 4), centered(8, 3, 4)];
        let bbox = calculator(5).compute(&tiles, 4).unwrap();
        assert_eq!(bbox.x_axis(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(!bbox.is_wrapped());
    }

    #[test]
    fn test_shorter_west_distance_wraps() {
        let tiles = [centered(1, 3, 4), centered(14, 3, 4)];
        let bbox = calculator(5).compute(&tiles, 4).unwrap();
        assert_eq!(bbox.x_axis(), &[0, 1, 14, 15]);
        assert_eq!(bbox.columns(), vec![14, 15, 0, 1]);
    }

    #[test]
    fn test_shorter_east_distance_wraps() {
        let tiles = [centered(14, 3, 4), centered(1, 3, 4)];
        let bbox = calculator(5).compute(&tiles, 4).unwrap();
        assert_eq!(bbox.columns(), vec![14, 15, 0, 1]);
    }

    #[test]
    fn test_tile_inside_wrapped_box_does_not_extend() {
        let tiles = [centered(14, 3, 4), centered(1, 3, 4), centered(15, 3, 4)];
        let bbox = calculator(5).compute(&tiles, 4).unwrap();
        assert_eq!(bbox.width(), 4);
    }

    #[test]
    fn test_margin_extends_north_and_west() {
        let tiles = [TileRef::new(5, 5, 2, 2, 8), TileRef::new(5, 5, 250, 250, 8)];
        let bbox = calculator(5).compute(&tiles, 8).unwrap();
        assert_eq!(bbox.x_axis(), &[4, 5]);
        assert_eq!(bbox.y_axis(), &[4, 5]);
    }

    #[test]
    fn test_margin_not_triggered_when_clear() {
        let tiles = [TileRef::new(5, 5, 10, 10, 8), TileRef::new(5, 5, 250, 250, 8)];
        let bbox = calculator(5).compute(&tiles, 8).unwrap();
        assert_eq!(bbox.x_axis(), &[5]);
        assert_eq!(bbox.y_axis(), &[5]);
    }

    #[test]
    fn test_margin_extends_south_and_east() {
        let tiles = [TileRef::new(5, 5, 253, 254, 8)];
        let bbox = calculator(5).compute(&tiles, 8).unwrap();
        assert_eq!(bbox.x_axis(), &[5, 6]);
        assert_eq!(bbox.y_axis(), &[5, 6]);
    }

    #[test]
    fn test_margin_only_checks_tiles_on_edges() {
        // The inner tile hugs its own tile border but not the grid border.
        let tiles = [
            TileRef::new(4, 4, 128, 128, 8),
            TileRef::new(6, 6, 128, 128, 8),
            TileRef::new(5, 5, 0, 0, 8),
        ];
        let bbox = calculator(5).compute(&tiles, 8).unwrap();
        assert_eq!(bbox.x_axis(), &[4, 5, 6]);
        assert_eq!(bbox.y_axis(), &[4, 5, 6]);
    }

    #[test]
    fn test_margin_extends_each_side_once() {
        let tiles = [TileRef::new(5, 5, 1, 1, 8), TileRef::new(5, 5, 3, 3, 8)];
        let bbox = calculator(5).compute(&tiles, 8).unwrap();
        assert_eq!(bbox.x_axis(), &[4, 5]);
        assert_eq!(bbox.y_axis(), &[4, 5]);
    }

    #[test]
    fn test_margin_pass_is_single_shot() {
        // A 300 px margin needs two extra columns for an offset of 2 px; the
        // pass adds one per side and does not run again.
        let tiles = [TileRef::new(5, 5, 2, 128, 8)];
        let bbox = calculator(300).compute(&tiles, 8).unwrap();
        assert_eq!(bbox.x_axis(), &[4, 5, 6]);
        assert_eq!(bbox.y_axis(), &[4, 5, 6]);

        let position = bbox.column_position(5).unwrap() as u32;
        let distance_to_west_edge = position * 256 + 2;
        assert_eq!(distance_to_west_edge, 258);
        assert!(distance_to_west_edge < 300);
    }

    #[test]
    fn test_margin_stops_at_north_pole() {
        let tiles = [TileRef::new(2, 0, 128, 1, 3)];
        let bbox = calculator(5).compute(&tiles, 3).unwrap();
        assert_eq!(bbox.y_axis(), &[0]);
    }

    #[test]
    fn test_margin_stops_at_south_pole() {
        let tiles = [TileRef::new(2, 7, 128, 255, 3)];
        let bbox = calculator(5).compute(&tiles, 3).unwrap();
        assert_eq!(bbox.y_axis(), &[7]);
    }

    #[test]
    fn test_margin_wraps_west_across_antimeridian() {
        let tiles = [TileRef::new(0, 3, 1, 128, 4)];
        let bbox = calculator(5).compute(&tiles, 4).unwrap();
        assert_eq!(bbox.columns(), vec![15, 0]);
    }

    #[test]
    fn test_containment_for_scattered_points() {
        let points = [
            (51.4775, -0.4614),
            (48.8566, 2.3522),
            (52.5200, 13.4050),
            (41.9028, 12.4964),
        ];
        let calc = calculator(5);
        for zoom in [3, 5, 7] {
            let tiles = calc.tiles_for_points(&points, zoom).unwrap();
            let bbox = calc.compute(&tiles, zoom).unwrap();
            for tile in &tiles {
                assert!(bbox.contains(tile.x, tile.y), "{} not in {}", tile, bbox);
            }
            let ys = bbox.y_axis();
            assert!(ys.windows(2).all(|w| w[1] == w[0] + 1));
        }
    }

    #[test]
    fn test_containment_across_antimeridian() {
        let points = [(-17.7, 178.0), (-13.8, -171.8), (-21.1, -175.2)];
        let calc = calculator(5);
        let tiles = calc.tiles_for_points(&points, 5).unwrap();
        let bbox = calc.compute(&tiles, 5).unwrap();
        assert!(bbox.is_wrapped());
        for tile in &tiles {
            assert!(bbox.contains(tile.x, tile.y));
        }
        assert!(bbox.width() < 4);
    }

    #[test]
    fn test_select_zoom_fits_target() {
        let points = [(51.4775, -0.4614), (51.5074, -0.1278)];
        let calc = calculator(5);
        let (zoom, bbox) = calc.select_zoom(&points, 2, 16, 2).unwrap();
        assert!(bbox.width() <= 2 && bbox.height() <= 2);
        assert_eq!(bbox.zoom(), zoom);

        let finer = calc.compute_for_points(&points, zoom + 1).unwrap();
        assert!(finer.width() > 2 || finer.height() > 2);
    }

    #[test]
    fn test_select_zoom_skips_levels_too_small_to_pad() {
        // One tile at zoom 1 fits 2x2, but zoom 1 only has two columns.
        let points = [(10.0, 10.0)];
        let (zoom, bbox) = calculator(5).select_zoom(&points, 0, 1, 2).unwrap();
        assert_eq!(zoom, 0);
        assert_eq!(bbox.zoom(), 0);

        let (zoom, _) = calculator(5).select_zoom(&points, 0, 2, 2).unwrap();
        assert_eq!(zoom, 2);
    }

    #[test]
    fn test_select_zoom_keeps_small_level_already_square() {
        let points = [(45.0, -90.0), (45.0, 90.0), (-45.0, -90.0), (-45.0, 90.0)];
        let (zoom, bbox) = calculator(5).select_zoom(&points, 0, 1, 2).unwrap();
        assert_eq!(zoom, 1);
        assert_eq!((bbox.width(), bbox.height()), (2, 2));
    }

    #[test]
    fn test_rejects_index_outside_zoom() {
        let result = calculator(5).compute(&[TileRef::new(20, 3, 128, 128, 4)], 4);
        assert!(matches!(result, Err(MosaicError::MalformedBoundingBox(_))));

        let result = calculator(5).compute(&[centered(3, 16, 4)], 4);
        assert!(matches!(result, Err(MosaicError::MalformedBoundingBox(_))));
    }

    #[test]
    fn test_rejects_zoom_past_max() {
        let result = calculator(5).compute(&[centered(0, 0, 40)], 40);
        assert!(matches!(result, Err(MosaicError::InvalidZoom(40))));
    }

    #[test]
    fn test_select_zoom_rejects_empty_points() {
        assert!(matches!(
            calculator(5).select_zoom(&[], 0, 10, 2),
            Err(MosaicError::EmptyInput)
        ));
    }
}
