//! Bounding box model.

use std::fmt;

use crate::coord::{
    decrement_x, decrement_y, increment_x, increment_y, tile_count, tile_to_lat_lon, MAX_ZOOM,
};
use crate::error::MosaicError;

/// Rectangular grid of tiles at one zoom level.
///
/// Both axes are kept sorted ascending without duplicates. Rows form one
/// contiguous run. Columns form one contiguous run, or a low run starting at
/// 0 plus a high run ending at `2^zoom - 1` when the grid straddles the
/// antimeridian. Use [`BoundingBox::columns`] for west-to-east order.
///
/// The west edge is stored alongside the axes: a box covering every column
/// has no gap to derive it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    x_axis: Vec<u32>,
    y_axis: Vec<u32>,
    west: u32,
    zoom: u8,
}

/// Geographic extent of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapEdges {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Creates a box holding exactly one tile.
    ///
    /// Callers validate the indices against `zoom` first.
    pub(crate) fn single(x: u32, y: u32, zoom: u8) -> Self {
        Self {
            x_axis: vec![x],
            y_axis: vec![y],
            west: x,
            zoom,
        }
    }

    /// Creates a box from its west column and north row.
    ///
    /// Columns wrap around the antimeridian; rows must stay on the map.
    pub fn from_extent(
        west: u32,
        width: u32,
        north: u32,
        height: u32,
        zoom: u8,
    ) -> Result<Self, MosaicError> {
        let count = checked_tile_count(zoom)?;
        if width == 0 || height == 0 {
            return Err(MosaicError::MalformedBoundingBox(
                "extent must be at least one tile on each axis".to_string(),
            ));
        }
        if width > count || west >= count {
            return Err(MosaicError::MalformedBoundingBox(format!(
                "{} columns from column {} do not fit zoom {}",
                width, west, zoom
            )));
        }
        if north >= count || height > count - north {
            return Err(MosaicError::MalformedBoundingBox(format!(
                "{} rows from row {} do not fit zoom {}",
                height, north, zoom
            )));
        }

        let mut x_axis: Vec<u32> = (0..width).map(|i| (west + i) % count).collect();
        x_axis.sort_unstable();
        let y_axis = (north..north + height).collect();

        Ok(Self {
            x_axis,
            y_axis,
            west,
            zoom,
        })
    }

    /// Creates a box from raw axes, validating every invariant.
    pub fn from_axes(x_axis: Vec<u32>, y_axis: Vec<u32>, zoom: u8) -> Result<Self, MosaicError> {
        let malformed = |reason: String| Err(MosaicError::MalformedBoundingBox(reason));
        let count = checked_tile_count(zoom)?;

        if x_axis.is_empty() || y_axis.is_empty() {
            return malformed("axis is empty".to_string());
        }
        for (name, axis) in [("x", &x_axis), ("y", &y_axis)] {
            if axis.windows(2).any(|w| w[0] >= w[1]) {
                return malformed(format!("{} axis is not strictly ascending", name));
            }
            if axis.iter().any(|&i| i >= count) {
                return malformed(format!("{} axis exceeds {} tiles at zoom {}", name, count, zoom));
            }
        }
        if y_axis.windows(2).any(|w| w[1] != w[0] + 1) {
            return malformed("y axis has a gap".to_string());
        }

        let gaps = x_axis.windows(2).filter(|w| w[1] != w[0] + 1).count();
        let wraps = x_axis[0] == 0 && x_axis[x_axis.len() - 1] == count - 1;
        if gaps > 1 || (gaps == 1 && !wraps) {
            return malformed("x axis has a gap that is not an antimeridian wrap".to_string());
        }
        let west = x_axis
            .windows(2)
            .find(|w| w[1] != w[0] + 1)
            .map_or(x_axis[0], |w| w[1]);

        Ok(Self {
            x_axis,
            y_axis,
            west,
            zoom,
        })
    }

    /// Column indices, sorted ascending.
    pub fn x_axis(&self) -> &[u32] {
        &self.x_axis
    }

    /// Row indices, sorted ascending (north to south).
    pub fn y_axis(&self) -> &[u32] {
        &self.y_axis
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn width(&self) -> usize {
        self.x_axis.len()
    }

    pub fn height(&self) -> usize {
        self.y_axis.len()
    }

    /// Position in `x_axis` where the west edge sits.
    fn west_position(&self) -> usize {
        self.x_axis.binary_search(&self.west).unwrap_or(0)
    }

    /// Westernmost column.
    pub fn west(&self) -> u32 {
        self.west
    }

    /// Easternmost column.
    pub fn east(&self) -> u32 {
        let west = self.west_position();
        let east = if west == 0 { self.x_axis.len() } else { west };
        self.x_axis[east - 1]
    }

    /// Northernmost row.
    pub fn north(&self) -> u32 {
        self.y_axis[0]
    }

    /// Southernmost row.
    pub fn south(&self) -> u32 {
        self.y_axis[self.y_axis.len() - 1]
    }

    /// Columns in west-to-east order.
    ///
    /// Equal to `x_axis` unless the box straddles the antimeridian.
    pub fn columns(&self) -> Vec<u32> {
        let west = self.west_position();
        let mut columns = Vec::with_capacity(self.x_axis.len());
        columns.extend_from_slice(&self.x_axis[west..]);
        columns.extend_from_slice(&self.x_axis[..west]);
        columns
    }

    /// Rows in north-to-south order.
    pub fn rows(&self) -> &[u32] {
        &self.y_axis
    }

    /// Whether the columns straddle the antimeridian.
    pub fn is_wrapped(&self) -> bool {
        self.west_position() != 0
    }

    /// Whether every column of the zoom level is covered.
    pub fn is_full_circle(&self) -> bool {
        self.x_axis.len() == tile_count(self.zoom) as usize
    }

    pub fn is_square(&self) -> bool {
        self.x_axis.len() == self.y_axis.len()
    }

    pub fn contains_column(&self, x: u32) -> bool {
        self.x_axis.binary_search(&x).is_ok()
    }

    pub fn contains_row(&self, y: u32) -> bool {
        self.y_axis.binary_search(&y).is_ok()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.contains_column(x) && self.contains_row(y)
    }

    /// Position of a column counted from the west edge.
    pub fn column_position(&self, x: u32) -> Option<usize> {
        let index = self.x_axis.binary_search(&x).ok()?;
        let west = self.west_position();
        let len = self.x_axis.len();
        Some((index + len - west) % len)
    }

    /// Position of a row counted from the north edge.
    pub fn row_position(&self, y: u32) -> Option<usize> {
        self.y_axis.binary_search(&y).ok()
    }

    /// Adds one column east of the box. Returns `false` if the box already
    /// covers the whole circle.
    pub(crate) fn extend_east(&mut self) -> bool {
        if self.is_full_circle() {
            return false;
        }
        let column = increment_x(self.east(), self.zoom);
        self.insert_column(column);
        true
    }

    /// Adds one column west of the box. Returns `false` if the box already
    /// covers the whole circle.
    pub(crate) fn extend_west(&mut self) -> bool {
        if self.is_full_circle() {
            return false;
        }
        let column = decrement_x(self.west, self.zoom);
        self.insert_column(column);
        self.west = column;
        true
    }

    /// Adds one row north of the box. Returns `false` at the top of the map.
    pub(crate) fn extend_north(&mut self) -> bool {
        match decrement_y(self.north()) {
            Some(row) => {
                self.y_axis.insert(0, row);
                true
            }
            None => false,
        }
    }

    /// Adds one row south of the box. Returns `false` at the bottom of the map.
    pub(crate) fn extend_south(&mut self) -> bool {
        match increment_y(self.south(), self.zoom) {
            Some(row) => {
                self.y_axis.push(row);
                true
            }
            None => false,
        }
    }

    fn insert_column(&mut self, column: u32) {
        if let Err(index) = self.x_axis.binary_search(&column) {
            self.x_axis.insert(index, column);
        }
    }

    /// Same extent one zoom level finer: every index `i` becomes `2i, 2i + 1`.
    pub fn zoom_in(&self) -> Result<Self, MosaicError> {
        let zoom = self
            .zoom
            .checked_add(1)
            .filter(|z| *z <= MAX_ZOOM)
            .ok_or(MosaicError::InvalidZoom(self.zoom.saturating_add(1)))?;
        let double = |axis: &[u32]| -> Vec<u32> {
            axis.iter().flat_map(|&i| [2 * i, 2 * i + 1]).collect()
        };
        Ok(Self {
            x_axis: double(&self.x_axis),
            y_axis: double(&self.y_axis),
            west: 2 * self.west,
            zoom,
        })
    }

    /// Geographic edges of the grid, from the tiles' outer corners.
    pub fn edges(&self) -> MapEdges {
        let (north, west) = tile_to_lat_lon(self.west(), self.north(), self.zoom);
        // A wrapped box reports east < west.
        let (south, east) = tile_to_lat_lon(self.east() + 1, self.south() + 1, self.zoom);
        MapEdges {
            north,
            south,
            west,
            east,
        }
    }
}

fn checked_tile_count(zoom: u8) -> Result<u32, MosaicError> {
    if zoom > MAX_ZOOM {
        return Err(MosaicError::InvalidZoom(zoom));
    }
    Ok(tile_count(zoom))
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} tiles at zoom {} (columns {:?}, rows {}..={})",
            self.width(),
            self.height(),
            self.zoom,
            self.columns(),
            self.north(),
            self.south()
        )
    }
}
