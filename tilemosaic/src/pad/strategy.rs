//! Pad strategy classification and the half-tile pad plan.
//!
//! All padding is expressed in half-tile units per side. A side padded by
//! `h` halves fetches `ceil(h / 2)` tiles; the crop then drops the extra half
//! tile, if any. The same numbers give the successor grid one zoom level
//! finer: its west column is `2 * west - west_halves` (wrapping) and its
//! north row is `2 * north - north_halves`, and it spans `2 * target`
//! indices on both axes.

use std::fmt;

use crate::bbox::BoundingBox;
use crate::coord::{tile_count, MAX_ZOOM};
use crate::error::{MosaicError, MosaicResult};
use crate::raster::PixelRect;

/// How a grid is padded to reach the target square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadStrategy {
    /// Already square and at least target-sized. Nothing to pad.
    SquareReached,
    /// Narrower than tall: pad west and east.
    WestEast,
    /// Shorter than wide, room on both sides: pad north and south.
    NorthSouth,
    /// Shorter than wide, south edge on the bottom row: pad north.
    NorthOnly,
    /// Shorter than wide, north edge on the top row: pad south.
    SouthOnly,
    /// Short on both axes: pad every side.
    AllFour,
}

impl PadStrategy {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PadStrategy::SquareReached)
    }
}

impl fmt::Display for PadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PadStrategy::SquareReached => "square reached",
            PadStrategy::WestEast => "west/east",
            PadStrategy::NorthSouth => "north/south",
            PadStrategy::NorthOnly => "north only",
            PadStrategy::SouthOnly => "south only",
            PadStrategy::AllFour => "all four sides",
        };
        f.write_str(name)
    }
}

/// Half-tile padding per side for one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadPlan {
    strategy: PadStrategy,
    target: u32,
    west_halves: u32,
    east_halves: u32,
    north_halves: u32,
    south_halves: u32,
}

impl PadPlan {
    /// Chooses the strategy and padding for `bbox` against a `target × target`
    /// tile square.
    ///
    /// # Errors
    ///
    /// `MalformedBoundingBox` if a non-square grid already exceeds the target
    /// on one axis, or if the target is as wide as the whole zoom level.
    pub fn classify(bbox: &BoundingBox, target: u32) -> MosaicResult<Self> {
        let width = bbox.width() as u32;
        let height = bbox.height() as u32;

        if width == height && width >= target {
            return Ok(Self {
                strategy: PadStrategy::SquareReached,
                target,
                west_halves: 0,
                east_halves: 0,
                north_halves: 0,
                south_halves: 0,
            });
        }
        if width > target || height > target {
            return Err(MosaicError::MalformedBoundingBox(format!(
                "{}x{} grid cannot be padded to a {}x{} square",
                width, height, target, target
            )));
        }
        let count = tile_count(bbox.zoom());
        if target >= count {
            return Err(MosaicError::MalformedBoundingBox(format!(
                "zoom {} has {} columns, too few to pad to {} tiles",
                bbox.zoom(),
                count,
                target
            )));
        }

        let x_halves = 2 * (target - width);
        let west_halves = x_halves / 2;
        let east_halves = x_halves - west_halves;

        let y_halves = 2 * (target - height);
        let room_north = 2 * bbox.north();
        let room_south = 2 * (count - 1 - bbox.south());
        let mut north_halves = y_halves / 2;
        let mut south_halves = y_halves - north_halves;
        if north_halves > room_north {
            south_halves += north_halves - room_north;
            north_halves = room_north;
        }
        if south_halves > room_south {
            north_halves += south_halves - room_south;
            south_halves = room_south;
        }

        let strategy = match (x_halves > 0, y_halves > 0) {
            (true, true) => PadStrategy::AllFour,
            (true, false) => PadStrategy::WestEast,
            (false, _) if north_halves == 0 => PadStrategy::SouthOnly,
            (false, _) if south_halves == 0 => PadStrategy::NorthOnly,
            (false, _) => PadStrategy::NorthSouth,
        };

        Ok(Self {
            strategy,
            target,
            west_halves,
            east_halves,
            north_halves,
            south_halves,
        })
    }

    pub fn strategy(&self) -> PadStrategy {
        self.strategy
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Padding in half tiles as `(west, east, north, south)`.
    pub fn halves(&self) -> (u32, u32, u32, u32) {
        (
            self.west_halves,
            self.east_halves,
            self.north_halves,
            self.south_halves,
        )
    }

    /// Tiles fetched on each side as `(west, east, north, south)`.
    pub fn fetched_tiles(&self) -> (u32, u32, u32, u32) {
        (
            self.west_halves.div_ceil(2),
            self.east_halves.div_ceil(2),
            self.north_halves.div_ceil(2),
            self.south_halves.div_ceil(2),
        )
    }

    /// The grid that has to be fetched: `bbox` plus whole padding tiles.
    pub fn padded_grid(&self, bbox: &BoundingBox) -> MosaicResult<BoundingBox> {
        let (west, east, north, south) = self.fetched_tiles();
        let count = tile_count(bbox.zoom());
        BoundingBox::from_extent(
            (bbox.west() + count - west) % count,
            bbox.width() as u32 + west + east,
            bbox.north() - north,
            bbox.height() as u32 + north + south,
            bbox.zoom(),
        )
    }

    /// The part of the padded raster kept after padding.
    pub fn crop_rect(&self, tile_size: u32) -> PixelRect {
        let (west, _, north, _) = self.fetched_tiles();
        let half = tile_size / 2;
        PixelRect::new(
            (2 * west - self.west_halves) * half,
            (2 * north - self.north_halves) * half,
            self.target * tile_size,
            self.target * tile_size,
        )
    }

    /// The cropped square expressed one zoom level finer.
    ///
    /// A terminal plan returns the input box unchanged.
    pub fn successor(&self, bbox: &BoundingBox) -> MosaicResult<BoundingBox> {
        if self.strategy.is_terminal() {
            return Ok(bbox.clone());
        }

        let zoom = bbox
            .zoom()
            .checked_add(1)
            .filter(|z| *z <= MAX_ZOOM)
            .ok_or(MosaicError::InvalidZoom(bbox.zoom().saturating_add(1)))?;
        let count = i64::from(tile_count(zoom));

        let west = (2 * i64::from(bbox.west()) - i64::from(self.west_halves)).rem_euclid(count);
        let north = 2 * bbox.north() - self.north_halves;
        let span = 2 * self.target;

        BoundingBox::from_extent(west as u32, span, north, span, zoom)
    }
}
