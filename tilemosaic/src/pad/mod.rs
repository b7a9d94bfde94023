//! Tile grid padding.
//!
//! A grid that is not yet a `target × target` square is padded with whole
//! tiles on the short sides, cropped back to the square with half-tile
//! precision and re-expressed one zoom level finer. Near a pole the padding
//! moves to the side that still has rows.
//!
//! ```
//! use tilemosaic::bbox::BoundingBox;
//! use tilemosaic::pad::{PadPlan, PadStrategy};
//!
//! let bbox = BoundingBox::from_extent(5, 1, 6, 2, 4).unwrap();
//! let plan = PadPlan::classify(&bbox, 2).unwrap();
//! assert_eq!(plan.strategy(), PadStrategy::WestEast);
//!
//! let next = plan.successor(&bbox).unwrap();
//! assert_eq!(next.x_axis(), &[9, 10, 11, 12]);
//! assert_eq!(next.y_axis(), &[12, 13, 14, 15]);
//! ```

mod padder;
mod strategy;

pub use padder::{PadOutcome, TileGridPadder};
pub use strategy::{PadPlan, PadStrategy};
