//! Tile-grid bounding boxes.
//!
//! [`BoundingBox`] is the rectangular (possibly antimeridian-straddling) set
//! of tiles a mosaic is assembled from; [`BoundingBoxCalculator`] derives one
//! from a set of tile references.

mod calculator;
mod types;

pub use calculator::BoundingBoxCalculator;
pub use types::{BoundingBox, MapEdges};
