//! Mosaic assembly and route drawing.
//!
//! - [`GridFetcher`] fetches and decodes tiles into grid positions
//! - [`MosaicAssembler`] montages a bounding box into one raster
//! - [`project_to_pixel`] maps a tile reference to mosaic pixels
//! - [`RouteOverlay`] draws lines, markers and labels

mod assembler;
mod grid;
mod projection;
mod route;

pub use assembler::MosaicAssembler;
pub use grid::{FetchedTiles, GridCell, GridFetcher};
pub use projection::{project_points, project_to_pixel};
pub use route::{RouteOverlay, RouteStop, RouteStyle};

#[cfg(test)]
pub(crate) use grid::tests as test_support;
