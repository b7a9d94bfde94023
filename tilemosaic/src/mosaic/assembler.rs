//! Mosaic assembly: fetch every tile of a grid and montage them.

use std::path::Path;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;

use crate::bbox::BoundingBox;
use crate::error::{MosaicError, MosaicResult};
use crate::log_info;
use crate::mosaic::grid::{FetchedTiles, GridCell, GridFetcher};
use crate::raster::{save_atomically, RasterError};

/// Builds the raster of a bounding box from its tiles.
pub struct MosaicAssembler {
    fetcher: GridFetcher,
}

impl MosaicAssembler {
    pub fn new(fetcher: GridFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &GridFetcher {
        &self.fetcher
    }

    /// Grid cells of `bbox`, north to south and west to east.
    pub fn cells(bbox: &BoundingBox) -> Vec<GridCell> {
        let columns = bbox.columns();
        bbox.rows()
            .iter()
            .enumerate()
            .flat_map(|(row, &y)| {
                columns
                    .iter()
                    .enumerate()
                    .map(move |(column, &x)| GridCell::new(row, column, x, y))
            })
            .collect()
    }

    /// Fetches and montages every tile of `bbox`.
    ///
    /// The raster is `width × tile_size` by `height × tile_size` pixels, with
    /// the west column of a wrapped box on the left.
    pub fn assemble(&self, bbox: &BoundingBox, cancel: &CancellationToken) -> MosaicResult<RgbaImage> {
        let cells = Self::cells(bbox);
        let mut tiles = self.fetcher.fetch(&cells, bbox.zoom(), cancel)?;
        let grid = take_grid(&mut tiles, bbox.height(), bbox.width())?;
        Ok(self.fetcher.raster().montage(&grid, self.fetcher.tile_size())?)
    }

    /// Assembles `bbox` and writes it to `path` atomically.
    pub fn assemble_to_file(
        &self,
        bbox: &BoundingBox,
        path: &Path,
        cancel: &CancellationToken,
    ) -> MosaicResult<()> {
        let mosaic = self.assemble(bbox, cancel)?;
        if cancel.is_cancelled() {
            return Err(MosaicError::Cancelled);
        }
        save_atomically(self.fetcher.raster().as_ref(), &mosaic, path)?;
        log_info!(
            self.fetcher.logger(),
            "Wrote {}x{} mosaic for {} to {}",
            mosaic.width(),
            mosaic.height(),
            bbox,
            path.display()
        );
        Ok(())
    }
}

/// Moves fetched tiles into row-major grid order.
fn take_grid(
    tiles: &mut FetchedTiles,
    rows: usize,
    columns: usize,
) -> MosaicResult<Vec<Vec<RgbaImage>>> {
    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| {
                    tiles.remove(&(row, column)).ok_or_else(|| {
                        MosaicError::ImageOperationFailed(RasterError::Geometry(format!(
                            "no tile for grid position ({}, {})",
                            row, column
                        )))
                    })
                })
                .collect()
        })
        .collect()
}
