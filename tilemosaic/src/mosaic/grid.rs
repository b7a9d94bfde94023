//! Fetching tiles into grid positions.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;

use crate::error::{MosaicError, MosaicResult};
use crate::log::Logger;
use crate::provider::TileSource;
use crate::raster::RasterBackend;
use crate::{log_debug, log_trace};

/// One tile to fetch and the grid position it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Row position, counted from the north edge of the grid.
    pub row: usize,
    /// Column position, counted from the west edge of the grid.
    pub column: usize,
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub fn new(row: usize, column: usize, x: u32, y: u32) -> Self {
        Self { row, column, x, y }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.column)
    }
}

/// Decoded tiles keyed by `(row, column)`.
pub type FetchedTiles = HashMap<(usize, usize), RgbaImage>;

/// Fetches and decodes tiles, optionally several at a time.
///
/// Tiles are fetched in batches of at most `parallel_fetches` scoped threads;
/// each batch finishes before the next starts. Results are keyed by grid
/// position, so completion order never affects placement.
#[derive(Clone)]
pub struct GridFetcher {
    source: Arc<dyn TileSource>,
    raster: Arc<dyn RasterBackend>,
    tile_size: u32,
    parallel_fetches: usize,
    logger: Arc<dyn Logger>,
}

impl GridFetcher {
    pub fn new(
        source: Arc<dyn TileSource>,
        raster: Arc<dyn RasterBackend>,
        tile_size: u32,
        parallel_fetches: usize,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            source,
            raster,
            tile_size,
            parallel_fetches: parallel_fetches.max(1),
            logger,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn raster(&self) -> &Arc<dyn RasterBackend> {
        &self.raster
    }

    pub fn source(&self) -> &Arc<dyn TileSource> {
        &self.source
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Fetches one tile and returns it decoded at `tile_size × tile_size`.
    pub fn fetch_one(&self, x: u32, y: u32, zoom: u8) -> MosaicResult<RgbaImage> {
        let bytes = self
            .source
            .fetch_tile(x, y, zoom)
            .map_err(|e| MosaicError::fetch_failed(x, y, zoom, &e))?;

        let decoded = self
            .raster
            .decode(&bytes)
            .map_err(|e| MosaicError::TileFetchFailed {
                x,
                y,
                zoom,
                reason: e.to_string(),
            })?;

        if decoded.dimensions() == (self.tile_size, self.tile_size) {
            return Ok(decoded);
        }
        log_trace!(
            self.logger,
            "Resizing tile z{}/{}/{} from {}x{}",
            zoom,
            x,
            y,
            decoded.width(),
            decoded.height()
        );
        Ok(self
            .raster
            .resize(&decoded, self.tile_size, self.tile_size)?)
    }

    /// Fetches every cell.
    ///
    /// The token is checked before each fetch. The first failure aborts the
    /// whole call; no partial result is returned.
    pub fn fetch(
        &self,
        cells: &[GridCell],
        zoom: u8,
        cancel: &CancellationToken,
    ) -> MosaicResult<FetchedTiles> {
        log_debug!(
            self.logger,
            "Fetching {} tiles at zoom {} from {}",
            cells.len(),
            zoom,
            self.source.name()
        );

        let mut tiles = FetchedTiles::with_capacity(cells.len());
        for batch in cells.chunks(self.parallel_fetches) {
            if cancel.is_cancelled() {
                return Err(MosaicError::Cancelled);
            }

            let results: Vec<(GridCell, MosaicResult<RgbaImage>)> = if batch.len() == 1 {
                let cell = batch[0];
                vec![(cell, self.fetch_one(cell.x, cell.y, zoom))]
            } else {
                thread::scope(|scope| {
                    let handles: Vec<_> = batch
                        .iter()
                        .map(|&cell| {
                            let handle = scope.spawn(move || {
                                if cancel.is_cancelled() {
                                    return Err(MosaicError::Cancelled);
                                }
                                self.fetch_one(cell.x, cell.y, zoom)
                            });
                            (cell, handle)
                        })
                        .collect();

                    handles
                        .into_iter()
                        .map(|(cell, handle)| {
                            let result = handle.join().unwrap_or_else(|_| {
                                Err(MosaicError::TileFetchFailed {
                                    x: cell.x,
                                    y: cell.y,
                                    zoom,
                                    reason: "fetch thread panicked".to_string(),
                                })
                            });
                            (cell, result)
                        })
                        .collect()
                })
            };

            for (cell, result) in results {
                tiles.insert(cell.position(), result?);
            }
        }

        Ok(tiles)
    }
}
