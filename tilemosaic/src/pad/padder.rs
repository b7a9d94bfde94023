//! Physical padding of a mosaic file.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::bbox::BoundingBox;
use crate::error::{MosaicError, MosaicResult};
use crate::mosaic::{GridFetcher, MosaicAssembler};
use crate::pad::strategy::{PadPlan, PadStrategy};
use crate::raster::{save_atomically, RasterError};
use crate::{log_debug, log_info};

/// Result of one pad step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadOutcome {
    pub strategy: PadStrategy,
    /// The padded extent one zoom level finer, or the input box when the
    /// strategy is [`PadStrategy::SquareReached`].
    pub successor: BoundingBox,
}

/// Grows a mosaic to a `target × target` tile square.
pub struct TileGridPadder {
    fetcher: GridFetcher,
    target: u32,
}

impl TileGridPadder {
    pub fn new(fetcher: GridFetcher, target: u32) -> Self {
        Self { fetcher, target }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Classifies `bbox` without touching any tile or file.
    pub fn plan(&self, bbox: &BoundingBox) -> MosaicResult<PadPlan> {
        PadPlan::classify(bbox, self.target)
    }

    /// Pads the mosaic stored at `filename`, which must be the raster of
    /// `bbox`.
    ///
    /// Only the tiles around the existing mosaic are fetched. The result is
    /// cropped to the target square and replaces `filename` atomically. On
    /// any error, including cancellation, `filename` is left as it was.
    pub fn pad(
        &self,
        bbox: &BoundingBox,
        filename: &Path,
        cancel: &CancellationToken,
    ) -> MosaicResult<PadOutcome> {
        let plan = self.plan(bbox)?;
        if plan.strategy().is_terminal() {
            log_debug!(self.fetcher.logger(), "No padding needed for {}", bbox);
            return Ok(PadOutcome {
                strategy: plan.strategy(),
                successor: bbox.clone(),
            });
        }

        let successor = plan.successor(bbox)?;
        let padded = plan.padded_grid(bbox)?;
        let tile_size = self.fetcher.tile_size();
        let raster = self.fetcher.raster();

        if cancel.is_cancelled() {
            return Err(MosaicError::Cancelled);
        }

        let existing = raster.load(filename)?;
        let expected = (bbox.width() as u32 * tile_size, bbox.height() as u32 * tile_size);
        if existing.dimensions() != expected {
            return Err(RasterError::Geometry(format!(
                "{} is {}x{}, expected {}x{} for {}",
                filename.display(),
                existing.width(),
                existing.height(),
                expected.0,
                expected.1,
                bbox
            ))
            .into());
        }

        let missing: Vec<_> = MosaicAssembler::cells(&padded)
            .into_iter()
            .filter(|cell| !bbox.contains(cell.x, cell.y))
            .collect();
        let tiles = self.fetcher.fetch(&missing, bbox.zoom(), cancel)?;

        let (fetched_west, _, fetched_north, _) = plan.fetched_tiles();
        let mut canvas = raster.blank(
            padded.width() as u32 * tile_size,
            padded.height() as u32 * tile_size,
        );
        raster.composite(
            &mut canvas,
            &existing,
            fetched_west * tile_size,
            fetched_north * tile_size,
        )?;
        for ((row, column), tile) in &tiles {
            raster.composite(
                &mut canvas,
                tile,
                *column as u32 * tile_size,
                *row as u32 * tile_size,
            )?;
        }

        let cropped = raster.crop(&canvas, plan.crop_rect(tile_size))?;

        if cancel.is_cancelled() {
            return Err(MosaicError::Cancelled);
        }
        save_atomically(raster.as_ref(), &cropped, filename)?;

        log_info!(
            self.fetcher.logger(),
            "Padded {} ({}, {} tiles fetched); next grid {}",
            bbox,
            plan.strategy(),
            missing.len(),
            successor
        );
        Ok(PadOutcome {
            strategy: plan.strategy(),
            successor,
        })
    }
}
