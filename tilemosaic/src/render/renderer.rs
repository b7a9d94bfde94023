//! End-to-end mosaic rendering.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;

use crate::bbox::{BoundingBox, BoundingBoxCalculator};
use crate::config::MosaicConfig;
use crate::coord::to_tile;
use crate::error::{MosaicError, MosaicResult};
use crate::log::Logger;
use crate::mosaic::{
    project_points, project_to_pixel, GridFetcher, MosaicAssembler, RouteOverlay, RouteStop,
    RouteStyle,
};
use crate::pad::{PadStrategy, TileGridPadder};
use crate::provider::TileSource;
use crate::raster::{save_atomically, PixelPoint, RasterBackend};
use crate::render::request::{RenderRequest, RenderResult, RenderedLevel};
use crate::{log_debug, log_info, log_warn};

/// Intermediate images are always PNG; other formats are converted at the end.
const WORK_FORMAT: &str = "png";

/// Turns a set of points into a series of increasingly detailed mosaics.
///
/// For each request: pick the highest zoom whose covering grid fits the
/// target square, assemble it, pad it once if it is not square, then zoom
/// in for every refinement level. The route is drawn on every level.
pub struct MosaicRenderer {
    config: MosaicConfig,
    calculator: BoundingBoxCalculator,
    assembler: MosaicAssembler,
    padder: TileGridPadder,
    overlay: RouteOverlay,
    raster: Arc<dyn RasterBackend>,
    logger: Arc<dyn Logger>,
}

impl MosaicRenderer {
    /// # Errors
    ///
    /// `Config` if `config` fails validation.
    pub fn new(
        source: Arc<dyn TileSource>,
        raster: Arc<dyn RasterBackend>,
        config: MosaicConfig,
        logger: Arc<dyn Logger>,
    ) -> MosaicResult<Self> {
        config.validate()?;

        let fetcher = GridFetcher::new(
            source,
            Arc::clone(&raster),
            config.tile_size(),
            config.parallel_fetches(),
            Arc::clone(&logger),
        );
        Ok(Self {
            config,
            calculator: BoundingBoxCalculator::new(
                config.tile_size(),
                config.trim_margin(),
                Arc::clone(&logger),
            ),
            assembler: MosaicAssembler::new(fetcher.clone()),
            padder: TileGridPadder::new(fetcher, config.target_size()),
            overlay: RouteOverlay::new(
                Arc::clone(&raster),
                RouteStyle::default(),
                Arc::clone(&logger),
            ),
            raster,
            logger,
        })
    }

    pub fn with_route_style(mut self, style: RouteStyle) -> Self {
        self.overlay = RouteOverlay::new(Arc::clone(&self.raster), style, Arc::clone(&self.logger));
        self
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    pub fn calculator(&self) -> &BoundingBoxCalculator {
        &self.calculator
    }

    pub fn padder(&self) -> &TileGridPadder {
        &self.padder
    }

    /// Renders every level of `request`.
    ///
    /// Levels already written stay on disk if a later level fails.
    pub fn render(
        &self,
        request: &RenderRequest,
        cancel: &CancellationToken,
    ) -> MosaicResult<RenderResult> {
        if request.points.is_empty() {
            return Err(MosaicError::EmptyInput);
        }
        let coordinates = request.coordinates();
        let (zoom, bbox) = self.calculator.select_zoom(
            &coordinates,
            request.min_zoom,
            request.max_zoom,
            self.config.target_size() as usize,
        )?;
        log_info!(
            self.logger,
            "Rendering '{}': {} points at zoom {}, grid {}",
            request.name,
            request.points.len(),
            zoom,
            bbox
        );

        fs::create_dir_all(&request.output_dir).map_err(|source| MosaicError::Io {
            path: request.output_dir.clone(),
            source,
        })?;

        let mut levels = Vec::with_capacity(request.refinement_levels as usize + 1);
        let (base, next_grid) = self.render_base(request, &bbox, cancel)?;
        levels.push(base);

        let mut grid = next_grid;
        for level in 1..=request.refinement_levels {
            if cancel.is_cancelled() {
                return Err(MosaicError::Cancelled);
            }
            if level > 1 {
                grid = grid.zoom_in()?;
            }

            let mut mosaic = self.assembler.assemble(&grid, cancel)?;
            if request.draw_route {
                let pixels = project_points(&coordinates, &grid, self.config.tile_size())?;
                self.draw_route(&mut mosaic, request, pixels)?;
            }
            let path = self.write_level(request, level, &mosaic)?;
            log_debug!(self.logger, "Level {} written to {}", level, path.display());

            levels.push(RenderedLevel {
                level,
                path,
                zoom: grid.zoom(),
                bbox: grid.clone(),
                edges: grid.edges(),
                strategy: None,
            });
        }

        log_info!(
            self.logger,
            "Rendered {} level(s) of '{}' into {}",
            levels.len(),
            request.name,
            request.output_dir.display()
        );
        Ok(RenderResult { levels })
    }

    /// Removes a half-written level file, logging when it cannot be removed.
    fn discard(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                log_warn!(self.logger, "Failed to remove {}: {}", path.display(), e);
            }
        }
    }

    /// Assembles, pads and annotates level 0.
    ///
    /// Returns the level and the grid of level 1.
    fn render_base(
        &self,
        request: &RenderRequest,
        bbox: &BoundingBox,
        cancel: &CancellationToken,
    ) -> MosaicResult<(RenderedLevel, BoundingBox)> {
        let work_path = self.level_path(request, 0, WORK_FORMAT);
        self.assembler.assemble_to_file(bbox, &work_path, cancel)?;

        let outcome = match self.padder.pad(bbox, &work_path, cancel) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.discard(&work_path);
                return Err(e);
            }
        };
        let padded = outcome.strategy != PadStrategy::SquareReached;

        let mut mosaic = self.raster.load(&work_path)?;
        if request.draw_route {
            let pixels = if padded {
                self.project_half_scale(request, &outcome.successor)?
            } else {
                project_points(&request.coordinates(), bbox, self.config.tile_size())?
            };
            self.draw_route(&mut mosaic, request, pixels)?;
        }
        let path = self.write_level(request, 0, &mosaic)?;

        let (covered, next) = if padded {
            (outcome.successor.clone(), outcome.successor)
        } else {
            (bbox.clone(), bbox.zoom_in()?)
        };
        let level = RenderedLevel {
            level: 0,
            path,
            zoom: bbox.zoom(),
            edges: covered.edges(),
            bbox: covered,
            strategy: Some(outcome.strategy),
        };
        Ok((level, next))
    }

    /// Projects onto a padded base mosaic: the padded square is exactly the
    /// successor grid drawn at half resolution.
    fn project_half_scale(
        &self,
        request: &RenderRequest,
        successor: &BoundingBox,
    ) -> MosaicResult<Vec<PixelPoint>> {
        let tile_size = self.config.tile_size();
        request
            .points
            .iter()
            .map(|p| -> MosaicResult<PixelPoint> {
                let tile = to_tile(p.lat, p.lon, successor.zoom(), tile_size)?;
                let pixel = project_to_pixel(&tile, successor, tile_size)?;
                Ok(PixelPoint::new(pixel.x / 2, pixel.y / 2))
            })
            .collect()
    }

    fn draw_route(
        &self,
        mosaic: &mut RgbaImage,
        request: &RenderRequest,
        pixels: Vec<PixelPoint>,
    ) -> MosaicResult<()> {
        let stops: Vec<RouteStop> = request
            .points
            .iter()
            .zip(pixels)
            .map(|(point, pixel)| RouteStop {
                point: pixel,
                label: point.label.clone(),
            })
            .collect();
        self.overlay.draw(mosaic, &stops)
    }

    /// Resizes if requested, writes PNG and converts to the final format.
    fn write_level(
        &self,
        request: &RenderRequest,
        level: u32,
        mosaic: &RgbaImage,
    ) -> MosaicResult<PathBuf> {
        let work_path = self.level_path(request, level, WORK_FORMAT);
        match request.resize {
            Some((width, height)) => {
                let resized = self.raster.resize(mosaic, width, height)?;
                save_atomically(self.raster.as_ref(), &resized, &work_path)?;
            }
            None => save_atomically(self.raster.as_ref(), mosaic, &work_path)?,
        }

        if request.format.eq_ignore_ascii_case(WORK_FORMAT) {
            return Ok(work_path);
        }
        Ok(self
            .raster
            .convert_format(&work_path, WORK_FORMAT, &request.format)?)
    }

    fn level_path(&self, request: &RenderRequest, level: u32, ext: &str) -> PathBuf {
        level_path(&request.output_dir, &request.name, level, ext)
    }
}

/// `<dir>/<name>_<level>.<ext>`
pub fn level_path(dir: &Path, name: &str, level: u32, ext: &str) -> PathBuf {
    dir.join(format!("{}_{}.{}", name, level, ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::mosaic::test_support::{tile_color, SolidSource};
    use crate::raster::ImageBackend;
    use crate::render::request::RoutePoint;
    use tempfile::TempDir;

    const TILE: u32 = 16;

    fn renderer(source: Arc<SolidSource>) -> MosaicRenderer {
        MosaicRenderer::new(
            source,
            Arc::new(ImageBackend::new()),
            MosaicConfig::new().with_tile_size(TILE).with_trim_margin(1),
            Arc::new(NoOpLogger),
        )
        .unwrap()
    }

    fn tile_centre(x: u32, y: u32, zoom: u8) -> RoutePoint {
        let (north, west) = crate::coord::tile_to_lat_lon(x, y, zoom);
        let (south, east) = crate::coord::tile_to_lat_lon(x + 1, y + 1, zoom);
        RoutePoint::new((north + south) / 2.0, (west + east) / 2.0)
    }

    #[test]
    fn test_level_path() {
        assert_eq!(
            level_path(Path::new("/out"), "circuit", 2, "jpg"),
            PathBuf::from("/out/circuit_2.jpg")
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = MosaicRenderer::new(
            Arc::new(SolidSource::new(TILE)),
            Arc::new(ImageBackend::new()),
            MosaicConfig::new().with_tile_size(15),
            Arc::new(NoOpLogger),
        );
        assert!(matches!(result, Err(MosaicError::Config(_))));
    }

    #[test]
    fn test_empty_points() {
        let temp = TempDir::new().unwrap();
        let request = RenderRequest::new("empty", vec![], temp.path());
        let result = renderer(Arc::new(SolidSource::new(TILE))).render(&request, &CancellationToken::new());
        assert!(matches!(result, Err(MosaicError::EmptyInput)));
    }

    #[test]
    fn test_single_point_pads_all_four_sides() {
        let temp = TempDir::new().unwrap();
        let request = RenderRequest::new("single", vec![tile_centre(37, 41, 6)], temp.path())
            .with_zoom_range(6, 6)
            .with_route(false);

        let result = renderer(Arc::new(SolidSource::new(TILE)))
            .render(&request, &CancellationToken::new())
            .unwrap();

        let base = result.base().unwrap();
        assert_eq!(base.strategy, Some(PadStrategy::AllFour));
        assert_eq!(base.zoom, 6);
        assert_eq!(base.bbox.zoom(), 7);
        assert_eq!(base.bbox.x_axis(), &[73, 74, 75, 76]);
        assert_eq!(base.path, temp.path().join("single_0.png"));

        let image = ImageBackend::new().load(&base.path).unwrap();
        assert_eq!(image.dimensions(), (2 * TILE, 2 * TILE));
        assert_eq!(*image.get_pixel(TILE, TILE), tile_color(37, 41, 6));
    }

    #[test]
    fn test_refinement_levels_follow_successor() {
        let temp = TempDir::new().unwrap();
        let request = RenderRequest::new("route", vec![tile_centre(37, 41, 6)], temp.path())
            .with_zoom_range(6, 6)
            .with_refinement_levels(2)
            .with_route(false);

        let result = renderer(Arc::new(SolidSource::new(TILE)))
            .render(&request, &CancellationToken::new())
            .unwrap();

        assert_eq!(result.levels.len(), 3);
        let first = &result.levels[1];
        assert_eq!(first.zoom, 7);
        assert_eq!(first.bbox.x_axis(), &[73, 74, 75, 76]);
        let second = result.finest().unwrap();
        assert_eq!(second.zoom, 8);
        assert_eq!(second.bbox.width(), 8);
        assert!(second.path.ends_with("route_2.png"));

        let image = ImageBackend::new().load(&second.path).unwrap();
        assert_eq!(image.dimensions(), (8 * TILE, 8 * TILE));
    }

    #[test]
    fn test_route_marker_lands_on_same_place_at_every_level() {
        let temp = TempDir::new().unwrap();
        let request = RenderRequest::new("marker", vec![tile_centre(37, 41, 6)], temp.path())
            .with_zoom_range(6, 6)
            .with_refinement_levels(1);

        let result = renderer(Arc::new(SolidSource::new(TILE)))
            .render(&request, &CancellationToken::new())
            .unwrap();

        let marker = RouteStyle::default().marker_color;
        let base = ImageBackend::new().load(&result.levels[0].path).unwrap();
        let finer = ImageBackend::new().load(&result.levels[1].path).unwrap();
        // The point is the centre of tile (37, 41): the middle of both squares.
        assert_eq!(*base.get_pixel(TILE, TILE), marker);
        assert_eq!(*finer.get_pixel(2 * TILE, 2 * TILE), marker);
    }

    #[test]
    fn test_format_conversion_and_resize() {
        let temp = TempDir::new().unwrap();
        let request = RenderRequest::new("jpeg", vec![tile_centre(10, 10, 5)], temp.path())
            .with_zoom_range(5, 5)
            .with_format(".JPG")
            .with_resize(20, 20)
            .with_route(false);

        let result = renderer(Arc::new(SolidSource::new(TILE)))
            .render(&request, &CancellationToken::new())
            .unwrap();

        let base = result.base().unwrap();
        assert_eq!(base.path, temp.path().join("jpeg_0.jpg"));
        assert!(!temp.path().join("jpeg_0.png").exists());
        assert_eq!(ImageBackend::new().load(&base.path).unwrap().dimensions(), (20, 20));
    }

    #[test]
    fn test_fetch_failure_removes_unpadded_base() {
        let temp = TempDir::new().unwrap();
        let request = RenderRequest::new("fail", vec![tile_centre(37, 41, 6)], temp.path())
            .with_zoom_range(6, 6)
            .with_route(false);

        // The base tile succeeds, the padding ring does not.
        let result = renderer(Arc::new(SolidSource::failing_on(TILE, 38, 41)))
            .render(&request, &CancellationToken::new());

        assert!(matches!(result, Err(MosaicError::TileFetchFailed { x: 38, y: 41, .. })));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_cleanup_is_logged() {
        let temp = TempDir::new().unwrap();
        let logger = Arc::new(MemoryLogger::new());
        let renderer = MosaicRenderer::new(
            Arc::new(SolidSource::new(TILE)),
            Arc::new(ImageBackend::new()),
            MosaicConfig::new().with_tile_size(TILE),
            logger.clone(),
        )
        .unwrap();

        renderer.discard(&temp.path().join("absent.png"));
        assert!(logger.messages_at(LogLevel::Warn).is_empty());

        // A directory cannot be removed as a file.
        let blocked = temp.path().join("blocked.png");
        fs::create_dir(&blocked).unwrap();
        renderer.discard(&blocked);

        let warnings = logger.messages_at(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("blocked.png"));
        assert!(blocked.exists());
    }

    #[test]
    fn test_cancelled_render() {
        let temp = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let request = RenderRequest::new("cancel", vec![tile_centre(3, 3, 4)], temp.path());

        let result = renderer(Arc::new(SolidSource::new(TILE))).render(&request, &cancel);

        assert!(matches!(result, Err(MosaicError::Cancelled)));
    }
}
