//! Render inputs and outputs.

use std::path::PathBuf;

use crate::bbox::{BoundingBox, MapEdges};
use crate::config::{ConfigFile, DEFAULT_IMAGE_FORMAT, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::pad::PadStrategy;

/// A geographic point on the route.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
    pub label: Option<String>,
}

impl RoutePoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            label: None,
        }
    }

    pub fn labelled(lat: f64, lon: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            label: Some(label.into()),
        }
    }
}

/// What to render and where.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// File name prefix: levels are written as `<name>_<level>.<format>`.
    pub name: String,
    pub points: Vec<RoutePoint>,
    pub output_dir: PathBuf,
    /// Finer mosaics rendered after the base mosaic.
    pub refinement_levels: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Extension of the final images.
    pub format: String,
    /// Final pixel size of every level, if it should be resampled.
    pub resize: Option<(u32, u32)>,
    pub draw_route: bool,
}

impl RenderRequest {
    pub fn new(name: impl Into<String>, points: Vec<RoutePoint>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            points,
            output_dir: output_dir.into(),
            refinement_levels: 0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            format: DEFAULT_IMAGE_FORMAT.to_string(),
            resize: None,
            draw_route: true,
        }
    }

    /// Request using the zoom range, folder, format and levels of a config file.
    pub fn from_config(name: impl Into<String>, points: Vec<RoutePoint>, config: &ConfigFile) -> Self {
        Self::new(name, points, config.output.image_folder.clone())
            .with_zoom_range(config.tiles.min_zoom, config.tiles.max_zoom)
            .with_format(config.output.format.clone())
            .with_refinement_levels(config.output.refinement_levels)
    }

    pub fn with_refinement_levels(mut self, levels: u32) -> Self {
        self.refinement_levels = levels;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into().trim_start_matches('.').to_lowercase();
        self
    }

    pub fn with_resize(mut self, width: u32, height: u32) -> Self {
        self.resize = Some((width, height));
        self
    }

    pub fn with_route(mut self, draw_route: bool) -> Self {
        self.draw_route = draw_route;
        self
    }

    pub(crate) fn coordinates(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.lat, p.lon)).collect()
    }
}

/// One written mosaic.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLevel {
    /// 0 for the base mosaic, then one per refinement.
    pub level: u32,
    pub path: PathBuf,
    /// Zoom level of the tiles in this image.
    pub zoom: u8,
    /// Grid the image covers. For a padded base mosaic this is the
    /// successor grid, one zoom level finer than `zoom`.
    pub bbox: BoundingBox,
    pub edges: MapEdges,
    /// Padding applied to the base mosaic; `None` for refinement levels.
    pub strategy: Option<PadStrategy>,
}

/// Everything written by one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub levels: Vec<RenderedLevel>,
}

impl RenderResult {
    pub fn base(&self) -> Option<&RenderedLevel> {
        self.levels.first()
    }

    pub fn finest(&self) -> Option<&RenderedLevel> {
        self.levels.last()
    }
}
