//! Route lines, markers and labels over a mosaic.

use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::error::MosaicResult;
use crate::log::Logger;
use crate::log_debug;
use crate::raster::{PixelPoint, PixelRect, RasterBackend};

/// Colours and sizes used when drawing a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteStyle {
    pub line_color: Rgba<u8>,
    pub line_width: u32,
    pub marker_color: Rgba<u8>,
    pub marker_radius: u32,
    pub label_color: Rgba<u8>,
    pub label_height: u32,
    pub label_max_width: u32,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            line_color: Rgba([220, 30, 30, 255]),
            line_width: 3,
            marker_color: Rgba([30, 30, 220, 255]),
            marker_radius: 6,
            label_color: Rgba([0, 0, 0, 255]),
            label_height: 18,
            label_max_width: 160,
        }
    }
}

/// A point on the route, optionally labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub point: PixelPoint,
    pub label: Option<String>,
}

impl RouteStop {
    pub fn new(point: PixelPoint) -> Self {
        Self { point, label: None }
    }

    pub fn labelled(point: PixelPoint, label: impl Into<String>) -> Self {
        Self {
            point,
            label: Some(label.into()),
        }
    }
}

/// Draws a route: connecting lines first, then markers, then labels.
pub struct RouteOverlay {
    raster: Arc<dyn RasterBackend>,
    style: RouteStyle,
    logger: Arc<dyn Logger>,
}

impl RouteOverlay {
    pub fn new(raster: Arc<dyn RasterBackend>, style: RouteStyle, logger: Arc<dyn Logger>) -> Self {
        Self {
            raster,
            style,
            logger,
        }
    }

    pub fn style(&self) -> &RouteStyle {
        &self.style
    }

    /// Draws `stops` in order onto `image`.
    ///
    /// Labels that would not fit to the right of their marker are skipped.
    /// Fails only if a label cannot be rendered (for example, no font).
    pub fn draw(&self, image: &mut RgbaImage, stops: &[RouteStop]) -> MosaicResult<()> {
        for pair in stops.windows(2) {
            self.raster.draw_line(
                image,
                pair[0].point,
                pair[1].point,
                self.style.line_color,
                self.style.line_width,
            );
        }

        for stop in stops {
            self.raster.fill_circle(
                image,
                stop.point,
                self.style.marker_radius,
                self.style.marker_color,
            );
        }

        for stop in stops {
            let Some(label) = stop.label.as_deref() else {
                continue;
            };
            match self.label_rect(image, stop.point) {
                Some(rect) => {
                    self.raster
                        .annotate(image, label, rect, self.style.label_color)?
                }
                None => log_debug!(
                    self.logger,
                    "No room for label '{}' at ({}, {})",
                    label,
                    stop.point.x,
                    stop.point.y
                ),
            }
        }
        Ok(())
    }

    /// Label box right of the marker, clipped to the image.
    fn label_rect(&self, image: &RgbaImage, point: PixelPoint) -> Option<PixelRect> {
        let x = point.x + self.style.marker_radius + 2;
        let y = point.y.saturating_sub(self.style.label_height / 2);
        let width = self.style.label_max_width.min(image.width().saturating_sub(x));
        let height = self.style.label_height.min(image.height().saturating_sub(y));
        (width > 0 && height > 0).then(|| PixelRect::new(x, y, width, height))
    }
}
