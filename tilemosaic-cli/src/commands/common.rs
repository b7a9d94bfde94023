//! Argument parsing shared across CLI commands.

use tilemosaic::config::{ConfigFile, MosaicConfig};
use tilemosaic::coord::parse_coordinate;
use tilemosaic::render::RoutePoint;

/// Parses `LAT,LON` or `LAT,LON,LABEL`.
///
/// Coordinates accept hemisphere letters (`51.47N,0.46W`). Everything after
/// the second comma is the label, commas included.
pub fn parse_point(value: &str) -> Result<RoutePoint, String> {
    let mut parts = value.splitn(3, ',');
    let (Some(lat), Some(lon)) = (parts.next(), parts.next()) else {
        return Err(format!("expected LAT,LON[,LABEL], got '{}'", value));
    };
    let (lat, lon) = parse_coordinate(lat, lon).map_err(|e| e.to_string())?;

    Ok(match parts.next().map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => RoutePoint::labelled(lat, lon, label),
        None => RoutePoint::new(lat, lon),
    })
}

/// Parses `WIDTHxHEIGHT`.
pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .to_lowercase()
        .split_once('x')
        .map(|(w, h)| (w.trim().parse::<u32>(), h.trim().parse::<u32>()))
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    match (width, height) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(format!("invalid size '{}'", value)),
    }
}

/// Grid settings from config with command-line overrides applied.
pub fn resolve_mosaic(
    config: &ConfigFile,
    target_size: Option<u32>,
    parallel: Option<usize>,
) -> MosaicConfig {
    let mut mosaic = config.mosaic;
    if let Some(target) = target_size {
        mosaic = mosaic.with_target_size(target);
    }
    if let Some(parallel) = parallel {
        mosaic = mosaic.with_parallel_fetches(parallel);
    }
    mosaic
}

/// Zoom range from config with command-line overrides applied.
pub fn resolve_zoom_range(
    config: &ConfigFile,
    min_zoom: Option<u8>,
    max_zoom: Option<u8>,
) -> (u8, u8) {
    (
        min_zoom.unwrap_or(config.tiles.min_zoom),
        max_zoom.unwrap_or(config.tiles.max_zoom),
    )
}
