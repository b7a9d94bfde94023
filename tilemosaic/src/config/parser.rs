//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::MAX_ZOOM;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tiles] section
    if let Some(section) = ini.section(Some("tiles")) {
        if let Some(v) = non_empty(section, "url_template") {
            for placeholder in ["{z}", "{x}", "{y}"] {
                if !v.contains(placeholder) {
                    return Err(invalid(
                        "tiles",
                        "url_template",
                        v,
                        "must contain {z}, {x} and {y}",
                    ));
                }
            }
            config.tiles.url_template = v.to_string();
        }
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            config.tiles.api_key = (!v.is_empty()).then(|| v.to_string());
        }
        if let Some(v) = section.get("cache_dir") {
            let v = v.trim();
            config.tiles.cache_dir = (!v.is_empty()).then(|| expand_tilde(v));
        }
        if let Some(zoom) = parse_zoom(section, "min_zoom")? {
            config.tiles.min_zoom = zoom;
        }
        if let Some(zoom) = parse_zoom(section, "max_zoom")? {
            config.tiles.max_zoom = zoom;
        }
        if config.tiles.min_zoom > config.tiles.max_zoom {
            return Err(invalid(
                "tiles",
                "min_zoom",
                &config.tiles.min_zoom.to_string(),
                "must not exceed max_zoom",
            ));
        }
        if let Some(v) = parse_number::<u64>(section, "tiles", "timeout", "seconds")? {
            config.tiles.timeout = v;
        }
    }

    // [mosaic] section
    if let Some(section) = ini.section(Some("mosaic")) {
        let mut mosaic = config.mosaic;
        if let Some(v) = parse_number(section, "mosaic", "tile_size", "pixels")? {
            mosaic = mosaic.with_tile_size(v);
        }
        if let Some(v) = parse_number(section, "mosaic", "trim_margin", "pixels")? {
            mosaic = mosaic.with_trim_margin(v);
        }
        if let Some(v) = parse_number(section, "mosaic", "target_size", "tiles")? {
            mosaic = mosaic.with_target_size(v);
        }
        if let Some(v) = parse_number(section, "mosaic", "parallel_fetches", "tiles")? {
            mosaic = mosaic.with_parallel_fetches(v);
        }
        mosaic.validate()?;
        config.mosaic = mosaic;
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = non_empty(section, "image_folder") {
            config.output.image_folder = expand_tilde(v);
        }
        if let Some(v) = section.get("font") {
            let v = v.trim();
            config.output.font = (!v.is_empty()).then(|| expand_tilde(v));
        }
        if let Some(v) = non_empty(section, "format") {
            let v = v.trim_start_matches('.').to_lowercase();
            if !["png", "jpg", "jpeg", "bmp", "tiff", "webp"].contains(&v.as_str()) {
                return Err(invalid(
                    "output",
                    "format",
                    &v,
                    "must be one of: png, jpg, jpeg, bmp, tiff, webp",
                ));
            }
            config.output.format = v;
        }
        if let Some(v) = parse_number(section, "output", "refinement_levels", "levels")? {
            config.output.refinement_levels = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
        if let Some(v) = non_empty(section, "filter") {
            config.logging.filter = v.to_string();
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    unit: &str,
) -> Result<Option<T>, ConfigFileError> {
    let Some(v) = non_empty(section, key) else {
        return Ok(None);
    };
    v.parse().map(Some).map_err(|_| {
        invalid(
            section_name,
            key,
            v,
            &format!("must be a non-negative integer ({})", unit),
        )
    })
}

fn parse_zoom(section: &Properties, key: &str) -> Result<Option<u8>, ConfigFileError> {
    match parse_number::<u8>(section, "tiles", key, "zoom level")? {
        Some(zoom) if zoom > MAX_ZOOM => Err(invalid(
            "tiles",
            key,
            &zoom.to_string(),
            &format!("must be at most {}", MAX_ZOOM),
        )),
        other => Ok(other),
    }
}

/// Expands a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
