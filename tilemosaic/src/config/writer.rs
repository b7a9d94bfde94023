//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.tiles.api_key.as_deref().unwrap_or("");
    let cache_dir = config
        .tiles
        .cache_dir
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();
    let font = config
        .output
        .font
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[tiles]
; Tile server URL template. Placeholders:
;   {{z}} zoom level, {{x}} column, {{y}} row, {{key}} the api_key below
url_template = {}
; API key, only needed when url_template contains {{key}}
api_key = {}
; Disk cache for downloaded tiles, stored as <cache_dir>/<zoom>/<x>/<y>.png
; Leave empty to disable the cache
cache_dir = {}
; Zoom levels considered when fitting a set of points (0-20)
min_zoom = {}
max_zoom = {}
; HTTP timeout in seconds
timeout = {}

[mosaic]
; Tile edge length in pixels (must be even)
tile_size = {}
; Minimum distance in pixels between any point and the mosaic edge
trim_margin = {}
; Side length of the padded square, in tiles (at least 2)
target_size = {}
; Tiles downloaded concurrently (1 = sequential)
parallel_fetches = {}

[output]
; Folder that receives rendered mosaics
image_folder = {}
; TrueType/OpenType font used for route labels (empty = no labels)
font = {}
; Format of the final images: png, jpg, bmp, tiff or webp
format = {}
; Number of finer mosaics rendered after the base mosaic
refinement_levels = {}

[logging]
; Log directory and file name (the file is truncated at start-up)
directory = {}
file = {}
; Filter used when RUST_LOG is not set, e.g. info or tilemosaic=debug
filter = {}
"#,
        config.tiles.url_template,
        api_key,
        cache_dir,
        config.tiles.min_zoom,
        config.tiles.max_zoom,
        config.tiles.timeout,
        config.mosaic.tile_size(),
        config.mosaic.trim_margin(),
        config.mosaic.target_size(),
        config.mosaic.parallel_fetches(),
        path_to_string(&config.output.image_folder),
        font,
        config.output.format,
        config.output.refinement_levels,
        path_to_string(&config.logging.directory),
        config.logging.file,
        config.logging.filter,
    )
}

/// Writes paths under the home directory with a `~/` prefix.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
