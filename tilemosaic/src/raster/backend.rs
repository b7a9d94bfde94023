//! The raster capability trait.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tempfile::Builder;

use super::types::{PixelPoint, PixelRect, RasterError};

/// Image operations needed to assemble, pad and annotate mosaics.
///
/// Rasters are exchanged as in-memory RGBA buffers. Path-based operations
/// pick the encoding from the file extension.
pub trait RasterBackend: Send + Sync {
    /// Decodes encoded image bytes (PNG, JPEG, ...).
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, RasterError>;

    /// Reads and decodes an image file.
    fn load(&self, path: &Path) -> Result<RgbaImage, RasterError>;

    /// Encodes `image` to `path`, format chosen by extension.
    fn save(&self, image: &RgbaImage, path: &Path) -> Result<(), RasterError>;

    /// A fully transparent raster.
    fn blank(&self, width: u32, height: u32) -> RgbaImage {
        RgbaImage::new(width, height)
    }

    /// Arranges `grid` (rows of equally sized square tiles, north to south,
    /// each row west to east) into one raster.
    fn montage(&self, grid: &[Vec<RgbaImage>], tile_size: u32) -> Result<RgbaImage, RasterError>;

    /// Copies `rect` out of `image`. The rectangle must lie inside the image.
    fn crop(&self, image: &RgbaImage, rect: PixelRect) -> Result<RgbaImage, RasterError>;

    /// Resamples `image` to `width × height`.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32)
        -> Result<RgbaImage, RasterError>;

    /// Draws a line segment `width` pixels wide.
    fn draw_line(
        &self,
        image: &mut RgbaImage,
        from: PixelPoint,
        to: PixelPoint,
        color: Rgba<u8>,
        width: u32,
    );

    /// Draws a filled circle.
    fn fill_circle(&self, image: &mut RgbaImage, center: PixelPoint, radius: u32, color: Rgba<u8>);

    /// Writes `text` inside `rect`, scaled to fit.
    fn annotate(
        &self,
        image: &mut RgbaImage,
        text: &str,
        rect: PixelRect,
        color: Rgba<u8>,
    ) -> Result<(), RasterError>;

    /// Alpha-blends `overlay` onto `base` with its top-left corner at `(x, y)`.
    /// The overlay must fit inside the base.
    fn composite(
        &self,
        base: &mut RgbaImage,
        overlay: &RgbaImage,
        x: u32,
        y: u32,
    ) -> Result<(), RasterError>;

    /// Re-encodes `path` (with extension `from_ext`) as `to_ext`, removes the
    /// source and returns the new path.
    fn convert_format(
        &self,
        path: &Path,
        from_ext: &str,
        to_ext: &str,
    ) -> Result<PathBuf, RasterError>;
}

/// Saves `image` to `path` without ever leaving a partial file there.
///
/// The image is encoded to a temporary file in the destination folder and
/// renamed over `path` once complete. The temporary file is removed if
/// encoding fails.
pub fn save_atomically(
    backend: &dyn RasterBackend,
    image: &RgbaImage,
    path: &Path,
) -> Result<(), RasterError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let temp = Builder::new()
        .prefix(".tilemosaic-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|source| RasterError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    backend.save(image, temp.path())?;

    temp.persist(path).map_err(|e| RasterError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
