//! [`RasterBackend`] built on the `image` and `imageproc` crates.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut, text_size};

use super::backend::{save_atomically, RasterBackend};
use super::types::{PixelPoint, PixelRect, RasterError};

/// Raster operations on in-memory RGBA buffers.
#[derive(Clone)]
pub struct ImageBackend {
    font: Option<FontArc>,
    filter: FilterType,
}

impl ImageBackend {
    /// Backend without a label font and Lanczos resampling.
    pub fn new() -> Self {
        Self {
            font: None,
            filter: FilterType::Lanczos3,
        }
    }

    /// Uses `font` for [`RasterBackend::annotate`].
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Loads a TrueType/OpenType font file for labels.
    pub fn with_font_file(self, path: &Path) -> Result<Self, RasterError> {
        let bytes = fs::read(path).map_err(|source| RasterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| RasterError::Font(format!("{}: {}", path.display(), e)))?;
        Ok(self.with_font(font))
    }

    /// Resampling filter used by [`RasterBackend::resize`].
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl Default for ImageBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn format_for(path: &Path) -> Result<ImageFormat, RasterError> {
    ImageFormat::from_path(path)
        .map_err(|_| RasterError::UnsupportedFormat(path.display().to_string()))
}

fn check_fits(rect: PixelRect, image: &RgbaImage, what: &str) -> Result<(), RasterError> {
    if rect.fits_within(image.width(), image.height()) {
        Ok(())
    } else {
        Err(RasterError::Geometry(format!(
            "{} {}x{}+{}+{} outside {}x{} raster",
            what,
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            image.width(),
            image.height()
        )))
    }
}

impl RasterBackend for ImageBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RgbaImage, RasterError> {
        image::load_from_memory(bytes)
            .map(|img| img.to_rgba8())
            .map_err(RasterError::Decode)
    }

    fn load(&self, path: &Path) -> Result<RgbaImage, RasterError> {
        let bytes = fs::read(path).map_err(|source| RasterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode(&bytes)
    }

    fn save(&self, image: &RgbaImage, path: &Path) -> Result<(), RasterError> {
        let format = format_for(path)?;
        let result = match format {
            // JPEG has no alpha channel.
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
                .to_rgb8()
                .save_with_format(path, format),
            _ => image.save_with_format(path, format),
        };
        result.map_err(|source| RasterError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn montage(&self, grid: &[Vec<RgbaImage>], tile_size: u32) -> Result<RgbaImage, RasterError> {
        let rows = grid.len() as u32;
        let columns = grid.first().map_or(0, |row| row.len()) as u32;
        if rows == 0 || columns == 0 || tile_size == 0 {
            return Err(RasterError::Geometry("empty montage grid".to_string()));
        }

        let mut canvas = self.blank(columns * tile_size, rows * tile_size);
        for (row_index, row) in grid.iter().enumerate() {
            if row.len() as u32 != columns {
                return Err(RasterError::Geometry(format!(
                    "montage row {} has {} tiles, expected {}",
                    row_index,
                    row.len(),
                    columns
                )));
            }
            for (column_index, tile) in row.iter().enumerate() {
                if tile.dimensions() != (tile_size, tile_size) {
                    return Err(RasterError::Geometry(format!(
                        "tile at row {} column {} is {}x{}, expected {}x{}",
                        row_index,
                        column_index,
                        tile.width(),
                        tile.height(),
                        tile_size,
                        tile_size
                    )));
                }
                imageops::replace(
                    &mut canvas,
                    tile,
                    column_index as i64 * tile_size as i64,
                    row_index as i64 * tile_size as i64,
                );
            }
        }
        Ok(canvas)
    }

    fn crop(&self, image: &RgbaImage, rect: PixelRect) -> Result<RgbaImage, RasterError> {
        check_fits(rect, image, "crop")?;
        Ok(imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
    }

    fn resize(
        &self,
        image: &RgbaImage,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Geometry(format!(
                "cannot resize to {}x{}",
                width, height
            )));
        }
        if image.dimensions() == (width, height) {
            return Ok(image.clone());
        }
        Ok(imageops::resize(image, width, height, self.filter))
    }

    fn draw_line(
        &self,
        image: &mut RgbaImage,
        from: PixelPoint,
        to: PixelPoint,
        color: Rgba<u8>,
        width: u32,
    ) {
        let (x0, y0) = (from.x as f32, from.y as f32);
        let (x1, y1) = (to.x as f32, to.y as f32);
        if width <= 1 {
            draw_line_segment_mut(image, (x0, y0), (x1, y1), color);
            return;
        }

        // Wide lines are parallel strokes along the normal plus round caps.
        let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        if length > 0.0 {
            let (nx, ny) = (-(y1 - y0) / length, (x1 - x0) / length);
            let half = (width - 1) as f32 / 2.0;
            let mut offset = -half;
            while offset <= half {
                draw_line_segment_mut(
                    image,
                    (x0 + nx * offset, y0 + ny * offset),
                    (x1 + nx * offset, y1 + ny * offset),
                    color,
                );
                offset += 0.5;
            }
        }
        let cap = width / 2;
        self.fill_circle(image, from, cap, color);
        self.fill_circle(image, to, cap, color);
    }

    fn fill_circle(&self, image: &mut RgbaImage, center: PixelPoint, radius: u32, color: Rgba<u8>) {
        draw_filled_circle_mut(
            image,
            (center.x as i32, center.y as i32),
            radius as i32,
            color,
        );
    }

    fn annotate(
        &self,
        image: &mut RgbaImage,
        text: &str,
        rect: PixelRect,
        color: Rgba<u8>,
    ) -> Result<(), RasterError> {
        let font = self.font.as_ref().ok_or(RasterError::NoFont)?;
        check_fits(rect, image, "label")?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let mut scale = PxScale::from(rect.height as f32);
        let (text_width, _) = text_size(scale, font, text);
        if text_width as f32 > rect.width as f32 {
            let shrink = rect.width as f32 / text_width as f32;
            scale = PxScale::from(rect.height as f32 * shrink);
        }

        draw_text_mut(
            image,
            color,
            rect.x as i32,
            rect.y as i32,
            scale,
            font,
            text,
        );
        Ok(())
    }

    fn composite(
        &self,
        base: &mut RgbaImage,
        overlay: &RgbaImage,
        x: u32,
        y: u32,
    ) -> Result<(), RasterError> {
        let rect = PixelRect::new(x, y, overlay.width(), overlay.height());
        check_fits(rect, base, "overlay")?;
        imageops::overlay(base, overlay, x as i64, y as i64);
        Ok(())
    }

    fn convert_format(
        &self,
        path: &Path,
        from_ext: &str,
        to_ext: &str,
    ) -> Result<PathBuf, RasterError> {
        let from_ext = from_ext.trim_start_matches('.');
        let to_ext = to_ext.trim_start_matches('.');
        let source = path.with_extension(from_ext);
        if from_ext.eq_ignore_ascii_case(to_ext) {
            return Ok(source);
        }

        let target = path.with_extension(to_ext);
        format_for(&target)?;

        let image = self.load(&source)?;
        save_atomically(self, &image, &target)?;
        fs::remove_file(&source).map_err(|e| RasterError::Io {
            path: source.clone(),
            source: e,
        })?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn solid(size: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(size, size, color)
    }

    fn shade(value: u8) -> Rgba<u8> {
        Rgba([value, value, value, 255])
    }

    #[test]
    fn test_save_and_load_png() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tile.png");
        let backend = ImageBackend::new();

        backend.save(&solid(8, RED), &path).unwrap();
        let loaded = backend.load(&path).unwrap();

        assert_eq!(loaded.dimensions(), (8, 8));
        assert_eq!(*loaded.get_pixel(3, 3), RED);
    }

    #[test]
    fn test_save_jpeg_drops_alpha() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tile.jpg");
        let backend = ImageBackend::new();

        backend.save(&solid(16, RED), &path).unwrap();
        assert_eq!(backend.load(&path).unwrap().dimensions(), (16, 16));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let result = ImageBackend::new().save(&solid(2, RED), &temp.path().join("tile.xyz"));
        assert!(matches!(result, Err(RasterError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decode_garbage() {
        let result = ImageBackend::new().decode(b"definitely not an image");
        assert!(matches!(result, Err(RasterError::Decode(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ImageBackend::new().load(Path::new("/nonexistent/tile.png"));
        assert!(matches!(result, Err(RasterError::Io { .. })));
    }

    #[test]
    fn test_montage_places_tiles_by_grid_position() {
        let backend = ImageBackend::new();
        let grid = vec![
            vec![solid(4, shade(10)), solid(4, shade(20))],
            vec![solid(4, shade(30)), solid(4, shade(40))],
        ];

        let canvas = backend.montage(&grid, 4).unwrap();

        assert_eq!(canvas.dimensions(), (8, 8));
        assert_eq!(*canvas.get_pixel(0, 0), shade(10));
        assert_eq!(*canvas.get_pixel(7, 0), shade(20));
        assert_eq!(*canvas.get_pixel(0, 7), shade(30));
        assert_eq!(*canvas.get_pixel(7, 7), shade(40));
    }

    #[test]
    fn test_montage_rejects_ragged_rows_and_wrong_sizes() {
        let backend = ImageBackend::new();
        let ragged = vec![vec![solid(4, RED), solid(4, RED)], vec![solid(4, RED)]];
        assert!(matches!(
            backend.montage(&ragged, 4),
            Err(RasterError::Geometry(_))
        ));

        let wrong_size = vec![vec![solid(5, RED)]];
        assert!(matches!(
            backend.montage(&wrong_size, 4),
            Err(RasterError::Geometry(_))
        ));

        assert!(backend.montage(&[], 4).is_err());
    }

    #[test]
    fn test_crop() {
        let backend = ImageBackend::new();
        let grid = vec![vec![solid(4, shade(10)), solid(4, shade(20))]];
        let canvas = backend.montage(&grid, 4).unwrap();

        let cropped = backend.crop(&canvas, PixelRect::new(2, 0, 4, 4)).unwrap();

        assert_eq!(cropped.dimensions(), (4, 4));
        assert_eq!(*cropped.get_pixel(1, 0), shade(10));
        assert_eq!(*cropped.get_pixel(2, 0), shade(20));
    }

    #[test]
    fn test_crop_outside_raster_fails() {
        let backend = ImageBackend::new();
        let result = backend.crop(&solid(4, RED), PixelRect::new(1, 1, 4, 4));
        assert!(matches!(result, Err(RasterError::Geometry(_))));
    }

    #[test]
    fn test_resize() {
        let backend = ImageBackend::new();
        let resized = backend.resize(&solid(8, BLUE), 4, 2).unwrap();
        assert_eq!(resized.dimensions(), (4, 2));
        assert!(backend.resize(&solid(8, BLUE), 0, 2).is_err());
    }

    #[test]
    fn test_draw_line_marks_pixels_along_segment() {
        let backend = ImageBackend::new();
        let mut image = backend.blank(20, 20);

        backend.draw_line(&mut image, PixelPoint::new(2, 10), PixelPoint::new(17, 10), RED, 1);

        assert_eq!(*image.get_pixel(10, 10), RED);
        assert_eq!(image.get_pixel(10, 12)[3], 0);
    }

    #[test]
    fn test_wide_line_covers_neighbouring_rows() {
        let backend = ImageBackend::new();
        let mut image = backend.blank(20, 20);

        backend.draw_line(&mut image, PixelPoint::new(2, 10), PixelPoint::new(17, 10), RED, 5);

        assert_eq!(*image.get_pixel(10, 8), RED);
        assert_eq!(*image.get_pixel(10, 12), RED);
        assert_eq!(image.get_pixel(10, 15)[3], 0);
    }

    #[test]
    fn test_fill_circle() {
        let backend = ImageBackend::new();
        let mut image = backend.blank(20, 20);

        backend.fill_circle(&mut image, PixelPoint::new(10, 10), 3, BLUE);

        assert_eq!(*image.get_pixel(10, 10), BLUE);
        assert_eq!(*image.get_pixel(12, 10), BLUE);
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_annotate_without_font_fails() {
        let backend = ImageBackend::new();
        let mut image = backend.blank(64, 16);
        let result = backend.annotate(&mut image, "EGLL", PixelRect::new(0, 0, 64, 16), RED);
        assert!(matches!(result, Err(RasterError::NoFont)));
        assert!(!backend.has_font());
    }

    #[test]
    fn test_with_font_file_rejects_non_font() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("font.ttf");
        fs::write(&path, b"not a font").unwrap();

        let result = ImageBackend::new().with_font_file(&path);
        assert!(matches!(result, Err(RasterError::Font(_))));
    }

    #[test]
    fn test_composite() {
        let backend = ImageBackend::new();
        let mut base = backend.blank(8, 8);

        backend.composite(&mut base, &solid(4, RED), 4, 0).unwrap();

        assert_eq!(*base.get_pixel(5, 1), RED);
        assert_eq!(base.get_pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_composite_outside_base_fails() {
        let backend = ImageBackend::new();
        let mut base = backend.blank(8, 8);
        let result = backend.composite(&mut base, &solid(4, RED), 5, 0);
        assert!(matches!(result, Err(RasterError::Geometry(_))));
    }

    #[test]
    fn test_convert_format_replaces_source() {
        let temp = TempDir::new().unwrap();
        let backend = ImageBackend::new();
        let stem = temp.path().join("mosaic_0");
        backend.save(&solid(8, RED), &stem.with_extension("png")).unwrap();

        let converted = backend.convert_format(&stem, "png", ".jpg").unwrap();

        assert_eq!(converted, stem.with_extension("jpg"));
        assert!(converted.exists());
        assert!(!stem.with_extension("png").exists());
    }

    #[test]
    fn test_convert_format_same_extension_is_noop() {
        let temp = TempDir::new().unwrap();
        let backend = ImageBackend::new();
        let path = temp.path().join("mosaic.png");
        backend.save(&solid(4, RED), &path).unwrap();

        assert_eq!(backend.convert_format(&path, "png", "PNG").unwrap(), path);
        assert!(path.exists());
    }

    #[test]
    fn test_save_atomically_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let backend = ImageBackend::new();
        let path = temp.path().join("mosaic.png");

        save_atomically(&backend, &solid(4, RED), &path).unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("mosaic.png")]);
    }

    #[test]
    fn test_save_atomically_failure_keeps_previous_file() {
        let temp = TempDir::new().unwrap();
        let backend = ImageBackend::new();
        let path = temp.path().join("mosaic.xyz");
        fs::write(&path, b"previous").unwrap();

        let result = save_atomically(&backend, &solid(4, RED), &path);

        assert!(matches!(result, Err(RasterError::UnsupportedFormat(_))));
        assert_eq!(fs::read(&path).unwrap(), b"previous");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }
}
