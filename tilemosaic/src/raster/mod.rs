//! Raster capability.
//!
//! The grid logic never touches pixels directly; it goes through the
//! [`RasterBackend`] trait (decode, montage, crop, resize, draw, annotate,
//! composite, format conversion). [`ImageBackend`] implements it with the
//! `image` and `imageproc` crates.
//!
//! ```
//! use tilemosaic::raster::{ImageBackend, PixelRect, RasterBackend};
//!
//! let backend = ImageBackend::new();
//! let canvas = backend.blank(512, 512);
//! let quarter = backend.crop(&canvas, PixelRect::new(0, 0, 256, 256)).unwrap();
//! assert_eq!(quarter.dimensions(), (256, 256));
//! ```

mod backend;
mod image_backend;
mod types;

pub use backend::{save_atomically, RasterBackend};
pub use image_backend::ImageBackend;
pub use types::{PixelPoint, PixelRect, RasterError};

pub use image::{Rgba, RgbaImage};
