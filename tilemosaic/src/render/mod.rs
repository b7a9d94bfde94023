//! Render orchestration: points in, annotated mosaics out.
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use tilemosaic::render::{MosaicRenderer, RenderRequest, RoutePoint};
//!
//! let renderer = MosaicRenderer::new(source, raster, config, logger)?;
//! let request = RenderRequest::new("circuit", vec![RoutePoint::new(51.47, -0.46)], "/tmp/out")
//!     .with_refinement_levels(2);
//! let result = renderer.render(&request, &CancellationToken::new())?;
//! ```

mod renderer;
mod request;

pub use renderer::{level_path, MosaicRenderer};
pub use request::{RenderRequest, RenderResult, RenderedLevel, RoutePoint};
