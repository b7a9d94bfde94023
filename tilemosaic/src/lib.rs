//! TileMosaic - tile-grid bounding boxes and map mosaics
//!
//! This library turns a set of geographic points into square, annotated map
//! images stitched from slippy-map tiles, the way scenario generators for
//! flight simulators build their briefing maps.
//!
//! # High-Level API
//!
//! For most use cases, the [`render`] module drives the whole pipeline:
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use tilemosaic::config::MosaicConfig;
//! use tilemosaic::log::TracingLogger;
//! use tilemosaic::provider::{ReqwestClient, UrlTemplateProvider};
//! use tilemosaic::raster::ImageBackend;
//! use tilemosaic::render::{MosaicRenderer, RenderRequest, RoutePoint};
//!
//! let provider = UrlTemplateProvider::new(
//!     ReqwestClient::new()?,
//!     "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
//! )?;
//! let renderer = MosaicRenderer::new(
//!     Arc::new(provider),
//!     Arc::new(ImageBackend::new()),
//!     MosaicConfig::default(),
//!     Arc::new(TracingLogger),
//! )?;
//!
//! let points = vec![RoutePoint::new(51.4775, -0.4614), RoutePoint::new(51.1537, -0.1821)];
//! let request = RenderRequest::new("heathrow-gatwick", points, "maps");
//! renderer.render(&request, &CancellationToken::new())?;
//! ```
//!
//! The lower layers are usable on their own: [`bbox`] computes tile grids,
//! [`pad`] squares a grid and [`mosaic`] assembles and annotates images.

pub mod bbox;
pub mod config;
pub mod coord;
pub mod error;
pub mod log;
pub mod logging;
pub mod mosaic;
pub mod pad;
pub mod provider;
pub mod raster;
pub mod render;

pub use error::{MosaicError, MosaicResult};

/// Version of the TileMosaic library and CLI.
///
/// The version is defined in the workspace `Cargo.toml` and injected at
/// compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
