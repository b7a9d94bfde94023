//! Tile fetch capability
//!
//! Tiles are addressed by `(x, y, zoom)` in the slippy-map scheme and returned
//! as encoded raster bytes. [`UrlTemplateProvider`] talks to any XYZ tile
//! server; [`CachedTileSource`] adds a disk cache in front of any source.
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilemosaic::log::TracingLogger;
//! use tilemosaic::provider::{CachedTileSource, ReqwestClient, UrlTemplateProvider};
//!
//! let http_client = ReqwestClient::new()?;
//! let remote = UrlTemplateProvider::new(http_client, "https://tile.openstreetmap.org/{z}/{x}/{y}.png")?;
//! let source = CachedTileSource::new(remote, "/tmp/tiles", Arc::new(TracingLogger));
//! ```

mod cached;
mod http;
mod template;
mod types;

pub use cached::CachedTileSource;
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use template::UrlTemplateProvider;
pub use types::{ProviderError, TileSource};

#[cfg(test)]
pub use http::tests::MockHttpClient;
