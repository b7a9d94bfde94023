//! Disk-cached tile source.
//!
//! Tiles are stored content-addressed by grid position at
//! `<cache_dir>/<zoom>/<x>/<y>.png`. A hit never touches the wrapped source.
//! Failing to write the cache is logged and otherwise ignored.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::log::Logger;
use crate::provider::{ProviderError, TileSource};
use crate::{log_trace, log_warn};

/// Wraps a [`TileSource`] with a directory cache.
pub struct CachedTileSource<S: TileSource> {
    inner: S,
    cache_dir: PathBuf,
    logger: Arc<dyn Logger>,
}

impl<S: TileSource> CachedTileSource<S> {
    pub fn new(inner: S, cache_dir: impl Into<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        Self {
            inner,
            cache_dir: cache_dir.into(),
            logger,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache location of a tile.
    pub fn tile_path(&self, x: u32, y: u32, zoom: u8) -> PathBuf {
        self.cache_dir
            .join(zoom.to_string())
            .join(x.to_string())
            .join(format!("{}.png", y))
    }

    fn read_cached(&self, path: &Path) -> Option<Vec<u8>> {
        match fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            _ => None,
        }
    }

    fn write_cached(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let dir = path.parent().unwrap_or(&self.cache_dir);
        fs::create_dir_all(dir)?;
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(bytes)?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl<S: TileSource> TileSource for CachedTileSource<S> {
    fn fetch_tile(&self, x: u32, y: u32, zoom: u8) -> Result<Vec<u8>, ProviderError> {
        let path = self.tile_path(x, y, zoom);
        if let Some(bytes) = self.read_cached(&path) {
            log_trace!(self.logger, "Cache hit for z{}/{}/{}", zoom, x, y);
            return Ok(bytes);
        }

        let bytes = self.inner.fetch_tile(x, y, zoom)?;
        if let Err(e) = self.write_cached(&path, &bytes) {
            log_warn!(
                self.logger,
                "Failed to cache tile z{}/{}/{} at {}: {}",
                zoom,
                x,
                y,
                path.display(),
                e
            );
        }
        Ok(bytes)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn min_zoom(&self) -> u8 {
        self.inner.min_zoom()
    }

    fn max_zoom(&self) -> u8 {
        self.inner.max_zoom()
    }
}
