//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and construction of
//! the tile source and renderer shared by the command handlers.

use std::path::Path;
use std::sync::Arc;

use tilemosaic::config::{ConfigFile, MosaicConfig};
use tilemosaic::log::{Logger, TracingLogger};
use tilemosaic::logging::{init_logging, LoggingGuard};
use tilemosaic::provider::{CachedTileSource, ReqwestClient, TileSource, UrlTemplateProvider};
use tilemosaic::raster::{ImageBackend, RasterBackend};
use tilemosaic::render::MosaicRenderer;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log file writer alive while the runner exists
    logging_guard: LoggingGuard,
    config: ConfigFile,
    logger: Arc<dyn Logger>,
}

impl CliRunner {
    /// Load config (from `config_path` or the default location) and
    /// initialize logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(
            &config.logging.directory,
            &config.logging.file,
            &config.logging.filter,
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            logger: Arc::new(TracingLogger),
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("TileMosaic v{}", tilemosaic::VERSION);
        info!("TileMosaic CLI: {} command", command);
        info!("Log file: {}", self.logging_guard.log_path().display());
    }

    /// Tile source from the `[tiles]` section, wrapped in a disk cache when
    /// `cache_dir` is set.
    pub fn tile_source(&self) -> Result<Arc<dyn TileSource>, CliError> {
        let tiles = &self.config.tiles;
        let client = ReqwestClient::with_timeout(tiles.timeout)?;
        let mut provider = UrlTemplateProvider::new(client, tiles.url_template.clone())?;
        if let Some(key) = &tiles.api_key {
            provider = provider.with_api_key(key.clone());
        }
        if provider.requires_key() && tiles.api_key.is_none() {
            return Err(CliError::Config(
                "url_template contains {key} but no api_key is set in config.ini".to_string(),
            ));
        }
        info!("Tile source: {}", provider.name());

        let source: Arc<dyn TileSource> = match &tiles.cache_dir {
            Some(dir) => {
                info!("Tile cache: {}", dir.display());
                Arc::new(CachedTileSource::new(
                    provider,
                    dir.clone(),
                    Arc::clone(&self.logger),
                ))
            }
            None => Arc::new(provider),
        };
        Ok(source)
    }

    /// Image backend, with the label font from `[output]` if one is set.
    pub fn raster(&self) -> Result<Arc<dyn RasterBackend>, CliError> {
        let backend = match &self.config.output.font {
            Some(font) => ImageBackend::new()
                .with_font_file(font)
                .map_err(|e| CliError::Config(e.to_string()))?,
            None => ImageBackend::new(),
        };
        Ok(Arc::new(backend))
    }

    /// Whether route labels can be drawn.
    pub fn has_font(&self) -> bool {
        self.config.output.font.is_some()
    }

    /// Renderer over the configured tile source and image backend.
    pub fn renderer(&self, mosaic: MosaicConfig) -> Result<MosaicRenderer, CliError> {
        let renderer = MosaicRenderer::new(
            self.tile_source()?,
            self.raster()?,
            mosaic,
            Arc::clone(&self.logger),
        )?;
        Ok(renderer)
    }

    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }
}
