//! Tracing library adapter implementation.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;

/// Logger implementation that forwards to the `tracing` crate.
///
/// Output depends on the subscriber installed by
/// [`crate::logging::init_logging`] (or any other subscriber).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "tilemosaic", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "tilemosaic", "{}", args),
            LogLevel::Info => tracing::info!(target: "tilemosaic", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "tilemosaic", "{}", args),
            LogLevel::Error => tracing::error!(target: "tilemosaic", "{}", args),
        }
    }
}
