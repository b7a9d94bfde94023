//! Logging abstraction layer.
//!
//! Grid computations and mosaic assembly log through the [`Logger`] trait
//! rather than calling `tracing` directly, so tests can run silently or
//! capture what was logged.
//!
//! - [`TracingLogger`]: production adapter that forwards to `tracing`
//! - [`NoOpLogger`]: discards everything
//! - [`MemoryLogger`]: keeps messages in memory for assertions
//!
//! ```
//! use std::sync::Arc;
//! use tilemosaic::log::{Logger, NoOpLogger};
//! use tilemosaic::log_info;
//!
//! let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
//! log_info!(logger, "Assembling {} tiles", 4);
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::MemoryLogger;
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;
