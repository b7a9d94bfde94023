//! In-memory logger for assertions in tests and diagnostics.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;
use std::sync::Mutex;

/// A logger that records every message with its level.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages logged at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        let message = args.to_string();
        match self.records.lock() {
            Ok(mut records) => records.push((level, message)),
            Err(poisoned) => poisoned.into_inner().push((level, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_levels_and_messages() {
        let logger = MemoryLogger::new();
        crate::log_info!(logger, "fetched {} tiles", 3);
        crate::log_warn!(logger, "cache write failed");

        assert_eq!(
            logger.records(),
            vec![
                (LogLevel::Info, "fetched 3 tiles".to_string()),
                (LogLevel::Warn, "cache write failed".to_string()),
            ]
        );
        assert_eq!(logger.messages_at(LogLevel::Warn).len(), 1);
        assert!(logger.messages_at(LogLevel::Error).is_empty());
    }
}
