//! Duel event logger
//!
//! Owned-string logger with optional in-memory capture so tests can assert
//! on emitted events without scraping stdout.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// How much the logger prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum VerbosityLevel {
    Silent,
    Minimal,
    #[default]
    Normal,
    Verbose,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A log entry with owned strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Verbosity level of this log entry
    pub level: VerbosityLevel,
    /// Log message
    pub message: String,
    /// Optional category (e.g., "movement", "engine", "selection")
    pub category: Option<String>,
}

/// Guard type that provides read-only access to captured log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger for duel events
#[derive(Debug, Clone, Default)]
pub struct DuelLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl DuelLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        DuelLogger::default()
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        DuelLogger {
            verbosity,
            ..DuelLogger::default()
        }
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Set output mode (Stdout, Memory, or Both)
    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Log a message at the given level
    pub fn log(&self, level: VerbosityLevel, message: impl Into<String>) {
        self.log_with_category(level, message, None);
    }

    /// Log a message with a category tag
    pub fn log_with_category(
        &self,
        level: VerbosityLevel,
        message: impl Into<String>,
        category: Option<&str>,
    ) {
        let message = message.into();

        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity
            && level != VerbosityLevel::Silent
        {
            println!("{message}");
        }

        if matches!(self.output_mode, OutputMode::Memory | OutputMode::Both) {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message,
                category: category.map(|c| c.to_string()),
            });
        }
    }

    /// Log at Minimal level (important game events)
    pub fn minimal(&self, message: impl Into<String>) {
        self.log(VerbosityLevel::Minimal, message);
    }

    /// Log at Normal level (standard game flow)
    pub fn normal(&self, message: impl Into<String>) {
        self.log(VerbosityLevel::Normal, message);
    }

    /// Log at Verbose level (detailed engine internals)
    pub fn verbose(&self, message: impl Into<String>) {
        self.log(VerbosityLevel::Verbose, message);
    }

    /// Read-only access to captured entries
    pub fn entries(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    /// Clear the capture buffer
    pub fn clear_logs(&self) {
        self.log_buffer.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_capture() {
        let mut logger = DuelLogger::with_verbosity(VerbosityLevel::Verbose);
        logger.set_output_mode(OutputMode::Memory);

        logger.normal("drew a card");
        logger.log_with_category(VerbosityLevel::Verbose, "step scheduled", Some("engine"));

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "drew a card");
        assert_eq!(entries[1].category.as_deref(), Some("engine"));
    }

    #[test]
    fn test_clear_logs() {
        let mut logger = DuelLogger::new();
        logger.set_output_mode(OutputMode::Memory);
        logger.minimal("duel start");
        assert_eq!(logger.entries().len(), 1);

        logger.clear_logs();
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(VerbosityLevel::Silent < VerbosityLevel::Minimal);
        assert!(VerbosityLevel::Normal < VerbosityLevel::Verbose);
    }
}
