//! Injected logging capability.
//!
//! Extractors never log through a global; they receive an [`ExtractLog`].
//! [`TracingLog`] forwards to `tracing`, [`NoopLog`] discards everything.

use std::fmt;

use serde_json::Value;
use tracing::Level;

/// A log payload: a plain message or a structured record.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    /// Free-form message.
    Message(String),
    /// Structured record, e.g. `{"order_count": 10}`.
    Record(Value),
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Record(record) => write!(f, "{record}"),
        }
    }
}

impl From<&str> for LogEntry {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for LogEntry {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<Value> for LogEntry {
    fn from(record: Value) -> Self {
        Self::Record(record)
    }
}

/// Sink for extractor log events.
pub trait ExtractLog {
    /// Record one event.
    fn emit(&self, level: Level, entry: LogEntry);
}

impl dyn ExtractLog + '_ {
    /// Debug-level event.
    pub fn debug(&self, entry: impl Into<LogEntry>) {
        self.emit(Level::DEBUG, entry.into());
    }

    /// Info-level event.
    pub fn info(&self, entry: impl Into<LogEntry>) {
        self.emit(Level::INFO, entry.into());
    }

    /// Warning.
    pub fn warn(&self, entry: impl Into<LogEntry>) {
        self.emit(Level::WARN, entry.into());
    }

    /// Error.
    pub fn error(&self, entry: impl Into<LogEntry>) {
        self.emit(Level::ERROR, entry.into());
    }
}

/// Forwards events to the `tracing` macros.
///
/// Structured records are attached as a `record` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl ExtractLog for TracingLog {
    fn emit(&self, level: Level, entry: LogEntry) {
        match entry {
            LogEntry::Message(message) => match level {
                Level::ERROR => tracing::error!(target: "rs_order_history", "{message}"),
                Level::WARN => tracing::warn!(target: "rs_order_history", "{message}"),
                Level::INFO => tracing::info!(target: "rs_order_history", "{message}"),
                Level::DEBUG => tracing::debug!(target: "rs_order_history", "{message}"),
                _ => tracing::trace!(target: "rs_order_history", "{message}"),
            },
            LogEntry::Record(record) => match level {
                Level::ERROR => tracing::error!(target: "rs_order_history", %record),
                Level::WARN => tracing::warn!(target: "rs_order_history", %record),
                Level::INFO => tracing::info!(target: "rs_order_history", %record),
                Level::DEBUG => tracing::debug!(target: "rs_order_history", %record),
                _ => tracing::trace!(target: "rs_order_history", %record),
            },
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl ExtractLog for NoopLog {
    fn emit(&self, _level: Level, _entry: LogEntry) {}
}

/// Keeps events in memory; handy for asserting on what was logged.
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: std::cell::RefCell<Vec<(Level, LogEntry)>>,
}

impl MemoryLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<(Level, LogEntry)> {
        self.events.borrow().clone()
    }

    /// Rendered entries at `level`.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, entry)| entry.to_string())
            .collect()
    }
}

impl ExtractLog for MemoryLog {
    fn emit(&self, level: Level, entry: LogEntry) {
        self.events.borrow_mut().push((level, entry));
    }
}
