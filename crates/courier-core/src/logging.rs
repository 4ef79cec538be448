//! In-memory request log
//!
//! An opt-in, bounded-lifetime record of what the client did: entries are
//! appended only while logging is enabled and live in memory until
//! cleared. Persistence and formatting are a collaborator's concern.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub data: Option<Value>,
}

/// In-memory log sequence, disabled by default.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    enabled: bool,
    entries: Vec<LogEntry>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append an entry; a no-op while disabled.
    pub fn record(&mut self, message: impl Into<String>, data: Option<Value>) {
        if !self.enabled {
            return;
        }
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            message: message.into(),
            data,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
