//! Append-only, capped event log for user-visible diagnostics

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Maximum number of retained entries; the oldest is silently dropped
/// once the cap is exceeded.
pub const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub trace_id: Option<String>,
    pub level: LogLevel,
}

/// Newest-first log of error/warning/info entries.
///
/// Entries are tagged with the correlation id active when they were
/// recorded; the id is passed explicitly by the caller so concurrent
/// workflows cannot cross-contaminate each other's identifiers. No
/// deduplication: identical messages append as separate entries.
#[derive(Debug)]
pub struct EventLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Prepend an entry, then truncate to the configured capacity.
    pub async fn append(
        &self,
        message: impl Into<String>,
        level: LogLevel,
        trace_id: Option<&str>,
    ) {
        let entry = LogEntry {
            id: Uuid::now_v7(),
            message: message.into(),
            timestamp: Utc::now(),
            trace_id: trace_id.map(str::to_owned),
            level,
        };

        let mut entries = self.entries.lock().await;
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Current entries, newest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Empty the log unconditionally.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn newest_entry_comes_first() {
        let log = EventLog::default();
        log.append("first", LogLevel::Info, None).await;
        log.append("second", LogLevel::Warning, Some("trace-1")).await;

        let entries = log.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[0].trace_id.as_deref(), Some("trace-1"));
        assert_eq!(entries[1].message, "first");
        assert!(entries[1].trace_id.is_none());
    }

    #[tokio::test]
    async fn cap_evicts_oldest() {
        let log = EventLog::default();
        for i in 0..60 {
            log.append(format!("entry {i}"), LogLevel::Error, None).await;
        }

        let entries = log.entries().await;
        assert_eq!(entries.len(), LOG_CAPACITY);
        // Newest first: entry 59 at the front, entry 10 at the back.
        assert_eq!(entries[0].message, "entry 59");
        assert_eq!(entries[LOG_CAPACITY - 1].message, "entry 10");
    }

    #[tokio::test]
    async fn identical_messages_are_separate_entries() {
        let log = EventLog::default();
        log.append("dup", LogLevel::Info, None).await;
        log.append("dup", LogLevel::Info, None).await;

        let entries = log.entries().await;
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[tokio::test]
    async fn clear_empties_unconditionally() {
        let log = EventLog::default();
        log.append("something", LogLevel::Error, None).await;
        log.clear().await;
        assert!(log.is_empty().await);
    }
}
