//! Fire-and-forget reporting seam for external error/event collaborators
//!
//! The hosted error-reporting service and the tracing collector are
//! external systems; the client only depends on this trait. Sink failures
//! are absorbed by the implementations and must never surface to callers.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::events::LogLevel;

/// Payload handed to the error-reporting collaborator for a failed request
/// or an unexpected failure elsewhere in the session.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub trace_id: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace_id: None,
            tags: BTreeMap::new(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// External reporting collaborator.
///
/// Implementations must be best-effort: swallow their own failures and
/// never block the caller beyond the await itself. Callers dispatch these
/// notifications after the authoritative state mutation, typically via
/// [`dispatch_error`] / [`dispatch_breadcrumb`] which spawn a task and
/// return immediately.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Report a failure with its correlation id and tags.
    async fn capture_error(&self, report: ErrorReport);

    /// Report a standalone message at the given level.
    async fn capture_message(&self, message: &str, level: LogLevel, trace_id: Option<&str>);

    /// Record a navigation/diagnostic breadcrumb preceding an operation.
    async fn breadcrumb(&self, category: &str, message: &str, trace_id: &str);
}

/// Default sink: forwards everything to the `tracing` subscriber.
///
/// Stands in for a hosted reporting service in local runs; a real
/// integration would implement [`EventSink`] against the vendor API.
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn capture_error(&self, report: ErrorReport) {
        tracing::error!(
            trace_id = report.trace_id.as_deref().unwrap_or("-"),
            tags = ?report.tags,
            "{}",
            report.message
        );
    }

    async fn capture_message(&self, message: &str, level: LogLevel, trace_id: Option<&str>) {
        let trace_id = trace_id.unwrap_or("-");
        match level {
            LogLevel::Error => tracing::error!(trace_id, "{message}"),
            LogLevel::Warning => tracing::warn!(trace_id, "{message}"),
            LogLevel::Info => tracing::info!(trace_id, "{message}"),
        }
    }

    async fn breadcrumb(&self, category: &str, message: &str, trace_id: &str) {
        tracing::debug!(category, trace_id, "{message}");
    }
}

/// Sink that drops everything. Useful in tests asserting on state only.
#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl EventSink for NoopSink {
    async fn capture_error(&self, _report: ErrorReport) {}
    async fn capture_message(&self, _message: &str, _level: LogLevel, _trace_id: Option<&str>) {}
    async fn breadcrumb(&self, _category: &str, _message: &str, _trace_id: &str) {}
}

/// Dispatch an error report without waiting for the sink.
pub fn dispatch_error(sink: &Arc<dyn EventSink>, report: ErrorReport) {
    let sink = Arc::clone(sink);
    tokio::spawn(async move {
        sink.capture_error(report).await;
    });
}

/// Dispatch a breadcrumb without waiting for the sink.
pub fn dispatch_breadcrumb(sink: &Arc<dyn EventSink>, category: &str, message: &str, trace_id: &str) {
    let sink = Arc::clone(sink);
    let category = category.to_owned();
    let message = message.to_owned();
    let trace_id = trace_id.to_owned();
    tokio::spawn(async move {
        sink.breadcrumb(&category, &message, &trace_id).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_builder_collects_tags() {
        let report = ErrorReport::new("boom")
            .with_trace_id("abc123")
            .with_tag("endpoint", "/health")
            .with_tag("status_code", "503");

        assert_eq!(report.message, "boom");
        assert_eq!(report.trace_id.as_deref(), Some("abc123"));
        assert_eq!(report.tags.get("endpoint").map(String::as_str), Some("/health"));
        assert_eq!(report.tags.len(), 2);
    }

    #[tokio::test]
    async fn noop_sink_accepts_everything() {
        let sink = NoopSink;
        sink.capture_error(ErrorReport::new("ignored")).await;
        sink.capture_message("ignored", LogLevel::Info, None).await;
        sink.breadcrumb("api", "GET /health", "abc").await;
    }
}
