//! Plain-text rendering of session snapshots

use std::fmt::Write;

use crate::client::StorageCheck;
use crate::events::LogLevel;
use crate::jobs::JobStatus;
use crate::session::SessionSnapshot;

/// Number of event-log entries shown per render pass.
const RENDERED_LOG_ENTRIES: usize = 10;

/// Format a millisecond latency for display: sub-second values in ms,
/// larger ones in seconds with one decimal.
pub fn fmt_latency(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{}ms", ms.round() as u64)
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}

/// Shortened correlation id for compact display.
pub fn fmt_trace(trace_id: &str) -> &str {
    trace_id.get(..8).unwrap_or(trace_id)
}

fn status_glyph(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => " ",
        JobStatus::Checking => "?",
        JobStatus::Downloading => ">",
        JobStatus::Completed => "+",
        JobStatus::Failed => "x",
    }
}

fn level_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "ERR ",
        LogLevel::Warning => "WARN",
        LogLevel::Info => "INFO",
    }
}

/// Render one full snapshot: health, metrics, jobs, recent log entries.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    match (&snapshot.health, &snapshot.health_error) {
        (Some(state), _) => {
            let storage = match state.health.checks.storage {
                StorageCheck::Ok => "ok",
                StorageCheck::Error => "error",
            };
            let overall = if state.health.is_healthy() {
                "healthy"
            } else {
                "unhealthy"
            };
            let _ = writeln!(
                out,
                "health: {overall} (storage: {storage}, checked {})",
                state.fetched_at.format("%H:%M:%S")
            );
        }
        (None, Some(error)) => {
            let _ = writeln!(out, "health: unavailable ({error})");
        }
        (None, None) => {
            let _ = writeln!(out, "health: checking...");
        }
    }

    let stats = &snapshot.stats;
    let _ = writeln!(
        out,
        "requests: {} total, {:.1}% ok, {} failed, avg {}",
        stats.total_requests,
        stats.success_rate(),
        stats.failed_requests,
        fmt_latency(stats.average_response_time_ms)
    );

    if let Some(ref trace_id) = snapshot.last_trace {
        let _ = writeln!(out, "trace: {trace_id}");
    }

    if snapshot.jobs.is_empty() {
        let _ = writeln!(out, "jobs: none");
    } else {
        let _ = writeln!(out, "jobs:");
        for job in &snapshot.jobs {
            let detail = if let Some(ref error) = job.error {
                error.clone()
            } else if let Some(ref url) = job.download_url {
                url.clone()
            } else if let Some(ref trace_id) = job.trace_id {
                format!("trace {}", fmt_trace(trace_id))
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "  [{}] file #{:<5} {:<11} {}",
                status_glyph(job.status),
                job.file_id,
                job.status,
                detail
            );
        }
    }

    if !snapshot.log.is_empty() {
        let _ = writeln!(out, "log:");
        for entry in snapshot.log.iter().take(RENDERED_LOG_ENTRIES) {
            let trace = entry
                .trace_id
                .as_deref()
                .map(fmt_trace)
                .unwrap_or("-");
            let _ = writeln!(
                out,
                "  {} [{}] {} ({})",
                entry.timestamp.format("%H:%M:%S"),
                level_tag(entry.level),
                entry.message,
                trace
            );
        }
    }

    out
}
