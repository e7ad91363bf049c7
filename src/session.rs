//! Session state: one wired-up set of client, jobs, telemetry, and log
//!
//! The session owns every piece of client-side state explicitly; nothing
//! here is ambient or global. The presentation layer reads immutable
//! snapshots and calls back in for user actions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::client::{ApiClient, BuildError};
use crate::config::Config;
use crate::events::{EventLog, LogEntry, LogLevel};
use crate::health::{HealthMonitor, HealthState};
use crate::jobs::{DownloadJob, JobBoard, Orchestrator};
use crate::reporting::{self, ErrorReport, EventSink};
use crate::telemetry::{RequestStats, StatsSnapshot};

/// Most recently observed correlation id, retained for display only.
///
/// Updated after successful health checks and completed downloads;
/// workflows themselves pass ids explicitly and never read this cell.
#[derive(Debug, Default)]
pub struct TraceCell(Mutex<Option<String>>);

impl TraceCell {
    pub async fn set(&self, trace_id: impl Into<String>) {
        *self.0.lock().await = Some(trace_id.into());
    }

    pub async fn get(&self) -> Option<String> {
        self.0.lock().await.clone()
    }
}

/// Everything the presentation layer needs for one render pass.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub jobs: Vec<DownloadJob>,
    pub stats: StatsSnapshot,
    pub log: Vec<LogEntry>,
    pub health: Option<HealthState>,
    pub health_error: Option<String>,
    pub last_trace: Option<String>,
}

pub struct Session {
    config: Config,
    pub client: Arc<ApiClient>,
    pub stats: Arc<RequestStats>,
    pub log: Arc<EventLog>,
    pub board: Arc<JobBoard>,
    pub orchestrator: Orchestrator,
    pub health: Arc<HealthMonitor>,
    pub last_trace: Arc<TraceCell>,
    sink: Arc<dyn EventSink>,
}

impl Session {
    pub fn new(config: Config, sink: Arc<dyn EventSink>) -> Result<Self, BuildError> {
        let stats = Arc::new(RequestStats::new(config.limits.latency_window));
        let log = Arc::new(EventLog::new(config.limits.event_log_capacity));
        let board = Arc::new(JobBoard::new());
        let last_trace = Arc::new(TraceCell::default());

        let client = Arc::new(ApiClient::new(
            &config.backend,
            Arc::clone(&stats),
            Arc::clone(&log),
            Arc::clone(&sink),
        )?);

        let orchestrator = Orchestrator::new(
            Arc::clone(&client),
            Arc::clone(&board),
            Arc::clone(&log),
            Arc::clone(&stats),
            Arc::clone(&last_trace),
        );

        let health = Arc::new(HealthMonitor::new(
            Arc::clone(&client),
            Arc::clone(&last_trace),
        ));

        Ok(Self {
            config,
            client,
            stats,
            log,
            board,
            orchestrator,
            health,
            last_trace,
            sink,
        })
    }

    /// Submit one batch of file ids; each id gets its own job + workflow.
    pub async fn submit_downloads(&self, file_ids: &[u64]) -> Vec<Uuid> {
        self.orchestrator.submit(file_ids).await
    }

    pub async fn clear_jobs(&self) {
        self.orchestrator.clear_jobs().await;
    }

    pub async fn clear_log(&self) {
        self.log.clear().await;
    }

    /// Exercise the reporting path without touching job state: a warning
    /// message plus a simulated error, both mirrored into the event log.
    pub async fn trigger_test_failure(&self) {
        let trace_id = self.last_trace.get().await;

        self.sink
            .capture_message(
                "Test failure triggered from dashboard",
                LogLevel::Warning,
                trace_id.as_deref(),
            )
            .await;
        self.log
            .append("Test failure triggered", LogLevel::Warning, trace_id.as_deref())
            .await;

        let message = "This is a test failure from the dashboard";
        let mut report = ErrorReport::new(message).with_tag("source", "test-trigger");
        if let Some(ref trace_id) = trace_id {
            report = report.with_trace_id(trace_id.clone());
        }
        reporting::dispatch_error(&self.sink, report);
        self.log
            .append(message, LogLevel::Error, trace_id.as_deref())
            .await;
    }

    /// Start the periodic health poll for the rest of the session.
    pub fn spawn_health_poller(&self) -> JoinHandle<()> {
        Arc::clone(&self.health).spawn(self.health_poll_interval())
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.session.health_poll_secs)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.config.session.render_interval_ms)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            jobs: self.board.snapshot().await,
            stats: self.stats.snapshot().await,
            log: self.log.entries().await,
            health: self.health.latest().await,
            health_error: self.health.last_error().await,
            last_trace: self.last_trace.get().await,
        }
    }
}
