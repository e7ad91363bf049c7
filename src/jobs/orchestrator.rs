//! Per-file download workflow driver
//!
//! Each submitted file id gets its own job record and its own spawned
//! workflow: check availability, then request the download URL. Workflows
//! are independent; one file's failure never blocks or cancels another's.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use super::{DownloadJob, JobBoard, JobStatus};
use crate::client::ApiClient;
use crate::events::{EventLog, LogLevel};
use crate::session::TraceCell;
use crate::telemetry::RequestStats;

/// Terminal error message for files the backend does not hold.
pub const UNAVAILABLE_ERROR: &str = "File not available in storage";

/// Drives download workflows against the shared [`JobBoard`].
///
/// Request-level failure side effects (telemetry, event log, external
/// report) are handled inside [`ApiClient`]; the orchestrator only turns
/// them into terminal job state. The one business-level failure — a
/// successful availability check reporting `available: false` — is
/// observed here instead, since the HTTP call itself succeeded.
#[derive(Clone)]
pub struct Orchestrator {
    client: Arc<ApiClient>,
    board: Arc<JobBoard>,
    log: Arc<EventLog>,
    stats: Arc<RequestStats>,
    last_trace: Arc<TraceCell>,
}

impl Orchestrator {
    pub fn new(
        client: Arc<ApiClient>,
        board: Arc<JobBoard>,
        log: Arc<EventLog>,
        stats: Arc<RequestStats>,
        last_trace: Arc<TraceCell>,
    ) -> Self {
        Self { client, board, log, stats, last_trace }
    }

    /// Create one pending job per file id and spawn its workflow.
    ///
    /// Returns the new job ids in submission order. There is no
    /// cancellation: once spawned, a workflow runs to a terminal state
    /// even if the board is cleared underneath it.
    pub async fn submit(&self, file_ids: &[u64]) -> Vec<Uuid> {
        let mut job_ids = Vec::with_capacity(file_ids.len());

        for &file_id in file_ids {
            let job = DownloadJob::new(file_id);
            let job_id = self.board.insert(job).await;
            job_ids.push(job_id);

            info!(%job_id, file_id, "Download job submitted");

            let orchestrator = self.clone();
            tokio::spawn(async move {
                orchestrator.run_job(job_id, file_id).await;
            });
        }

        job_ids
    }

    /// Replace the visible job collection with empty. In-flight workflows
    /// keep running; their late updates miss the board and are dropped.
    pub async fn clear_jobs(&self) {
        self.board.clear().await;
        info!("Job list cleared");
    }

    /// One job's workflow: checking -> downloading -> completed, with
    /// either network step able to end in failed. Steps are awaited in
    /// order, so a single job's transitions are strictly sequenced.
    async fn run_job(&self, job_id: Uuid, file_id: u64) {
        let started = Instant::now();

        self.board.set_status(job_id, JobStatus::Checking).await;

        let check = match self.client.check_download(file_id).await {
            Ok(check) => check,
            Err(failure) => {
                warn!(%job_id, file_id, error = %failure, "Availability check failed");
                self.board
                    .fail(job_id, failure.message.clone(), Some(failure.trace_id))
                    .await;
                return;
            }
        };

        if !check.body.available {
            self.board
                .fail(job_id, UNAVAILABLE_ERROR, Some(check.trace_id.clone()))
                .await;
            self.log
                .append(
                    format!("File #{file_id} not available"),
                    LogLevel::Warning,
                    Some(&check.trace_id),
                )
                .await;
            // The check call itself succeeded, so the client recorded a
            // success; the workflow outcome is still a failure.
            self.stats
                .record(false, started.elapsed().as_secs_f64() * 1000.0)
                .await;
            return;
        }

        self.board.set_status(job_id, JobStatus::Downloading).await;

        match self.client.start_download(file_id).await {
            Ok(response) => {
                info!(%job_id, file_id, trace_id = %response.trace_id, "Download ready");
                self.last_trace.set(response.trace_id.clone()).await;
                self.board
                    .complete(job_id, response.body.download_url, response.trace_id)
                    .await;
            }
            Err(failure) => {
                warn!(%job_id, file_id, error = %failure, "Download start failed");
                self.board
                    .fail(job_id, failure.message.clone(), Some(failure.trace_id))
                    .await;
            }
        }
    }
}
