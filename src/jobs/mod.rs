//! Download job tracking and orchestration
//!
//! The [`JobBoard`] owns the visible job collection; the orchestrator in
//! [`orchestrator`] drives one independent workflow per submitted file id
//! and mutates jobs only through the board.

pub mod models;
pub mod orchestrator;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub use models::{DownloadJob, JobStatus};
pub use orchestrator::Orchestrator;

/// Shared, newest-first collection of in-flight and completed jobs.
///
/// All mutations address jobs by id. A mutation for an id that is no
/// longer present (the collection was cleared while the workflow was in
/// flight) is a silent no-op: clearing hides eventual results, it does
/// not cancel work. Terminal jobs are never modified again.
#[derive(Debug, Default)]
pub struct JobBoard {
    jobs: RwLock<Vec<DownloadJob>>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job at the front (newest first) and return its id.
    pub async fn insert(&self, job: DownloadJob) -> Uuid {
        let id = job.id;
        self.jobs.write().await.insert(0, job);
        id
    }

    /// Apply `mutate` to the job with the given id.
    ///
    /// Returns false when the job is missing (cleared) or already
    /// terminal; in both cases the update is discarded.
    pub async fn update<F>(&self, id: Uuid, mutate: F) -> bool
    where
        F: FnOnce(&mut DownloadJob),
    {
        let mut jobs = self.jobs.write().await;
        match jobs.iter_mut().find(|job| job.id == id) {
            Some(job) if !job.status.is_terminal() => {
                mutate(job);
                true
            }
            _ => false,
        }
    }

    /// Advance a job to a transient status.
    pub async fn set_status(&self, id: Uuid, status: JobStatus) -> bool {
        self.update(id, |job| job.status = status).await
    }

    /// Terminally fail a job with a human-readable message.
    pub async fn fail(&self, id: Uuid, error: impl Into<String>, trace_id: Option<String>) -> bool {
        let error = error.into();
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error);
            if trace_id.is_some() {
                job.trace_id = trace_id;
            }
            job.completed_at = Some(Utc::now());
        })
        .await
    }

    /// Terminally complete a job with its download URL.
    pub async fn complete(&self, id: Uuid, download_url: String, trace_id: String) -> bool {
        self.update(id, |job| {
            job.status = JobStatus::Completed;
            job.download_url = Some(download_url);
            job.trace_id = Some(trace_id);
            job.completed_at = Some(Utc::now());
        })
        .await
    }

    /// Clone of the current collection, newest first.
    pub async fn snapshot(&self) -> Vec<DownloadJob> {
        self.jobs.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// True when every visible job reached a terminal state.
    pub async fn all_terminal(&self) -> bool {
        self.jobs
            .read()
            .await
            .iter()
            .all(|job| job.status.is_terminal())
    }

    /// Replace the collection with empty. In-flight workflows keep
    /// running; their later updates miss and are dropped.
    pub async fn clear(&self) {
        self.jobs.write().await.clear();
    }
}
