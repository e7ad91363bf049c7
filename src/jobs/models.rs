use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Job lifecycle. `Pending`, `Checking`, and `Downloading` are transient;
/// `Completed` and `Failed` are terminal and never left again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Checking,
    Downloading,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Checking => write!(f, "checking"),
            JobStatus::Downloading => write!(f, "downloading"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One tracked lifecycle of checking-and-downloading a single file.
///
/// Identity is per submission, not per file: submitting the same file id
/// again creates a new, independent record. Jobs are only bulk-cleared,
/// never deleted individually.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadJob {
    /// Time-sortable UUIDv7, unique per submission.
    pub id: Uuid,
    pub file_id: u64,
    pub status: JobStatus,
    pub download_url: Option<String>,
    pub error: Option<String>,
    /// Correlation id of the most recent backend call for this job.
    pub trace_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DownloadJob {
    pub fn new(file_id: u64) -> Self {
        Self {
            id: Uuid::now_v7(),
            file_id,
            status: JobStatus::Pending,
            download_url: None,
            error: None,
            trace_id: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_starts_pending() {
        let job = DownloadJob::new(42);
        assert_eq!(job.file_id, 42);
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.download_url.is_none());
        assert!(job.error.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Checking.is_terminal());
        assert!(!JobStatus::Downloading.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn job_ids_are_distinct_per_submission() {
        let a = DownloadJob::new(1);
        let b = DownloadJob::new(1);
        assert_ne!(a.id, b.id);
    }
}
