//! Typed request/response bodies for the download backend
//!
//! Field names and casing follow the backend's wire contract exactly:
//! snake_case for the check/start operations, camelCase for the bulk
//! initiate response, and a mixed `s3Key` on the check response.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageCheck {
    Ok,
    Error,
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub storage: StorageCheck,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// `POST /v1/download/check` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub file_id: u64,
}

/// `POST /v1/download/check` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadCheckResponse {
    pub file_id: u64,
    pub available: bool,
    #[serde(rename = "s3Key")]
    pub s3_key: Option<String>,
    pub size: Option<u64>,
}

/// `POST /v1/download/initiate` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiateRequest {
    pub file_ids: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitiateStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for InitiateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitiateStatus::Queued => write!(f, "queued"),
            InitiateStatus::Processing => write!(f, "processing"),
            InitiateStatus::Completed => write!(f, "completed"),
            InitiateStatus::Failed => write!(f, "failed"),
        }
    }
}

/// `POST /v1/download/initiate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadInitiateResponse {
    #[serde(rename = "jobId")]
    pub job_id: String,
    pub status: InitiateStatus,
    #[serde(rename = "totalFileIds")]
    pub total_file_ids: u64,
}

/// `POST /v1/download/start` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    pub file_id: u64,
}

/// `POST /v1/download/start` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadStartResponse {
    pub file_id: u64,
    pub download_url: String,
    pub expires_at: String,
}

/// Failure bodies are JSON with an optional `message` field; anything
/// else falls back to a generic HTTP status line.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_response_uses_wire_casing() {
        let json = r#"{"file_id": 7, "available": true, "s3Key": "files/7.bin", "size": 1024}"#;
        let parsed: DownloadCheckResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.file_id, 7);
        assert!(parsed.available);
        assert_eq!(parsed.s3_key.as_deref(), Some("files/7.bin"));
        assert_eq!(parsed.size, Some(1024));
    }

    #[test]
    fn check_response_allows_nulls_when_unavailable() {
        let json = r#"{"file_id": 9, "available": false, "s3Key": null, "size": null}"#;
        let parsed: DownloadCheckResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.available);
        assert!(parsed.s3_key.is_none());
        assert!(parsed.size.is_none());
    }

    #[test]
    fn initiate_response_uses_camel_case() {
        let json = r#"{"jobId": "job-1", "status": "queued", "totalFileIds": 3}"#;
        let parsed: DownloadInitiateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.job_id, "job-1");
        assert_eq!(parsed.status, InitiateStatus::Queued);
        assert_eq!(parsed.total_file_ids, 3);
    }

    #[test]
    fn health_response_round_trips() {
        let json = r#"{"status": "healthy", "checks": {"storage": "ok"}}"#;
        let parsed: HealthResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.is_healthy());
        assert_eq!(parsed.checks.storage, StorageCheck::Ok);

        let json = r#"{"status": "unhealthy", "checks": {"storage": "error"}}"#;
        let parsed: HealthResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_healthy());
    }

    #[test]
    fn error_body_message_is_optional() {
        let parsed: ErrorBody = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.message.is_none());

        let parsed: ErrorBody = serde_json::from_str(r#"{"message": "nope"}"#).unwrap();
        assert_eq!(parsed.message.as_deref(), Some("nope"));
    }
}
