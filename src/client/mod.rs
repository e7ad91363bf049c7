//! HTTP client for the download backend
//!
//! One method per backend operation. Every call:
//! - generates a fresh correlation id and sends it in a dedicated header,
//! - records its outcome and wall-clock latency into [`RequestStats`],
//! - on failure appends an error-level event-log entry and dispatches a
//!   fire-and-forget report to the [`EventSink`], then returns the
//!   normalized [`RequestFailed`] to the caller.
//!
//! The client never retries; retries, if any, belong to the caller. No
//! request timeout is configured: a hanging backend call stalls only the
//! workflow awaiting it.

pub mod error;
pub mod models;

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::events::{EventLog, LogLevel};
use crate::reporting::{self, ErrorReport, EventSink};
use crate::telemetry::RequestStats;

pub use error::{BuildError, FailureKind, RequestFailed, Result};
pub use models::{
    CheckRequest, DownloadCheckResponse, DownloadInitiateResponse, DownloadStartResponse,
    ErrorBody, HealthChecks, HealthResponse, HealthStatus, InitiateRequest, InitiateStatus,
    StartRequest, StorageCheck,
};

pub const HEALTH_ENDPOINT: &str = "/health";
pub const CHECK_ENDPOINT: &str = "/v1/download/check";
pub const INITIATE_ENDPOINT: &str = "/v1/download/initiate";
pub const START_ENDPOINT: &str = "/v1/download/start";

/// Generate a fresh correlation id (32 lowercase hex chars).
pub fn new_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Response body plus the identifiers observed for the call.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub body: T,
    /// Correlation id that was attached to the outgoing request.
    pub trace_id: String,
    /// Server-assigned request id, captured for diagnostics only.
    pub request_id: Option<String>,
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    trace_header: String,
    request_id_header: String,
    stats: Arc<RequestStats>,
    log: Arc<EventLog>,
    sink: Arc<dyn EventSink>,
}

impl ApiClient {
    pub fn new(
        config: &BackendConfig,
        stats: Arc<RequestStats>,
        log: Arc<EventLog>,
        sink: Arc<dyn EventSink>,
    ) -> std::result::Result<Self, BuildError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BuildError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        let http = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            http,
            base_url,
            trace_header: config.trace_header.clone(),
            request_id_header: config.request_id_header.clone(),
            stats,
            log,
            sink,
        })
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<ApiResponse<HealthResponse>> {
        self.request::<(), _>(Method::GET, HEALTH_ENDPOINT, None).await
    }

    /// `POST /v1/download/check` — file availability by id.
    pub async fn check_download(&self, file_id: u64) -> Result<ApiResponse<DownloadCheckResponse>> {
        self.request(Method::POST, CHECK_ENDPOINT, Some(&CheckRequest { file_id }))
            .await
    }

    /// `POST /v1/download/initiate` — bulk initiation.
    pub async fn initiate_download(
        &self,
        file_ids: &[u64],
    ) -> Result<ApiResponse<DownloadInitiateResponse>> {
        self.request(
            Method::POST,
            INITIATE_ENDPOINT,
            Some(&InitiateRequest { file_ids: file_ids.to_vec() }),
        )
        .await
    }

    /// `POST /v1/download/start` — request a download URL for one file.
    pub async fn start_download(&self, file_id: u64) -> Result<ApiResponse<DownloadStartResponse>> {
        self.request(Method::POST, START_ENDPOINT, Some(&StartRequest { file_id }))
            .await
    }

    async fn request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>> {
        let trace_id = new_trace_id();
        reporting::dispatch_breadcrumb(
            &self.sink,
            "api",
            &format!("{method} {endpoint}"),
            &trace_id,
        );

        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| RequestFailed {
                kind: FailureKind::Unexpected,
                status: None,
                message: format!("invalid endpoint: {e}"),
                endpoint: endpoint.to_string(),
                trace_id: trace_id.clone(),
            })?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(self.trace_header.as_str(), trace_id.as_str());
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, endpoint, trace_id, "Sending request");
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let failure = RequestFailed {
                    kind: FailureKind::Transport,
                    status: None,
                    message: e.to_string(),
                    endpoint: endpoint.to_string(),
                    trace_id: trace_id.clone(),
                };
                self.observe_failure(&failure, elapsed_ms(started)).await;
                return Err(failure);
            }
        };

        let request_id = response
            .headers()
            .get(self.request_id_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        if let Some(ref request_id) = request_id {
            debug!(endpoint, trace_id, request_id, "Server request id");
        }

        let status = response.status();
        if !status.is_success() {
            // Prefer the backend's message field; fall back to the status line.
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

            let failure = RequestFailed {
                kind: FailureKind::Http,
                status: Some(status.as_u16()),
                message,
                endpoint: endpoint.to_string(),
                trace_id: trace_id.clone(),
            };
            self.observe_failure(&failure, elapsed_ms(started)).await;
            return Err(failure);
        }

        let body = match response.json::<T>().await {
            Ok(body) => body,
            Err(e) => {
                let failure = RequestFailed {
                    kind: FailureKind::Unexpected,
                    status: Some(status.as_u16()),
                    message: format!("failed to decode response: {e}"),
                    endpoint: endpoint.to_string(),
                    trace_id: trace_id.clone(),
                };
                self.observe_failure(&failure, elapsed_ms(started)).await;
                return Err(failure);
            }
        };

        let latency_ms = elapsed_ms(started);
        self.stats.record(true, latency_ms).await;
        debug!(endpoint, trace_id, latency_ms, "Request completed");

        Ok(ApiResponse { body, trace_id, request_id })
    }

    /// Failure side effects: telemetry, event log, external report.
    /// The report is dispatched fire-and-forget after the state updates.
    async fn observe_failure(&self, failure: &RequestFailed, latency_ms: f64) {
        self.stats.record(false, latency_ms).await;
        self.log
            .append(failure.message.clone(), LogLevel::Error, Some(&failure.trace_id))
            .await;

        let mut report = ErrorReport::new(failure.message.clone())
            .with_trace_id(failure.trace_id.clone())
            .with_tag("endpoint", failure.endpoint.clone());
        report = match failure.status {
            Some(status) => report.with_tag("status_code", status.to_string()),
            None => report.with_tag("status_code", "unknown"),
        };
        reporting::dispatch_error(&self.sink, report);
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
