use serde::{Deserialize, Serialize};

use crate::events::LOG_CAPACITY;
use crate::telemetry::LATENCY_WINDOW;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Header carrying the outgoing correlation id.
    #[serde(default = "default_trace_header")]
    pub trace_header: String,
    /// Response header with the server-assigned request id.
    #[serde(default = "default_request_id_header")]
    pub request_id_header: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            trace_header: default_trace_header(),
            request_id_header: default_request_id_header(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_user_agent() -> String {
    concat!("downwatch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_trace_header() -> String {
    "x-trace-id".to_string()
}

fn default_request_id_header() -> String {
    "x-request-id".to_string()
}

/// Session loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Seconds between automatic health checks.
    #[serde(default = "default_health_poll_secs")]
    pub health_poll_secs: u64,
    /// Milliseconds between rendered snapshots in `watch`.
    #[serde(default = "default_render_interval_ms")]
    pub render_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            health_poll_secs: default_health_poll_secs(),
            render_interval_ms: default_render_interval_ms(),
        }
    }
}

fn default_health_poll_secs() -> u64 {
    30
}

fn default_render_interval_ms() -> u64 {
    500
}

/// Retention limits for client-side state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Latency samples retained for the rolling average.
    #[serde(default = "default_latency_window")]
    pub latency_window: usize,
    /// Event log entries retained before the oldest is dropped.
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            latency_window: default_latency_window(),
            event_log_capacity: default_event_log_capacity(),
        }
    }
}

fn default_latency_window() -> usize {
    LATENCY_WINDOW
}

fn default_event_log_capacity() -> usize {
    LOG_CAPACITY
}
