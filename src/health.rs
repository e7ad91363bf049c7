//! Periodic backend health polling

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{ApiClient, HealthResponse, RequestFailed};
use crate::session::TraceCell;

/// Latest health observation; wholly replaced on each successful poll.
#[derive(Debug, Clone)]
pub struct HealthState {
    pub health: HealthResponse,
    pub fetched_at: DateTime<Utc>,
    pub trace_id: String,
}

/// Polls `GET /health` once at startup and then on a fixed interval.
///
/// A manual [`refresh`](HealthMonitor::refresh) performs the same call out
/// of band and does not reset the interval. Failed polls keep the last
/// good snapshot and surface through `last_error`; the request-level side
/// effects (telemetry, event log, reporting) happen inside the client
/// like for any other call.
pub struct HealthMonitor {
    client: Arc<ApiClient>,
    latest: RwLock<Option<HealthState>>,
    last_error: RwLock<Option<String>>,
    last_trace: Arc<TraceCell>,
}

impl HealthMonitor {
    pub fn new(client: Arc<ApiClient>, last_trace: Arc<TraceCell>) -> Self {
        Self {
            client,
            latest: RwLock::new(None),
            last_error: RwLock::new(None),
            last_trace,
        }
    }

    /// Fetch health now and update the retained snapshot.
    pub async fn refresh(&self) -> Result<HealthState, RequestFailed> {
        match self.client.health().await {
            Ok(response) => {
                let state = HealthState {
                    health: response.body,
                    fetched_at: Utc::now(),
                    trace_id: response.trace_id,
                };
                self.last_trace.set(state.trace_id.clone()).await;
                *self.latest.write().await = Some(state.clone());
                *self.last_error.write().await = None;
                debug!(trace_id = %state.trace_id, healthy = state.health.is_healthy(), "Health updated");
                Ok(state)
            }
            Err(failure) => {
                *self.last_error.write().await = Some(failure.message.clone());
                Err(failure)
            }
        }
    }

    pub async fn latest(&self) -> Option<HealthState> {
        self.latest.read().await.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Spawn the polling loop: one immediate check, then one per interval.
    /// The loop runs for the rest of the session; drop the handle or abort
    /// it to stop polling.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(failure) = self.refresh().await {
                    warn!(error = %failure, "Health poll failed");
                }
            }
        })
    }
}
