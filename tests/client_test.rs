//! Request client failure-normalization tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use downwatch::client::{ApiClient, FailureKind};
use downwatch::config::BackendConfig;
use downwatch::events::{EventLog, LogLevel};
use downwatch::reporting::NoopSink;
use downwatch::telemetry::RequestStats;

struct Harness {
    client: ApiClient,
    stats: Arc<RequestStats>,
    log: Arc<EventLog>,
}

fn harness(addr: SocketAddr) -> Harness {
    let stats = Arc::new(RequestStats::default());
    let log = Arc::new(EventLog::default());
    let config = BackendConfig {
        base_url: format!("http://{addr}"),
        ..BackendConfig::default()
    };
    let client = ApiClient::new(
        &config,
        Arc::clone(&stats),
        Arc::clone(&log),
        Arc::new(NoopSink),
    )
    .unwrap();
    Harness { client, stats, log }
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn failure_message_prefers_backend_message_field() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"message": "storage offline"})),
            )
        }),
    );
    let h = harness(spawn(app).await);

    let err = h.client.health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Http);
    assert_eq!(err.status, Some(503));
    assert_eq!(err.message, "storage offline");
    assert_eq!(err.endpoint, "/health");
    assert!(!err.trace_id.is_empty());
}

#[tokio::test]
async fn unparseable_failure_body_falls_back_to_status_line() {
    let app = Router::new().route(
        "/v1/download/check",
        post(|| async { (StatusCode::NOT_FOUND, "nope") }),
    );
    let h = harness(spawn(app).await);

    let err = h.client.check_download(1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Http);
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "HTTP 404");
}

#[tokio::test]
async fn undecodable_success_body_is_unexpected() {
    let app = Router::new().route("/health", get(|| async { "not json" }));
    let h = harness(spawn(app).await);

    let err = h.client.health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Unexpected);
    assert_eq!(err.status, Some(200));
    assert!(err.message.contains("failed to decode response"));
}

#[tokio::test]
async fn every_failure_is_observed_once() {
    let app = Router::new().route(
        "/health",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let h = harness(spawn(app).await);

    let err = h.client.health().await.unwrap_err();

    let stats = h.stats.snapshot().await;
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.failed_requests, 1);

    let entries = h.log.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert_eq!(entries[0].message, err.message);
    assert_eq!(entries[0].trace_id.as_deref(), Some(err.trace_id.as_str()));
}

#[tokio::test]
async fn successes_do_not_touch_the_event_log() {
    let app = Router::new().route(
        "/health",
        get(|| async { Json(json!({"status": "healthy", "checks": {"storage": "ok"}})) }),
    );
    let h = harness(spawn(app).await);

    let response = h.client.health().await.unwrap();
    assert!(response.body.is_healthy());
    assert!(h.log.is_empty().await);

    let stats = h.stats.snapshot().await;
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.failed_requests, 0);
}
