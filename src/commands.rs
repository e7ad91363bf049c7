//! CLI command implementations

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use downwatch::config::Config;
use downwatch::render;
use downwatch::reporting::TracingSink;
use downwatch::session::Session;

use crate::cli::{Cli, CheckArgs, InitiateArgs, WatchArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn build_session(cli: &Cli) -> Result<Session, AnyError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };

    if let Some(ref url) = cli.api_url {
        config.backend.base_url = url.clone();
    }

    Ok(Session::new(config, Arc::new(TracingSink))?)
}

/// Parse a comma-separated file id list; non-numeric and zero entries are
/// skipped, matching the dashboard's lenient input handling.
pub fn parse_file_ids(input: &str) -> Vec<u64> {
    input
        .split(',')
        .filter_map(|part| part.trim().parse::<u64>().ok())
        .filter(|&id| id > 0)
        .collect()
}

/// Run the monitoring session: health poll plus submitted batches,
/// rendering snapshots until interrupted (or, with `--once`, until all
/// jobs are terminal).
pub async fn watch(cli: &Cli, args: &WatchArgs) -> Result<(), AnyError> {
    let session = build_session(cli)?;
    let poller = session.spawn_health_poller();

    for batch in &args.batches {
        let ids = parse_file_ids(batch);
        if ids.is_empty() {
            error!(batch = %batch, "No usable file ids in batch, skipping");
            continue;
        }
        session.submit_downloads(&ids).await;
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(session.render_interval());

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let snapshot = session.snapshot().await;
                print!("{}", render::render(&snapshot));
                println!("---");

                let done = !snapshot.jobs.is_empty()
                    && snapshot.jobs.iter().all(|job| job.status.is_terminal());
                if args.once && done {
                    break;
                }
            }
        }
    }

    poller.abort();
    if let Some(trace_id) = session.last_trace.get().await {
        info!(trace_id, "Session ended");
    }
    Ok(())
}

/// One-shot health check.
pub async fn health(cli: &Cli) -> Result<(), AnyError> {
    let session = build_session(cli)?;
    match session.health.refresh().await {
        Ok(state) => {
            let snapshot = session.snapshot().await;
            print!("{}", render::render(&snapshot));
            if !state.health.is_healthy() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(failure) => {
            error!(trace_id = %failure.trace_id, "Health check failed");
            Err(failure.into())
        }
    }
}

/// One-shot availability check for a single file id.
pub async fn check(cli: &Cli, args: &CheckArgs) -> Result<(), AnyError> {
    let session = build_session(cli)?;
    match session.client.check_download(args.file_id).await {
        Ok(response) => {
            let check = response.body;
            if check.available {
                println!(
                    "file #{} available (key: {}, size: {})",
                    check.file_id,
                    check.s3_key.as_deref().unwrap_or("-"),
                    check.size.map_or_else(|| "-".to_string(), |s| s.to_string()),
                );
            } else {
                println!("file #{} not available", check.file_id);
            }
            Ok(())
        }
        Err(failure) => {
            error!(trace_id = %failure.trace_id, "Availability check failed");
            Err(failure.into())
        }
    }
}

/// Bulk initiate call; not used by the orchestrator, exposed for parity
/// with the backend surface.
pub async fn initiate(cli: &Cli, args: &InitiateArgs) -> Result<(), AnyError> {
    let file_ids = parse_file_ids(&args.file_ids);
    if file_ids.is_empty() {
        return Err("no usable file ids given".into());
    }

    let session = build_session(cli)?;
    match session.client.initiate_download(&file_ids).await {
        Ok(response) => {
            println!(
                "bulk job {} ({}, {} files)",
                response.body.job_id, response.body.status, response.body.total_file_ids,
            );
            Ok(())
        }
        Err(failure) => {
            error!(trace_id = %failure.trace_id, "Bulk initiate failed");
            Err(failure.into())
        }
    }
}

/// Exercise the reporting path end to end with a simulated failure.
pub async fn test_failure(cli: &Cli) -> Result<(), AnyError> {
    let session = build_session(cli)?;
    session.trigger_test_failure().await;
    // The report is dispatched on a spawned task; let it run before exit.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let snapshot = session.snapshot().await;
    print!("{}", render::render(&snapshot));
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_file_ids_trims_and_filters() {
        assert_eq!(parse_file_ids("1, 2,3"), vec![1, 2, 3]);
        assert_eq!(parse_file_ids("7"), vec![7]);
        assert_eq!(parse_file_ids("a, 0, 5"), vec![5]);
        assert!(parse_file_ids("").is_empty());
        assert!(parse_file_ids("x,y").is_empty());
    }
}
