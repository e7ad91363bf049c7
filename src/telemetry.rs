//! Client-side request telemetry (counters + rolling latency window)

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

/// Number of latency samples retained for the rolling average.
pub const LATENCY_WINDOW: usize = 100;

/// Records the outcome and latency of every backend request.
///
/// Counters are lifetime totals and are never reset short of a process
/// restart. The latency window keeps only the most recent
/// [`LATENCY_WINDOW`] samples (FIFO, oldest evicted first), so the average
/// is a recent-behavior indicator while the totals cover the whole session.
/// That asymmetry is intentional.
#[derive(Debug)]
pub struct RequestStats {
    total: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    window: Mutex<VecDeque<f64>>,
    window_cap: usize,
}

impl RequestStats {
    pub fn new(window_cap: usize) -> Self {
        Self {
            total: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            window: Mutex::new(VecDeque::with_capacity(window_cap)),
            window_cap,
        }
    }

    /// Record one request outcome and its wall-clock latency.
    pub async fn record(&self, success: bool, latency_ms: f64) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }

        let mut window = self.window.lock().await;
        window.push_back(latency_ms);
        while window.len() > self.window_cap {
            window.pop_front();
        }

        tracing::debug!(success, latency_ms, "Request observed");
    }

    /// Current aggregate view. The average is recomputed from the window
    /// contents on every call, not maintained incrementally.
    pub async fn snapshot(&self) -> StatsSnapshot {
        let window = self.window.lock().await;
        let average_response_time_ms = if window.is_empty() {
            0.0
        } else {
            window.iter().sum::<f64>() / window.len() as f64
        };

        StatsSnapshot {
            total_requests: self.total.load(Ordering::Relaxed),
            successful_requests: self.succeeded.load(Ordering::Relaxed),
            failed_requests: self.failed.load(Ordering::Relaxed),
            average_response_time_ms,
        }
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new(LATENCY_WINDOW)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_time_ms: f64,
}

impl StatsSnapshot {
    /// Percentage of successful requests, 0.0 when nothing was recorded yet.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.successful_requests as f64 / self.total_requests as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counters_always_balance() {
        let stats = RequestStats::default();
        for i in 0..37u64 {
            stats.record(i % 3 != 0, i as f64).await;
        }

        let snap = stats.snapshot().await;
        assert_eq!(snap.total_requests, 37);
        assert_eq!(
            snap.successful_requests + snap.failed_requests,
            snap.total_requests
        );
    }

    #[tokio::test]
    async fn window_keeps_only_latest_samples() {
        let stats = RequestStats::default();

        // 50 slow samples, then 100 fast ones. After 150 records the window
        // must only reflect the latest 100.
        for _ in 0..50 {
            stats.record(true, 1000.0).await;
        }
        for _ in 0..100 {
            stats.record(true, 10.0).await;
        }

        let snap = stats.snapshot().await;
        assert_eq!(snap.total_requests, 150);
        assert!((snap.average_response_time_ms - 10.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_window_averages_to_zero() {
        let stats = RequestStats::default();
        let snap = stats.snapshot().await;
        assert_eq!(snap.average_response_time_ms, 0.0);
        assert_eq!(snap.success_rate(), 0.0);
    }

    #[tokio::test]
    async fn success_rate_is_derived_from_counters() {
        let stats = RequestStats::default();
        stats.record(true, 5.0).await;
        stats.record(true, 5.0).await;
        stats.record(false, 5.0).await;
        stats.record(true, 5.0).await;

        let snap = stats.snapshot().await;
        assert!((snap.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn custom_window_capacity() {
        let stats = RequestStats::new(2);
        stats.record(true, 100.0).await;
        stats.record(true, 10.0).await;
        stats.record(true, 20.0).await;

        let snap = stats.snapshot().await;
        assert!((snap.average_response_time_ms - 15.0).abs() < f64::EPSILON);
    }
}
