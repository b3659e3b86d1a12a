// src/utils/metrics.rs
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{Duration, Instant};

pub struct Metrics {
    start_time: Instant,
    requests_total: AtomicU64,
    requests_failed: AtomicU64,
    processing_time: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub requests_total: u64,
    pub requests_failed: u64,
    pub avg_request_time: Duration,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            requests_total: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            processing_time: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self, duration: Duration, success: bool) {
        self.requests_total.fetch_add(1, Ordering::SeqCst);
        self.processing_time.fetch_add(duration.as_micros() as u64, Ordering::SeqCst);
        if !success {
            self.requests_failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.requests_total.load(Ordering::SeqCst);
        let micros = self.processing_time.load(Ordering::SeqCst);

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            requests_total: total,
            requests_failed: self.requests_failed.load(Ordering::SeqCst),
            avg_request_time: if total == 0 {
                Duration::ZERO
            } else {
                Duration::from_micros(micros / total)
            },
        }
    }

    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        tracing::info!(
            total_requests = snapshot.requests_total,
            failed_requests = snapshot.requests_failed,
            avg_request_ms = snapshot.avg_request_time.as_millis() as u64,
            uptime_secs = snapshot.uptime.as_secs(),
            "Client metrics"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
