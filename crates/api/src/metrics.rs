use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    validation_failures: AtomicUsize,
    processing_failures: AtomicUsize,

    // Timing (in microseconds)
    total_extract_time_us: AtomicU64,
    extractions: AtomicUsize,

    // Counts
    total_traces: AtomicUsize,
    total_points: AtomicUsize,
}

/// How a request ended, as far as the counters care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success { traces: usize, points: usize },
    ValidationFailure,
    ProcessingFailure,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            validation_failures: AtomicUsize::new(0),
            processing_failures: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
            extractions: AtomicUsize::new(0),
            total_traces: AtomicUsize::new(0),
            total_points: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, outcome: Outcome) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        match outcome {
            Outcome::Success { traces, points } => {
                self.successful_requests.fetch_add(1, Ordering::Relaxed);
                self.total_traces.fetch_add(traces, Ordering::Relaxed);
                self.total_points.fetch_add(points, Ordering::Relaxed);
            }
            Outcome::ValidationFailure => {
                self.validation_failures.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::ProcessingFailure => {
                self.processing_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Time spent inside the engine, whether or not it succeeded.
    pub fn record_extract(&self, duration: Duration) {
        self.total_extract_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.extractions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let extractions = self.extractions.load(Ordering::Relaxed);
        let total_us = self.total_extract_time_us.load(Ordering::Relaxed) as f64;

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            processing_failures: self.processing_failures.load(Ordering::Relaxed),
            extractions,
            avg_extract_time_ms: if extractions > 0 {
                total_us / extractions as f64 / 1000.0 // Convert to ms
            } else {
                0.0
            },
            total_traces: self.total_traces.load(Ordering::Relaxed),
            total_points: self.total_points.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub validation_failures: usize,
    pub processing_failures: usize,
    pub extractions: usize,
    pub avg_extract_time_ms: f64,
    pub total_traces: usize,
    pub total_points: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.record_request(Outcome::Success {
            traces: 2,
            points: 40,
        });
        metrics.record_request(Outcome::ValidationFailure);
        metrics.record_request(Outcome::ProcessingFailure);
        metrics.record_extract(Duration::from_millis(30));
        metrics.record_extract(Duration::from_millis(10));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.successful_requests, 1);
        assert_eq!(snapshot.validation_failures, 1);
        assert_eq!(snapshot.processing_failures, 1);
        assert_eq!(snapshot.total_traces, 2);
        assert_eq!(snapshot.total_points, 40);
        assert!((snapshot.avg_extract_time_ms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_average() {
        assert_eq!(Metrics::new().snapshot().avg_extract_time_ms, 0.0);
    }
}
