//! Prometheus metrics (lock-free atomics, zero allocation on hot path).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Traffic ---
    pub relay_total: AtomicU64,
    pub relay_success: AtomicU64,
    pub relay_rejected: AtomicU64,
    pub relay_failed: AtomicU64,

    // --- Latency (μs, updated via CAS) ---
    pub relay_duration_us_sum: AtomicU64,
    pub relay_duration_us_max: AtomicU64,

    // --- Ledger ---
    pub ledger_errors: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            relay_total: AtomicU64::new(0),
            relay_success: AtomicU64::new(0),
            relay_rejected: AtomicU64::new(0),
            relay_failed: AtomicU64::new(0),
            relay_duration_us_sum: AtomicU64::new(0),
            relay_duration_us_max: AtomicU64::new(0),
            ledger_errors: AtomicU64::new(0),
        }
    }

    pub fn record_relay_duration(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.relay_duration_us_sum.fetch_add(us, Ordering::Relaxed);
        // CAS loop for max tracking
        let mut cur = self.relay_duration_us_max.load(Ordering::Relaxed);
        while us > cur {
            match self.relay_duration_us_max.compare_exchange_weak(
                cur,
                us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => cur = actual,
            }
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let total = self.relay_total.load(Ordering::Relaxed);
        let success = self.relay_success.load(Ordering::Relaxed);
        let rejected = self.relay_rejected.load(Ordering::Relaxed);
        let failed = self.relay_failed.load(Ordering::Relaxed);
        let dur_sum = self.relay_duration_us_sum.load(Ordering::Relaxed);
        let dur_max = self.relay_duration_us_max.swap(0, Ordering::Relaxed);
        let ledger_errors = self.ledger_errors.load(Ordering::Relaxed);

        // Convert μs to seconds for Prometheus conventions
        let dur_sum_s = dur_sum as f64 / 1_000_000.0;
        let dur_max_s = dur_max as f64 / 1_000_000.0;

        format!(
            "\
# HELP relayer_relay_total Total relay requests received.\n\
# TYPE relayer_relay_total counter\n\
relayer_relay_total {total}\n\
# HELP relayer_relay_success_total Submitted transactions (HTTP 200).\n\
# TYPE relayer_relay_success_total counter\n\
relayer_relay_success_total {success}\n\
# HELP relayer_relay_rejected_total Requests rejected before submission (HTTP 4xx).\n\
# TYPE relayer_relay_rejected_total counter\n\
relayer_relay_rejected_total {rejected}\n\
# HELP relayer_relay_failed_total Submission or internal failures (HTTP 5xx).\n\
# TYPE relayer_relay_failed_total counter\n\
relayer_relay_failed_total {failed}\n\
# HELP relayer_relay_duration_seconds_sum Total handler time (seconds).\n\
# TYPE relayer_relay_duration_seconds_sum counter\n\
relayer_relay_duration_seconds_sum {dur_sum_s:.6}\n\
# HELP relayer_relay_duration_seconds_max Max handler time since last scrape (seconds).\n\
# TYPE relayer_relay_duration_seconds_max gauge\n\
relayer_relay_duration_seconds_max {dur_max_s:.6}\n\
# HELP relayer_ledger_errors_total Outbound ledger call failures.\n\
# TYPE relayer_ledger_errors_total counter\n\
relayer_ledger_errors_total {ledger_errors}\n"
        )
    }
}
