//! In-memory histogram of indicator fetch round-trip times.
//! Pollers record, the API reads.

use std::sync::Mutex;
use std::time::Duration;

/// Shared fetch-latency stats. Values stored in microseconds.
pub struct FetchLatency {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl FetchLatency {
    /// Tracks 1us to 100s, 3 significant figures — indicator fetches are
    /// whole-HTTP round trips, typically tens to hundreds of ms.
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 100_000_000, 3)
            .expect("valid histogram bounds");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    pub fn record(&self, d: Duration) {
        let us = d.as_micros().min(u128::from(u64::MAX)) as u64;
        if let Ok(mut h) = self.inner.lock() {
            let _ = h.record(us.max(1));
        }
    }

    /// Return (p50_ms, p95_ms, p99_ms). None if no samples yet.
    pub fn percentiles_ms(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        let Ok(h) = self.inner.lock() else {
            return (None, None, None);
        };
        if h.len() == 0 {
            return (None, None, None);
        }
        let to_ms = |us: u64| us as f64 / 1000.0;
        (
            Some(to_ms(h.value_at_quantile(0.5))),
            Some(to_ms(h.value_at_quantile(0.95))),
            Some(to_ms(h.value_at_quantile(0.99))),
        )
    }

    pub fn sample_count(&self) -> u64 {
        self.inner.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for FetchLatency {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram_reports_no_percentiles() {
        let stats = FetchLatency::new();
        assert_eq!(stats.percentiles_ms(), (None, None, None));
        assert_eq!(stats.sample_count(), 0);
    }

    #[test]
    fn recorded_fetches_surface_in_percentiles() {
        let stats = FetchLatency::new();
        for ms in [50u64, 60, 70, 80, 90] {
            stats.record(Duration::from_millis(ms));
        }
        assert_eq!(stats.sample_count(), 5);
        let (p50, _, p99) = stats.percentiles_ms();
        let p50 = p50.unwrap();
        let p99 = p99.unwrap();
        assert!(p50 >= 50.0 && p50 <= 90.0, "p50={p50}");
        assert!(p99 >= p50, "p99={p99} < p50={p50}");
    }
}
