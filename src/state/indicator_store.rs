use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crate::config::stale_after_ns;
use crate::types::{AthStats, IndicatorSnapshot, IndicatorSource, SeasonInfo};

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// A fetched indicator value. One variant per source.
#[derive(Debug, Clone, Copy)]
pub enum ReadingValue {
    FearGreed(f64),
    Ath(AthStats),
    Dominance(f64),
}

impl ReadingValue {
    /// The primary numeric value, for display and persistence.
    pub fn primary(&self) -> f64 {
        match self {
            ReadingValue::FearGreed(v) => *v,
            ReadingValue::Ath(a) => a.drawdown_pct,
            ReadingValue::Dominance(v) => *v,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CachedReading {
    pub value: ReadingValue,
    /// Nanosecond UTC epoch of the fetch.
    pub fetched_at_ns: u64,
}

impl CachedReading {
    pub fn is_stale(&self, source: IndicatorSource, now_ns: u64) -> bool {
        now_ns.saturating_sub(self.fetched_at_ns) > stale_after_ns(source)
    }
}

// ---------------------------------------------------------------------------
// IndicatorStore
// ---------------------------------------------------------------------------

/// Concurrent cache of the latest reading per source plus the latest
/// computed season readout. Pollers write, the engine and API read.
pub struct IndicatorStore {
    readings: DashMap<IndicatorSource, CachedReading>,
    current_season: Mutex<Option<SeasonInfo>>,
}

impl IndicatorStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            readings: DashMap::new(),
            current_season: Mutex::new(None),
        })
    }

    pub fn record(&self, source: IndicatorSource, value: ReadingValue, fetched_at_ns: u64) {
        self.readings.insert(
            source,
            CachedReading {
                value,
                fetched_at_ns,
            },
        );
    }

    pub fn reading(&self, source: IndicatorSource) -> Option<CachedReading> {
        self.readings.get(&source).map(|r| *r.value())
    }

    /// Assemble the classifier input from current readings, dropping any
    /// whose age exceeds the per-source staleness cutoff. A dropped reading
    /// degrades to the scorer's neutral default rather than erroring.
    pub fn snapshot(&self, now_ns: u64) -> IndicatorSnapshot {
        let mut snapshot = IndicatorSnapshot::default();
        for source in IndicatorSource::ALL {
            let Some(reading) = self.reading(source) else {
                continue;
            };
            if reading.is_stale(source, now_ns) {
                continue;
            }
            match reading.value {
                ReadingValue::FearGreed(v) => snapshot.fear_greed = Some(v),
                ReadingValue::Ath(a) => snapshot.ath = Some(a),
                ReadingValue::Dominance(v) => snapshot.btc_dominance = Some(v),
            }
        }
        snapshot
    }

    pub fn set_current_season(&self, info: SeasonInfo) {
        if let Ok(mut current) = self.current_season.lock() {
            *current = Some(info);
        }
    }

    pub fn current_season(&self) -> Option<SeasonInfo> {
        self.current_season.lock().ok().and_then(|c| c.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const NS_PER_SEC: u64 = 1_000_000_000;

    #[test]
    fn fresh_readings_land_in_the_snapshot() {
        let store = IndicatorStore::new();
        let now = 1_000_000 * NS_PER_SEC;
        store.record(IndicatorSource::FearGreed, ReadingValue::FearGreed(32.0), now);
        store.record(IndicatorSource::BtcDominance, ReadingValue::Dominance(56.5), now);

        let snapshot = store.snapshot(now + NS_PER_SEC);
        assert_eq!(snapshot.fear_greed, Some(32.0));
        assert_eq!(snapshot.btc_dominance, Some(56.5));
        assert!(snapshot.ath.is_none());
    }

    #[test]
    fn stale_readings_drop_out_of_the_snapshot() {
        let store = IndicatorStore::new();
        let fetched = 1_000_000 * NS_PER_SEC;
        store.record(IndicatorSource::BtcDominance, ReadingValue::Dominance(56.5), fetched);

        // Two days later the dominance reading is long past its cutoff.
        let now = fetched + 2 * 86_400 * NS_PER_SEC;
        let snapshot = store.snapshot(now);
        assert!(snapshot.btc_dominance.is_none());
        // The raw reading is still retrievable for the API age display.
        assert!(store.reading(IndicatorSource::BtcDominance).is_some());
    }

    #[test]
    fn newer_reading_replaces_older() {
        let store = IndicatorStore::new();
        let t0 = 1_000_000 * NS_PER_SEC;
        store.record(IndicatorSource::FearGreed, ReadingValue::FearGreed(30.0), t0);
        store.record(IndicatorSource::FearGreed, ReadingValue::FearGreed(45.0), t0 + NS_PER_SEC);

        let snapshot = store.snapshot(t0 + 2 * NS_PER_SEC);
        assert_eq!(snapshot.fear_greed, Some(45.0));
    }

    #[test]
    fn empty_store_yields_empty_snapshot_and_no_season() {
        let store = IndicatorStore::new();
        let snapshot = store.snapshot(0);
        assert!(snapshot.fear_greed.is_none());
        assert!(snapshot.ath.is_none());
        assert!(snapshot.btc_dominance.is_none());
        assert!(store.current_season().is_none());
    }
}
