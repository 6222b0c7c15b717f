use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Market season
// ---------------------------------------------------------------------------

/// The four halving-anchored phases of a Bitcoin market cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSeason {
    /// Pre-halving run-up — quiet build phase.
    Accumulation,
    /// Post-halving expansion.
    Bull,
    /// Late-cycle top formation.
    Distribution,
    /// Post-peak drawdown through the cycle tail.
    Bear,
}

impl std::fmt::Display for MarketSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MarketSeason::Accumulation => "accumulation",
            MarketSeason::Bull => "bull",
            MarketSeason::Distribution => "distribution",
            MarketSeason::Bear => "bear",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Indicator inputs
// ---------------------------------------------------------------------------

/// Derived all-time-high metrics for BTC.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AthStats {
    /// Percentage decline from the all-time high, >= 0.
    pub drawdown_pct: f64,
    /// Current price as a percentage of the all-time high.
    pub recovery_pct: f64,
    /// Whole days elapsed since the all-time high was set.
    pub days_since_ath: i64,
}

/// Latest live indicator values. Every field is optional — a source that has
/// never been fetched, or whose reading has gone stale, is simply absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorSnapshot {
    /// Fear & Greed index in [0, 100].
    pub fear_greed: Option<f64>,
    pub ath: Option<AthStats>,
    /// BTC share of total crypto market cap, as a percentage.
    pub btc_dominance: Option<f64>,
}

/// Snapshot with neutral defaults substituted for every missing field.
/// The scorer only ever sees this form, so it is total over any input.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveIndicators {
    pub fear_greed: f64,
    pub drawdown_pct: f64,
    pub recovery_pct: f64,
    pub days_since_ath: i64,
    pub btc_dominance: f64,
}

impl IndicatorSnapshot {
    /// Neutral fallbacks: fg=50, drawdown=0, recovery=100, days_since_ath=0,
    /// dominance=50.
    pub fn effective(&self) -> EffectiveIndicators {
        EffectiveIndicators {
            fear_greed: self.fear_greed.unwrap_or(50.0),
            drawdown_pct: self.ath.map_or(0.0, |a| a.drawdown_pct),
            recovery_pct: self.ath.map_or(100.0, |a| a.recovery_pct),
            days_since_ath: self.ath.map_or(0, |a| a.days_since_ath),
            btc_dominance: self.btc_dominance.unwrap_or(50.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier output
// ---------------------------------------------------------------------------

/// The full season readout served to UI callers.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonInfo {
    pub season: MarketSeason,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    /// Percentage through the current phase, always in [0, 100].
    pub progress: f64,
    /// One of {40, 55, 70, 85, 100}.
    pub confidence: f64,
    pub icon: &'static str,
    /// Hex color token for the badge.
    pub color: &'static str,
    /// Two comma-separated hex stops for the background gradient.
    pub bg_gradient: &'static str,
    /// At most 3 entries; the first is always the cycle-position label.
    pub signals: Vec<String>,
}

// ---------------------------------------------------------------------------
// Indicator sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSource {
    FearGreed,
    AthStats,
    BtcDominance,
}

impl IndicatorSource {
    pub const ALL: [IndicatorSource; 3] = [
        IndicatorSource::FearGreed,
        IndicatorSource::AthStats,
        IndicatorSource::BtcDominance,
    ];
}

impl std::fmt::Display for IndicatorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IndicatorSource::FearGreed => "fear_greed",
            IndicatorSource::AthStats => "ath_stats",
            IndicatorSource::BtcDominance => "btc_dominance",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Channel message types
// ---------------------------------------------------------------------------

/// Routed from an indicator poller to the season engine after a successful
/// fetch, prompting a recompute.
#[derive(Debug, Clone)]
pub struct SourceUpdateMsg {
    pub source: IndicatorSource,
    /// Nanosecond UTC epoch of when the reading landed in the store.
    pub fetched_at_ns: u64,
}

/// A recomputed season readout headed for the DB writer.
#[derive(Debug, Clone)]
pub struct SeasonSnapshotEvent {
    pub computed_at_ns: u64,
    pub days_since_halving: i64,
    pub info: SeasonInfo,
    /// The indicator values the readout was computed from.
    pub inputs: IndicatorSnapshot,
}

/// A raw per-source reading headed for the DB writer.
#[derive(Debug, Clone)]
pub struct IndicatorReadingEvent {
    pub source: IndicatorSource,
    /// Primary numeric value (fg index, dominance pct, or drawdown pct).
    pub value: f64,
    /// Extra fields as JSON for sources with more than one number.
    pub detail: Option<String>,
    pub fetched_at_ns: u64,
    pub latency_us: u64,
}

/// Routed from the engine and pollers to the DB writer.
#[derive(Debug, Clone)]
pub enum PersistEvent {
    Season(SeasonSnapshotEvent),
    Reading(IndicatorReadingEvent),
}
