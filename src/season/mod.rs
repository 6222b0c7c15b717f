//! Halving-anchored market season classification.
//!
//! The pipeline is pure and total: a wall-clock instant fixes the cycle
//! position, the cycle position fixes the season, and live indicators only
//! adjust confidence and the signal readouts. No input combination errors.

pub mod classifier;
pub mod confidence;
pub mod halving;
pub mod presentation;

use crate::types::{IndicatorSnapshot, SeasonInfo};

/// Maximum signal entries surfaced to callers; the cycle-position label
/// always occupies the first slot.
const MAX_SIGNALS: usize = 3;

/// Full season readout for a wall-clock instant (UTC unix seconds).
pub fn season_info(now_secs: i64, snapshot: &IndicatorSnapshot) -> SeasonInfo {
    season_info_for_days(halving::days_since_halving(now_secs), snapshot)
}

/// Full season readout for an explicit cycle position.
pub fn season_info_for_days(days: i64, snapshot: &IndicatorSnapshot) -> SeasonInfo {
    let phase = classifier::classify(days);
    let reading = confidence::score(phase.season, &snapshot.effective());
    let display = presentation::display(phase.season);

    let mut signals = Vec::with_capacity(MAX_SIGNALS);
    signals.push(phase.cycle_position);
    signals.extend(reading.signals);
    signals.truncate(MAX_SIGNALS);

    SeasonInfo {
        season: phase.season,
        name: display.name,
        subtitle: display.subtitle,
        description: display.description,
        progress: phase.progress,
        confidence: reading.confidence,
        icon: display.icon,
        color: display.color,
        bg_gradient: display.bg_gradient,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AthStats, MarketSeason};

    #[test]
    fn early_bull_with_neutral_indicators() {
        let info = season_info_for_days(45, &IndicatorSnapshot::default());
        assert_eq!(info.season, MarketSeason::Bull);
        assert!((info.progress - 11.25).abs() < 1e-9);
        // All four bull checks pass on neutral defaults.
        assert_eq!(info.confidence, 100.0);
        assert_eq!(info.signals.len(), 3);
        assert_eq!(info.signals[0], "45 days post-halving");
    }

    #[test]
    fn late_previous_cycle_readout() {
        let info = season_info_for_days(-200, &IndicatorSnapshot::default());
        assert_eq!(info.season, MarketSeason::Bear);
        assert_eq!(info.progress, 50.0);
        assert_eq!(info.signals[0], "Late previous cycle");
    }

    #[test]
    fn deep_bear_progress_pins_at_100() {
        let info = season_info_for_days(1300, &IndicatorSnapshot::default());
        assert_eq!(info.season, MarketSeason::Bear);
        assert_eq!(info.progress, 100.0);
    }

    #[test]
    fn signals_never_exceed_three_entries() {
        // A snapshot that satisfies all four accumulation checks.
        let snapshot = IndicatorSnapshot {
            fear_greed: Some(20.0),
            ath: Some(AthStats {
                drawdown_pct: 60.0,
                recovery_pct: 40.0,
                days_since_ath: 500,
            }),
            btc_dominance: Some(57.0),
        };
        let info = season_info_for_days(-100, &snapshot);
        assert_eq!(info.season, MarketSeason::Accumulation);
        assert_eq!(info.confidence, 100.0);
        assert_eq!(info.signals.len(), 3);
        assert_eq!(info.signals[0], "100 days to halving");
        // The fourth matched check is silently dropped.
        assert_eq!(info.signals[1], "Fear & Greed at 20");
        assert_eq!(info.signals[2], "60% below all-time high");
    }

    #[test]
    fn season_ignores_indicator_swings() {
        let days = 250;
        let baseline = season_info_for_days(days, &IndicatorSnapshot::default()).season;
        for fg in [0.0, 10.0, 50.0, 90.0, 100.0] {
            for dd in [0.0, 30.0, 60.0, 95.0] {
                for dom in [10.0, 45.0, 55.0, 90.0] {
                    let snapshot = IndicatorSnapshot {
                        fear_greed: Some(fg),
                        ath: Some(AthStats {
                            drawdown_pct: dd,
                            recovery_pct: 100.0 - dd,
                            days_since_ath: (dd * 10.0) as i64,
                        }),
                        btc_dominance: Some(dom),
                    };
                    let info = season_info_for_days(days, &snapshot);
                    assert_eq!(info.season, baseline);
                    assert_eq!(info.signals[0], "250 days post-halving");
                }
            }
        }
    }

    #[test]
    fn wall_clock_entry_point_matches_day_lookup() {
        let now = 1_713_571_200 + 45 * halving::SECS_PER_DAY;
        let info = season_info(now, &IndicatorSnapshot::default());
        assert_eq!(info.season, MarketSeason::Bull);
        assert_eq!(info.signals[0], "45 days post-halving");
    }
}
