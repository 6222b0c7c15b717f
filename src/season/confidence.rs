use crate::types::{EffectiveIndicators, MarketSeason};

/// Indicator agreement with the halving-anchored season. The season itself is
/// never revised here — live indicators only move the confidence and supply
/// corroborating signal strings.
#[derive(Debug, Clone)]
pub struct ConfidenceReading {
    /// One of {40, 55, 70, 85, 100}.
    pub confidence: f64,
    /// One signal string per satisfied check, in check order.
    pub signals: Vec<String>,
}

/// Baseline confidence with zero indicator agreement.
const CONFIDENCE_FLOOR: f64 = 40.0;
/// Confidence added per agreeing check (4 checks per season).
const CONFIDENCE_STEP: f64 = 15.0;

/// Evaluate the four season-specific indicator checks and derive confidence.
///
/// Each season reads the same five inputs against its own thresholds,
/// reflecting the expected market psychology of that phase: accumulation
/// wants fear and a deep, aged drawdown; bull wants recovering greed;
/// distribution wants euphoria at fresh highs; bear wants capitulation.
pub fn score(season: MarketSeason, ind: &EffectiveIndicators) -> ConfidenceReading {
    let mut agreements = 0u32;
    let mut signals = Vec::new();
    let mut check = |hit: bool, signal: String| {
        if hit {
            agreements += 1;
            signals.push(signal);
        }
    };

    match season {
        MarketSeason::Accumulation => {
            check(
                ind.fear_greed <= 40.0,
                format!("Fear & Greed at {:.0}", ind.fear_greed),
            );
            check(
                ind.drawdown_pct >= 30.0,
                format!("{:.0}% below all-time high", ind.drawdown_pct),
            );
            check(
                ind.btc_dominance >= 50.0,
                format!("BTC dominance {:.1}%", ind.btc_dominance),
            );
            check(
                ind.days_since_ath >= 300,
                format!("{} days since all-time high", ind.days_since_ath),
            );
        }
        MarketSeason::Bull => {
            check(
                ind.fear_greed >= 40.0,
                format!("Fear & Greed at {:.0}", ind.fear_greed),
            );
            check(
                ind.recovery_pct >= 50.0,
                format!("Price at {:.0}% of all-time high", ind.recovery_pct),
            );
            check(
                (40.0..=60.0).contains(&ind.btc_dominance),
                format!("BTC dominance {:.1}%", ind.btc_dominance),
            );
            check(
                ind.drawdown_pct <= 40.0,
                format!("{:.0}% off the high", ind.drawdown_pct),
            );
        }
        MarketSeason::Distribution => {
            check(
                ind.fear_greed >= 70.0,
                format!("Fear & Greed at {:.0}", ind.fear_greed),
            );
            check(
                ind.recovery_pct >= 90.0,
                format!("Price at {:.0}% of all-time high", ind.recovery_pct),
            );
            check(
                ind.btc_dominance <= 55.0,
                format!("BTC dominance down to {:.1}%", ind.btc_dominance),
            );
            check(
                ind.days_since_ath <= 60,
                format!("All-time high {} days ago", ind.days_since_ath),
            );
        }
        MarketSeason::Bear => {
            check(
                ind.fear_greed <= 30.0,
                format!("Fear & Greed at {:.0}", ind.fear_greed),
            );
            check(
                ind.drawdown_pct >= 40.0,
                format!("{:.0}% below all-time high", ind.drawdown_pct),
            );
            check(
                ind.recovery_pct <= 60.0,
                format!("Price at {:.0}% of all-time high", ind.recovery_pct),
            );
            check(
                ind.btc_dominance >= 52.0,
                format!("BTC dominance {:.1}%", ind.btc_dominance),
            );
        }
    }

    ConfidenceReading {
        confidence: CONFIDENCE_FLOOR + f64::from(agreements) * CONFIDENCE_STEP,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndicatorSnapshot;

    fn neutral() -> EffectiveIndicators {
        IndicatorSnapshot::default().effective()
    }

    #[test]
    fn neutral_defaults_fully_agree_with_bull() {
        let r = score(MarketSeason::Bull, &neutral());
        assert_eq!(r.confidence, 100.0);
        assert_eq!(r.signals.len(), 4);
    }

    #[test]
    fn neutral_defaults_give_bear_the_floor() {
        let r = score(MarketSeason::Bear, &neutral());
        assert_eq!(r.confidence, 40.0);
        assert!(r.signals.is_empty());
    }

    #[test]
    fn accumulation_thresholds_all_fire() {
        let ind = EffectiveIndicators {
            fear_greed: 25.0,
            drawdown_pct: 55.0,
            recovery_pct: 45.0,
            days_since_ath: 420,
            btc_dominance: 58.0,
        };
        let r = score(MarketSeason::Accumulation, &ind);
        assert_eq!(r.confidence, 100.0);
        assert_eq!(r.signals[0], "Fear & Greed at 25");
        assert_eq!(r.signals[3], "420 days since all-time high");
    }

    #[test]
    fn distribution_wants_euphoria_at_fresh_highs() {
        let ind = EffectiveIndicators {
            fear_greed: 82.0,
            drawdown_pct: 3.0,
            recovery_pct: 97.0,
            days_since_ath: 12,
            btc_dominance: 48.5,
        };
        let r = score(MarketSeason::Distribution, &ind);
        assert_eq!(r.confidence, 100.0);
    }

    #[test]
    fn partial_agreement_lands_on_intermediate_steps() {
        // Only fear and dominance agree with accumulation.
        let ind = EffectiveIndicators {
            fear_greed: 30.0,
            drawdown_pct: 10.0,
            recovery_pct: 90.0,
            days_since_ath: 50,
            btc_dominance: 60.0,
        };
        let r = score(MarketSeason::Accumulation, &ind);
        assert_eq!(r.confidence, 70.0);
        assert_eq!(r.signals.len(), 2);
    }

    #[test]
    fn confidence_only_takes_the_five_step_values() {
        let admissible = [40.0, 55.0, 70.0, 85.0, 100.0];
        for fg in [0.0, 25.0, 50.0, 75.0, 100.0] {
            for dd in [0.0, 35.0, 80.0] {
                for dom in [30.0, 50.0, 70.0] {
                    for days in [0, 100, 500] {
                        let ind = EffectiveIndicators {
                            fear_greed: fg,
                            drawdown_pct: dd,
                            recovery_pct: 100.0 - dd,
                            days_since_ath: days,
                            btc_dominance: dom,
                        };
                        for season in [
                            MarketSeason::Accumulation,
                            MarketSeason::Bull,
                            MarketSeason::Distribution,
                            MarketSeason::Bear,
                        ] {
                            let r = score(season, &ind);
                            assert!(admissible.contains(&r.confidence), "{}", r.confidence);
                            assert!(r.signals.len() <= 4);
                        }
                    }
                }
            }
        }
    }
}
