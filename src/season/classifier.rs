use crate::config::cycle_timing::{
    CYCLE_LENGTH_DAYS, FALL_START_DAYS, SPRING_START_DAYS, SUMMER_START_DAYS, WINTER_START_DAYS,
};
use crate::types::MarketSeason;

/// Phase readout for a given cycle position. `progress` is the percentage
/// through the phase, always in [0, 100].
#[derive(Debug, Clone)]
pub struct PhaseClassification {
    pub season: MarketSeason,
    pub progress: f64,
    /// Human-readable cycle position, always the first signal shown.
    pub cycle_position: String,
}

/// Map days-since-halving to a season. Ordered, first-match-wins; each
/// boundary belongs to the *later* phase (strict `<` on the earlier branch).
///
/// Days before the accumulation window get a fixed mid-phase progress of 50 —
/// the tail of the previous cycle is not modeled any finer than that.
pub fn classify(days: i64) -> PhaseClassification {
    if days < SPRING_START_DAYS {
        return PhaseClassification {
            season: MarketSeason::Bear,
            progress: 50.0,
            cycle_position: "Late previous cycle".to_string(),
        };
    }

    if days < SUMMER_START_DAYS {
        let span = (SUMMER_START_DAYS - SPRING_START_DAYS) as f64;
        return PhaseClassification {
            season: MarketSeason::Accumulation,
            progress: (days - SPRING_START_DAYS) as f64 / span * 100.0,
            cycle_position: format!("{} days to halving", -days),
        };
    }

    if days < FALL_START_DAYS {
        let span = (FALL_START_DAYS - SUMMER_START_DAYS) as f64;
        return PhaseClassification {
            season: MarketSeason::Bull,
            progress: (days - SUMMER_START_DAYS) as f64 / span * 100.0,
            cycle_position: format!("{days} days post-halving"),
        };
    }

    if days < WINTER_START_DAYS {
        let span = (WINTER_START_DAYS - FALL_START_DAYS) as f64;
        return PhaseClassification {
            season: MarketSeason::Distribution,
            progress: (days - FALL_START_DAYS) as f64 / span * 100.0,
            cycle_position: format!("{days} days post-halving"),
        };
    }

    // Bear runs to the start of the next cycle's accumulation window; days
    // beyond that pin at 100 rather than wrapping.
    let winter_end = CYCLE_LENGTH_DAYS + SPRING_START_DAYS;
    let span = (winter_end - WINTER_START_DAYS) as f64;
    PhaseClassification {
        season: MarketSeason::Bear,
        progress: ((days - WINTER_START_DAYS) as f64 / span * 100.0).min(100.0),
        cycle_position: format!("{days} days post-halving"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_accumulation_tail_is_fixed_midpoint() {
        let c = classify(-200);
        assert_eq!(c.season, MarketSeason::Bear);
        assert_eq!(c.progress, 50.0);
        assert_eq!(c.cycle_position, "Late previous cycle");
    }

    #[test]
    fn boundaries_select_the_later_season() {
        assert_eq!(classify(SPRING_START_DAYS).season, MarketSeason::Accumulation);
        assert_eq!(classify(SUMMER_START_DAYS).season, MarketSeason::Bull);
        assert_eq!(classify(FALL_START_DAYS).season, MarketSeason::Distribution);
        assert_eq!(classify(WINTER_START_DAYS).season, MarketSeason::Bear);
    }

    #[test]
    fn phase_entry_starts_at_zero_progress() {
        assert_eq!(classify(SPRING_START_DAYS).progress, 0.0);
        assert_eq!(classify(SUMMER_START_DAYS).progress, 0.0);
        assert_eq!(classify(FALL_START_DAYS).progress, 0.0);
        assert_eq!(classify(WINTER_START_DAYS).progress, 0.0);
    }

    #[test]
    fn accumulation_counts_down_to_halving() {
        let c = classify(-90);
        assert_eq!(c.season, MarketSeason::Accumulation);
        assert!((c.progress - 50.0).abs() < 1e-9);
        assert_eq!(c.cycle_position, "90 days to halving");
    }

    #[test]
    fn mid_bull_progress_is_linear() {
        let c = classify(45);
        assert_eq!(c.season, MarketSeason::Bull);
        assert!((c.progress - 11.25).abs() < 1e-9);
        assert_eq!(c.cycle_position, "45 days post-halving");
    }

    #[test]
    fn distribution_interpolates_its_own_span() {
        let c = classify(475);
        assert_eq!(c.season, MarketSeason::Distribution);
        assert!((c.progress - 50.0).abs() < 1e-9);
    }

    #[test]
    fn bear_past_modeled_cycle_end_pins_at_100() {
        let c = classify(1300);
        assert_eq!(c.season, MarketSeason::Bear);
        assert_eq!(c.progress, 100.0);
    }

    #[test]
    fn progress_stays_in_range_across_full_sweep() {
        for days in -10_000..=10_000 {
            let c = classify(days);
            assert!(
                (0.0..=100.0).contains(&c.progress),
                "days={days} progress={}",
                c.progress
            );
        }
    }
}
