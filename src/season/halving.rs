//! Halving calendar and cycle-position lookup.

pub const SECS_PER_DAY: i64 = 86_400;

/// Known and estimated halving instants as UTC unix seconds, strictly
/// increasing. The last entry is the estimated 2028 halving; all others are
/// historical fact.
///
/// 2012-11-28, 2016-07-09, 2020-05-11, 2024-04-20, 2028-04-14 (est).
pub const HALVING_DATES: &[i64] = &[
    1_354_060_800,
    1_468_022_400,
    1_589_155_200,
    1_713_571_200,
    1_839_283_200,
];

/// The most recent halving at or before `now_secs`. Falls back to the first
/// calendar entry when `now_secs` predates the whole table, so the lookup is
/// total over any input.
pub fn last_halving_at(now_secs: i64) -> i64 {
    HALVING_DATES
        .iter()
        .rev()
        .find(|&&d| d <= now_secs)
        .copied()
        .unwrap_or(HALVING_DATES[0])
}

/// Whole days elapsed since the anchoring halving, floored. Negative only in
/// the degenerate case where `now_secs` predates the first calendar entry.
/// Can exceed the modeled cycle length once `now_secs` outruns the last
/// (estimated) entry — the classifier pins progress at 100 in that regime.
pub fn days_since_halving(now_secs: i64) -> i64 {
    (now_secs - last_halving_at(now_secs)).div_euclid(SECS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_is_strictly_increasing() {
        for pair in HALVING_DATES.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn anchors_to_most_recent_past_halving() {
        // One day after the 2020 halving.
        let now = 1_589_155_200 + SECS_PER_DAY;
        assert_eq!(last_halving_at(now), 1_589_155_200);
        assert_eq!(days_since_halving(now), 1);
    }

    #[test]
    fn exact_halving_instant_counts_as_day_zero() {
        assert_eq!(days_since_halving(1_713_571_200), 0);
        // One second shy of a full day still floors to 0.
        assert_eq!(days_since_halving(1_713_571_200 + SECS_PER_DAY - 1), 0);
    }

    #[test]
    fn predating_the_calendar_falls_back_to_first_entry() {
        let now = HALVING_DATES[0] - 10 * SECS_PER_DAY;
        assert_eq!(last_halving_at(now), HALVING_DATES[0]);
        assert_eq!(days_since_halving(now), -10);
    }

    #[test]
    fn outrunning_the_calendar_keeps_counting() {
        let last = *HALVING_DATES.last().unwrap();
        let now = last + 2000 * SECS_PER_DAY;
        assert_eq!(last_halving_at(now), last);
        assert_eq!(days_since_halving(now), 2000);
    }
}
