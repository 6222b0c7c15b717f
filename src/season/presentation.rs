use crate::types::MarketSeason;

/// Static display bundle for a season. Color tokens are plain hex strings;
/// `bg_gradient` carries two comma-separated stops. UI callers consume these
/// directly with no further transformation.
#[derive(Debug, Clone, Copy)]
pub struct SeasonDisplay {
    pub name: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub bg_gradient: &'static str,
}

const ACCUMULATION: SeasonDisplay = SeasonDisplay {
    name: "Accumulation",
    subtitle: "Quiet build-up",
    description: "Sentiment is washed out and supply changes hands at a discount while the halving approaches.",
    icon: "🌱",
    color: "#34d399",
    bg_gradient: "#064e3b,#115e59",
};

const BULL: SeasonDisplay = SeasonDisplay {
    name: "Bull Market",
    subtitle: "Post-halving expansion",
    description: "The supply shock works through the market and price discovery trends upward.",
    icon: "🚀",
    color: "#fbbf24",
    bg_gradient: "#78350f,#92400e",
};

const DISTRIBUTION: SeasonDisplay = SeasonDisplay {
    name: "Distribution",
    subtitle: "Late-cycle euphoria",
    description: "Greed runs hot near the highs and long-term holders distribute into strength.",
    icon: "🍂",
    color: "#fb923c",
    bg_gradient: "#7c2d12,#9a3412",
};

const BEAR: SeasonDisplay = SeasonDisplay {
    name: "Bear Market",
    subtitle: "Drawdown and reset",
    description: "Excess unwinds and drawdowns deepen until the next accumulation base forms.",
    icon: "❄️",
    color: "#60a5fa",
    bg_gradient: "#1e3a8a,#1e40af",
};

/// Exhaustive season → display lookup.
pub fn display(season: MarketSeason) -> &'static SeasonDisplay {
    match season {
        MarketSeason::Accumulation => &ACCUMULATION,
        MarketSeason::Bull => &BULL,
        MarketSeason::Distribution => &DISTRIBUTION,
        MarketSeason::Bear => &BEAR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_season_has_a_distinct_bundle() {
        let names: Vec<&str> = [
            MarketSeason::Accumulation,
            MarketSeason::Bull,
            MarketSeason::Distribution,
            MarketSeason::Bear,
        ]
        .iter()
        .map(|&s| display(s).name)
        .collect();
        assert_eq!(names, ["Accumulation", "Bull Market", "Distribution", "Bear Market"]);
    }

    #[test]
    fn gradients_carry_two_stops() {
        for season in [
            MarketSeason::Accumulation,
            MarketSeason::Bull,
            MarketSeason::Distribution,
            MarketSeason::Bear,
        ] {
            let d = display(season);
            assert_eq!(d.bg_gradient.split(',').count(), 2);
            assert!(d.color.starts_with('#'));
        }
    }
}
