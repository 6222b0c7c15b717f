use crate::error::{AppError, Result};

pub const FEAR_GREED_API_URL: &str = "https://api.alternative.me";
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com";

/// Outbound HTTP timeout for indicator fetches (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Fear & Greed refresh interval (seconds). The index updates once a day, so
/// polling faster than this buys nothing.
pub const FEAR_GREED_REFRESH_SECS: u64 = 1800;

/// BTC dominance refresh interval (seconds).
pub const DOMINANCE_REFRESH_SECS: u64 = 300;

/// ATH stats refresh interval (seconds).
pub const ATH_REFRESH_SECS: u64 = 300;

/// A cached reading older than this many refresh intervals is treated as
/// missing and the scorer falls back to its neutral default.
pub const STALE_AFTER_INTERVALS: u64 = 3;

/// Engine clock tick (seconds) — forces a recompute even with no source
/// updates so the day counter rolls over.
pub const RECOMPUTE_TICK_SECS: u64 = 3600;

/// Channel capacity for internal message routing.
pub const CHANNEL_CAPACITY: usize = 256;

/// Day offsets relative to a halving delimiting the four seasons, plus the
/// modeled full cycle length. These are contract constants — the classifier
/// boundaries and progress spans are all derived from them.
pub mod cycle_timing {
    /// Accumulation begins this many days before the halving.
    pub const SPRING_START_DAYS: i64 = -180;
    /// Bull begins at the halving itself.
    pub const SUMMER_START_DAYS: i64 = 0;
    /// Distribution begins this many days after the halving.
    pub const FALL_START_DAYS: i64 = 400;
    /// Bear begins this many days after the halving.
    pub const WINTER_START_DAYS: i64 = 550;
    /// Modeled cycle length; the bear phase nominally ends at
    /// CYCLE_LENGTH_DAYS + SPRING_START_DAYS post-halving.
    pub const CYCLE_LENGTH_DAYS: i64 = 1260;
}

#[derive(Debug, Clone)]
pub struct Config {
    pub fear_greed_api_url: String,
    pub coingecko_api_url: String,
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// Fear & Greed poll interval in seconds (FEAR_GREED_REFRESH_SECS).
    pub fear_greed_refresh_secs: u64,
    /// BTC dominance poll interval in seconds (DOMINANCE_REFRESH_SECS).
    pub dominance_refresh_secs: u64,
    /// ATH stats poll interval in seconds (ATH_REFRESH_SECS).
    pub ath_refresh_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            fear_greed_api_url: std::env::var("FEAR_GREED_API_URL")
                .unwrap_or_else(|_| FEAR_GREED_API_URL.to_string()),
            coingecko_api_url: std::env::var("COINGECKO_API_URL")
                .unwrap_or_else(|_| COINGECKO_API_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "seasons.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            fear_greed_refresh_secs: std::env::var("FEAR_GREED_REFRESH_SECS")
                .unwrap_or_else(|_| FEAR_GREED_REFRESH_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(FEAR_GREED_REFRESH_SECS),
            dominance_refresh_secs: std::env::var("DOMINANCE_REFRESH_SECS")
                .unwrap_or_else(|_| DOMINANCE_REFRESH_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(DOMINANCE_REFRESH_SECS),
            ath_refresh_secs: std::env::var("ATH_REFRESH_SECS")
                .unwrap_or_else(|_| ATH_REFRESH_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(ATH_REFRESH_SECS),
        })
    }

    /// Poll interval for a source, from env-resolved config.
    pub fn refresh_secs(&self, source: crate::types::IndicatorSource) -> u64 {
        use crate::types::IndicatorSource::*;
        match source {
            FearGreed => self.fear_greed_refresh_secs,
            AthStats => self.ath_refresh_secs,
            BtcDominance => self.dominance_refresh_secs,
        }
    }
}

/// Staleness cutoff for a source in nanoseconds, derived from the default
/// refresh interval. A reading older than this is dropped from snapshots.
pub fn stale_after_ns(source: crate::types::IndicatorSource) -> u64 {
    use crate::types::IndicatorSource::*;
    let interval_secs = match source {
        FearGreed => FEAR_GREED_REFRESH_SECS,
        AthStats => ATH_REFRESH_SECS,
        BtcDominance => DOMINANCE_REFRESH_SECS,
    };
    interval_secs * STALE_AFTER_INTERVALS * 1_000_000_000
}
