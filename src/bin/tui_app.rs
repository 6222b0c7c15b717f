use ratatui::style::Color;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// API response types (mirror routes.rs shapes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct SeasonResponse {
    pub season: String,
    pub name: String,
    pub subtitle: String,
    pub description: String,
    pub progress: f64,
    pub confidence: f64,
    pub icon: String,
    pub color: String,
    pub bg_gradient: String,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct IndicatorResponse {
    pub source: String,
    pub value: Option<f64>,
    pub drawdown_pct: Option<f64>,
    pub recovery_pct: Option<f64>,
    pub days_since_ath: Option<i64>,
    pub age_secs: Option<f64>,
    pub stale: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct HistoryResponse {
    pub computed_at: i64,
    pub season: String,
    pub progress: f64,
    pub confidence: f64,
    pub days_since_halving: i64,
    pub cycle_position: String,
    pub fear_greed: Option<f64>,
    pub btc_dominance: Option<f64>,
    pub drawdown_pct: Option<f64>,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct HealthResponse {
    pub last_recompute_at_ns: Option<u64>,
    pub recompute_count: Option<u64>,
    pub write_queue_pending: Option<u64>,
    pub sources_fresh: Option<usize>,
    pub sources_total: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct LatencyResponse {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub season: SeasonResponse,
    pub indicators: Vec<IndicatorResponse>,
    pub history: Vec<HistoryResponse>,
    pub health: HealthResponse,
    pub latency: LatencyResponse,
    pub last_refresh: std::time::Instant,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            season: SeasonResponse::default(),
            indicators: Vec::new(),
            history: Vec::new(),
            health: HealthResponse::default(),
            latency: LatencyResponse::default(),
            last_refresh: std::time::Instant::now(),
            base_url,
        }
    }

    pub async fn refresh(&mut self, client: &reqwest::Client) {
        let season_url = format!("{}/season", self.base_url);
        let indicators_url = format!("{}/indicators", self.base_url);
        let history_url = format!("{}/season/history?limit=30", self.base_url);
        let health_url = format!("{}/health", self.base_url);
        let latency_url = format!("{}/stats/latency", self.base_url);

        let (season_res, indicators_res, history_res, health_res, latency_res) = tokio::join!(
            client.get(&season_url).send(),
            client.get(&indicators_url).send(),
            client.get(&history_url).send(),
            client.get(&health_url).send(),
            client.get(&latency_url).send(),
        );

        let core_ok = season_res.is_ok() && indicators_res.is_ok();
        if !core_ok {
            let err = season_res.err().or_else(|| indicators_res.err());
            if let Some(e) = err {
                self.status = ConnectionStatus::Error(format!("{e}"));
            }
            return;
        }

        let (season, indicators) = tokio::join!(
            season_res.unwrap().json::<SeasonResponse>(),
            indicators_res.unwrap().json::<Vec<IndicatorResponse>>(),
        );

        match (season, indicators) {
            (Ok(s), Ok(i)) => {
                self.season = s;
                self.indicators = i;
                self.status = ConnectionStatus::Connected;
                self.last_refresh = std::time::Instant::now();

                if let Ok(h) = history_res {
                    if let Ok(history) = h.json::<Vec<HistoryResponse>>().await {
                        self.history = history;
                    }
                }
                if let Ok(h) = health_res {
                    if let Ok(health) = h.json::<HealthResponse>().await {
                        self.health = health;
                    }
                }
                if let Ok(l) = latency_res {
                    if let Ok(latency) = l.json::<LatencyResponse>().await {
                        self.latency = latency;
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("parse error: {e}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Badge color per season token, approximating the hex tokens the API serves.
pub fn season_color(season: &str) -> Color {
    match season {
        "accumulation" => Color::Green,
        "bull" => Color::Yellow,
        "distribution" => Color::LightRed,
        "bear" => Color::Blue,
        _ => Color::White,
    }
}

pub fn format_pct(v: f64) -> String {
    format!("{v:.1}%")
}

pub fn format_age(secs: Option<f64>) -> String {
    match secs {
        Some(s) if s >= 3600.0 => format!("{:.1}h", s / 3600.0),
        Some(s) if s >= 60.0 => format!("{:.0}m", s / 60.0),
        Some(s) => format!("{s:.0}s"),
        None => "—".to_string(),
    }
}

pub fn format_source(source: &str) -> &'static str {
    match source {
        "fear_greed" => "Fear & Greed",
        "ath_stats" => "ATH stats",
        "btc_dominance" => "BTC dominance",
        _ => "unknown",
    }
}

/// Convert nanosecond epoch timestamp to HH:MM:SS string.
pub fn format_time_ns(ns: i64) -> String {
    let secs = (ns / 1_000_000_000) as u64;
    let h = (secs / 3600) % 24;
    let m = (secs / 60) % 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_formats_scale_with_magnitude() {
        assert_eq!(format_age(Some(12.0)), "12s");
        assert_eq!(format_age(Some(180.0)), "3m");
        assert_eq!(format_age(Some(7200.0)), "2.0h");
        assert_eq!(format_age(None), "—");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer label", 8), "a longe…");
    }

    #[test]
    fn every_season_token_maps_to_a_color() {
        for s in ["accumulation", "bull", "distribution", "bear"] {
            assert_ne!(season_color(s), Color::White);
        }
    }
}

fn main() {
    // TUI entry point lives in src/bin/tui.rs — this file is its module.
}
