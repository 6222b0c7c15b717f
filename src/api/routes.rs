use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::health::HealthState;
use crate::api::latency::FetchLatency;
use crate::db::models::{IndicatorReadingRow, SeasonSnapshotRow};
use crate::error::AppError;
use crate::season;
use crate::state::{IndicatorStore, ReadingValue};
use crate::types::{IndicatorSource, SeasonInfo};

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<IndicatorStore>,
    pub pool: sqlx::SqlitePool,
    pub health: Arc<HealthState>,
    pub latency: Arc<FetchLatency>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/season", get(get_season))
        .route("/season/history", get(get_season_history))
        .route("/indicators", get(get_indicators))
        .route("/indicators/history", get(get_indicator_history))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub since: Option<i64>,
}

#[derive(Deserialize)]
pub struct IndicatorHistoryQuery {
    pub source: Option<String>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
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

#[derive(Serialize)]
pub struct IndicatorResponse {
    pub source: String,
    pub value: Option<f64>,
    pub drawdown_pct: Option<f64>,
    pub recovery_pct: Option<f64>,
    pub days_since_ath: Option<i64>,
    pub age_secs: Option<f64>,
    pub stale: bool,
}

#[derive(Serialize)]
pub struct ReadingResponse {
    pub source: String,
    pub value: f64,
    pub detail: Option<String>,
    pub fetched_at: i64,
    pub latency_us: i64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub last_recompute_at_ns: u64,
    pub recompute_count: u64,
    pub write_queue_pending: u64,
    pub sources_fresh: usize,
    pub sources_total: usize,
}

#[derive(Serialize)]
pub struct LatencyResponse {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Current season readout. Served from the engine's last recompute; if the
/// engine has not run yet, computed fresh from whatever is cached — the
/// classifier is total, so this always succeeds.
async fn get_season(State(state): State<ApiState>) -> Json<SeasonInfo> {
    let info = state.store.current_season().unwrap_or_else(|| {
        let now_ns = now_ns();
        let snapshot = state.store.snapshot(now_ns);
        season::season_info((now_ns / 1_000_000_000) as i64, &snapshot)
    });
    Json(info)
}

async fn get_season_history(
    State(state): State<ApiState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryResponse>>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 1000);
    let since = params.since.unwrap_or(0);

    let rows: Vec<SeasonSnapshotRow> = sqlx::query_as(
        r#"
        SELECT id, computed_at, season, progress, confidence,
               days_since_halving, cycle_position,
               fear_greed, btc_dominance, drawdown_pct, recovery_pct, days_since_ath,
               signals
        FROM season_snapshots
        WHERE computed_at > ?
        ORDER BY computed_at DESC
        LIMIT ?
        "#,
    )
    .bind(since)
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;

    let history = rows
        .into_iter()
        .map(|r| HistoryResponse {
            computed_at: r.computed_at,
            season: r.season,
            progress: r.progress,
            confidence: r.confidence,
            days_since_halving: r.days_since_halving,
            cycle_position: r.cycle_position,
            fear_greed: r.fear_greed,
            btc_dominance: r.btc_dominance,
            drawdown_pct: r.drawdown_pct,
            signals: serde_json::from_str(&r.signals).unwrap_or_default(),
        })
        .collect();

    Ok(Json(history))
}

async fn get_indicators(State(state): State<ApiState>) -> Json<Vec<IndicatorResponse>> {
    let now_ns = now_ns();

    let indicators = IndicatorSource::ALL
        .iter()
        .map(|&source| match state.store.reading(source) {
            Some(reading) => {
                let age_secs =
                    now_ns.saturating_sub(reading.fetched_at_ns) as f64 / 1_000_000_000.0;
                let (value, drawdown_pct, recovery_pct, days_since_ath) = match reading.value {
                    ReadingValue::FearGreed(v) => (Some(v), None, None, None),
                    ReadingValue::Dominance(v) => (Some(v), None, None, None),
                    ReadingValue::Ath(a) => (
                        None,
                        Some(a.drawdown_pct),
                        Some(a.recovery_pct),
                        Some(a.days_since_ath),
                    ),
                };
                IndicatorResponse {
                    source: source.to_string(),
                    value,
                    drawdown_pct,
                    recovery_pct,
                    days_since_ath,
                    age_secs: Some(age_secs),
                    stale: reading.is_stale(source, now_ns),
                }
            }
            None => IndicatorResponse {
                source: source.to_string(),
                value: None,
                drawdown_pct: None,
                recovery_pct: None,
                days_since_ath: None,
                age_secs: None,
                stale: true,
            },
        })
        .collect();

    Json(indicators)
}

async fn get_indicator_history(
    State(state): State<ApiState>,
    Query(params): Query<IndicatorHistoryQuery>,
) -> Result<Json<Vec<ReadingResponse>>, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    let source = params.source.unwrap_or_default();

    // Empty source filter matches every row.
    let rows: Vec<IndicatorReadingRow> = sqlx::query_as(
        r#"
        SELECT id, source, value, detail, fetched_at, latency_us
        FROM indicator_readings
        WHERE (? = '' OR source = ?)
        ORDER BY fetched_at DESC
        LIMIT ?
        "#,
    )
    .bind(&source)
    .bind(&source)
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;

    let readings = rows
        .into_iter()
        .map(|r| ReadingResponse {
            source: r.source,
            value: r.value,
            detail: r.detail,
            fetched_at: r.fetched_at,
            latency_us: r.latency_us,
        })
        .collect();

    Ok(Json(readings))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let now_ns = now_ns();
    let sources_fresh = IndicatorSource::ALL
        .iter()
        .filter(|&&s| {
            state
                .store
                .reading(s)
                .is_some_and(|r| !r.is_stale(s, now_ns))
        })
        .count();

    Json(HealthResponse {
        last_recompute_at_ns: state.health.last_recompute_at_ns(),
        recompute_count: state.health.recompute_count(),
        write_queue_pending: state.health.write_queue_pending(),
        sources_fresh,
        sources_total: IndicatorSource::ALL.len(),
    })
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let (p50_ms, p95_ms, p99_ms) = state.latency.percentiles_ms();
    Json(LatencyResponse {
        p50_ms,
        p95_ms,
        p99_ms,
        sample_count: state.latency.sample_count(),
    })
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
