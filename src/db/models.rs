/// Database row types matching the schema in migrations/0001_init.sql.
/// Used by sqlx for typed query_as reads.

#[derive(Debug, sqlx::FromRow)]
pub struct SeasonSnapshotRow {
    pub id: i64,
    pub computed_at: i64,
    pub season: String,
    pub progress: f64,
    pub confidence: f64,
    pub days_since_halving: i64,
    pub cycle_position: String,
    pub fear_greed: Option<f64>,
    pub btc_dominance: Option<f64>,
    pub drawdown_pct: Option<f64>,
    pub recovery_pct: Option<f64>,
    pub days_since_ath: Option<i64>,
    /// JSON array of signal strings.
    pub signals: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct IndicatorReadingRow {
    pub id: i64,
    pub source: String,
    pub value: f64,
    pub detail: Option<String>,
    pub fetched_at: i64,
    pub latency_us: i64,
}
