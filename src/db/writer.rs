use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::error;

use crate::api::health::HealthState;
use crate::error::Result;
use crate::types::{IndicatorReadingEvent, PersistEvent, SeasonSnapshotEvent};

/// Receives persistence events from the engine and pollers and writes them
/// to SQLite. Runs as a dedicated background task — never blocks recompute
/// or polling paths.
pub struct DbWriter {
    pool: sqlx::SqlitePool,
    persist_rx: mpsc::Receiver<PersistEvent>,
    health: Arc<HealthState>,
}

impl DbWriter {
    pub fn new(
        pool: sqlx::SqlitePool,
        persist_rx: mpsc::Receiver<PersistEvent>,
        health: Arc<HealthState>,
    ) -> Self {
        Self {
            pool,
            persist_rx,
            health,
        }
    }

    pub async fn run(mut self) {
        while let Some(event) = self.persist_rx.recv().await {
            let result = match &event {
                PersistEvent::Season(snapshot) => {
                    let r = self.write_snapshot(snapshot).await;
                    self.health.dec_write_queue_pending();
                    r
                }
                PersistEvent::Reading(reading) => self.write_reading(reading).await,
            };
            if let Err(e) = result {
                error!("DB write error: {e}");
            }
        }
    }

    async fn write_snapshot(&self, s: &SeasonSnapshotEvent) -> Result<()> {
        let season = s.info.season.to_string();
        let cycle_position = s.info.signals.first().cloned().unwrap_or_default();
        let signals = serde_json::to_string(&s.info.signals)?;
        let computed_at = s.computed_at_ns as i64;
        let (drawdown_pct, recovery_pct, days_since_ath) = match s.inputs.ath {
            Some(a) => (Some(a.drawdown_pct), Some(a.recovery_pct), Some(a.days_since_ath)),
            None => (None, None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO season_snapshots (
                computed_at, season, progress, confidence,
                days_since_halving, cycle_position,
                fear_greed, btc_dominance, drawdown_pct, recovery_pct, days_since_ath,
                signals
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(computed_at)
        .bind(season)
        .bind(s.info.progress)
        .bind(s.info.confidence)
        .bind(s.days_since_halving)
        .bind(cycle_position)
        .bind(s.inputs.fear_greed)
        .bind(s.inputs.btc_dominance)
        .bind(drawdown_pct)
        .bind(recovery_pct)
        .bind(days_since_ath)
        .bind(signals)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn write_reading(&self, r: &IndicatorReadingEvent) -> Result<()> {
        let source = r.source.to_string();
        let fetched_at = r.fetched_at_ns as i64;
        let latency_us = r.latency_us as i64;

        sqlx::query(
            r#"
            INSERT INTO indicator_readings (source, value, detail, fetched_at, latency_us)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(source)
        .bind(r.value)
        .bind(r.detail.as_deref())
        .bind(fetched_at)
        .bind(latency_us)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
