use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::health::HealthState;
use crate::config::RECOMPUTE_TICK_SECS;
use crate::season;
use crate::state::IndicatorStore;
use crate::types::{MarketSeason, PersistEvent, SeasonSnapshotEvent, SourceUpdateMsg};

/// Background task that recomputes the season readout whenever an indicator
/// source updates, plus on an hourly clock tick so the day counter rolls
/// over even when every source is quiet.
pub struct SeasonEngine {
    store: Arc<IndicatorStore>,
    update_rx: mpsc::Receiver<SourceUpdateMsg>,
    persist_tx: mpsc::Sender<PersistEvent>,
    health: Arc<HealthState>,
    last_season: Option<MarketSeason>,
}

impl SeasonEngine {
    pub fn new(
        store: Arc<IndicatorStore>,
        update_rx: mpsc::Receiver<SourceUpdateMsg>,
        persist_tx: mpsc::Sender<PersistEvent>,
        health: Arc<HealthState>,
    ) -> Self {
        Self {
            store,
            update_rx,
            persist_tx,
            health,
            last_season: None,
        }
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(RECOMPUTE_TICK_SECS));

        loop {
            tokio::select! {
                Some(msg) = self.update_rx.recv() => {
                    debug!(source = %msg.source, "source update received");
                    self.recompute();
                }
                _ = ticker.tick() => {
                    self.recompute();
                }
            }
        }
    }

    fn recompute(&mut self) {
        let now_ns = now_ns();
        let now_secs = (now_ns / 1_000_000_000) as i64;

        let snapshot = self.store.snapshot(now_ns);
        let days = season::halving::days_since_halving(now_secs);
        let info = season::season_info_for_days(days, &snapshot);

        match self.last_season {
            Some(old) if old != info.season => {
                info!(
                    old = %old,
                    new = %info.season,
                    days_since_halving = days,
                    confidence = info.confidence,
                    "season transition: {old} → {}",
                    info.season,
                );
            }
            None => {
                info!(
                    season = %info.season,
                    days_since_halving = days,
                    progress = format_args!("{:.1}", info.progress),
                    confidence = info.confidence,
                    "initial season readout: {} ({:.1}% through phase)",
                    info.season, info.progress,
                );
            }
            _ => {}
        }
        self.last_season = Some(info.season);

        self.store.set_current_season(info.clone());
        self.health.set_last_recompute_at_ns(now_ns);
        self.health.inc_recompute_count();

        let event = PersistEvent::Season(SeasonSnapshotEvent {
            computed_at_ns: now_ns,
            days_since_halving: days,
            info,
            inputs: snapshot,
        });
        if let Err(e) = self.persist_tx.try_send(event) {
            warn!("DB writer channel full, dropping season snapshot: {e}");
        } else {
            self.health.inc_write_queue_pending();
        }
    }
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
