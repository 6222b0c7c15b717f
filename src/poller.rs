use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use futures_util::future::join3;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{info, warn};

use crate::api::latency::FetchLatency;
use crate::config::Config;
use crate::error::Result;
use crate::indicators::{fetch_ath_stats, fetch_btc_dominance, fetch_fear_greed};
use crate::state::{IndicatorStore, ReadingValue};
use crate::types::{IndicatorReadingEvent, IndicatorSource, PersistEvent, SourceUpdateMsg};

/// Background task that polls one indicator source on its own interval and
/// routes fresh readings to the store, the engine, and the DB writer.
pub struct IndicatorPoller {
    cfg: Config,
    client: reqwest::Client,
    source: IndicatorSource,
    store: Arc<IndicatorStore>,
    update_tx: mpsc::Sender<SourceUpdateMsg>,
    persist_tx: mpsc::Sender<PersistEvent>,
    latency: Arc<FetchLatency>,
}

impl IndicatorPoller {
    pub fn new(
        cfg: Config,
        client: reqwest::Client,
        source: IndicatorSource,
        store: Arc<IndicatorStore>,
        update_tx: mpsc::Sender<SourceUpdateMsg>,
        persist_tx: mpsc::Sender<PersistEvent>,
        latency: Arc<FetchLatency>,
    ) -> Self {
        Self {
            cfg,
            client,
            source,
            store,
            update_tx,
            persist_tx,
            latency,
        }
    }

    pub async fn run(self) {
        let mut ticker = interval(Duration::from_secs(self.cfg.refresh_secs(self.source)));
        ticker.tick().await; // skip immediate first tick — bootstrap already fetched

        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_once().await {
                warn!(source = %self.source, "indicator fetch failed: {e}");
            }
        }
    }

    async fn poll_once(&self) -> Result<()> {
        let started = Instant::now();
        let value = fetch_reading(&self.client, &self.cfg, self.source).await?;
        let elapsed = started.elapsed();
        self.latency.record(elapsed);

        let fetched_at_ns = now_ns();
        self.store.record(self.source, value, fetched_at_ns);

        self.update_tx
            .send(SourceUpdateMsg {
                source: self.source,
                fetched_at_ns,
            })
            .await
            .map_err(|e| crate::error::AppError::ChannelSend(e.to_string()))?;

        let event = PersistEvent::Reading(reading_event(self.source, value, fetched_at_ns, elapsed));
        if let Err(e) = self.persist_tx.try_send(event) {
            warn!(source = %self.source, "DB writer channel full, dropping reading: {e}");
        }

        Ok(())
    }
}

/// Fetch all three sources concurrently at startup so the first recompute has
/// real data. Individual failures are logged and tolerated — the scorer
/// degrades to neutral defaults for whatever is missing.
pub async fn bootstrap_indicators(
    cfg: &Config,
    client: &reqwest::Client,
    store: &Arc<IndicatorStore>,
) {
    let now_secs = (now_ns() / 1_000_000_000) as i64;
    let (fg, ath, dom) = join3(
        fetch_fear_greed(client, &cfg.fear_greed_api_url),
        fetch_ath_stats(client, &cfg.coingecko_api_url, now_secs),
        fetch_btc_dominance(client, &cfg.coingecko_api_url),
    )
    .await;

    let fetched_at_ns = now_ns();
    let mut hydrated = 0usize;

    match fg {
        Ok(v) => {
            store.record(IndicatorSource::FearGreed, ReadingValue::FearGreed(v), fetched_at_ns);
            hydrated += 1;
        }
        Err(e) => warn!("bootstrap fear/greed fetch failed: {e}"),
    }
    match ath {
        Ok(a) => {
            store.record(IndicatorSource::AthStats, ReadingValue::Ath(a), fetched_at_ns);
            hydrated += 1;
        }
        Err(e) => warn!("bootstrap ATH fetch failed: {e}"),
    }
    match dom {
        Ok(v) => {
            store.record(IndicatorSource::BtcDominance, ReadingValue::Dominance(v), fetched_at_ns);
            hydrated += 1;
        }
        Err(e) => warn!("bootstrap dominance fetch failed: {e}"),
    }

    info!("Bootstrap complete: {hydrated}/3 indicator sources hydrated");
}

async fn fetch_reading(
    client: &reqwest::Client,
    cfg: &Config,
    source: IndicatorSource,
) -> Result<ReadingValue> {
    match source {
        IndicatorSource::FearGreed => {
            let v = fetch_fear_greed(client, &cfg.fear_greed_api_url).await?;
            Ok(ReadingValue::FearGreed(v))
        }
        IndicatorSource::AthStats => {
            let now_secs = (now_ns() / 1_000_000_000) as i64;
            let a = fetch_ath_stats(client, &cfg.coingecko_api_url, now_secs).await?;
            Ok(ReadingValue::Ath(a))
        }
        IndicatorSource::BtcDominance => {
            let v = fetch_btc_dominance(client, &cfg.coingecko_api_url).await?;
            Ok(ReadingValue::Dominance(v))
        }
    }
}

fn reading_event(
    source: IndicatorSource,
    value: ReadingValue,
    fetched_at_ns: u64,
    elapsed: Duration,
) -> IndicatorReadingEvent {
    let detail = match value {
        ReadingValue::Ath(a) => serde_json::to_string(&a).ok(),
        _ => None,
    };
    IndicatorReadingEvent {
        source,
        value: value.primary(),
        detail,
        fetched_at_ns,
        latency_us: elapsed.as_micros().min(u128::from(u64::MAX)) as u64,
    }
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
