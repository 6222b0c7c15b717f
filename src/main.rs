mod api;
mod config;
mod db;
mod engine;
mod error;
mod indicators;
mod poller;
mod season;
mod state;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::FetchLatency;
use crate::api::routes::{router, ApiState};
use crate::config::{Config, CHANNEL_CAPACITY, HTTP_TIMEOUT_SECS};
use crate::db::writer::DbWriter;
use crate::engine::SeasonEngine;
use crate::error::Result;
use crate::poller::{bootstrap_indicators, IndicatorPoller};
use crate::state::IndicatorStore;
use crate::types::{IndicatorSource, PersistEvent, SourceUpdateMsg};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", cfg.db_path)).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready at {}", cfg.db_path);

    // --- Shared state ---
    let store = IndicatorStore::new();
    let health = Arc::new(HealthState::new());
    let latency = Arc::new(FetchLatency::new());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?;

    // --- REST bootstrap: hydrate all indicator sources before first compute ---
    bootstrap_indicators(&cfg, &client, &store).await;

    // --- Channels ---
    let (update_tx, update_rx) = mpsc::channel::<SourceUpdateMsg>(CHANNEL_CAPACITY);
    let (persist_tx, persist_rx) = mpsc::channel::<PersistEvent>(CHANNEL_CAPACITY);

    // --- Spawn tasks ---

    // Season engine: recomputes on source updates + hourly clock tick.
    // Its interval fires immediately, so the first readout lands right away.
    let engine = SeasonEngine::new(
        Arc::clone(&store),
        update_rx,
        persist_tx.clone(),
        Arc::clone(&health),
    );
    tokio::spawn(async move { engine.run().await });

    // One poller per indicator source, each on its own interval.
    for source in IndicatorSource::ALL {
        let poller = IndicatorPoller::new(
            cfg.clone(),
            client.clone(),
            source,
            Arc::clone(&store),
            update_tx.clone(),
            persist_tx.clone(),
            Arc::clone(&latency),
        );
        tokio::spawn(async move { poller.run().await });
        info!(source = %source, interval_secs = cfg.refresh_secs(source), "poller started");
    }

    // DB writer: persists season snapshots and raw readings.
    let writer = DbWriter::new(pool.clone(), persist_rx, Arc::clone(&health));
    tokio::spawn(async move { writer.run().await });

    // --- HTTP API server ---
    let api_state = ApiState {
        store,
        pool,
        health,
        latency,
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
