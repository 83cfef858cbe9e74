//! Feed probe: exercises the sync engine against a live product API
//!
//! Runs the full trigger set once - initial load, a couple of scroll-driven
//! growth steps, a manual refresh, a detail lookup through the dedup cache -
//! and briefly lets the auto-refresh timer tick, logging state snapshots
//! along the way. Point it at a backend with SHELFWATCH_BASE_URL.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use shelfwatch::infrastructure::config::AppConfig;
use shelfwatch::{ApiClient, DedupCache, ProductApi, RefreshTimer, SyncEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelfwatch::infrastructure::logging::init_logging()?;

    let config = AppConfig::load()?;
    info!("🚀 Feed probe starting against {}", config.base_url);

    let api: Arc<dyn ProductApi> = Arc::new(ApiClient::new(&config)?);
    let engine = Arc::new(SyncEngine::new(Arc::clone(&api)));

    engine.initial_load().await?;
    log_snapshot(&engine, "after initial load").await;

    for _ in 0..2 {
        engine.load_more().await?;
    }
    log_snapshot(&engine, "after two scroll steps").await;

    engine.refresh().await?;
    log_snapshot(&engine, "after manual refresh").await;

    if let Some(first) = engine.snapshot().await.products.first() {
        let cache = DedupCache::new(Arc::clone(&api));
        let product = cache.get(first.id).await?;
        info!("Detail lookup: {} ({})", product.title, product.platform);
    }

    let timer = RefreshTimer::start(
        Arc::clone(&engine),
        Duration::from_secs(config.refresh_interval_secs),
    );
    info!(
        "Letting the auto-refresh timer run for one period ({}s)...",
        config.refresh_interval_secs
    );
    tokio::time::sleep(Duration::from_secs(config.refresh_interval_secs + 2)).await;
    timer.stop();
    log_snapshot(&engine, "after one timer period").await;

    info!("Feed probe finished");
    Ok(())
}

async fn log_snapshot(engine: &SyncEngine, label: &str) {
    let state = engine.snapshot().await;
    info!(
        "[{label}] {} products, page {}, limit {}, has_more {}, refresh_count {}",
        state.products.len(),
        state.current_page,
        state.current_limit,
        state.has_more,
        state.refresh_count
    );
}
