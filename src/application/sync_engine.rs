//! Pagination/refresh state machine
//!
//! The engine owns the authoritative [`ListState`] and orchestrates the
//! trigger sources that compete for it. All mutation happens from the
//! continuations of the async operations below; overlapping operations are
//! interleavings on the cooperative scheduler, not parallel threads, so no
//! locking beyond the state lock is needed.
//!
//! Known correctness gap, preserved deliberately: when a refresh and a
//! scroll-load race past each other's busy flags, the last response to
//! settle wins. An append that lands after a wholesale replace is appended
//! onto the post-refresh list and can duplicate items when the two limits
//! disagree. Compatibility with the existing behavior beats tidiness here;
//! do not "fix" this without a contract change.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::constants::paging;
use crate::domain::list_state::{EngineState, ListState};
use crate::domain::product::{Platform, Product};
use crate::infrastructure::api_client::{ApiError, ProductApi};

/// Client-side synchronization engine for the product list view
pub struct SyncEngine {
    api: Arc<dyn ProductApi>,
    state: Arc<RwLock<ListState>>,
}

impl SyncEngine {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(ListState::new())),
        }
    }

    /// Clone of the current list state
    pub async fn snapshot(&self) -> ListState {
        self.state.read().await.clone()
    }

    /// Derived filtered view of the current products
    pub async fn filtered_products(&self) -> Vec<Product> {
        self.state.read().await.filtered_products()
    }

    /// First fetch of the session. Exactly-once: repeat calls are no-ops.
    ///
    /// On success installs the first page wholesale at the default limit;
    /// on failure records the error and leaves the list empty.
    pub async fn initial_load(&self) -> Result<(), ApiError> {
        {
            let mut state = self.state.write().await;
            if state.initialized {
                debug!("initial load already performed, ignoring");
                return Ok(());
            }
            state.initialized = true;
            state.engine_state = EngineState::InitialLoading;
            state.last_error = None;
        }

        info!("🚀 Initial load: page 1, limit {}", paging::DEFAULT_LIMIT);
        match self.api.list_products(1, paging::DEFAULT_LIMIT, None).await {
            Ok(page) => {
                let mut state = self.state.write().await;
                state.products = page.items;
                state.current_page = 1;
                state.current_limit = paging::DEFAULT_LIMIT;
                state.has_more = true;
                state.last_updated = Some(chrono::Utc::now());
                state.engine_state = EngineState::Idle;
                info!("Initial load complete: {} products", state.products.len());
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.engine_state = EngineState::Idle;
                warn!("Initial load failed: {e}");
                Err(e)
            }
        }
    }

    /// Manual or periodic refresh.
    ///
    /// No-op once the limit has reached the refresh ceiling. Otherwise
    /// computes the next grown limit, fires the ingest-both hint (best
    /// effort, result discarded), then re-fetches page 1 at that limit and
    /// replaces the list wholesale. The refresh counter advances only when
    /// the wholesale replace lands; a display-fetch failure surfaces the
    /// error and the next attempt reuses the same target limit.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let refresh_limit = {
            let mut state = self.state.write().await;
            if state.refresh_disabled() {
                info!(
                    "Refresh skipped: limit {} at ceiling {}",
                    state.current_limit,
                    paging::REFRESH_CEILING
                );
                return Ok(());
            }
            state.engine_state = EngineState::RefreshInFlight;
            state.last_error = None;
            paging::DEFAULT_LIMIT + (state.refresh_count + 1) * paging::GROWTH_STEP
        };

        info!("🔄 Refresh: target limit {refresh_limit}");

        // Side-effect hint only; the listing below is what we display
        if let Err(e) = self
            .api
            .trigger_ingest_both(refresh_limit, refresh_limit)
            .await
        {
            warn!("Ingest hint failed (ignored): {e}");
        }

        match self.api.list_products(1, refresh_limit, None).await {
            Ok(page) => {
                let mut state = self.state.write().await;
                state.refresh_count += 1;
                state.products = page.items;
                state.current_page = 1;
                state.current_limit = refresh_limit;
                state.has_more = true;
                state.last_updated = Some(chrono::Utc::now());
                state.engine_state = EngineState::Idle;
                info!(
                    "Refresh complete: {} products at limit {refresh_limit}",
                    state.products.len()
                );
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.engine_state = EngineState::Idle;
                warn!("Refresh display fetch failed: {e}");
                Err(e)
            }
        }
    }

    /// Scroll-triggered pagination growth.
    ///
    /// Guarded: a no-op while another load-more is in flight or when the end
    /// of data has been reached. On success appends the fetched page; on
    /// failure the list is untouched and the state returns to idle so a later
    /// trigger can retry.
    pub async fn load_more(&self) -> Result<(), ApiError> {
        let (next_page, next_limit) = {
            let mut state = self.state.write().await;
            if state.loading_more() {
                debug!("load_more ignored: already loading");
                return Ok(());
            }
            if !state.has_more {
                debug!("load_more ignored: no more data");
                return Ok(());
            }
            state.scroll_count += 1;
            state.engine_state = EngineState::LoadingMore;
            state.last_error = None;
            (state.current_page + 1, state.current_limit + paging::GROWTH_STEP)
        };

        info!("📜 Load more: page {next_page}, limit {next_limit}");
        match self.api.list_products(next_page, next_limit, None).await {
            Ok(page) => {
                let mut state = self.state.write().await;
                let fetched = page.items.len() as u32;
                state.products.extend(page.items);
                // A short page means the server ran out of data
                state.has_more = fetched == next_limit;
                state.current_page = next_page;
                state.current_limit = next_limit;
                state.last_updated = Some(chrono::Utc::now());
                state.engine_state = EngineState::Idle;
                info!(
                    "Appended {fetched} products (total {}, has_more {})",
                    state.products.len(),
                    state.has_more
                );
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.engine_state = EngineState::Idle;
                warn!("Load more failed: {e}");
                Err(e)
            }
        }
    }

    /// Search filter change.
    ///
    /// Any change resets pagination (counters, page, limit, list) and
    /// re-fetches the default first page wholesale; the filter itself is
    /// applied client-side on the reset set via [`ListState::filtered_products`].
    pub async fn set_search_query(&self, query: impl Into<String>) -> Result<(), ApiError> {
        let query = query.into();
        {
            let mut state = self.state.write().await;
            if state.search_query == query {
                return Ok(());
            }
            debug!("Search query changed to {query:?}, resetting pagination");
            state.search_query = query;
            state.reset_pagination();
            state.engine_state = EngineState::Loading;
            state.last_error = None;
        }
        self.fetch_default_page().await
    }

    /// Explicit user-initiated pagination reset: counters and cursor back to
    /// defaults, list cleared, then the default first page is re-fetched.
    pub async fn reset_pagination(&self) -> Result<(), ApiError> {
        {
            let mut state = self.state.write().await;
            state.reset_pagination();
            state.engine_state = EngineState::Loading;
            state.last_error = None;
        }
        self.fetch_default_page().await
    }

    /// Explicit combined-platform fetch: triggers ingest on both platforms
    /// and installs the combined items wholesale at the default cursor.
    pub async fn fetch_both_platforms(
        &self,
        amazon_limit: u32,
        jumia_limit: u32,
    ) -> Result<(), ApiError> {
        {
            let mut state = self.state.write().await;
            state.engine_state = EngineState::RefreshInFlight;
            state.last_error = None;
        }

        info!("🔄 Fetch both platforms: amazon {amazon_limit}, jumia {jumia_limit}");
        match self.api.trigger_ingest_both(amazon_limit, jumia_limit).await {
            Ok(outcome) => {
                let mut state = self.state.write().await;
                let mut combined = outcome.amazon_items;
                combined.extend(outcome.jumia_items);
                info!(
                    "Combined {} amazon + {} jumia products",
                    outcome.amazon_count, outcome.jumia_count
                );
                state.products = combined;
                state.current_page = 1;
                state.current_limit = paging::DEFAULT_LIMIT;
                state.has_more = true;
                state.last_updated = Some(chrono::Utc::now());
                state.engine_state = EngineState::Idle;
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.engine_state = EngineState::Idle;
                warn!("Fetch both platforms failed: {e}");
                Err(e)
            }
        }
    }

    /// Single-platform ingest action: ask the remote service to scrape fresh
    /// items for one platform, then re-read the default first page so they
    /// show up. Unlike the refresh hint, a failed ingest here is surfaced.
    pub async fn ingest_platform(&self, platform: Platform, limit: u32) -> Result<(), ApiError> {
        {
            let mut state = self.state.write().await;
            state.engine_state = EngineState::Loading;
            state.last_error = None;
        }

        info!("🔄 Ingest for {platform}: limit {limit}");
        if let Err(e) = self.api.trigger_ingest(platform, limit).await {
            let mut state = self.state.write().await;
            state.last_error = Some(e.to_string());
            state.engine_state = EngineState::Idle;
            warn!("{platform} ingest failed: {e}");
            return Err(e);
        }

        self.fetch_default_page().await
    }

    /// Wholesale fetch of page 1 at the default limit, computing `has_more`
    /// from the returned count. Shared by search resets and explicit resets.
    async fn fetch_default_page(&self) -> Result<(), ApiError> {
        match self.api.list_products(1, paging::DEFAULT_LIMIT, None).await {
            Ok(page) => {
                let mut state = self.state.write().await;
                let fetched = page.items.len() as u32;
                state.products = page.items;
                state.has_more = fetched == paging::DEFAULT_LIMIT;
                state.current_page = 1;
                state.current_limit = paging::DEFAULT_LIMIT;
                state.last_updated = Some(chrono::Utc::now());
                state.engine_state = EngineState::Idle;
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.engine_state = EngineState::Idle;
                warn!("Default page fetch failed: {e}");
                Err(e)
            }
        }
    }
}
