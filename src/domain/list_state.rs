//! In-memory list-view model owned by the synchronization engine
//!
//! `ListState` is the single source of truth for the product list: the
//! products in server order, the pagination cursor, the busy state, the
//! search query, and the growth counters. The filtered view is always derived
//! on demand from (products, query) and never stored, so the two can not
//! diverge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::constants::paging;
use crate::domain::product::Product;

/// What the engine is currently doing with the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    /// First fetch of the session
    InitialLoading,
    /// Full reload (search reset)
    Loading,
    /// Appending a further page
    LoadingMore,
    /// Refresh cycle (ingest hint + wholesale re-fetch)
    RefreshInFlight,
}

/// Authoritative list-view state
///
/// Mutated exclusively from the engine's continuation code; consumers get
/// clones via [`crate::SyncEngine::snapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListState {
    /// Products in server order; append-only within a growth cycle,
    /// replaced wholesale on reset or refresh
    pub products: Vec<Product>,
    pub current_page: u32,
    pub current_limit: u32,
    pub has_more: bool,
    /// Empty string means no filter
    pub search_query: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub engine_state: EngineState,
    /// Pagination growth steps since the last reset
    pub scroll_count: u32,
    /// Manual/periodic refresh growth steps since the last reset
    pub refresh_count: u32,
    /// Set once the exactly-once initial load has been issued
    pub initialized: bool,
}

impl ListState {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            current_page: 1,
            current_limit: paging::DEFAULT_LIMIT,
            has_more: true,
            search_query: String::new(),
            last_updated: None,
            last_error: None,
            engine_state: EngineState::Idle,
            scroll_count: 0,
            refresh_count: 0,
            initialized: false,
        }
    }

    /// True while an initial load or full reload is in flight
    pub fn loading(&self) -> bool {
        matches!(
            self.engine_state,
            EngineState::InitialLoading | EngineState::Loading
        )
    }

    pub fn loading_more(&self) -> bool {
        self.engine_state == EngineState::LoadingMore
    }

    pub fn fetching_both(&self) -> bool {
        self.engine_state == EngineState::RefreshInFlight
    }

    /// Refresh is disabled for the rest of the session once the limit hits
    /// the ceiling, until an explicit reset
    pub fn refresh_disabled(&self) -> bool {
        self.current_limit >= paging::REFRESH_CEILING
    }

    /// Drop pagination progress back to the defaults and clear the list.
    /// Does not touch `initialized` or the search query.
    pub fn reset_pagination(&mut self) {
        self.current_page = 1;
        self.current_limit = paging::DEFAULT_LIMIT;
        self.has_more = true;
        self.products.clear();
        self.scroll_count = 0;
        self.refresh_count = 0;
    }

    /// Derived filtered view of the current products
    pub fn filtered_products(&self) -> Vec<Product> {
        filter_products(&self.products, &self.search_query)
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive substring filter over title, stringified price and
/// stringified id. Pure function of its inputs; an empty query passes
/// everything through.
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    if query.is_empty() {
        return products.to_vec();
    }
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.price.to_string().to_lowercase().contains(&needle)
                || p.id.to_string().contains(&needle)
        })
        .cloned()
        .collect()
}
