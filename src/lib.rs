//! Shelfwatch - client-side synchronization engine for scraped product feeds
//!
//! This crate owns the authoritative in-memory product list for a list view
//! backed by a remote scraping service, and reconciles the trigger sources
//! that compete for it (initial load, manual refresh, scroll pagination,
//! search resets, timed auto-refresh) into a single consistent view. It also
//! deduplicates concurrent per-item detail lookups.

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;

// Re-export commonly used items
pub use application::dedup_cache::DedupCache;
pub use application::refresh_timer::RefreshTimer;
pub use application::sync_engine::SyncEngine;
pub use application::visibility::VisibilityTrigger;
pub use domain::list_state::{EngineState, ListState};
pub use domain::product::{Platform, Product};
pub use infrastructure::api_client::{ApiClient, ApiError, ProductApi};

#[cfg(test)]
pub mod test_utils;
