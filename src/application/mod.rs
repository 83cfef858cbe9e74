//! Application layer: the synchronization engine and its collaborators

pub mod dedup_cache;
pub mod refresh_timer;
pub mod sync_engine;
pub mod visibility;

pub use dedup_cache::DedupCache;
pub use refresh_timer::RefreshTimer;
pub use sync_engine::SyncEngine;
pub use visibility::VisibilityTrigger;
