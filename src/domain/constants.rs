//! Engine policy constants
//!
//! Fixed growth and cadence values the synchronization engine applies across
//! all trigger sources. These are product decisions, not tunables: the growth
//! step is shared by scroll and refresh on purpose, and the refresh ceiling
//! exists so a long-lived session stops hammering the ingest endpoints.

/// Pagination and growth policy
pub mod paging {
    /// Page size used for the initial load and after every reset
    pub const DEFAULT_LIMIT: u32 = 15;

    /// Fixed increment applied to the limit per scroll or refresh cycle
    pub const GROWTH_STEP: u32 = 5;

    /// Once the limit reaches this value, manual and periodic refresh are
    /// disabled until an explicit reset
    pub const REFRESH_CEILING: u32 = 100;
}

/// Timing policy
pub mod cadence {
    /// Interval between periodic auto-refresh ticks
    pub const REFRESH_INTERVAL_SECS: u64 = 30;

    /// How long a settled per-item lookup stays joinable in the dedup cache,
    /// absorbing rapid re-requests from view remounts
    pub const DEDUP_GRACE_MS: u64 = 1000;
}
