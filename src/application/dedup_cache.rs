//! Per-item lookup deduplication
//!
//! At most one network lookup per product id is in flight at any moment;
//! every concurrent requester joins the same shared future and observes the
//! identical result or failure. A settled entry lingers for a short grace
//! period so a rapid re-request (a detail view remounting, say) joins the
//! settled lookup instead of refetching.
//!
//! The cache does not gate late results against consumer teardown; a caller
//! whose view has gone away must discard the result itself.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::constants::cadence;
use crate::domain::product::Product;
use crate::infrastructure::api_client::{ApiError, ProductApi};

type SharedLookup = Shared<BoxFuture<'static, Result<Product, ApiError>>>;

/// Explicit dedup service owned by the data-fetching component
pub struct DedupCache {
    api: Arc<dyn ProductApi>,
    inflight: Arc<Mutex<HashMap<u64, SharedLookup>>>,
    grace: Duration,
}

impl DedupCache {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        Self::with_grace(api, Duration::from_millis(cadence::DEDUP_GRACE_MS))
    }

    /// Override the post-settlement grace window (tests shorten or pause it)
    pub fn with_grace(api: Arc<dyn ProductApi>, grace: Duration) -> Self {
        Self {
            api,
            inflight: Arc::new(Mutex::new(HashMap::new())),
            grace,
        }
    }

    /// Look up a product, joining an outstanding lookup for the same id if
    /// one exists.
    pub async fn get(&self, id: u64) -> Result<Product, ApiError> {
        let lookup = {
            let mut inflight = self.inflight.lock().await;
            if let Some(existing) = inflight.get(&id) {
                debug!("Joining in-flight lookup for product {id}");
                existing.clone()
            } else {
                debug!("Starting lookup for product {id}");
                let api = Arc::clone(&self.api);
                let lookup: SharedLookup =
                    async move { api.get_product(id).await }.boxed().shared();
                inflight.insert(id, lookup.clone());

                // Evict a fixed grace period after settlement, success or
                // failure alike. The watcher also drives the lookup to
                // completion if every caller loses interest.
                let registry = Arc::clone(&self.inflight);
                let settled = lookup.clone();
                let grace = self.grace;
                tokio::spawn(async move {
                    let _ = settled.await;
                    tokio::time::sleep(grace).await;
                    registry.lock().await.remove(&id);
                    debug!("Evicted settled lookup for product {id}");
                });

                lookup
            }
        };

        lookup.await
    }

    /// Drop the outstanding entry for one id, forcing the next `get` to
    /// refetch.
    ///
    /// Invalidating while the lookup is still in flight releases the
    /// one-call-per-id guarantee for that id: callers already joined keep
    /// their shared lookup, and the next `get` starts a second concurrent
    /// network call.
    pub async fn invalidate(&self, id: u64) {
        self.inflight.lock().await.remove(&id);
    }
}
