//! Visibility trigger adapter
//!
//! Bridges the rendering layer's "last element became visible" signal into a
//! guarded load-more call. The adapter is armed for one element identity at a
//! time: a signal fires at most one pagination step, and the watch must be
//! re-armed when the last-rendered item changes across list growth.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::sync_engine::SyncEngine;
use crate::infrastructure::api_client::ApiError;

pub struct VisibilityTrigger {
    engine: Arc<SyncEngine>,
    armed: Mutex<Option<u64>>,
}

impl VisibilityTrigger {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            armed: Mutex::new(None),
        }
    }

    /// Arm the adapter for the current last-rendered element. Call again
    /// whenever the element identity changes.
    pub async fn watch(&self, element_id: u64) {
        let mut armed = self.armed.lock().await;
        if *armed != Some(element_id) {
            debug!("Visibility watch re-armed for element {element_id}");
            *armed = Some(element_id);
        }
    }

    /// Handle a visibility signal for an element. Fires at most one
    /// load-more per armed element; ignored while the engine is busy or the
    /// end of data has been reached.
    pub async fn on_visible(&self, element_id: u64) -> Result<(), ApiError> {
        let snapshot = self.engine.snapshot().await;
        if snapshot.loading() || snapshot.loading_more() {
            debug!("Visibility signal ignored: engine busy");
            return Ok(());
        }
        if !snapshot.has_more {
            debug!("Visibility signal ignored: no more data");
            return Ok(());
        }

        {
            let mut armed = self.armed.lock().await;
            match *armed {
                Some(id) if id == element_id => {
                    // Disarm before the await so a duplicate signal for the
                    // same element cannot fire twice
                    *armed = None;
                }
                _ => {
                    debug!("Visibility signal ignored: element {element_id} not armed");
                    return Ok(());
                }
            }
        }

        self.engine.load_more().await
    }
}
