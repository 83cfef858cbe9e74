//! Shared test doubles for the engine and cache tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::product::{Platform, Product};
use crate::infrastructure::api_client::{
    ApiError, CombinedIngestOutcome, IngestOutcome, PageMeta, ProductApi, ProductPage,
};

pub fn sample_product(id: u64, platform: Platform) -> Product {
    Product {
        id,
        title: format!("Product {id}"),
        price: 10.0 + id as f64,
        image_url: format!("https://img.example.com/{id}.jpg"),
        platform,
        source_url: None,
        created_at: "2026-08-01T00:00:00Z".to_string(),
        updated_at: "2026-08-01T00:00:00Z".to_string(),
    }
}

/// Scripted [`ProductApi`] fake: full pages by default, with knobs for short
/// pages, failures, and artificial latency.
#[derive(Default)]
pub struct FakeApi {
    list_calls: Mutex<Vec<(u32, u32)>>,
    ingest_calls: Mutex<Vec<(Platform, u32)>>,
    ingest_both_calls: Mutex<Vec<(u32, u32)>>,
    detail_calls: Mutex<Vec<u64>>,
    fail_list: AtomicU32,
    fail_ingest: AtomicU32,
    fail_detail: AtomicU32,
    forced_list_count: Mutex<Option<usize>>,
    list_delay_ms: AtomicU64,
    paged_list_delay_ms: AtomicU64,
    detail_delay_ms: AtomicU64,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` listing calls with HTTP 500
    pub fn fail_list_next(&self, n: u32) {
        self.fail_list.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` ingest-both calls
    pub fn fail_ingest_next(&self, n: u32) {
        self.fail_ingest.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` detail lookups
    pub fn fail_detail_next(&self, n: u32) {
        self.fail_detail.store(n, Ordering::SeqCst);
    }

    /// Return exactly `n` items from the next listing call (short page)
    pub fn force_list_count(&self, n: usize) {
        *self.forced_list_count.lock().unwrap() = Some(n);
    }

    /// Delay every listing call
    pub fn set_list_delay_ms(&self, ms: u64) {
        self.list_delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Delay only listing calls for pages beyond the first, so a wholesale
    /// replace can overtake an in-flight append
    pub fn set_paged_list_delay_ms(&self, ms: u64) {
        self.paged_list_delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Delay every detail lookup
    pub fn set_detail_delay_ms(&self, ms: u64) {
        self.detail_delay_ms.store(ms, Ordering::SeqCst);
    }

    pub async fn list_calls(&self) -> Vec<(u32, u32)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub async fn ingest_calls(&self) -> Vec<(Platform, u32)> {
        self.ingest_calls.lock().unwrap().clone()
    }

    pub async fn ingest_both_calls(&self) -> Vec<(u32, u32)> {
        self.ingest_both_calls.lock().unwrap().clone()
    }

    pub async fn detail_calls(&self) -> Vec<u64> {
        self.detail_calls.lock().unwrap().clone()
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ProductApi for FakeApi {
    async fn list_products(
        &self,
        page: u32,
        limit: u32,
        _platform: Option<Platform>,
    ) -> Result<ProductPage, ApiError> {
        self.list_calls.lock().unwrap().push((page, limit));

        let delay = self.list_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let paged_delay = self.paged_list_delay_ms.load(Ordering::SeqCst);
        if page > 1 && paged_delay > 0 {
            tokio::time::sleep(Duration::from_millis(paged_delay)).await;
        }

        if Self::take_failure(&self.fail_list) {
            return Err(ApiError::Transport {
                status: 500,
                body: "scripted listing failure".to_string(),
            });
        }

        let count = self
            .forced_list_count
            .lock()
            .unwrap()
            .take()
            .unwrap_or(limit as usize);
        let items = (0..count)
            .map(|i| sample_product(u64::from(page) * 1000 + i as u64, Platform::Amazon))
            .collect();

        Ok(ProductPage {
            items,
            meta: PageMeta {
                current_page: page,
                last_page: 99,
                per_page: limit,
                total: 10_000,
                platform_filter: None,
            },
        })
    }

    async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        self.detail_calls.lock().unwrap().push(id);

        let delay = self.detail_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if Self::take_failure(&self.fail_detail) {
            return Err(ApiError::Transport {
                status: 404,
                body: format!("scripted miss for {id}"),
            });
        }

        Ok(sample_product(id, Platform::Jumia))
    }

    async fn trigger_ingest(&self, platform: Platform, limit: u32) -> Result<IngestOutcome, ApiError> {
        self.ingest_calls.lock().unwrap().push((platform, limit));

        if Self::take_failure(&self.fail_ingest) {
            return Err(ApiError::Transport {
                status: 502,
                body: "scripted ingest failure".to_string(),
            });
        }

        let items: Vec<Product> = (0..limit)
            .map(|i| sample_product(300_000 + u64::from(i), platform))
            .collect();
        Ok(IngestOutcome {
            count: items.len() as u32,
            items,
        })
    }

    async fn trigger_ingest_both(
        &self,
        amazon_limit: u32,
        jumia_limit: u32,
    ) -> Result<CombinedIngestOutcome, ApiError> {
        self.ingest_both_calls
            .lock()
            .unwrap()
            .push((amazon_limit, jumia_limit));

        if Self::take_failure(&self.fail_ingest) {
            return Err(ApiError::Transport {
                status: 502,
                body: "scripted ingest failure".to_string(),
            });
        }

        let amazon_items: Vec<Product> = (0..amazon_limit)
            .map(|i| sample_product(100_000 + u64::from(i), Platform::Amazon))
            .collect();
        let jumia_items: Vec<Product> = (0..jumia_limit)
            .map(|i| sample_product(200_000 + u64::from(i), Platform::Jumia))
            .collect();

        Ok(CombinedIngestOutcome {
            amazon_count: amazon_items.len() as u32,
            amazon_items: amazon_items.clone(),
            jumia_count: jumia_items.len() as u32,
            jumia_items,
            total_count: amazon_limit + jumia_limit,
        })
    }
}
