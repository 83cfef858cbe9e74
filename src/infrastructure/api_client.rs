//! Typed HTTP gateway to the remote product API
//!
//! Thin, stateless wrapper: every operation is a single round trip with no
//! retry and no caching. Responses follow one tagged contract - a body that
//! parses but is not marked `success: true` is a hard failure, never probed
//! for alternative shapes.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::domain::product::{Platform, Product};
use crate::infrastructure::config::AppConfig;

/// Failure taxonomy for gateway calls
///
/// Clone-able on purpose: the dedup cache broadcasts one settled result to
/// every concurrent requester, errors included.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-2xx HTTP status
    #[error("HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// Connection, timeout, or other transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Body parsed but lacks the expected tagged shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Pagination metadata returned alongside every product listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    #[serde(default)]
    pub platform_filter: Option<String>,
}

/// One page of the unified product listing
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub meta: PageMeta,
}

/// Result of a single-platform ingest trigger
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub count: u32,
    pub items: Vec<Product>,
}

/// Result of the combined Amazon + Jumia ingest trigger
#[derive(Debug, Clone)]
pub struct CombinedIngestOutcome {
    pub amazon_count: u32,
    pub amazon_items: Vec<Product>,
    pub jumia_count: u32,
    pub jumia_items: Vec<Product>,
    pub total_count: u32,
}

/// Gateway seam consumed by the sync engine and the dedup cache
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Read one page of the current store
    async fn list_products(
        &self,
        page: u32,
        limit: u32,
        platform: Option<Platform>,
    ) -> Result<ProductPage, ApiError>;

    /// Read a single product by id
    async fn get_product(&self, id: u64) -> Result<Product, ApiError>;

    /// Ask the remote service to scrape fresh items for one platform
    async fn trigger_ingest(&self, platform: Platform, limit: u32) -> Result<IngestOutcome, ApiError>;

    /// Ask the remote service to scrape fresh items for both platforms
    async fn trigger_ingest_both(
        &self,
        amazon_limit: u32,
        jumia_limit: u32,
    ) -> Result<CombinedIngestOutcome, ApiError>;
}

// Wire envelopes. Kept private: callers only ever see the outcome types.

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    data: Vec<Product>,
    meta: PageMeta,
}

#[derive(Debug, Deserialize)]
struct SingleEnvelope {
    success: bool,
    data: Product,
}

#[derive(Debug, Deserialize)]
struct IngestEnvelope {
    success: bool,
    #[allow(dead_code)]
    message: String,
    count: u32,
    data: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct PlatformSlice {
    count: u32,
    data: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct BothEnvelope {
    success: bool,
    #[allow(dead_code)]
    message: String,
    amazon: PlatformSlice,
    jumia: PlatformSlice,
    total_count: u32,
}

/// reqwest-backed implementation of [`ProductApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Malformed(format!("invalid base URL {}: {e}", config.base_url)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Malformed(format!("invalid endpoint path {path}: {e}")))?;
        // query_pairs_mut leaves a dangling `?` even when nothing is appended
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint_url(path, query)?;

        debug!("🌐 GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ProductApi for ApiClient {
    async fn list_products(
        &self,
        page: u32,
        limit: u32,
        platform: Option<Platform>,
    ) -> Result<ProductPage, ApiError> {
        let mut query = vec![("page", page.to_string()), ("per_page", limit.to_string())];
        if let Some(platform) = platform {
            query.push(("platform", platform.as_str().to_string()));
        }

        let envelope: ListEnvelope = self.get_json("/api/products", &query).await?;
        if !envelope.success {
            return Err(ApiError::Malformed("listing not marked successful".to_string()));
        }
        Ok(ProductPage {
            items: envelope.data,
            meta: envelope.meta,
        })
    }

    async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        let envelope: SingleEnvelope = self.get_json(&format!("/api/products/{id}"), &[]).await?;
        if !envelope.success {
            return Err(ApiError::Malformed(format!(
                "product {id} lookup not marked successful"
            )));
        }
        Ok(envelope.data)
    }

    async fn trigger_ingest(&self, platform: Platform, limit: u32) -> Result<IngestOutcome, ApiError> {
        let path = match platform {
            Platform::Amazon => "/api/products/fetch-apify",
            Platform::Jumia => "/api/products/fetch-jumia-apify",
        };
        let envelope: IngestEnvelope = self.get_json(path, &[("limit", limit.to_string())]).await?;
        if !envelope.success {
            return Err(ApiError::Malformed(format!(
                "{platform} ingest not marked successful"
            )));
        }
        Ok(IngestOutcome {
            count: envelope.count,
            items: envelope.data,
        })
    }

    async fn trigger_ingest_both(
        &self,
        amazon_limit: u32,
        jumia_limit: u32,
    ) -> Result<CombinedIngestOutcome, ApiError> {
        let query = [
            ("amazon_limit", amazon_limit.to_string()),
            ("jumia_limit", jumia_limit.to_string()),
        ];
        let envelope: BothEnvelope = self
            .get_json("/api/products/fetch-both-apis", &query)
            .await?;
        if !envelope.success {
            return Err(ApiError::Malformed(
                "combined ingest not marked successful".to_string(),
            ));
        }
        Ok(CombinedIngestOutcome {
            amazon_count: envelope.amazon.count,
            amazon_items: envelope.amazon.data,
            jumia_count: envelope.jumia.count,
            jumia_items: envelope.jumia.data,
            total_count: envelope.total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_from_defaults() {
        let config = AppConfig::default();
        assert!(ApiClient::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = AppConfig {
            base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(ApiClient::new(&config), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_empty_query_leaves_url_bare() {
        let client = ApiClient::new(&AppConfig::default()).unwrap();
        let url = client.endpoint_url("/api/products/42", &[]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/products/42");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_query_pairs_are_appended_in_order() {
        let client = ApiClient::new(&AppConfig::default()).unwrap();
        let url = client
            .endpoint_url(
                "/api/products",
                &[("page", "2".to_string()), ("per_page", "20".to_string())],
            )
            .unwrap();
        assert_eq!(url.query(), Some("page=2&per_page=20"));
    }

    #[test]
    fn test_list_envelope_parses() {
        let json = r#"{
            "success": true,
            "data": [{
                "id": 1,
                "title": "Kettle",
                "price": 25.0,
                "image_url": "https://img.example.com/1.jpg",
                "platform": "jumia",
                "created_at": "2026-08-01T00:00:00Z",
                "updated_at": "2026-08-01T00:00:00Z"
            }],
            "meta": {"current_page": 1, "last_page": 3, "per_page": 15, "total": 41}
        }"#;
        let envelope: ListEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.meta.last_page, 3);
        assert!(envelope.meta.platform_filter.is_none());
    }

    #[test]
    fn test_both_envelope_parses() {
        let json = r#"{
            "success": true,
            "message": "fetched",
            "amazon": {"count": 1, "data": [{
                "id": 1, "title": "A", "price": 1.0,
                "image_url": "u", "platform": "amazon",
                "created_at": "c", "updated_at": "u"
            }]},
            "jumia": {"count": 0, "data": []},
            "total_count": 1
        }"#;
        let envelope: BothEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.amazon.count, 1);
        assert_eq!(envelope.jumia.data.len(), 0);
        assert_eq!(envelope.total_count, 1);
    }

    #[test]
    fn test_envelope_missing_fields_is_malformed() {
        // `meta` absent: must fail to parse, never be guessed around
        let json = r#"{"success": true, "data": []}"#;
        let result: Result<ListEnvelope, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_display_includes_status() {
        let err = ApiError::Transport {
            status: 503,
            body: "unavailable".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("503"));
        assert!(text.contains("unavailable"));
    }
}
