//! Catalog client over HTTP.

use async_trait::async_trait;
use cart_core::{CatalogError, CatalogService, Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use url::Url;

use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl FetchError {
    /// Map onto the catalog error taxonomy.
    pub fn into_catalog_error(self, product_id: ProductId) -> CatalogError {
        match self {
            FetchError::Http { status: 404, .. } => CatalogError::NotFound(product_id),
            FetchError::Deserialization(msg) => CatalogError::InvalidResponse(msg),
            other => CatalogError::Unavailable(other.to_string()),
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }
}

/// Stock and product lookups against a REST catalog.
///
/// Expects `GET {base}/stock/{id}` to answer `{"id":…,"amount":…}` and
/// `GET {base}/products/{id}` to answer a product record.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: Url,
    policy: FetchPolicy,
}

impl HttpCatalog {
    /// Create a client with the default policy.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::with_policy(base_url, FetchPolicy::default())
    }

    /// Create a client with an explicit policy.
    pub fn with_policy(base_url: &str, policy: FetchPolicy) -> Result<Self, FetchError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(policy.timeout.connect)
            .timeout(policy.timeout.total)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            policy,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, resource: &str, product_id: ProductId) -> Result<Url, FetchError> {
        self.base_url
            .join(&format!("{}/{}", resource, product_id))
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// Fetch and decode a JSON document, retrying per policy.
    pub async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if self.policy.retry.should_retry(&e, attempt) => {
                    let delay = self.policy.retry.backoff.delay_for_attempt(attempt);
                    tracing::warn!(%url, attempt, error = %e, ?delay, "retrying catalog request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        tracing::debug!(%url, "GET");
        let resp = self.client.get(url.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Deserialization(e.to_string()))
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        let url = self
            .endpoint("stock", product_id)
            .map_err(|e| e.into_catalog_error(product_id))?;
        self.fetch(url)
            .await
            .map_err(|e| e.into_catalog_error(product_id))
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        let url = self
            .endpoint("products", product_id)
            .map_err(|e| e.into_catalog_error(product_id))?;
        self.fetch(url)
            .await
            .map_err(|e| e.into_catalog_error(product_id))
    }
}
