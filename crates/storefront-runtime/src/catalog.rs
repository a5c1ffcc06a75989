//! # Catalog Sources
//!
//! Where the product fetcher gets its records from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Request                                  │
//! │                                                                         │
//! │   GET <catalog url>                                                     │
//! │        │                                                                │
//! │        ├── send fails ─────────────► FetchError::Transport              │
//! │        ├── status not 2xx ─────────► FetchError::Status(code)           │
//! │        ├── body not a JSON array ──► FetchError::Decode                 │
//! │        ├── record fails check() ───► FetchError::InvalidRecord          │
//! │        └── ok ─────────────────────► Vec<T>                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries happen here. A retry is a new fetch.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use storefront_core::{CatalogProduct, Product};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::error::FetchError;

// =============================================================================
// Traits
// =============================================================================

/// A source of catalog records.
#[async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    /// Record type the source yields.
    type Item: Clone + Send + Sync + 'static;

    /// Loads the full product list.
    async fn fetch_products(&self) -> Result<Vec<Self::Item>, FetchError>;
}

/// A record that can check its own fields after decoding.
pub trait CatalogRecord: DeserializeOwned + Clone + Send + Sync + 'static {
    fn check(&self) -> Result<(), FetchError>;
}

impl CatalogRecord for Product {
    fn check(&self) -> Result<(), FetchError> {
        self.validate()
            .map_err(|e| FetchError::InvalidRecord(e.to_string()))
    }
}

impl CatalogRecord for CatalogProduct {
    fn check(&self) -> Result<(), FetchError> {
        if self.price.is_sign_negative() {
            return Err(FetchError::InvalidRecord(format!(
                "product {} has a negative price",
                self.id
            )));
        }
        Ok(())
    }
}

// =============================================================================
// HTTP Catalog
// =============================================================================

/// Catalog served as a JSON array over HTTP.
pub struct HttpCatalog<T> {
    client: reqwest::Client,
    url: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: CatalogRecord> HttpCatalog<T> {
    /// Creates a client for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(HttpCatalog {
            client,
            url: url.into(),
            _record: PhantomData,
        })
    }

    /// Creates a client from the `[catalog]` config section.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        Self::new(config.url.clone(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<T> std::fmt::Debug for HttpCatalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalog").field("url", &self.url).finish()
    }
}

#[async_trait]
impl<T: CatalogRecord> CatalogSource for HttpCatalog<T> {
    type Item = T;

    async fn fetch_products(&self) -> Result<Vec<T>, FetchError> {
        debug!(url = %self.url, "Requesting catalog");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let records: Vec<T> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        for record in &records {
            record.check()?;
        }

        debug!(url = %self.url, count = records.len(), "Catalog received");
        Ok(records)
    }
}

// =============================================================================
// Static Catalog
// =============================================================================

/// A catalog that always answers with the same records (or error).
#[derive(Debug, Clone)]
pub struct StaticCatalog<T> {
    response: Result<Vec<T>, FetchError>,
}

impl<T> StaticCatalog<T> {
    pub fn new(records: Vec<T>) -> Self {
        StaticCatalog {
            response: Ok(records),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        StaticCatalog {
            response: Err(error),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> CatalogSource for StaticCatalog<T> {
    type Item = T;

    async fn fetch_products(&self) -> Result<Vec<T>, FetchError> {
        self.response.clone()
    }
}
