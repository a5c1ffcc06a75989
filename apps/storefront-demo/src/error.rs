//! # Demo Error Type
//!
//! Everything that ends the demo with a non-zero exit code.

use storefront_runtime::StorefrontError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] StorefrontError),

    /// The catalog fetch ended in the error state.
    #[error("{0}")]
    Fetch(String),

    /// The fetcher stopped publishing state before finishing.
    #[error("Product fetcher stopped before completing")]
    FetcherGone,

    /// No storage path configured and no platform data directory.
    #[error("No storage location available; set STOREFRONT_STORAGE_PATH")]
    NoStoragePath,

    /// Async runtime could not be started.
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type DemoResult<T> = Result<T, DemoError>;
