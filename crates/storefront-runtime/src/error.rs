//! # Runtime Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Runtime Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  StorageError   │  │   FetchError    │  │   StorefrontError       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Unavailable    │  │  Status         │  │  InvalidConfig          │ │
//! │  │  Io             │  │  Transport      │  │  ConfigSaveFailed       │ │
//! │  │  Corrupt        │  │  Decode         │  │  Translations           │ │
//! │  │                 │  │  InvalidRecord  │  │  Io / Toml              │ │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────────────────┘ │
//! │           │                    │                                        │
//! │   logged + swallowed    becomes the fetcher's                          │
//! │   (in-memory default)   error message                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stale fetch results are not errors and have no variant here.

use storefront_core::Language;
use thiserror::Error;

/// Result type alias for key/value storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for configuration and setup operations.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

// =============================================================================
// Storage Errors
// =============================================================================

/// Key/value store failures.
///
/// Callers never surface these: a failed read means "not set" and a failed
/// write leaves the in-memory value in effect.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store refuses all access (e.g. private browsing).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Backing file could not be read or written.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file exists but is not a JSON object of strings.
    #[error("Storage file is corrupt: {0}")]
    Corrupt(String),
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Catalog request failures.
///
/// The `Display` text is what ends up in the fetcher's error state, so it
/// is written for people, not for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-2xx response.
    #[error("Failed to load products (HTTP {0})")]
    Status(u16),

    /// Connection, DNS, TLS or timeout failure.
    #[error("Failed to load products: {0}")]
    Transport(String),

    /// Response body was not the expected JSON array.
    #[error("Failed to read products: {0}")]
    Decode(String),

    /// A record failed validation.
    #[error("Catalog returned an invalid product: {0}")]
    InvalidRecord(String),
}

// =============================================================================
// Setup Errors
// =============================================================================

/// Configuration and resource loading errors.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// A translation table could not be loaded.
    #[error("Invalid translations for {language}: {reason}")]
    Translations { language: Language, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialize error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_messages_are_human_readable() {
        assert_eq!(
            FetchError::Status(503).to_string(),
            "Failed to load products (HTTP 503)"
        );
        assert_eq!(
            FetchError::Transport("connection refused".into()).to_string(),
            "Failed to load products: connection refused"
        );
    }

    #[test]
    fn test_translation_error_names_language() {
        let err = StorefrontError::Translations {
            language: Language::Arabic,
            reason: "root must be an object".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid translations for ar: root must be an object"
        );
    }

    #[test]
    fn test_io_converts_to_storage_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
