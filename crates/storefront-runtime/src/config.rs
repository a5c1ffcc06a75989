//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_CATALOG_URL=http://localhost:3000/products.json         │
//! │     STOREFRONT_FETCH_DELAY_MS=0                                        │
//! │     STOREFRONT_STORAGE_PATH=/tmp/storefront.json                       │
//! │     STOREFRONT_LANGUAGE=ar                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/demo/storefront.toml (Linux)                             │
//! │     ~/Library/Application Support/com.storefront.demo/storefront.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [catalog]
//! url = "https://fakestoreapi.com/products"
//! delay_ms = 2000
//! timeout_secs = 10
//!
//! [storage]
//! path = "/home/me/.local/share/demo/storage.json"
//! theme_key = "theme"
//! language_key = "i18nextLng"
//!
//! [locale]
//! default_language = "ar"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use storefront_core::Language;
use tracing::{debug, info, warn};

use crate::error::{StorefrontError, StorefrontResult};
use crate::storage::{FileStore, LANGUAGE_STORAGE_KEY, THEME_STORAGE_KEY};

pub const ENV_CATALOG_URL: &str = "STOREFRONT_CATALOG_URL";
pub const ENV_FETCH_DELAY_MS: &str = "STOREFRONT_FETCH_DELAY_MS";
pub const ENV_STORAGE_PATH: &str = "STOREFRONT_STORAGE_PATH";
pub const ENV_LANGUAGE: &str = "STOREFRONT_LANGUAGE";

// =============================================================================
// Catalog Settings
// =============================================================================

/// Where and how the product catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Endpoint returning a JSON array of products.
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Artificial delay before each request (milliseconds).
    /// Only there to make loading states visible.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "https://fakestoreapi.com/products".to_string()
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            url: default_catalog_url(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Key/value storage location and key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file. Unset means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_theme_key")]
    pub theme_key: String,

    #[serde(default = "default_language_key")]
    pub language_key: String,
}

fn default_theme_key() -> String {
    THEME_STORAGE_KEY.to_string()
}

fn default_language_key() -> String {
    LANGUAGE_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: None,
            theme_key: default_theme_key(),
            language_key: default_language_key(),
        }
    }
}

impl StorageConfig {
    /// Configured path, or the platform default.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(FileStore::default_path)
    }
}

// =============================================================================
// Locale Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Used in place of the host locale during language detection.
    /// A language already stored still wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<Language>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub locale: LocaleConfig,
}

impl StorefrontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StorefrontResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StorefrontResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StorefrontError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StorefrontResult<()> {
        let url = &self.catalog.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StorefrontError::InvalidConfig(format!(
                "Catalog URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(StorefrontError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storage.theme_key.trim().is_empty() || self.storage.language_key.trim().is_empty() {
            return Err(StorefrontError::InvalidConfig(
                "storage keys must not be empty".into(),
            ));
        }

        if self.storage.theme_key == self.storage.language_key {
            return Err(StorefrontError::InvalidConfig(format!(
                "theme_key and language_key must differ, both are '{}'",
                self.storage.theme_key
            )));
        }

        Ok(())
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_CATALOG_URL) {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.url = url;
        }

        if let Some(delay) = lookup(ENV_FETCH_DELAY_MS) {
            match delay.parse::<u64>() {
                Ok(ms) => self.catalog.delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid fetch delay in environment"),
            }
        }

        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(tag) = lookup(ENV_LANGUAGE) {
            match Language::from_tag(&tag) {
                Some(language) => self.locale.default_language = Some(language),
                None => warn!(tag = %tag, "Unsupported language in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "demo")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}
