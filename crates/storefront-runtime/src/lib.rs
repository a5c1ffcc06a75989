//! # storefront-runtime: Event-Driven State Units
//!
//! The stateful half of the storefront. Each unit here wraps pure logic from
//! `storefront-core` and reacts to one kind of outside event.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Runtime Units                                    │
//! │                                                                         │
//! │   Unit               Driven by                   Talks to               │
//! │   ────               ─────────                   ────────               │
//! │   CartStore          user actions                (nothing)              │
//! │   ThemeResolver      user actions, OS changes    KeyValueStore,         │
//! │                                                  AppearanceSignal,      │
//! │                                                  DocumentAppearance     │
//! │   LanguageSwitcher   user actions                KeyValueStore,         │
//! │                                                  DocumentAppearance     │
//! │   ProductFetcher     user actions, timers,       CatalogSource          │
//! │                      network completions                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The units never call one another.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use storefront_core::{EffectiveTheme, ThemePreference};
//! use storefront_runtime::{DocumentMarkers, ManualAppearanceSignal, MemoryStore, ThemeResolver};
//!
//! let signal = ManualAppearanceSignal::new(true);
//! let markers = DocumentMarkers::new();
//! let theme = ThemeResolver::initialize(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(signal.clone()),
//!     Arc::new(markers.clone()),
//! );
//!
//! assert_eq!(theme.preference(), ThemePreference::System);
//! assert!(markers.is_dark());
//!
//! signal.set_prefers_dark(false);
//! assert_eq!(theme.effective_theme(), EffectiveTheme::Light);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

// =============================================================================
// Module Declarations
// =============================================================================

pub mod appearance;
pub mod cart_store;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod i18n;
pub mod language;
pub mod ports;
pub mod storage;
pub mod theme_resolver;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use appearance::{DocumentMarkers, ManualAppearanceSignal, MarkerSnapshot};
pub use cart_store::CartStore;
pub use catalog::{CatalogRecord, CatalogSource, HttpCatalog, StaticCatalog};
pub use config::{CatalogConfig, LocaleConfig, StorageConfig, StorefrontConfig};
pub use error::{FetchError, StorageError, StorageResult, StorefrontError, StorefrontResult};
pub use fetcher::{FetchSession, FetchState, FetchStatus, ProductFetcher};
pub use i18n::Translations;
pub use language::{LanguageSource, LanguageSwitcher};
pub use ports::{AppearanceCallback, AppearanceSignal, DocumentAppearance, KeyValueStore, Subscription};
pub use storage::{FileStore, MemoryStore, LANGUAGE_STORAGE_KEY, THEME_STORAGE_KEY};
pub use theme_resolver::ThemeResolver;

/// Locks a mutex, recovering the data if a previous holder panicked.
///
/// Every critical section in this crate leaves its data consistent before
/// any call that could panic.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
