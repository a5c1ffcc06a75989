//! # Language Switcher
//!
//! Chooses the UI language, remembers it, and keeps the document direction
//! and language markers in step.
//!
//! ## Detection Order
//! ```text
//!   stored tag (i18nextLng) ──► supported? ──yes──► use it
//!            │ no / absent / unreadable
//!            ▼
//!   detected locale (LANG)  ──► supported? ──yes──► use it
//!            │ no
//!            ▼
//!   fallback: en
//! ```
//!
//! Whatever is chosen is cached back to storage, so the next start skips
//! detection.

use std::sync::{Arc, Mutex};

use storefront_core::{Direction, Language, FALLBACK_LANGUAGE};
use tracing::{debug, info, warn};

use crate::lock;
use crate::ports::{DocumentAppearance, KeyValueStore};
use crate::storage::LANGUAGE_STORAGE_KEY;

/// Where the active language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    Stored,
    Detected,
    Fallback,
    /// Chosen by the user during this session.
    User,
}

struct SwitcherState {
    language: Language,
    source: LanguageSource,
}

/// UI language controller. Clones share state.
#[derive(Clone)]
pub struct LanguageSwitcher {
    store: Arc<dyn KeyValueStore>,
    document: Arc<dyn DocumentAppearance>,
    storage_key: String,
    state: Arc<Mutex<SwitcherState>>,
}

impl LanguageSwitcher {
    /// Detects the language and applies it to the document.
    ///
    /// `detected_locale` is the host's locale string (`ar-EG`, `en_US.UTF-8`),
    /// if it has one.
    pub fn initialize(
        store: Arc<dyn KeyValueStore>,
        document: Arc<dyn DocumentAppearance>,
        detected_locale: Option<&str>,
    ) -> Self {
        Self::with_storage_key(store, document, detected_locale, LANGUAGE_STORAGE_KEY)
    }

    /// Like [`LanguageSwitcher::initialize`] with a custom storage key.
    pub fn with_storage_key(
        store: Arc<dyn KeyValueStore>,
        document: Arc<dyn DocumentAppearance>,
        detected_locale: Option<&str>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let (language, source) = detect(store.as_ref(), &storage_key, detected_locale);

        let switcher = LanguageSwitcher {
            store,
            document,
            storage_key,
            state: Arc::new(Mutex::new(SwitcherState { language, source })),
        };

        {
            let _state = lock(&switcher.state);
            switcher.persist(language);
            switcher
                .document
                .set_direction_and_language(language.direction(), language);
        }

        info!(%language, ?source, "Language initialized");
        switcher
    }

    pub fn language(&self) -> Language {
        lock(&self.state).language
    }

    /// How the current language was chosen.
    pub fn source(&self) -> LanguageSource {
        lock(&self.state).source
    }

    pub fn direction(&self) -> Direction {
        self.language().direction()
    }

    pub fn is_rtl(&self) -> bool {
        self.direction().is_rtl()
    }

    /// Switches language, persists it, and updates the document markers.
    pub fn set_language(&self, language: Language) {
        let mut state = lock(&self.state);
        state.source = LanguageSource::User;
        if state.language == language {
            debug!(%language, "Language unchanged");
            return;
        }

        state.language = language;
        self.persist(language);
        self.document
            .set_direction_and_language(language.direction(), language);
        info!(%language, dir = %language.direction(), "Language changed");
    }

    /// Switches to the other supported language and returns it.
    pub fn toggle(&self) -> Language {
        let next = self.language().toggled();
        self.set_language(next);
        next
    }

    fn persist(&self, language: Language) {
        if let Err(e) = self.store.set(&self.storage_key, language.tag()) {
            warn!(key = %self.storage_key, error = %e, "Failed to persist language");
        }
    }
}

impl std::fmt::Debug for LanguageSwitcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("LanguageSwitcher")
            .field("language", &state.language)
            .field("source", &state.source)
            .finish()
    }
}

fn detect(
    store: &dyn KeyValueStore,
    key: &str,
    detected_locale: Option<&str>,
) -> (Language, LanguageSource) {
    let stored = match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Language storage unavailable");
            None
        }
    };

    if let Some(language) = stored.as_deref().and_then(Language::from_tag) {
        return (language, LanguageSource::Stored);
    }

    if let Some(language) = detected_locale.and_then(Language::from_tag) {
        return (language, LanguageSource::Detected);
    }

    (FALLBACK_LANGUAGE, LanguageSource::Fallback)
}
