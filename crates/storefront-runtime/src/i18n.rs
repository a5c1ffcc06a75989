//! # Translations
//!
//! Per-language string tables with English fallback.
//!
//! Tables are nested JSON objects. Nesting is flattened with `.`, so
//! `{"cart": {"title": "..."}}` is looked up as `cart.title`. Arrays of
//! strings are kept as lists (`features.list`).
//!
//! ## Lookup Order
//! ```text
//!   active language ──► fallback language (en) ──► the key itself
//! ```

use std::collections::HashMap;

use serde_json::Value;
use storefront_core::{Language, FALLBACK_LANGUAGE};
use tracing::debug;

use crate::error::{StorefrontError, StorefrontResult};

const KEY_SEPARATOR: char = '.';

const BUNDLED_EN: &str = include_str!("../locales/en.json");
const BUNDLED_AR: &str = include_str!("../locales/ar.json");

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Text(String),
    List(Vec<String>),
}

/// Loaded translation tables.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    tables: HashMap<Language, HashMap<String, Entry>>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tables shipped with the crate (`locales/*.json`).
    pub fn bundled() -> StorefrontResult<Self> {
        let mut translations = Translations::new();
        translations.load_json(Language::English, BUNDLED_EN)?;
        translations.load_json(Language::Arabic, BUNDLED_AR)?;
        Ok(translations)
    }

    /// Loads (or merges into) the table for `language`.
    ///
    /// The root must be a JSON object. Non-string leaves (numbers, bools,
    /// null) are skipped.
    pub fn load_json(&mut self, language: Language, json: &str) -> StorefrontResult<usize> {
        let root: Value = serde_json::from_str(json).map_err(|e| StorefrontError::Translations {
            language,
            reason: e.to_string(),
        })?;

        let Value::Object(_) = root else {
            return Err(StorefrontError::Translations {
                language,
                reason: "root must be an object".into(),
            });
        };

        let table = self.tables.entry(language).or_default();
        let before = table.len();
        flatten("", &root, table);
        let added = table.len() - before;

        debug!(%language, keys = table.len(), "Translations loaded");
        Ok(added)
    }

    /// True when `language` has a table.
    pub fn has_language(&self, language: Language) -> bool {
        self.tables.contains_key(&language)
    }

    /// Looks up a string, falling back to English and then to `key`.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::Language;
    /// use storefront_runtime::Translations;
    ///
    /// let mut t = Translations::new();
    /// t.load_json(Language::English, r#"{"nav": {"home": "Home"}}"#).unwrap();
    ///
    /// assert_eq!(t.translate(Language::Arabic, "nav.home"), "Home");
    /// assert_eq!(t.translate(Language::English, "nav.cart"), "nav.cart");
    /// ```
    pub fn translate(&self, language: Language, key: &str) -> String {
        match self.lookup(language, key) {
            Some(Entry::Text(text)) => text.clone(),
            Some(Entry::List(_)) | None => key.to_string(),
        }
    }

    /// Like [`Translations::translate`], replacing `{{name}}` placeholders.
    pub fn translate_with(&self, language: Language, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.translate(language, key), |text, (name, value)| {
                text.replace(&format!("{{{{{name}}}}}"), value)
            })
    }

    /// Looks up a list entry; empty when the key is missing or not a list.
    pub fn translate_list(&self, language: Language, key: &str) -> Vec<String> {
        match self.lookup(language, key) {
            Some(Entry::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&Entry> {
        let find = |language: Language| self.tables.get(&language).and_then(|t| t.get(key));
        find(language).or_else(|| {
            if language != FALLBACK_LANGUAGE {
                debug!(%language, key, "Translation missing, using fallback");
            }
            find(FALLBACK_LANGUAGE)
        })
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, Entry>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}{KEY_SEPARATOR}{name}")
                };
                flatten(&key, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), Entry::Text(text.clone()));
        }
        Value::Array(items) => {
            let strings = items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect();
            out.insert(prefix.to_string(), Entry::List(strings));
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}
