//! # Locale
//!
//! The two supported UI languages and the text direction each one implies.
//!
//! ```text
//! ┌──────────────┬───────┬───────────┐
//! │ Language     │ Tag   │ Direction │
//! ├──────────────┼───────┼───────────┤
//! │ English      │ en    │ ltr       │  ◄── fallback
//! │ Arabic       │ ar    │ rtl       │
//! └──────────────┴───────┴───────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Language used when nothing persisted or detected is supported.
pub const FALLBACK_LANGUAGE: Language = Language::English;

/// Languages with translation tables.
pub const SUPPORTED_LANGUAGES: [Language; 2] = [Language::English, Language::Arabic];

/// A supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    /// The BCP 47 tag written to storage and the document `lang` attribute.
    pub const fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    /// Maps a language tag to a supported language.
    ///
    /// Only the primary subtag counts, so `ar-EG` and `en_US` are accepted.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::locale::Language;
    ///
    /// assert_eq!(Language::from_tag("ar-EG"), Some(Language::Arabic));
    /// assert_eq!(Language::from_tag("EN"), Some(Language::English));
    /// assert_eq!(Language::from_tag("fr"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(&['-', '_', '.'][..])
            .next()
            .unwrap_or_default();

        SUPPORTED_LANGUAGES
            .into_iter()
            .find(|language| language.tag().eq_ignore_ascii_case(primary))
    }

    /// Text direction for this language.
    pub const fn direction(&self) -> Direction {
        match self {
            Language::English => Direction::Ltr,
            Language::Arabic => Direction::Rtl,
        }
    }

    /// The other language (what the language switch does).
    pub const fn toggled(self) -> Self {
        match self {
            Language::English => Language::Arabic,
            Language::Arabic => Language::English,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        FALLBACK_LANGUAGE
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Document text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    pub const fn is_rtl(&self) -> bool {
        matches!(self, Direction::Rtl)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_accepts_region_and_case() {
        assert_eq!(Language::from_tag("en"), Some(Language::English));
        assert_eq!(Language::from_tag("en-US"), Some(Language::English));
        assert_eq!(Language::from_tag("ar_SA.UTF-8"), Some(Language::Arabic));
        assert_eq!(Language::from_tag(" AR "), Some(Language::Arabic));
    }

    #[test]
    fn test_from_tag_rejects_unsupported() {
        assert_eq!(Language::from_tag(""), None);
        assert_eq!(Language::from_tag("de-DE"), None);
        assert_eq!(Language::from_tag("C"), None);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Language::Arabic.direction(), Direction::Rtl);
        assert_eq!(Language::English.direction(), Direction::Ltr);
        assert!(Language::Arabic.direction().is_rtl());
    }

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(Language::English.toggled(), Language::Arabic);
        assert_eq!(Language::English.toggled().toggled(), Language::English);
    }

    #[test]
    fn test_serde_uses_tags() {
        assert_eq!(serde_json::to_string(&Language::Arabic).unwrap(), "\"ar\"");
        assert_eq!(serde_json::to_string(&Direction::Rtl).unwrap(), "\"rtl\"");
    }
}
