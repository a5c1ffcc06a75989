//! # Theme Preference
//!
//! The pure half of the theme toggle: which preference the user picked and
//! which concrete appearance that means right now.
//!
//! ## Resolution Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   preference     OS prefers dark     effective                         │
//! │   ──────────     ───────────────     ─────────                         │
//! │   light          (ignored)           light                             │
//! │   dark           (ignored)           dark                              │
//! │   system         true                dark                              │
//! │   system         false               light                             │
//! │                                                                         │
//! │   Toggle cycle:  light ──► dark ──► system ──► light                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stored string form is exactly `light`, `dark` or `system`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::validate_one_of;

// =============================================================================
// Theme Preference
// =============================================================================

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the OS appearance.
    #[default]
    System,
}

impl ThemePreference {
    /// Every valid preference, in cycle order.
    pub const ALL: [ThemePreference; 3] = [
        ThemePreference::Light,
        ThemePreference::Dark,
        ThemePreference::System,
    ];

    /// The persisted string form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// The next preference of the toggle cycle.
    pub const fn next(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
            ThemePreference::System => ThemePreference::Light,
        }
    }

    /// True when the OS appearance decides.
    pub const fn is_system(&self) -> bool {
        matches!(self, ThemePreference::System)
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ValidationError;

    /// Parses the persisted form. Matching is exact: `"Dark"` is not valid.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let allowed = ThemePreference::ALL.map(|p| p.as_str());
        match validate_one_of("theme", s, &allowed)? {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            _ => Ok(ThemePreference::System),
        }
    }
}

// =============================================================================
// Effective Theme
// =============================================================================

/// The appearance actually applied. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    /// True for the dark appearance (the document-level `dark` flag).
    pub const fn is_dark(&self) -> bool {
        matches!(self, EffectiveTheme::Dark)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            EffectiveTheme::Light => "light",
            EffectiveTheme::Dark => "dark",
        }
    }
}

impl fmt::Display for EffectiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a preference against the OS "prefers dark" signal.
///
/// ## Example
/// ```rust
/// use storefront_core::theme::{resolve_effective, EffectiveTheme, ThemePreference};
///
/// assert_eq!(resolve_effective(ThemePreference::System, true), EffectiveTheme::Dark);
/// assert_eq!(resolve_effective(ThemePreference::Light, true), EffectiveTheme::Light);
/// ```
pub const fn resolve_effective(preference: ThemePreference, os_is_dark: bool) -> EffectiveTheme {
    match preference {
        ThemePreference::Dark => EffectiveTheme::Dark,
        ThemePreference::System if os_is_dark => EffectiveTheme::Dark,
        ThemePreference::System | ThemePreference::Light => EffectiveTheme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_effective_table() {
        assert_eq!(resolve_effective(ThemePreference::System, true), EffectiveTheme::Dark);
        assert_eq!(resolve_effective(ThemePreference::System, false), EffectiveTheme::Light);
        for os_is_dark in [true, false] {
            assert_eq!(resolve_effective(ThemePreference::Dark, os_is_dark), EffectiveTheme::Dark);
            assert_eq!(resolve_effective(ThemePreference::Light, os_is_dark), EffectiveTheme::Light);
        }
    }

    #[test]
    fn test_cycle_order() {
        assert_eq!(ThemePreference::Light.next(), ThemePreference::Dark);
        assert_eq!(ThemePreference::Dark.next(), ThemePreference::System);
        assert_eq!(ThemePreference::System.next(), ThemePreference::Light);
    }

    #[test]
    fn test_cycle_closes_after_three_steps() {
        for start in ThemePreference::ALL {
            assert_eq!(start.next().next().next(), start);
        }
    }

    #[test]
    fn test_parse_persisted_values() {
        for preference in ThemePreference::ALL {
            assert_eq!(preference.as_str().parse::<ThemePreference>(), Ok(preference));
        }
    }

    #[test]
    fn test_parse_rejects_anything_else() {
        for raw in ["", "Dark", "auto", " light", "null"] {
            assert!(raw.parse::<ThemePreference>().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_default_is_system() {
        assert_eq!(ThemePreference::default(), ThemePreference::System);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&ThemePreference::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&EffectiveTheme::Dark).unwrap(), "\"dark\"");
    }
}
