//! # Host Ports
//!
//! Everything the runtime needs from its host, as traits.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Port Map                                        │
//! │                                                                         │
//! │   Browser / OS concept               Port                               │
//! │   ────────────────────               ────                               │
//! │   localStorage                 ───►  KeyValueStore                      │
//! │   matchMedia(prefers dark)     ───►  AppearanceSignal::prefers_dark     │
//! │   mql.addEventListener         ───►  AppearanceSignal::subscribe        │
//! │   mql.removeEventListener      ───►  Subscription (drop / unsubscribe)  │
//! │   <html class="dark">          ───►  DocumentAppearance::set_dark_class │
//! │   <html dir=".." lang="..">    ───►  DocumentAppearance::               │
//! │                                        set_direction_and_language       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use storefront_core::{Direction, Language};

use crate::error::StorageResult;

// =============================================================================
// Key/Value Storage
// =============================================================================

/// Browser-local style string storage.
///
/// Implementations may fail on any call. Writes from several instances are
/// not coordinated: last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

// =============================================================================
// OS Appearance Signal
// =============================================================================

/// Callback invoked with the new "prefers dark" value.
pub type AppearanceCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// The OS light/dark preference and its change notifications.
pub trait AppearanceSignal: Send + Sync {
    /// Current OS preference. Hosts without the query report `false`.
    fn prefers_dark(&self) -> bool;

    /// Registers a change listener until the returned subscription ends.
    ///
    /// Implementations may invoke `callback` before returning, for example
    /// to report the current value.
    fn subscribe(&self, callback: AppearanceCallback) -> Subscription;
}

/// A live listener registration.
///
/// Ends on `unsubscribe()` or on drop, whichever comes first; the removal
/// action runs at most once.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps the action that removes the listener.
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Subscription {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A subscription with nothing to remove.
    pub fn noop() -> Self {
        Subscription { unsubscribe: None }
    }

    /// Removes the listener now.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

// =============================================================================
// Document Markers
// =============================================================================

/// The document-level flags styling depends on.
///
/// Called synchronously on every resolved change, before the next render.
pub trait DocumentAppearance: Send + Sync {
    /// Adds (`true`) or removes (`false`) the dark marker.
    fn set_dark_class(&self, dark: bool);

    /// Sets the text direction and language attributes.
    fn set_direction_and_language(&self, direction: Direction, language: Language);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscription_runs_removal_once() {
        let removed = Arc::new(AtomicUsize::new(0));
        let counter = removed.clone();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.unsubscribe();
        assert_eq!(removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_removes_on_drop() {
        let removed = Arc::new(AtomicUsize::new(0));
        {
            let counter = removed.clone();
            let _subscription = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_noop_subscription() {
        let subscription = Subscription::noop();
        assert_eq!(format!("{:?}", subscription), "Subscription { active: false }");
        subscription.unsubscribe();
    }
}
