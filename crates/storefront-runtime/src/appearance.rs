//! # Appearance Adapters
//!
//! Host-side implementations of the appearance ports for hosts without a
//! native theme API (tests, the demo binary).
//!
//! ```text
//!   set_prefers_dark(true)
//!          │
//!          ▼
//!   ManualAppearanceSignal ── value changed? ──► every live callback(true)
//!                                   │
//!                                   └── unchanged ──► nothing
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use storefront_core::{Direction, Language};
use tracing::{debug, info};

use crate::lock;
use crate::ports::{AppearanceCallback, AppearanceSignal, DocumentAppearance, Subscription};

// =============================================================================
// Manual Appearance Signal
// =============================================================================

struct SignalInner {
    prefers_dark: AtomicBool,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, AppearanceCallback)>>,
}

/// An OS appearance signal whose value the caller sets.
///
/// Clones share state, so a test can keep one handle and give another to
/// the resolver.
#[derive(Clone)]
pub struct ManualAppearanceSignal {
    inner: Arc<SignalInner>,
}

impl ManualAppearanceSignal {
    pub fn new(prefers_dark: bool) -> Self {
        ManualAppearanceSignal {
            inner: Arc::new(SignalInner {
                prefers_dark: AtomicBool::new(prefers_dark),
                next_id: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Changes the OS value and notifies listeners if it differs.
    ///
    /// Callbacks run on the calling thread after the listener lock is
    /// released, so a callback may subscribe or unsubscribe.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        let previous = self.inner.prefers_dark.swap(prefers_dark, Ordering::SeqCst);
        if previous == prefers_dark {
            return;
        }

        let callbacks: Vec<AppearanceCallback> = lock(&self.inner.listeners)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        debug!(prefers_dark, listeners = callbacks.len(), "OS appearance changed");
        for callback in callbacks {
            callback(prefers_dark);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }
}

impl Default for ManualAppearanceSignal {
    fn default() -> Self {
        Self::new(false)
    }
}

impl std::fmt::Debug for ManualAppearanceSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualAppearanceSignal")
            .field("prefers_dark", &self.prefers_dark())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl AppearanceSignal for ManualAppearanceSignal {
    fn prefers_dark(&self) -> bool {
        self.inner.prefers_dark.load(Ordering::SeqCst)
    }

    fn subscribe(&self, callback: AppearanceCallback) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.inner.listeners).push((id, callback));

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner.listeners).retain(|(listener, _)| *listener != id);
            }
        })
    }
}

// =============================================================================
// Document Markers
// =============================================================================

/// Snapshot of the document-level markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSnapshot {
    pub dark: bool,
    pub direction: Direction,
    pub language: Language,
    /// Number of marker writes so far.
    pub writes: u64,
}

impl Default for MarkerSnapshot {
    fn default() -> Self {
        MarkerSnapshot {
            dark: false,
            direction: Direction::Ltr,
            language: Language::English,
            writes: 0,
        }
    }
}

/// A [`DocumentAppearance`] that records the markers in memory.
///
/// Stands in for the document root element: the last write wins, and every
/// write is logged.
#[derive(Debug, Clone, Default)]
pub struct DocumentMarkers {
    state: Arc<Mutex<MarkerSnapshot>>,
}

impl DocumentMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current marker values.
    pub fn snapshot(&self) -> MarkerSnapshot {
        *lock(&self.state)
    }

    pub fn is_dark(&self) -> bool {
        self.snapshot().dark
    }
}

impl DocumentAppearance for DocumentMarkers {
    fn set_dark_class(&self, dark: bool) {
        let mut state = lock(&self.state);
        state.dark = dark;
        state.writes += 1;
        info!(dark, "Document dark marker set");
    }

    fn set_direction_and_language(&self, direction: Direction, language: Language) {
        let mut state = lock(&self.state);
        state.direction = direction;
        state.language = language;
        state.writes += 1;
        info!(dir = %direction, lang = %language, "Document direction set");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_callback(counter: &Arc<AtomicUsize>) -> AppearanceCallback {
        let counter = Arc::clone(counter);
        Arc::new(move |_: bool| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_signal_notifies_only_on_change() {
        let signal = ManualAppearanceSignal::new(false);
        let calls = Arc::new(AtomicUsize::new(0));
        let _subscription = signal.subscribe(counting_callback(&calls));

        signal.set_prefers_dark(false);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        signal.set_prefers_dark(true);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(signal.prefers_dark());
    }

    #[test]
    fn test_dropping_subscription_removes_listener() {
        let signal = ManualAppearanceSignal::new(false);
        let calls = Arc::new(AtomicUsize::new(0));

        let subscription = signal.subscribe(counting_callback(&calls));
        assert_eq!(signal.listener_count(), 1);

        drop(subscription);
        assert_eq!(signal.listener_count(), 0);

        signal.set_prefers_dark(true);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_removes_only_its_own_listener() {
        let signal = ManualAppearanceSignal::new(false);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = signal.subscribe(counting_callback(&calls));
        let _second = signal.subscribe(counting_callback(&calls));
        first.unsubscribe();

        signal.set_prefers_dark(true);
        assert_eq!(signal.listener_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_document_markers_record_last_write() {
        let markers = DocumentMarkers::new();
        markers.set_dark_class(true);
        markers.set_direction_and_language(Direction::Rtl, Language::Arabic);

        let snapshot = markers.snapshot();
        assert!(snapshot.dark);
        assert_eq!(snapshot.direction, Direction::Rtl);
        assert_eq!(snapshot.language, Language::Arabic);
        assert_eq!(snapshot.writes, 2);
    }
}
