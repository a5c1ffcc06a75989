//! # Theme Resolver
//!
//! Holds the user's theme preference, keeps it persisted, and keeps the
//! document dark marker in sync with the effective theme.
//!
//! ## Listener Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    OS Listener Lifecycle                                │
//! │                                                                         │
//! │   preference        OS subscription       OS change fires              │
//! │   ──────────        ───────────────       ───────────────              │
//! │   light / dark      none                  (not delivered)              │
//! │   system            exactly one           recompute + set marker       │
//! │                                                                         │
//! │   light ──► system : install  (no-op if already installed)             │
//! │   system ──► dark  : remove   (no-op if none installed)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The listener callback also re-checks the preference when it fires, so a
//! notification already in flight during a switch away from `system` is
//! ignored.
//!
//! ## Storage
//! Reads happen once, in [`ThemeResolver::initialize`]. Every preference
//! change is written back. Storage failures are logged and swallowed; the
//! in-memory preference always takes effect.

use std::sync::{Arc, Mutex, Weak};

use storefront_core::{resolve_effective, EffectiveTheme, ThemePreference};
use tracing::{debug, info, warn};

use crate::lock;
use crate::ports::{AppearanceSignal, DocumentAppearance, KeyValueStore, Subscription};
use crate::storage::THEME_STORAGE_KEY;

struct ResolverState {
    preference: ThemePreference,
    effective: EffectiveTheme,
    subscription: Option<Subscription>,
}

struct ResolverInner {
    store: Arc<dyn KeyValueStore>,
    signal: Arc<dyn AppearanceSignal>,
    document: Arc<dyn DocumentAppearance>,
    storage_key: String,
    state: Mutex<ResolverState>,
}

/// Light/dark/system theme controller.
///
/// Cheap to clone; clones share state. The OS listener holds only a weak
/// reference, so dropping the last handle ends the subscription.
#[derive(Clone)]
pub struct ThemeResolver {
    inner: Arc<ResolverInner>,
}

impl ThemeResolver {
    /// Loads the persisted preference and applies it.
    ///
    /// Missing, invalid or unreadable values mean `system`. The resolved
    /// preference is written back and the dark marker is set before this
    /// returns.
    pub fn initialize(
        store: Arc<dyn KeyValueStore>,
        signal: Arc<dyn AppearanceSignal>,
        document: Arc<dyn DocumentAppearance>,
    ) -> Self {
        Self::with_storage_key(store, signal, document, THEME_STORAGE_KEY)
    }

    /// Like [`ThemeResolver::initialize`] with a custom storage key.
    pub fn with_storage_key(
        store: Arc<dyn KeyValueStore>,
        signal: Arc<dyn AppearanceSignal>,
        document: Arc<dyn DocumentAppearance>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let preference = read_preference(store.as_ref(), &storage_key);
        let effective = resolve_effective(preference, signal.prefers_dark());

        let resolver = ThemeResolver {
            inner: Arc::new(ResolverInner {
                store,
                signal,
                document,
                storage_key,
                state: Mutex::new(ResolverState {
                    preference,
                    effective,
                    subscription: None,
                }),
            }),
        };

        resolver.inner.persist(preference);
        resolver.inner.document.set_dark_class(effective.is_dark());
        if preference.is_system() {
            resolver.inner.attach_listener();
        }

        info!(%preference, effective = %resolver.effective_theme(), "Theme resolver initialized");
        resolver
    }

    /// The user's preference.
    pub fn preference(&self) -> ThemePreference {
        lock(&self.inner.state).preference
    }

    /// The appearance currently applied.
    pub fn effective_theme(&self) -> EffectiveTheme {
        lock(&self.inner.state).effective
    }

    /// True while an OS listener is installed.
    pub fn is_listening(&self) -> bool {
        lock(&self.inner.state).subscription.is_some()
    }

    /// Sets, persists and applies a preference.
    ///
    /// Setting the current preference again changes nothing.
    pub fn set_preference(&self, preference: ThemePreference) {
        let removed = {
            let mut state = lock(&self.inner.state);
            if state.preference == preference {
                debug!(%preference, "Theme preference unchanged");
                return;
            }

            state.preference = preference;
            self.inner.persist(preference);
            state.effective = resolve_effective(preference, self.inner.signal.prefers_dark());
            self.inner.document.set_dark_class(state.effective.is_dark());

            info!(%preference, effective = %state.effective, "Theme preference changed");

            if preference.is_system() {
                None
            } else {
                state.subscription.take()
            }
        };

        // Dropped outside the state lock: removal may call back into the signal.
        if removed.is_some() {
            debug!("OS appearance listener removed");
        }
        drop(removed);

        if preference.is_system() {
            self.inner.attach_listener();
        }
    }

    pub fn set_light(&self) {
        self.set_preference(ThemePreference::Light);
    }

    pub fn set_dark(&self) {
        self.set_preference(ThemePreference::Dark);
    }

    pub fn set_system(&self) {
        self.set_preference(ThemePreference::System);
    }

    /// Advances light → dark → system → light and returns the new value.
    pub fn cycle_preference(&self) -> ThemePreference {
        let next = self.preference().next();
        self.set_preference(next);
        next
    }
}

impl std::fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("ThemeResolver")
            .field("preference", &state.preference)
            .field("effective", &state.effective)
            .field("listening", &state.subscription.is_some())
            .finish()
    }
}

impl ResolverInner {
    fn persist(&self, preference: ThemePreference) {
        if let Err(e) = self.store.set(&self.storage_key, preference.as_str()) {
            warn!(key = %self.storage_key, error = %e, "Failed to persist theme preference");
        }
    }

    /// Installs the OS listener unless one is already held.
    ///
    /// `subscribe` runs without the state lock, since a signal may report
    /// its current value from inside `subscribe`. The OS value is re-read
    /// once the listener is in place so a change that landed before
    /// registration is not lost.
    fn attach_listener(self: &Arc<Self>) {
        if lock(&self.state).subscription.is_some() {
            return;
        }

        let weak: Weak<ResolverInner> = Arc::downgrade(self);
        let subscription = self.signal.subscribe(Arc::new(move |prefers_dark: bool| {
            if let Some(inner) = weak.upgrade() {
                inner.on_os_change(prefers_dark);
            }
        }));

        let unused = {
            let mut state = lock(&self.state);
            if !state.preference.is_system() || state.subscription.is_some() {
                Some(subscription)
            } else {
                state.subscription = Some(subscription);
                debug!("OS appearance listener installed");
                self.sync_with_os(&mut state, self.signal.prefers_dark());
                None
            }
        };
        drop(unused);
    }

    fn on_os_change(&self, prefers_dark: bool) {
        let mut state = lock(&self.state);
        if !state.preference.is_system() {
            return;
        }
        self.sync_with_os(&mut state, prefers_dark);
    }

    fn sync_with_os(&self, state: &mut ResolverState, prefers_dark: bool) {
        let effective = resolve_effective(state.preference, prefers_dark);
        if effective == state.effective {
            return;
        }
        state.effective = effective;
        self.document.set_dark_class(effective.is_dark());
        debug!(prefers_dark, %effective, "Theme followed OS change");
    }
}

fn read_preference(store: &dyn KeyValueStore, key: &str) -> ThemePreference {
    match store.get(key) {
        Ok(Some(raw)) => raw.parse::<ThemePreference>().unwrap_or_else(|e| {
            warn!(key, value = %raw, error = %e, "Ignoring invalid stored theme");
            ThemePreference::default()
        }),
        Ok(None) => ThemePreference::default(),
        Err(e) => {
            warn!(key, error = %e, "Theme storage unavailable");
            ThemePreference::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{DocumentMarkers, ManualAppearanceSignal};
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    struct Harness {
        store: Arc<MemoryStore>,
        signal: ManualAppearanceSignal,
        markers: DocumentMarkers,
    }

    impl Harness {
        fn new(store: MemoryStore, os_dark: bool) -> Self {
            Harness {
                store: Arc::new(store),
                signal: ManualAppearanceSignal::new(os_dark),
                markers: DocumentMarkers::new(),
            }
        }

        fn resolver(&self) -> ThemeResolver {
            ThemeResolver::initialize(
                self.store.clone(),
                Arc::new(self.signal.clone()),
                Arc::new(self.markers.clone()),
            )
        }

        fn stored(&self) -> Option<String> {
            self.store.get(THEME_STORAGE_KEY).unwrap()
        }
    }

    #[test]
    fn test_initialize_without_stored_value_is_system() {
        let h = Harness::new(MemoryStore::new(), true);
        let resolver = h.resolver();

        assert_eq!(resolver.preference(), ThemePreference::System);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert!(h.markers.is_dark());
        assert!(resolver.is_listening());
        assert_eq!(h.stored().as_deref(), Some("system"));
    }

    #[test]
    fn test_initialize_reads_stored_value() {
        let h = Harness::new(MemoryStore::with_entries([(THEME_STORAGE_KEY, "dark")]), false);
        let resolver = h.resolver();

        assert_eq!(resolver.preference(), ThemePreference::Dark);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert!(!resolver.is_listening());
        assert_eq!(h.signal.listener_count(), 0);
    }

    #[test]
    fn test_initialize_ignores_invalid_stored_value() {
        let h = Harness::new(MemoryStore::with_entries([(THEME_STORAGE_KEY, "Dark")]), false);
        let resolver = h.resolver();

        assert_eq!(resolver.preference(), ThemePreference::System);
        assert_eq!(h.stored().as_deref(), Some("system"));
    }

    #[test]
    fn test_unavailable_storage_is_not_fatal() {
        let h = Harness::new(MemoryStore::unavailable(), false);
        let resolver = h.resolver();
        assert_eq!(resolver.preference(), ThemePreference::System);

        resolver.set_dark();
        assert_eq!(resolver.preference(), ThemePreference::Dark);
        assert!(h.markers.is_dark());
    }

    #[test]
    fn test_set_preference_persists_and_applies() {
        let h = Harness::new(MemoryStore::new(), false);
        let resolver = h.resolver();

        resolver.set_dark();
        assert_eq!(h.stored().as_deref(), Some("dark"));
        assert!(h.markers.is_dark());

        resolver.set_light();
        assert_eq!(h.stored().as_deref(), Some("light"));
        assert!(!h.markers.is_dark());
    }

    #[test]
    fn test_os_change_applies_only_while_system() {
        let h = Harness::new(MemoryStore::new(), false);
        let resolver = h.resolver();
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Light);

        h.signal.set_prefers_dark(true);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert!(h.markers.is_dark());

        resolver.set_light();
        h.signal.set_prefers_dark(false);
        h.signal.set_prefers_dark(true);
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Light);
        assert!(!h.markers.is_dark());
    }

    #[test]
    fn test_exactly_one_listener_while_system() {
        let h = Harness::new(MemoryStore::with_entries([(THEME_STORAGE_KEY, "light")]), false);
        let resolver = h.resolver();
        assert_eq!(h.signal.listener_count(), 0);

        resolver.set_system();
        assert_eq!(h.signal.listener_count(), 1);

        // Re-selecting system does not install a second listener
        resolver.set_system();
        assert_eq!(h.signal.listener_count(), 1);

        resolver.set_dark();
        assert_eq!(h.signal.listener_count(), 0);
        resolver.set_light();
        assert_eq!(h.signal.listener_count(), 0);
    }

    #[test]
    fn test_cycle_preference_closes() {
        let h = Harness::new(MemoryStore::with_entries([(THEME_STORAGE_KEY, "light")]), true);
        let resolver = h.resolver();

        assert_eq!(resolver.cycle_preference(), ThemePreference::Dark);
        assert_eq!(resolver.cycle_preference(), ThemePreference::System);
        assert!(resolver.is_listening());
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert_eq!(resolver.cycle_preference(), ThemePreference::Light);
        assert!(!resolver.is_listening());
        assert_eq!(h.stored().as_deref(), Some("light"));
    }

    #[test]
    fn test_dropping_resolver_removes_listener() {
        let h = Harness::new(MemoryStore::new(), false);
        let resolver = h.resolver();
        assert_eq!(h.signal.listener_count(), 1);

        drop(resolver);
        assert_eq!(h.signal.listener_count(), 0);
    }

    #[test]
    fn test_custom_storage_key() {
        let store = Arc::new(MemoryStore::with_entries([("ui-theme", "dark")]));
        let resolver = ThemeResolver::with_storage_key(
            store.clone(),
            Arc::new(ManualAppearanceSignal::new(false)),
            Arc::new(DocumentMarkers::new()),
            "ui-theme",
        );

        assert_eq!(resolver.preference(), ThemePreference::Dark);
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap(), None);
    }

    /// Signal with scripted behavior inside `subscribe`.
    struct EagerSignal {
        dark: AtomicBool,
        // Calls the callback with the current value before returning.
        report_on_subscribe: bool,
        // OS turns dark after `prefers_dark()` was read but before the
        // listener is registered.
        darken_on_subscribe: bool,
    }

    impl EagerSignal {
        fn new(dark: bool, report_on_subscribe: bool, darken_on_subscribe: bool) -> Self {
            EagerSignal {
                dark: AtomicBool::new(dark),
                report_on_subscribe,
                darken_on_subscribe,
            }
        }
    }

    impl AppearanceSignal for EagerSignal {
        fn prefers_dark(&self) -> bool {
            self.dark.load(Ordering::SeqCst)
        }

        fn subscribe(&self, callback: crate::ports::AppearanceCallback) -> Subscription {
            if self.darken_on_subscribe {
                self.dark.store(true, Ordering::SeqCst);
            }
            if self.report_on_subscribe {
                callback(self.prefers_dark());
            }
            Subscription::noop()
        }
    }

    fn init_within(
        store: Arc<MemoryStore>,
        signal: Arc<EagerSignal>,
        markers: DocumentMarkers,
    ) -> ThemeResolver {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let resolver = ThemeResolver::initialize(store, signal, Arc::new(markers));
            let _ = tx.send(resolver);
        });
        rx.recv_timeout(Duration::from_secs(3))
            .expect("initialize did not return")
    }

    #[test]
    fn test_signal_reporting_on_subscribe_does_not_deadlock() {
        let markers = DocumentMarkers::new();
        let signal = Arc::new(EagerSignal::new(true, true, false));
        let resolver = init_within(Arc::new(MemoryStore::new()), signal, markers.clone());

        assert!(resolver.is_listening());
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert!(markers.is_dark());
    }

    #[test]
    fn test_set_system_with_reporting_signal_does_not_deadlock() {
        let markers = DocumentMarkers::new();
        let store = Arc::new(MemoryStore::with_entries([(THEME_STORAGE_KEY, "light")]));
        let signal = Arc::new(EagerSignal::new(true, true, false));
        let resolver = init_within(store, signal, markers.clone());
        assert!(!resolver.is_listening());

        let (tx, rx) = mpsc::channel();
        let handle = resolver.clone();
        std::thread::spawn(move || {
            handle.set_system();
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(3))
            .expect("set_system did not return");

        assert!(resolver.is_listening());
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert!(markers.is_dark());
    }

    #[test]
    fn test_os_change_before_registration_is_not_lost() {
        let markers = DocumentMarkers::new();
        let signal = Arc::new(EagerSignal::new(false, false, true));
        let resolver = init_within(Arc::new(MemoryStore::new()), signal.clone(), markers.clone());

        assert!(signal.prefers_dark());
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert!(markers.is_dark());
    }

    #[test]
    fn test_os_change_before_registration_on_set_system() {
        let markers = DocumentMarkers::new();
        let store = Arc::new(MemoryStore::with_entries([(THEME_STORAGE_KEY, "light")]));
        let signal = Arc::new(EagerSignal::new(false, false, true));
        let resolver = init_within(store, signal, markers.clone());
        assert!(!markers.is_dark());

        resolver.set_system();
        assert_eq!(resolver.effective_theme(), EffectiveTheme::Dark);
        assert!(markers.is_dark());
    }
}
