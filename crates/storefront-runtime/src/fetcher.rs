//! # Product Fetcher
//!
//! Loads the catalog after an artificial delay, with cancellation and a
//! guard against out-of-order completions.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Fetch States                                    │
//! │                                                                         │
//! │            fetch()                                                      │
//! │   Idle ─────────────► Loading ──── current result ok ───► Success       │
//! │                          ▲    └─── current result err ──► Error         │
//! │                          │                                  │    │      │
//! │                          └────────── refetch() ─────────────┴────┘      │
//! │                                                                         │
//! │   There is no way back to Idle.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sessions
//! ```text
//!   fetch() #1 ──► session 1 ── delay ── request ─────────────── result 1
//!   fetch() #2 ──► cancel 1, session 2 ── delay ── request ── result 2
//!                                                               │
//!   apply result N  iff  N == latest  &&  token N not cancelled  &&  not disposed
//! ```
//!
//! Results are applied by session currency at completion time, never by
//! start or completion order. The check and the state write happen under
//! one lock, so no newer session can start in between.
//!
//! Cancelling a session stops its delay timer. Once the request has been
//! sent it is allowed to finish; its result is dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::catalog::CatalogSource;
use crate::error::FetchError;
use crate::lock;

// =============================================================================
// State
// =============================================================================

/// Where the fetcher is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable fetcher state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchState<T> {
    pub status: FetchStatus,

    /// Last successfully loaded records. Kept through later errors.
    pub data: Vec<T>,

    /// Human-readable message of the last failure.
    pub error: Option<String>,

    /// Sequence number of the most recent session (0 before the first).
    pub sequence: u64,
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState {
            status: FetchStatus::Idle,
            data: Vec::new(),
            error: None,
            sequence: 0,
        }
    }
}

/// One fetch attempt: its sequence number and cancellation token.
#[derive(Debug, Clone)]
pub struct FetchSession {
    pub sequence: u64,
    pub token: CancellationToken,
}

impl FetchSession {
    fn new(sequence: u64) -> Self {
        FetchSession {
            sequence,
            token: CancellationToken::new(),
        }
    }
}

// =============================================================================
// Shared State
// =============================================================================

struct Control {
    latest: u64,
    current: Option<FetchSession>,
    task: Option<JoinHandle<()>>,
    disposed: bool,
}

struct Shared<T> {
    control: Mutex<Control>,
    state_tx: watch::Sender<FetchState<T>>,
    stale_results: AtomicU64,
}

impl<T> Shared<T> {
    /// Applies a completed session's result if it is still current.
    fn complete(&self, session: &FetchSession, result: Result<Vec<T>, FetchError>) -> bool {
        let control = lock(&self.control);

        if control.disposed || session.token.is_cancelled() || control.latest != session.sequence {
            self.stale_results.fetch_add(1, Ordering::SeqCst);
            debug!(
                sequence = session.sequence,
                latest = control.latest,
                disposed = control.disposed,
                "Discarding stale fetch result"
            );
            return false;
        }

        match result {
            Ok(data) => {
                info!(sequence = session.sequence, count = data.len(), "Products loaded");
                self.state_tx.send_modify(|state| {
                    state.status = FetchStatus::Success;
                    state.data = data;
                    state.error = None;
                });
            }
            Err(e) => {
                warn!(sequence = session.sequence, error = %e, "Product fetch failed");
                self.state_tx.send_modify(|state| {
                    state.status = FetchStatus::Error;
                    state.error = Some(e.to_string());
                });
            }
        }
        true
    }
}

// =============================================================================
// Product Fetcher
// =============================================================================

/// Cancellable, delayed catalog loader.
///
/// `fetch` spawns onto the current tokio runtime. Dropping the fetcher
/// disposes it.
pub struct ProductFetcher<S: CatalogSource> {
    source: Arc<S>,
    delay: Duration,
    shared: Arc<Shared<S::Item>>,
}

impl<S: CatalogSource> ProductFetcher<S> {
    /// Creates an idle fetcher. `delay` runs before every request.
    pub fn new(source: S, delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(FetchState::default());

        ProductFetcher {
            source: Arc::new(source),
            delay,
            shared: Arc::new(Shared {
                control: Mutex::new(Control {
                    latest: 0,
                    current: None,
                    task: None,
                    disposed: false,
                }),
                state_tx,
                stale_results: AtomicU64::new(0),
            }),
        }
    }

    /// First fetch of the fetcher's life. Does nothing once any session
    /// has started.
    pub fn start(&self) -> u64 {
        let latest = lock(&self.shared.control).latest;
        if latest > 0 {
            return latest;
        }
        self.fetch()
    }

    /// Starts a new session, superseding any in-flight one.
    ///
    /// Returns the new session's sequence number. After disposal nothing
    /// happens and the last sequence number is returned.
    pub fn fetch(&self) -> u64 {
        let mut control = lock(&self.shared.control);
        if control.disposed {
            debug!("Fetch ignored after dispose");
            return control.latest;
        }

        if let Some(previous) = control.current.take() {
            previous.token.cancel();
            debug!(sequence = previous.sequence, "Superseded fetch session");
        }

        control.latest += 1;
        let session = FetchSession::new(control.latest);
        control.current = Some(session.clone());

        let sequence = session.sequence;
        self.shared.state_tx.send_modify(|state| {
            state.status = FetchStatus::Loading;
            state.error = None;
            state.sequence = sequence;
        });

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "No async runtime to run the fetch on");
                self.shared.state_tx.send_modify(|state| {
                    state.status = FetchStatus::Error;
                    state.error = Some(format!("Failed to load products: {e}"));
                });
                return sequence;
            }
        };

        debug!(sequence, delay_ms = self.delay.as_millis() as u64, "Fetch session started");
        let task = handle.spawn(run_session(
            Arc::clone(&self.source),
            Arc::clone(&self.shared),
            session,
            self.delay,
        ));
        // A superseded task is left to finish; its result is discarded.
        control.task = Some(task);

        sequence
    }

    /// Same as [`ProductFetcher::fetch`].
    pub fn refetch(&self) -> u64 {
        self.fetch()
    }

    /// Clears the error message. Status and data stay as they are.
    pub fn clear_error(&self) {
        let control = lock(&self.shared.control);
        if control.disposed {
            return;
        }
        self.shared
            .state_tx
            .send_if_modified(|state| state.error.take().is_some());
    }

    /// Cancels the current session and freezes the state.
    pub fn dispose(&self) {
        let mut control = lock(&self.shared.control);
        if control.disposed {
            return;
        }
        control.disposed = true;

        if let Some(session) = control.current.take() {
            session.token.cancel();
        }
        if let Some(task) = control.task.take() {
            task.abort();
        }
        debug!(latest = control.latest, "Product fetcher disposed");
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.shared.control).disposed
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<S::Item> {
        self.shared.state_tx.borrow().clone()
    }

    /// Receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<S::Item>> {
        self.shared.state_tx.subscribe()
    }

    /// The current session, if one is in flight or has completed.
    pub fn current_session(&self) -> Option<FetchSession> {
        lock(&self.shared.control).current.clone()
    }

    /// Number of results dropped because their session was no longer current.
    pub fn stale_results(&self) -> u64 {
        self.shared.stale_results.load(Ordering::SeqCst)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<S: CatalogSource> Drop for ProductFetcher<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: CatalogSource> fmt::Debug for ProductFetcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let control = lock(&self.shared.control);
        f.debug_struct("ProductFetcher")
            .field("delay", &self.delay)
            .field("latest", &control.latest)
            .field("disposed", &control.disposed)
            .field("status", &self.shared.state_tx.borrow().status)
            .finish()
    }
}

async fn run_session<S: CatalogSource>(
    source: Arc<S>,
    shared: Arc<Shared<S::Item>>,
    session: FetchSession,
    delay: Duration,
) {
    tokio::select! {
        _ = session.token.cancelled() => {
            debug!(sequence = session.sequence, "Fetch cancelled before request");
            return;
        }
        _ = tokio::time::sleep(delay) => {}
    }

    let result = source.fetch_products().await;
    shared.complete(&session, result);
}
