//! Debounced synchronization between local filter state and the URL.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use shopfront_core::{FilterChange, FilterState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::instrument;

use super::Navigator;

/// Debounce window used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Where the synchronizer is between an edit and the URL write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    /// Local edits are waiting for the debounce window to close.
    Editing,
    /// The URL is being written.
    Syncing,
}

#[derive(Debug)]
struct Shared {
    local: FilterState,
    committed: FilterState,
    phase: SyncPhase,
}

/// Owns the filter state of one mounted listing view.
///
/// Edits go to the local state immediately and reach the URL once the
/// debounce window passes without another edit. Page changes are written at
/// once, together with any edit still waiting. A commit that would encode the
/// same query as the URL already holds does not navigate.
///
/// Every commit is published on a watch channel; that is the signal for the
/// view to refetch products.
///
/// Debounced edits spawn a timer task, so [`apply`](Self::apply) must be
/// called within a tokio runtime unless the debounce window is zero.
pub struct FilterSynchronizer {
    shared: Arc<Mutex<Shared>>,
    navigator: Arc<dyn Navigator>,
    published: Arc<watch::Sender<FilterState>>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for FilterSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSynchronizer")
            .field("shared", &self.shared)
            .field("debounce", &self.debounce)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl FilterSynchronizer {
    /// Start from the listing's current URL query.
    ///
    /// Malformed parameters fall back to their defaults; nothing is written
    /// back to the URL until the first edit.
    pub fn mount(query: &str, navigator: Arc<dyn Navigator>, debounce: Duration) -> Self {
        let state = FilterState::from_query(query);
        tracing::debug!(query = %state.to_query(), "filters mounted");
        let (published, _) = watch::channel(state.clone());
        Self {
            shared: Arc::new(Mutex::new(Shared {
                local: state.clone(),
                committed: state,
                phase: SyncPhase::Idle,
            })),
            navigator,
            published: Arc::new(published),
            debounce,
            pending: None,
        }
    }

    /// Apply one user edit. Returns whether the local state changed.
    #[instrument(skip(self))]
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let page_only = change.is_page_only();
        let changed = {
            let mut shared = lock(&self.shared);
            let changed = shared.local.apply(change);
            if changed {
                shared.phase = SyncPhase::Editing;
            }
            changed
        };
        if !changed {
            return false;
        }

        if page_only || self.debounce.is_zero() {
            self.flush();
        } else {
            self.restart_timer();
        }
        true
    }

    /// Adopt a URL changed from outside, such as back/forward navigation.
    ///
    /// Pending edits are discarded and the new state is published without
    /// navigating.
    #[instrument(skip(self))]
    pub fn url_changed(&mut self, query: &str) {
        self.cancel_timer();
        let state = FilterState::from_query(query);
        {
            let mut shared = lock(&self.shared);
            shared.local = state.clone();
            shared.committed = state.clone();
            shared.phase = SyncPhase::Idle;
        }
        self.published.send_replace(state);
    }

    /// Write pending edits to the URL now.
    pub fn flush(&mut self) {
        self.cancel_timer();
        commit(&self.shared, self.navigator.as_ref(), &self.published);
    }

    /// Receiver of every committed state, starting with the mounted one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.published.subscribe()
    }

    /// The local state, including edits not yet in the URL.
    #[must_use]
    pub fn state(&self) -> FilterState {
        lock(&self.shared).local.clone()
    }

    /// The state the URL currently encodes.
    #[must_use]
    pub fn committed(&self) -> FilterState {
        lock(&self.shared).committed.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        lock(&self.shared).phase
    }

    /// Shareable query string of the committed state.
    #[must_use]
    pub fn query(&self) -> String {
        lock(&self.shared).committed.to_query()
    }

    /// Tear the view down, dropping any edit still waiting on the timer.
    pub fn unmount(mut self) {
        self.cancel_timer();
    }

    fn restart_timer(&mut self) {
        self.cancel_timer();
        let shared = Arc::clone(&self.shared);
        let navigator = Arc::clone(&self.navigator);
        let published = Arc::clone(&self.published);
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            commit(&shared, navigator.as_ref(), &published);
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for FilterSynchronizer {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn commit(shared: &Mutex<Shared>, navigator: &dyn Navigator, published: &watch::Sender<FilterState>) {
    let target = {
        let mut guard = lock(shared);
        if guard.local == guard.committed {
            guard.phase = SyncPhase::Idle;
            return;
        }
        guard.phase = SyncPhase::Syncing;
        guard.committed = guard.local.clone();
        guard.committed.clone()
    };

    let query = target.to_query();
    tracing::debug!(%query, "filters committed");
    navigator.navigate(&query);
    published.send_replace(target);

    let mut guard = lock(shared);
    if guard.phase == SyncPhase::Syncing {
        guard.phase = SyncPhase::Idle;
    }
}
