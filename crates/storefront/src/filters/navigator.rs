//! Where committed filter queries are written.

use std::sync::{Mutex, PoisonError};

use url::Url;

/// Receives the query string of every committed filter state.
///
/// A front end implements this by pushing a history entry for the listing
/// URL. `query` has no leading `?` and is empty for the default filters.
pub trait Navigator: Send + Sync {
    fn navigate(&self, query: &str);
}

/// Navigator that records a linear history of listing URLs.
#[derive(Debug)]
pub struct HistoryNavigator {
    base: Url,
    history: Mutex<Vec<Url>>,
}

impl HistoryNavigator {
    /// History rooted at `base`; any query on `base` is dropped.
    #[must_use]
    pub fn new(mut base: Url) -> Self {
        base.set_query(None);
        base.set_fragment(None);
        Self {
            base,
            history: Mutex::new(Vec::new()),
        }
    }

    /// The most recent URL, or the base URL before any navigation.
    #[must_use]
    pub fn current(&self) -> Url {
        self.lock().last().cloned().unwrap_or_else(|| self.base.clone())
    }

    /// Every URL navigated to, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Url> {
        self.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Url>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, query: &str) {
        let mut url = self.base.clone();
        url.set_query((!query.is_empty()).then_some(query));
        tracing::debug!(url = %url, "navigate");
        self.lock().push(url);
    }
}
