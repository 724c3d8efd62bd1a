//! Mounted-view scopes for async work.
//!
//! A view that starts a request hands the future to a [`ScopeGuard`]. If the
//! view is unmounted before the response arrives the result is dropped
//! instead of being applied to state nobody is looking at.

use std::future::Future;

use tokio::sync::watch;

/// A mounted view. Unmounting (or dropping) it cancels every guarded future.
#[derive(Debug)]
pub struct ViewScope {
    mounted: watch::Sender<bool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        let (mounted, _) = watch::channel(true);
        Self { mounted }
    }

    /// A guard tied to this scope.
    #[must_use]
    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            mounted: self.mounted.subscribe(),
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    /// Unmount the view. Guarded futures still pending resolve to `None`.
    pub fn unmount(&self) {
        self.mounted.send_replace(false);
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Runs futures on behalf of a [`ViewScope`].
#[derive(Debug, Clone)]
pub struct ScopeGuard {
    mounted: watch::Receiver<bool>,
}

impl ScopeGuard {
    /// Whether the owning scope is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    /// Drive `future` while the scope is mounted.
    ///
    /// Returns `None`, and drops `future`, once the scope unmounts. A result
    /// that completes after unmounting is discarded as well.
    pub async fn run<F>(&self, future: F) -> Option<F::Output>
    where
        F: Future,
    {
        let mut mounted = self.mounted.clone();
        if !*mounted.borrow_and_update() {
            return None;
        }

        tokio::select! {
            biased;
            () = unmounted(&mut mounted) => {
                tracing::debug!("view unmounted; discarding pending result");
                None
            }
            output = future => self.is_mounted().then_some(output),
        }
    }
}

/// Resolves once the scope is unmounted or gone.
async fn unmounted(mounted: &mut watch::Receiver<bool>) {
    // An error means the scope was dropped, which also counts as unmounted.
    let _ = mounted.wait_for(|is_mounted| !is_mounted).await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_result_applied_while_mounted() {
        let scope = ViewScope::new();
        let guard = scope.guard();

        assert_eq!(guard.run(async { 7 }).await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_after_unmount_is_discarded() {
        let scope = ViewScope::new();
        let guard = scope.guard();

        let pending = tokio::spawn(async move {
            guard
                .run(async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "products"
                })
                .await
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        scope.unmount();

        assert_eq!(pending.await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_scope_cancels() {
        let scope = ViewScope::new();
        let guard = scope.guard();

        let pending = tokio::spawn(async move {
            guard
                .run(tokio::time::sleep(Duration::from_secs(5)))
                .await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(scope);

        assert_eq!(pending.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_run_after_unmount_never_polls() {
        let scope = ViewScope::new();
        let guard = scope.guard();
        scope.unmount();

        let mut polled = false;
        let result = guard
            .run(async {
                polled = true;
            })
            .await;

        assert!(result.is_none());
        assert!(!polled);
        assert!(!guard.is_mounted());
    }
}
