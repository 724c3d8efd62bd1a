//! Write-through persistence shared by the cart and the wishlist.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{LocalStore, Loaded, load_json, save_json};
use crate::error::AppError;
use crate::notify::Notifier;

/// Persists one aggregate under one key, immediately on every mutation.
///
/// When a write fails the aggregate keeps working in memory; the user is
/// warned once when storage becomes unusable and told again when a later
/// write succeeds.
pub(crate) struct WriteThrough {
    key: &'static str,
    label: &'static str,
    store: Arc<dyn LocalStore>,
    notifier: Notifier,
    degraded: bool,
}

impl WriteThrough {
    pub(crate) fn new(
        key: &'static str,
        label: &'static str,
        store: Arc<dyn LocalStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            key,
            label,
            store,
            notifier,
            degraded: false,
        }
    }

    /// Read the stored value, falling back to `T::default()`.
    pub(crate) fn load<T: DeserializeOwned + Default>(&mut self) -> T {
        match load_json(self.store.as_ref(), self.key) {
            Loaded::Value(value) => value,
            Loaded::Missing => T::default(),
            Loaded::Unavailable(e) => {
                tracing::warn!(key = self.key, error = %e, "stored value unreadable");
                self.enter_degraded();
                T::default()
            }
            Loaded::Corrupt(source) => {
                AppError::Corrupt {
                    key: self.key.to_string(),
                    source,
                }
                .report();
                self.notifier.warning(format!(
                    "Your saved {} could not be read and has been reset.",
                    self.label
                ));
                T::default()
            }
        }
    }

    /// Persist `value`. Failures are absorbed; see the type docs.
    pub(crate) fn save<T: Serialize + ?Sized>(&mut self, value: &T) {
        match save_json(self.store.as_ref(), self.key, value) {
            Ok(()) => {
                if self.degraded {
                    self.degraded = false;
                    tracing::info!(key = self.key, "storage available again");
                    self.notifier
                        .info(format!("Your {} is being saved again.", self.label));
                }
            }
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "write-through failed");
                self.enter_degraded();
            }
        }
    }

    /// Whether the last storage operation failed.
    pub(crate) const fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub(crate) const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn enter_degraded(&mut self) {
        if !self.degraded {
            self.degraded = true;
            self.notifier.warning(format!(
                "Your {} can't be saved on this device; changes will last until you close the app.",
                self.label
            ));
        }
    }
}
