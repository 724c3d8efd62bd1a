//! URL-driven filter, sort, and pagination state.
//!
//! The listing's filters live in two places: the editable local state and the
//! URL query that makes the listing shareable. [`FilterSynchronizer`] keeps
//! them in step, debouncing edits so typing a search term produces one
//! history entry rather than one per keystroke.

mod navigator;
mod sync;

pub use navigator::{HistoryNavigator, Navigator};
pub use sync::{DEFAULT_DEBOUNCE, FilterSynchronizer, SyncPhase};
