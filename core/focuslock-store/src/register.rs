//! The register interface every view shares.

use std::sync::Arc;

use crate::error::StoreError;

/// Callback invoked with `(old, new)` after a stored value changes.
pub type ChangeListener = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// A cross-view cell of numeric values, keyed by string.
///
/// Implementations are last-write-wins: `set` overwrites whatever is present
/// and concurrent writers race without error. There is no compare-and-swap;
/// every write is an absolute value.
pub trait DeadlineStore: Send + Sync {
    /// Reads the value under `key`, or `default` if the key is absent.
    fn get(&self, key: &str, default: u64) -> Result<u64, StoreError>;

    /// Writes `value` under `key`. Last write wins.
    fn set(&self, key: &str, value: u64) -> Result<(), StoreError>;

    /// Registers `listener` for changes to `key`.
    ///
    /// Delivery is best-effort and may never happen; a backend with no
    /// notification channel returns an inert guard. Observers that need
    /// correctness must keep re-reading on their own schedule. Dropping the
    /// returned guard unregisters the listener.
    fn subscribe(&self, key: &str, listener: ChangeListener) -> Subscription;
}

/// Guard for a registered change listener.
///
/// Unregisters on [`cancel`](Subscription::cancel) or drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Subscription {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Guard for backends that never notify.
    pub fn inert() -> Self {
        Subscription { cancel: None }
    }

    /// Unregisters the listener now instead of at drop time.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
