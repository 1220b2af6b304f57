//! In-process register with synchronous change notification.
//!
//! Every view in the process shares one `Arc<MemoryStore>`. Listeners run on
//! the writing thread, after all internal locks are released, so a listener
//! may re-enter the store (read, or even write back) without deadlocking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::StoreError;
use crate::register::{ChangeListener, DeadlineStore, Subscription};

struct Registration {
    key: String,
    listener: ChangeListener,
}

struct Inner {
    values: Mutex<HashMap<String, u64>>,
    listeners: Mutex<HashMap<u64, Registration>>,
    next_listener_id: AtomicU64,
}

/// Shared in-memory register.
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Arc::new(Inner {
                values: Mutex::new(HashMap::new()),
                listeners: Mutex::new(HashMap::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Listeners registered for `key`, cloned out so no lock is held while
    /// they run.
    fn listeners_for(&self, key: &str) -> Vec<ChangeListener> {
        match self.inner.listeners.lock() {
            Ok(listeners) => listeners
                .values()
                .filter(|registration| registration.key == key)
                .map(|registration| registration.listener.clone())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl DeadlineStore for MemoryStore {
    fn get(&self, key: &str, default: u64) -> Result<u64, StoreError> {
        let values = self
            .inner
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("register value table poisoned".to_string()))?;
        Ok(values.get(key).copied().unwrap_or(default))
    }

    fn set(&self, key: &str, value: u64) -> Result<(), StoreError> {
        let old = {
            let mut values = self.inner.values.lock().map_err(|_| {
                StoreError::Unavailable("register value table poisoned".to_string())
            })?;
            let old = values.get(key).copied().unwrap_or(0);
            values.insert(key.to_string(), value);
            old
        };

        // Idempotent overwrite: nothing changed, nobody to tell.
        if old == value {
            return Ok(());
        }

        let interested = self.listeners_for(key);
        debug!(key, old, new = value, listeners = interested.len(), "register value changed");
        for listener in interested {
            listener(old, value);
        }
        Ok(())
    }

    fn subscribe(&self, key: &str, listener: ChangeListener) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.inner.listeners.lock() {
            listeners.insert(
                id,
                Registration {
                    key: key.to_string(),
                    listener,
                },
            );
        }

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                if let Ok(mut listeners) = inner.listeners.lock() {
                    listeners.remove(&id);
                }
            }
        })
    }
}
