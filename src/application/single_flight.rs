//! Per-key request serialization.
//!
//! Reconciliation for one user must not overlap with itself: two
//! concurrent syncs would race on the cached profile. A keyed async lock
//! serializes them per user while leaving different users fully
//! concurrent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-key async locks.
///
/// The registry itself is guarded by a std mutex held only long enough to
/// fetch or create the entry; the per-key lock is then awaited outside it.
#[derive(Default)]
pub struct KeyedLock {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another holder is active.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("keyed lock registry poisoned");
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of keys ever locked. Bounded by the active user population.
    pub fn len(&self) -> usize {
        self.locks.lock().expect("keyed lock registry poisoned").len()
    }

    /// True if no key has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
