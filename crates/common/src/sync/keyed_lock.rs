//! Lazily created per-key async locks
//!
//! Mutual exclusion scoped to a key without declaring the key set up front.
//! The map itself sits behind a short-held `parking_lot` mutex used only for
//! create-if-absent; callers then await the per-key `tokio` mutex, which may
//! be held across I/O. Locks are never removed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-key async mutexes.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lock for `key`, creating it on first use.
    pub fn lock_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock();
        if let Some(existing) = locks.get(key) {
            return Arc::clone(existing);
        }
        let created = Arc::new(AsyncMutex::new(()));
        locks.insert(key.to_string(), Arc::clone(&created));
        created
    }

    /// Acquire the lock for `key`, returning an owned guard.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        self.lock_for(key).lock_owned().await
    }

    /// Number of distinct keys ever locked.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_returns_same_lock() {
        let locks = KeyedLocks::new();
        let a = locks.lock_for("db-password");
        let b = locks.lock_for("db-password");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_locks() {
        let locks = KeyedLocks::new();
        let a = locks.lock_for("a");
        let b = locks.lock_for("b");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_other_key_not_blocked_while_held() {
        let locks = KeyedLocks::new();
        let _held = locks.acquire("a").await;
        assert!(locks.lock_for("b").try_lock().is_ok());
        assert!(locks.lock_for("a").try_lock().is_err());
    }
}
