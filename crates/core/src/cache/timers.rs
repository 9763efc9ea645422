//! Background refresh timer registry
//!
//! One pending timer per secret. Arming a timer for a key that already has
//! one cancels the old timer first, so a forced refresh never leaves two
//! refreshes racing for the same key. Each timer carries an id so a fired
//! task can tell whether it is still the registered timer.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct TimerHandle {
    id: u64,
    token: CancellationToken,
}

#[derive(Default)]
pub(crate) struct RefreshTimers {
    timers: DashMap<String, TimerHandle>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl RefreshTimers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run `fire(id)` after `delay` unless cancelled or replaced first.
    pub(crate) fn arm<F, Fut>(&self, name: &str, delay: Duration, fire: F)
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            debug!(secret_name = %name, "Timer registry closed, not arming");
            return;
        }

        let Some((id, token)) = self.register(name) else {
            return;
        };

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => fire(id).await,
            }
        });
    }

    /// Record a fresh timer for `name`, cancelling its predecessor. Returns
    /// `None`, leaving nothing behind, if `cancel_all` ran before the insert landed.
    fn register(&self, name: &str) -> Option<(u64, CancellationToken)> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        if let Some(previous) =
            self.timers.insert(name.to_string(), TimerHandle { id, token: token.clone() })
        {
            previous.token.cancel();
        }
        if self.closed.load(Ordering::SeqCst) {
            token.cancel();
            self.remove(name, id);
            debug!(secret_name = %name, "Timer registry closed while arming");
            return None;
        }
        Some((id, token))
    }

    /// Whether `id` is still the registered timer for `name`.
    pub(crate) fn is_current(&self, name: &str, id: u64) -> bool {
        self.timers.get(name).is_some_and(|handle| handle.id == id)
    }

    /// Drop the record for `name` if it still belongs to timer `id`.
    pub(crate) fn remove(&self, name: &str, id: u64) {
        self.timers.remove_if(name, |_, handle| handle.id == id);
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }

    /// Cancel every pending timer and refuse new ones.
    pub(crate) fn cancel_all(&self) {
        self.closed.store(true, Ordering::SeqCst);
        for handle in self.timers.iter() {
            handle.token.cancel();
        }
        self.timers.clear();
    }
}
