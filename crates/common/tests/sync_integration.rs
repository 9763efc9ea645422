//! Integration tests for sync module
//!
//! Validates that keyed locks serialize work per key while leaving distinct
//! keys free to run in parallel.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use secretcache_common::KeyedLocks;

/// Concurrent holders of the same key never overlap.
#[tokio::test(start_paused = true)]
async fn same_key_sections_do_not_overlap() {
    let locks = Arc::new(KeyedLocks::new());
    let active = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let tasks = (0..8).map(|_| {
        let locks = Arc::clone(&locks);
        let active = Arc::clone(&active);
        let max_seen = Arc::clone(&max_seen);
        tokio::spawn(async move {
            let _guard = locks.acquire("shared").await;
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            active.fetch_sub(1, Ordering::SeqCst);
        })
    });
    futures::future::join_all(tasks).await;

    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    assert_eq!(locks.len(), 1);
}

/// Holders of distinct keys run at the same time.
#[tokio::test(start_paused = true)]
async fn distinct_keys_overlap() {
    let locks = Arc::new(KeyedLocks::new());
    let active = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));

    let tasks = (0..4).map(|i| {
        let locks = Arc::clone(&locks);
        let active = Arc::clone(&active);
        let max_seen = Arc::clone(&max_seen);
        tokio::spawn(async move {
            let _guard = locks.acquire(&format!("key-{i}")).await;
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            max_seen.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            active.fetch_sub(1, Ordering::SeqCst);
        })
    });
    futures::future::join_all(tasks).await;

    assert_eq!(max_seen.load(Ordering::SeqCst), 4);
    assert_eq!(locks.len(), 4);
}
