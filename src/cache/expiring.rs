//! In-memory response cache with a periodic reaper
//!
//! Provides an `ExpiringCache` that stores raw response bytes with the time they
//! were added, and a `ReaperHandle` controlling the background sweep that drops
//! stale entries.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// A single cached response
#[derive(Debug, Clone)]
struct CacheEntry {
    /// When the entry was added, stamped by the cache
    created_at: DateTime<Utc>,
    /// Raw response body
    value: Vec<u8>,
}

/// Thread-safe response cache whose entries are removed by a timed sweep
///
/// Cloning an `ExpiringCache` yields another handle to the same map, which is
/// how the command loop and the reaper task share it. A single lock guards the
/// whole map for `add`, `get` and the sweep.
///
/// Expiry is driven only by the sweep: on each tick every entry created before
/// the tick time is dropped, so an entry lives between one and two intervals
/// depending on when it was added relative to the ticks.
#[derive(Debug, Clone, Default)]
pub struct ExpiringCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl ExpiringCache {
    /// Creates an empty cache with no reaper running
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `key`, stamped with the current time
    pub fn add(&self, key: impl Into<String>, value: Vec<u8>) {
        let entry = CacheEntry {
            created_at: Utc::now(),
            value,
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Returns a copy of the bytes stored under `key`, if present
    ///
    /// Age is not checked here; an entry stays visible until a sweep removes it.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(key).map(|entry| entry.value.clone())
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Runs one sweep, removing every entry created strictly before `tick`
    ///
    /// # Returns
    /// The number of entries removed
    pub fn reap(&self, tick: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.created_at >= tick);
        before - entries.len()
    }

    /// Spawns the background sweep on the current tokio runtime
    ///
    /// The first sweep happens one full `interval` after this call. The task runs
    /// until `ReaperHandle::shutdown` is called or the handle is dropped.
    ///
    /// # Arguments
    /// * `interval` - Time between sweeps; must be non-zero
    pub fn start_reaper(&self, interval: Duration) -> ReaperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let cache = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip the first tick (immediate)
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.reap(Utc::now());
                        if removed > 0 {
                            info!(removed, remaining = cache.len(), "cache sweep");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("cache reaper stopped");
                        break;
                    }
                }
            }
        });

        ReaperHandle { shutdown_tx }
    }
}

/// Handle for stopping the cache reaper
///
/// Dropping the handle closes the shutdown channel, which also stops the task.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl ReaperHandle {
    /// Stops the background sweep
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let cache = ExpiringCache::new();
        assert!(cache.get("https://example.com/missing").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_immediately_after_add_returns_value() {
        let cache = ExpiringCache::new();
        cache.add("https://example.com/a", b"testdata".to_vec());

        assert_eq!(cache.get("https://example.com/a"), Some(b"testdata".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_add_twice_keeps_single_entry_with_latest_value() {
        let cache = ExpiringCache::new();
        cache.add("key", b"first".to_vec());
        cache.add("key", b"second".to_vec());

        assert_eq!(cache.get("key"), Some(b"second".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reap_removes_entries_created_before_tick() {
        let cache = ExpiringCache::new();
        cache.add("old", b"x".to_vec());

        let tick = Utc::now() + ChronoDuration::milliseconds(1);
        let removed = cache.reap(tick);

        assert_eq!(removed, 1);
        assert!(cache.get("old").is_none());
    }

    #[test]
    fn test_reap_keeps_entries_created_after_tick() {
        let cache = ExpiringCache::new();
        let tick = Utc::now() - ChronoDuration::seconds(5);
        cache.add("fresh", b"x".to_vec());

        assert_eq!(cache.reap(tick), 0);
        assert_eq!(cache.get("fresh"), Some(b"x".to_vec()));
    }

    #[test]
    fn test_re_add_restamps_entry() {
        let cache = ExpiringCache::new();
        cache.add("key", b"v".to_vec());
        std::thread::sleep(std::time::Duration::from_millis(5));
        let between = Utc::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        cache.add("key", b"v".to_vec());

        // Only the second insertion's timestamp counts
        assert_eq!(cache.reap(between), 0);
        assert_eq!(cache.get("key"), Some(b"v".to_vec()));
    }

    #[test]
    fn test_clone_shares_entries() {
        let cache = ExpiringCache::new();
        let other = cache.clone();
        cache.add("shared", b"1".to_vec());

        assert_eq!(other.get("shared"), Some(b"1".to_vec()));
        other.reap(Utc::now() + ChronoDuration::seconds(1));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_reaper_evicts_after_interval() {
        let cache = ExpiringCache::new();
        let handle = cache.start_reaper(Duration::from_millis(20));
        cache.add("https://example.com/reap", b"testdata".to_vec());

        assert!(cache.get("https://example.com/reap").is_some());

        // Two full intervals guarantee a tick after the entry was created
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cache.get("https://example.com/reap").is_none());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_sweeping() {
        let cache = ExpiringCache::new();
        let handle = cache.start_reaper(Duration::from_millis(10));
        handle.shutdown().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        cache.add("kept", b"x".to_vec());
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.get("kept"), Some(b"x".to_vec()));
    }
}
