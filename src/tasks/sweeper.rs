//! Expiration Sweeper
//!
//! Background task that repeatedly scans a cache space in bounded
//! batches and deletes tuples whose expiration has passed, pacing itself
//! toward a target full-scan duration. One task per space, started at
//! space initialization, no natural termination.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{codec, epoch_secs, is_expired};
use crate::error::{CacheError, Result};
use crate::store::{ScanCursor, TupleStore};
use crate::tasks::{NodeRole, SweepSchedule};

/// Pause after a failed batch before the loop resumes.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

// == Expiration Sweeper ==
/// Handle to the background sweep task of one cache space.
#[derive(Debug)]
pub struct ExpirationSweeper {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ExpirationSweeper {
    // == Start ==
    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// Fails with `SweeperUnavailable` when no runtime is running: a
    /// space without an active sweeper accumulates expired garbage
    /// silently, so initialization aborts instead.
    ///
    /// On a replica whose schedule opts out of participation the task
    /// idles until shutdown; deletions then arrive via replication from
    /// the primary's sweep rather than from local predicate decisions.
    pub fn start(
        store: Arc<dyn TupleStore>,
        schedule: SweepSchedule,
        role: NodeRole,
    ) -> Result<Self> {
        let runtime =
            Handle::try_current().map_err(|e| CacheError::SweeperUnavailable(e.to_string()))?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let participates = role == NodeRole::Primary || schedule.replica_participation();
        let task = if participates {
            info!(
                batch_size = schedule.batch_size(),
                target_full_scan_secs = schedule.target_full_scan().as_secs(),
                "expiration sweeper started"
            );
            runtime.spawn(sweep_loop(store, schedule, shutdown_rx))
        } else {
            info!("replica opted out of sweeping; deferring to replicated deletes");
            runtime.spawn(idle_until_shutdown(shutdown_rx))
        };

        Ok(Self { shutdown_tx, task })
    }

    // == Stop ==
    /// Signals the task to exit. Idempotent and safe to call after the
    /// task has already finished.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// True once the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ExpirationSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

// == Pacing ==
/// Inter-batch pause targeting one full keyspace traversal per
/// `target_full_scan`, assuming a roughly uniform key distribution:
/// `target x batch_size / space_size`, capped at the full target. An
/// empty space waits out the whole target before rescanning.
pub(crate) fn batch_pause(schedule: &SweepSchedule, estimated_size: u64) -> Duration {
    let target = schedule.target_full_scan();
    if estimated_size == 0 {
        return target;
    }
    let fraction = schedule.batch_size() as f64 / estimated_size as f64;
    target.mul_f64(fraction.min(1.0))
}

// == Sweep Loop ==
async fn sweep_loop(
    store: Arc<dyn TupleStore>,
    schedule: SweepSchedule,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut cursor = ScanCursor::Start;
    let mut scanned: u64 = 0;
    let mut removed: u64 = 0;

    loop {
        if *shutdown_rx.borrow() {
            return;
        }

        let page = match store.scan_batch(cursor.clone(), schedule.batch_size()).await {
            Ok(page) => page,
            Err(e) => {
                // One failed batch must not end eviction for the space.
                warn!(error = %e, "batch scan failed, retrying after backoff");
                if wait_or_shutdown(&mut shutdown_rx, ERROR_BACKOFF).await {
                    return;
                }
                continue;
            }
        };

        let now = epoch_secs();
        for tuple in &page.tuples {
            scanned += 1;
            match codec::decode_expiry(tuple) {
                Ok((key, expire_at)) => {
                    if is_expired(expire_at, now) {
                        match store.delete_by_key(&key).await {
                            Ok(()) => removed += 1,
                            Err(e) => {
                                warn!(key = %key, error = %e, "failed to delete expired tuple")
                            }
                        }
                    }
                }
                // A data-integrity problem in one tuple must not crash
                // the sweep; direct reads of that key still surface it.
                Err(e) => warn!(error = %e, "skipping malformed tuple during sweep"),
            }
        }

        cursor = match page.next {
            Some(next) => next,
            None => {
                debug!(scanned, removed, "full scan complete, wrapping cursor");
                scanned = 0;
                removed = 0;
                ScanCursor::Start
            }
        };

        let estimated = store.estimated_size().await.unwrap_or(0);
        let pause = batch_pause(&schedule, estimated);
        if !pause.is_zero() && wait_or_shutdown(&mut shutdown_rx, pause).await {
            return;
        }
    }
}

/// Sleeps for `pause`, returning true if shutdown was signalled first.
async fn wait_or_shutdown(shutdown_rx: &mut watch::Receiver<bool>, pause: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(pause) => *shutdown_rx.borrow(),
        result = shutdown_rx.changed() => result.is_err() || *shutdown_rx.borrow(),
    }
}

/// Non-participating replica body: wait for teardown, never scan.
async fn idle_until_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    loop {
        if shutdown_rx.changed().await.is_err() || *shutdown_rx.borrow() {
            return;
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::cache::{CacheRecord, CacheStore};
    use crate::store::{Field, InsertOutcome, MemoryStore, ScanPage, Tuple};

    /// Store whose first batch scan fails with a transient error, then
    /// recovers and delegates normally.
    struct FlakyStore {
        inner: MemoryStore,
        scan_failed: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new("test"),
                scan_failed: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl TupleStore for FlakyStore {
        async fn point_lookup(&self, key: &str) -> Result<Option<Tuple>> {
            self.inner.point_lookup(key).await
        }

        async fn insert_unique(&self, tuple: Tuple) -> Result<InsertOutcome> {
            self.inner.insert_unique(tuple).await
        }

        async fn replace(&self, tuple: Tuple) -> Result<()> {
            self.inner.replace(tuple).await
        }

        async fn delete_by_key(&self, key: &str) -> Result<()> {
            self.inner.delete_by_key(key).await
        }

        async fn truncate(&self) -> Result<()> {
            self.inner.truncate().await
        }

        async fn scan_batch(&self, cursor: ScanCursor, limit: usize) -> Result<ScanPage> {
            if !self.scan_failed.swap(true, Ordering::SeqCst) {
                return Err(CacheError::Store("connection reset".to_string()));
            }
            self.inner.scan_batch(cursor, limit).await
        }

        async fn estimated_size(&self) -> Result<u64> {
            self.inner.estimated_size().await
        }
    }

    fn expired_tuple(key: &str) -> Tuple {
        codec::encode(&CacheRecord {
            key: key.to_string(),
            expire_at: epoch_secs() - 60,
            value: Bytes::from_static(b"dead"),
        })
    }

    async fn plant_expired(store: &MemoryStore, keys: &[&str]) {
        for key in keys {
            store.replace(expired_tuple(key)).await.unwrap();
        }
    }

    fn fast_schedule() -> SweepSchedule {
        SweepSchedule::new(64, 1, false).unwrap()
    }

    // Pacing formula: batch 2 over a 6-tuple space with a 10s full-scan
    // target pauses ~3.33s between batches.
    #[test]
    fn test_batch_pause_targets_full_scan_duration() {
        let schedule = SweepSchedule::new(2, 10, false).unwrap();
        let pause = batch_pause(&schedule, 6);

        let secs = pause.as_secs_f64();
        assert!((secs - 10.0 * 2.0 / 6.0).abs() < 0.01, "pause was {secs}s");
    }

    #[test]
    fn test_batch_pause_caps_at_target() {
        // Batch covers the whole space in one pull.
        let schedule = SweepSchedule::new(100, 10, false).unwrap();
        assert_eq!(batch_pause(&schedule, 3), Duration::from_secs(10));
    }

    #[test]
    fn test_batch_pause_empty_space_waits_full_target() {
        let schedule = SweepSchedule::new(2, 10, false).unwrap();
        assert_eq!(batch_pause(&schedule, 0), Duration::from_secs(10));
    }

    #[test]
    fn test_start_outside_runtime_is_fatal() {
        let store = Arc::new(MemoryStore::new("test"));
        let result = ExpirationSweeper::start(store, SweepSchedule::default(), NodeRole::Primary);
        assert!(matches!(result, Err(CacheError::SweeperUnavailable(_))));
    }

    #[tokio::test]
    async fn test_sweeper_deletes_expired_and_keeps_live() {
        let store = Arc::new(MemoryStore::new("test"));
        let cache = CacheStore::new(store.clone());

        plant_expired(&store, &["dead1", "dead2", "dead3"]).await;
        cache.set("alive", Bytes::from_static(b"v"), 3600).await.unwrap();

        let sweeper =
            ExpirationSweeper::start(store.clone(), fast_schedule(), NodeRole::Primary).unwrap();

        // First batch covers the whole space and runs without delay.
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(store.point_lookup("dead1").await.unwrap().is_none());
        assert!(store.point_lookup("dead2").await.unwrap().is_none());
        assert!(store.point_lookup("dead3").await.unwrap().is_none());
        assert_eq!(cache.get("alive").await.unwrap(), Some(Bytes::from_static(b"v")));

        sweeper.stop();
    }

    #[tokio::test]
    async fn test_sweeper_never_deletes_unexpired_tuples() {
        let store = Arc::new(MemoryStore::new("test"));
        let cache = CacheStore::new(store.clone());

        for i in 0..10 {
            cache
                .set(&format!("key{i}"), Bytes::from_static(b"v"), 3600)
                .await
                .unwrap();
        }

        let sweeper =
            ExpirationSweeper::start(store.clone(), fast_schedule(), NodeRole::Primary).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.estimated_size().await.unwrap(), 10);
        sweeper.stop();
    }

    #[tokio::test]
    async fn test_sweeper_skips_malformed_tuple_and_keeps_sweeping() {
        let store = Arc::new(MemoryStore::new("test"));

        // Malformed tuple sorts before the expired one, so the sweep hits
        // it first and must carry on.
        store
            .replace(Tuple(vec![Field::Str("a-broken".to_string()), Field::Int(1)]))
            .await
            .unwrap();
        plant_expired(&store, &["z-dead"]).await;

        let sweeper =
            ExpirationSweeper::start(store.clone(), fast_schedule(), NodeRole::Primary).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(store.point_lookup("z-dead").await.unwrap().is_none());
        // The malformed tuple is skipped, not deleted.
        assert!(store.point_lookup("a-broken").await.unwrap().is_some());

        sweeper.stop();
    }

    #[tokio::test]
    async fn test_sweep_survives_transient_scan_error() {
        let store = Arc::new(FlakyStore::new());
        plant_expired(&store.inner, &["dead"]).await;

        let sweeper =
            ExpirationSweeper::start(store.clone(), fast_schedule(), NodeRole::Primary).unwrap();

        // The first scan fails; the loop must back off, retry, and still
        // reclaim the expired tuple.
        tokio::time::sleep(ERROR_BACKOFF + Duration::from_millis(500)).await;

        assert!(store.scan_failed.load(Ordering::SeqCst));
        assert!(store.inner.point_lookup("dead").await.unwrap().is_none());

        sweeper.stop();
    }

    #[tokio::test]
    async fn test_replica_without_participation_idles() {
        let store = Arc::new(MemoryStore::new("test"));
        plant_expired(&store, &["dead1", "dead2"]).await;

        let schedule = SweepSchedule::new(64, 1, false).unwrap();
        let sweeper =
            ExpirationSweeper::start(store.clone(), schedule, NodeRole::Replica).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Local predicate never ran; tuples await replicated deletes.
        assert_eq!(store.estimated_size().await.unwrap(), 2);

        sweeper.stop();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(sweeper.is_finished());
    }

    #[tokio::test]
    async fn test_replica_with_participation_sweeps() {
        let store = Arc::new(MemoryStore::new("test"));
        plant_expired(&store, &["dead1", "dead2"]).await;

        let schedule = SweepSchedule::new(64, 1, true).unwrap();
        let sweeper =
            ExpirationSweeper::start(store.clone(), schedule, NodeRole::Replica).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(store.estimated_size().await.unwrap(), 0);
        sweeper.stop();
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_terminates_task() {
        let store = Arc::new(MemoryStore::new("test"));
        let sweeper =
            ExpirationSweeper::start(store, fast_schedule(), NodeRole::Primary).unwrap();

        sweeper.stop();
        sweeper.stop();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sweeper.is_finished());

        // Still safe once the task has exited.
        sweeper.stop();
    }
}
