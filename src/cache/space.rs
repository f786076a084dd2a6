//! Cache Space
//!
//! Ties one store handle to its expiration sweeper so both are
//! provisioned and torn down as a unit.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::store::TupleStore;
use crate::tasks::{ExpirationSweeper, NodeRole, SweepSchedule};

// == Cache Space ==
/// One provisioned cache space: foreground operations plus the sweeper
/// that reclaims its expired tuples.
pub struct CacheSpace {
    store: CacheStore,
    sweeper: ExpirationSweeper,
}

impl CacheSpace {
    // == Open ==
    /// Provisions a cache space over `store`.
    ///
    /// Builds the validated sweep schedule from `config` and starts the
    /// sweeper. When the sweeper cannot start, initialization fails
    /// rather than running without eviction.
    pub fn open(store: Arc<dyn TupleStore>, config: &Config, role: NodeRole) -> Result<Self> {
        let schedule = SweepSchedule::new(
            config.sweep_batch_size,
            config.sweep_full_scan_secs,
            config.sweep_on_replica,
        )?;
        let sweeper = ExpirationSweeper::start(Arc::clone(&store), schedule, role)?;
        info!(space = %config.space, "cache space opened");

        Ok(Self {
            store: CacheStore::new(store),
            sweeper,
        })
    }

    // == Foreground Operations ==
    /// Point lookup by key; `Ok(None)` is a miss.
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.store.get(key).await
    }

    /// Stores `value` under `key`, expiring `ttl_secs` from now.
    pub async fn set(&self, key: &str, value: Bytes, ttl_secs: u64) -> Result<()> {
        self.store.set(key, value, ttl_secs).await
    }

    /// Creation-only write; `false` when the key already exists.
    pub async fn add(&self, key: &str, value: Bytes, ttl_secs: u64) -> Result<bool> {
        self.store.add(key, value, ttl_secs).await
    }

    /// Removes `key`; absent keys are a success.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key).await
    }

    /// Truncates the whole space.
    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    // == Shutdown ==
    /// Stops the sweeper. Idempotent; safe when the task already exited.
    pub fn shutdown(&self) {
        self.sweeper.stop();
        info!("cache space shut down");
    }

    /// True once the sweep task has exited.
    pub fn sweeper_finished(&self) -> bool {
        self.sweeper.is_finished()
    }
}
