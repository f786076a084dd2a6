//! Cache Store Module
//!
//! Foreground read/write path: get/set/add/delete/flush semantics on top
//! of raw tuple operations. Every call is a single round trip to the
//! store; no record state is held between calls.

use std::sync::Arc;

use bytes::Bytes;

use crate::cache::{codec, CacheRecord};
use crate::error::Result;
use crate::store::{InsertOutcome, TupleStore};

// == Cache Store ==
/// Key/value operations over one cache space.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn TupleStore>,
}

impl CacheStore {
    // == Constructor ==
    /// Wraps a tuple-store handle for one cache space.
    pub fn new(store: Arc<dyn TupleStore>) -> Self {
        Self { store }
    }

    // == Get ==
    /// Point lookup by key. `Ok(None)` is a miss.
    ///
    /// `expire_at` is NOT re-checked here: a logically-expired tuple the
    /// sweeper has not reached yet is still returned as a hit. Reclaim
    /// latency is bounded by the sweeper's full-scan target, not by
    /// reads.
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        match self.store.point_lookup(key).await? {
            Some(tuple) => Ok(Some(codec::decode_value(&tuple)?)),
            None => Ok(None),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl_secs` from now.
    ///
    /// Overwrites any existing tuple wholesale: key, expiry and value are
    /// replaced as one atomic store operation.
    pub async fn set(&self, key: &str, value: Bytes, ttl_secs: u64) -> Result<()> {
        let record = CacheRecord::with_ttl(key, value, ttl_secs);
        self.store.replace(codec::encode(&record)).await
    }

    // == Add ==
    /// Creation-only write.
    ///
    /// Returns `false` when the key already holds a live tuple, leaving
    /// the existing record untouched. Every other store failure
    /// propagates.
    pub async fn add(&self, key: &str, value: Bytes, ttl_secs: u64) -> Result<bool> {
        let record = CacheRecord::with_ttl(key, value, ttl_secs);
        match self.store.insert_unique(codec::encode(&record)).await? {
            InsertOutcome::Inserted => Ok(true),
            InsertOutcome::AlreadyExists => Ok(false),
        }
    }

    // == Delete ==
    /// Removes `key`. Deleting an absent key is a success.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete_by_key(key).await
    }

    // == Flush ==
    /// Truncates the whole space, expired and live tuples alike.
    pub async fn flush(&self) -> Result<()> {
        self.store.truncate().await
    }
}
