//! In-Memory Tuple Store
//!
//! Reference `TupleStore` backed by an ordered map. Key order is
//! lexicographic, which gives batched scans a stable cursor order.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{Field, InsertOutcome, ScanCursor, ScanPage, Tuple, TupleStore};

// == Memory Store ==
/// Memory-resident tuple store, one instance per cache space.
#[derive(Debug)]
pub struct MemoryStore {
    /// Space label, carried for logging only
    space: String,
    /// Tuples keyed by their first field
    tuples: RwLock<BTreeMap<String, Tuple>>,
}

impl MemoryStore {
    /// Creates an empty store for the named space.
    pub fn new(space: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            tuples: RwLock::new(BTreeMap::new()),
        }
    }

    /// Space label this store was opened with.
    pub fn space(&self) -> &str {
        &self.space
    }

    fn key_of(tuple: &Tuple) -> Result<String> {
        match tuple.field(0) {
            Some(Field::Str(key)) => Ok(key.clone()),
            other => Err(CacheError::MalformedTuple(format!(
                "field 1: expected string key, got {:?}",
                other
            ))),
        }
    }
}

#[async_trait]
impl TupleStore for MemoryStore {
    async fn point_lookup(&self, key: &str) -> Result<Option<Tuple>> {
        Ok(self.tuples.read().await.get(key).cloned())
    }

    async fn insert_unique(&self, tuple: Tuple) -> Result<InsertOutcome> {
        let key = Self::key_of(&tuple)?;
        let mut tuples = self.tuples.write().await;
        if tuples.contains_key(&key) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        tuples.insert(key, tuple);
        Ok(InsertOutcome::Inserted)
    }

    async fn replace(&self, tuple: Tuple) -> Result<()> {
        let key = Self::key_of(&tuple)?;
        self.tuples.write().await.insert(key, tuple);
        Ok(())
    }

    async fn delete_by_key(&self, key: &str) -> Result<()> {
        self.tuples.write().await.remove(key);
        Ok(())
    }

    async fn truncate(&self) -> Result<()> {
        let mut tuples = self.tuples.write().await;
        let dropped = tuples.len();
        tuples.clear();
        debug!(space = %self.space, dropped, "space truncated");
        Ok(())
    }

    async fn scan_batch(&self, cursor: ScanCursor, limit: usize) -> Result<ScanPage> {
        let tuples = self.tuples.read().await;
        let lower = match &cursor {
            ScanCursor::Start => Bound::Unbounded,
            ScanCursor::After(key) => Bound::Excluded(key.clone()),
        };

        let mut page = Vec::with_capacity(limit.min(tuples.len()));
        let mut last_key = None;
        for (key, tuple) in tuples.range((lower, Bound::Unbounded)).take(limit) {
            page.push(tuple.clone());
            last_key = Some(key.clone());
        }

        // A short page means the range is exhausted.
        let next = if page.len() < limit {
            None
        } else {
            last_key.map(ScanCursor::After)
        };
        Ok(ScanPage { tuples: page, next })
    }

    async fn estimated_size(&self) -> Result<u64> {
        Ok(self.tuples.read().await.len() as u64)
    }
}
