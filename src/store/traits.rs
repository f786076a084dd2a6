//! Tuple Store Contract
//!
//! Minimum interface an underlying tuple store must provide. All
//! concurrency control lives behind this boundary: point operations are
//! each atomic for a single tuple; a batched scan is a sequence of
//! independent reads, not one atomic operation.

use async_trait::async_trait;

use crate::error::Result;
use crate::store::{ScanCursor, ScanPage, Tuple};

// == Insert Outcome ==
/// Result of a creation-only insert.
///
/// "Already exists" is a distinguishable outcome rather than an error,
/// so callers can map it to domain semantics without intercepting store
/// failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

// == Tuple Store Trait ==
/// Keyed tuple storage with unique-key point operations and batched
/// cursor-ordered scans.
#[async_trait]
pub trait TupleStore: Send + Sync {
    /// Unique-key point lookup.
    async fn point_lookup(&self, key: &str) -> Result<Option<Tuple>>;

    /// Creation-only insert; reports `AlreadyExists` instead of failing
    /// when the key already holds a live tuple.
    async fn insert_unique(&self, tuple: Tuple) -> Result<InsertOutcome>;

    /// Unconditional upsert keyed by the tuple's first field.
    async fn replace(&self, tuple: Tuple) -> Result<()>;

    /// Delete by key; deleting an absent key is a success.
    async fn delete_by_key(&self, key: &str) -> Result<()>;

    /// Remove every tuple in the space.
    async fn truncate(&self) -> Result<()>;

    /// Pull up to `limit` tuples in key order starting at `cursor`.
    /// Cursor order must be stable across calls.
    async fn scan_batch(&self, cursor: ScanCursor, limit: usize) -> Result<ScanPage>;

    /// Approximate number of live tuples; consumed only for sweep
    /// pacing, so staleness is acceptable.
    async fn estimated_size(&self) -> Result<u64>;
}
