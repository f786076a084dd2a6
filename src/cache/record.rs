//! Cache Record
//!
//! The logical entry held in a cache space: key, absolute expiration
//! time, opaque value.

use bytes::Bytes;
use chrono::Utc;

// == Cache Record ==
/// A single cache entry.
///
/// `expire_at` is always an absolute timestamp supplied at write time;
/// the engine never stores relative durations. A record whose
/// `expire_at` is in the past is logically absent even while it is still
/// physically present, pending the sweeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Unique identity, immutable once created
    pub key: String,
    /// Epoch seconds after which the record is logically dead
    pub expire_at: i64,
    /// Opaque binary payload, never re-interpreted by the engine
    pub value: Bytes,
}

impl CacheRecord {
    /// Creates a record expiring `ttl_secs` from now.
    ///
    /// An oversized TTL saturates at the far future instead of wrapping
    /// into an instantly-expired record.
    pub fn with_ttl(key: impl Into<String>, value: Bytes, ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            key: key.into(),
            expire_at: epoch_secs().saturating_add(ttl),
            value,
        }
    }

    /// Whether this record is logically dead at `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        is_expired(self.expire_at, now)
    }
}

// == Expiration Predicate ==
/// The single expiration predicate shared by the sweeper and tests:
/// a record is dead once its expiration is strictly in the past.
pub fn is_expired(expire_at: i64, now: i64) -> bool {
    expire_at < now
}

// == Clock ==
/// Current Unix timestamp in whole seconds.
pub fn epoch_secs() -> i64 {
    Utc::now().timestamp()
}
