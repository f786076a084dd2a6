//! Sweep Schedule
//!
//! Tunables for the expiration sweeper, validated at construction and
//! kept out of the sweeper's control flow so deployments can override
//! the engine defaults (e.g. a slower, larger-batch sweep for a
//! disk-backed store).

use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default tuples pulled per scan batch.
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Default target duration of one full keyspace scan, in seconds.
pub const DEFAULT_FULL_SCAN_SECS: u64 = 3600;

// == Node Role ==
/// Role of this node in the store's topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Primary,
    Replica,
}

// == Sweep Schedule ==
/// Validated sweeper configuration. Pure data, no behavior.
#[derive(Debug, Clone)]
pub struct SweepSchedule {
    batch_size: usize,
    target_full_scan: Duration,
    replica_participation: bool,
}

impl SweepSchedule {
    /// Validates and builds a schedule. Both tunables must be positive.
    pub fn new(
        batch_size: usize,
        target_full_scan_secs: u64,
        replica_participation: bool,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(CacheError::InvalidSchedule(
                "batch_size must be positive".to_string(),
            ));
        }
        if target_full_scan_secs == 0 {
            return Err(CacheError::InvalidSchedule(
                "target_full_scan_secs must be positive".to_string(),
            ));
        }
        Ok(Self {
            batch_size,
            target_full_scan: Duration::from_secs(target_full_scan_secs),
            replica_participation,
        })
    }

    /// Tuples pulled per scan batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Target duration of one full keyspace traversal.
    pub fn target_full_scan(&self) -> Duration {
        self.target_full_scan
    }

    /// Whether replicas run their own sweep instead of relying on
    /// deletions replicating from the primary.
    pub fn replica_participation(&self) -> bool {
        self.replica_participation
    }
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            target_full_scan: Duration::from_secs(DEFAULT_FULL_SCAN_SECS),
            replica_participation: false,
        }
    }
}
