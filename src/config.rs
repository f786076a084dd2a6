//! Configuration Module
//!
//! Handles loading engine configuration from environment variables with
//! sensible defaults.

use std::env;

use crate::tasks::{DEFAULT_BATCH_SIZE, DEFAULT_FULL_SCAN_SECS};

// == Storage Engine ==
/// Backend hint passed through to store construction: memory-resident or
/// disk-backed. The cache engine itself treats both identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageEngine {
    #[default]
    Memory,
    Disk,
}

impl StorageEngine {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "memory" => Some(Self::Memory),
            "disk" => Some(Self::Disk),
            _ => None,
        }
    }
}

// == Config ==
/// Engine configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Space/table name the cache lives in
    pub space: String,
    /// Storage backend hint for store construction. The engine never
    /// builds stores itself; whoever constructs the `TupleStore` handed
    /// to `CacheSpace::open` is responsible for honoring this hint.
    pub engine: StorageEngine,
    /// Tuples pulled per sweep batch
    pub sweep_batch_size: usize,
    /// Target duration of one full sweep of the keyspace, in seconds
    pub sweep_full_scan_secs: u64,
    /// Whether replicas run their own sweep
    pub sweep_on_replica: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SPACE` - Space name (default: "cache")
    /// - `CACHE_ENGINE` - "memory" or "disk" (default: "memory")
    /// - `SWEEP_BATCH_SIZE` - Tuples per sweep batch (default: 1024)
    /// - `SWEEP_FULL_SCAN_SECS` - Full-scan target in seconds (default: 3600)
    /// - `SWEEP_ON_REPLICA` - Sweep on replica nodes (default: false)
    pub fn from_env() -> Self {
        Self {
            space: env::var("CACHE_SPACE").unwrap_or_else(|_| "cache".to_string()),
            engine: env::var("CACHE_ENGINE")
                .ok()
                .and_then(|v| StorageEngine::parse(&v))
                .unwrap_or_default(),
            sweep_batch_size: env::var("SWEEP_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BATCH_SIZE),
            sweep_full_scan_secs: env::var("SWEEP_FULL_SCAN_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FULL_SCAN_SECS),
            sweep_on_replica: env::var("SWEEP_ON_REPLICA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            space: "cache".to_string(),
            engine: StorageEngine::Memory,
            sweep_batch_size: DEFAULT_BATCH_SIZE,
            sweep_full_scan_secs: DEFAULT_FULL_SCAN_SECS,
            sweep_on_replica: false,
        }
    }
}
