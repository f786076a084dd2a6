//! Tuplecache - TTL-indexed key/value cache engine
//!
//! Presents get/set/add/delete/flush semantics on top of an external
//! tuple store and reclaims expired entries with a paced background
//! sweeper. The store owns all record storage; this crate is a stateless
//! coordinator over it.

pub mod cache;
pub mod config;
pub mod error;
pub mod store;
pub mod tasks;

pub use cache::{CacheRecord, CacheSpace, CacheStore};
pub use config::{Config, StorageEngine};
pub use error::{CacheError, Result};
pub use store::{MemoryStore, TupleStore};
pub use tasks::{ExpirationSweeper, NodeRole, SweepSchedule};
