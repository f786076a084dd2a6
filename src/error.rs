//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying tuple store failed (connectivity, timeout, storage).
    /// Propagated as-is; retry policy belongs to the store client.
    #[error("Store failure: {0}")]
    Store(String),

    /// Stored tuple has the wrong arity or field types
    #[error("Malformed tuple: {0}")]
    MalformedTuple(String),

    /// No task-hosting runtime available for the expiration sweeper
    #[error("Sweeper unavailable: {0}")]
    SweeperUnavailable(String),

    /// Sweep schedule failed validation
    #[error("Invalid sweep schedule: {0}")]
    InvalidSchedule(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
