//! Background Tasks Module
//!
//! Contains the per-space expiration sweeper and its schedule.

mod schedule;
mod sweeper;

pub use schedule::{NodeRole, SweepSchedule, DEFAULT_BATCH_SIZE, DEFAULT_FULL_SCAN_SECS};
pub use sweeper::ExpirationSweeper;
