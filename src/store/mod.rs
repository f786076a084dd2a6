//! Store Module
//!
//! The tuple-store boundary: wire types, the minimum contract an
//! underlying store must provide, and an in-memory reference
//! implementation used by tests and memory-backed deployments.

mod memory;
mod traits;
mod tuple;

pub use memory::MemoryStore;
pub use traits::{InsertOutcome, TupleStore};
pub use tuple::{Field, ScanCursor, ScanPage, Tuple};
