//! Cache Module
//!
//! Foreground engine: the record model, the record/tuple codec, and the
//! read/write path over the backing store.

pub mod codec;
mod record;
mod space;
mod store;


pub use record::{epoch_secs, is_expired, CacheRecord};
pub use space::CacheSpace;
pub use store::CacheStore;
