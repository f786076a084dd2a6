//! Tuple Representation
//!
//! Positional tuple values exchanged with the backing store, plus the
//! cursor and page types used by batched scans.

use bytes::Bytes;

// == Field ==
/// A single positional field of a stored tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// UTF-8 string (keys)
    Str(String),
    /// Signed integer (epoch-second timestamps)
    Int(i64),
    /// Opaque binary payload (values)
    Bytes(Bytes),
}

// == Tuple ==
/// A positional tuple as stored in the backing space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple(pub Vec<Field>);

impl Tuple {
    /// Number of fields.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Field at zero-based `index`, if present.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.0.get(index)
    }
}

// == Scan Cursor ==
/// Position of a batched scan over the keyspace.
///
/// `After(key)` resumes strictly after `key` in the store's key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCursor {
    Start,
    After(String),
}

// == Scan Page ==
/// One batch of tuples plus the cursor for the next batch.
///
/// `next == None` means the scan reached the end of the keyspace.
#[derive(Debug, Clone)]
pub struct ScanPage {
    pub tuples: Vec<Tuple>,
    pub next: Option<ScanCursor>,
}
