//! Record Codec
//!
//! Bidirectional mapping between `CacheRecord` and the store's
//! positional tuple layout `[key, expire_at, value]`. The value field is
//! wrapped as an opaque binary payload and never type-coerced.

use bytes::Bytes;

use crate::cache::CacheRecord;
use crate::error::{CacheError, Result};
use crate::store::{Field, Tuple};

/// Fields per stored cache tuple.
pub const TUPLE_ARITY: usize = 3;

// == Encode ==
/// Encodes a record into the positional layout.
pub fn encode(record: &CacheRecord) -> Tuple {
    Tuple(vec![
        Field::Str(record.key.clone()),
        Field::Int(record.expire_at),
        Field::Bytes(record.value.clone()),
    ])
}

// == Decode ==
/// Decodes a full record, validating arity and every field type.
pub fn decode(tuple: &Tuple) -> Result<CacheRecord> {
    check_arity(tuple)?;
    let key = decode_key(tuple)?;
    let expire_at = decode_expire_at(tuple)?;
    let value = decode_value_field(tuple)?;
    Ok(CacheRecord {
        key,
        expire_at,
        value,
    })
}

/// Read-path decode: extracts the value field only. `expire_at` is left
/// unexamined, so a logically-expired tuple still decodes as a hit.
pub fn decode_value(tuple: &Tuple) -> Result<Bytes> {
    check_arity(tuple)?;
    decode_value_field(tuple)
}

/// Sweep-path decode: key and expiration time only.
pub fn decode_expiry(tuple: &Tuple) -> Result<(String, i64)> {
    check_arity(tuple)?;
    Ok((decode_key(tuple)?, decode_expire_at(tuple)?))
}

// == Field Helpers ==
fn check_arity(tuple: &Tuple) -> Result<()> {
    if tuple.arity() != TUPLE_ARITY {
        return Err(CacheError::MalformedTuple(format!(
            "expected {} fields, got {}",
            TUPLE_ARITY,
            tuple.arity()
        )));
    }
    Ok(())
}

fn decode_key(tuple: &Tuple) -> Result<String> {
    match tuple.field(0) {
        Some(Field::Str(key)) => Ok(key.clone()),
        other => Err(type_error(1, "string", other)),
    }
}

fn decode_expire_at(tuple: &Tuple) -> Result<i64> {
    match tuple.field(1) {
        Some(Field::Int(expire_at)) => Ok(*expire_at),
        other => Err(type_error(2, "integer", other)),
    }
}

fn decode_value_field(tuple: &Tuple) -> Result<Bytes> {
    match tuple.field(2) {
        Some(Field::Bytes(value)) => Ok(value.clone()),
        other => Err(type_error(3, "bytes", other)),
    }
}

fn type_error(position: usize, expected: &str, got: Option<&Field>) -> CacheError {
    CacheError::MalformedTuple(format!(
        "field {}: expected {}, got {:?}",
        position, expected, got
    ))
}
