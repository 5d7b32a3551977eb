//! Canonical payload serialization.
//!
//! A uniquely determined byte encoding of a JSON value: object keys are
//! emitted in lexicographic byte order at every nesting level, with no
//! insignificant whitespace. Two payloads with identical logical content
//! serialize to identical bytes regardless of field insertion order, which
//! makes the encoding safe to hash and sign.
//!
//! The sort is applied explicitly rather than relying on `serde_json`'s
//! internal map ordering, so the encoding cannot change under the
//! `preserve_order` feature being enabled elsewhere in a dependency graph.

use serde_json::Value;
use thiserror::Error;

use crate::payload::Payload;

/// Errors producing the canonical encoding.
#[derive(Debug, Error)]
pub enum CanonicalError {
    /// The value could not be represented as JSON (non-finite number,
    /// unsupported type, cyclic structure).
    #[error("payload is not canonically encodable: {0}")]
    Unrepresentable(#[from] serde_json::Error),

    /// A payload must be a JSON object at the top level.
    #[error("payload must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type name of the offending value.
        found: &'static str,
    },
}

/// Serialize a payload to its canonical byte encoding.
pub fn canonical_bytes(payload: &Payload) -> Result<Vec<u8>, CanonicalError> {
    let mut out = Vec::with_capacity(128);
    write_object(payload.as_map(), &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<(), CanonicalError> {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
            Ok(())
        }
        // Scalars already have a unique serde_json rendering.
        scalar => {
            let bytes = serde_json::to_vec(scalar)?;
            out.extend_from_slice(&bytes);
            Ok(())
        }
    }
}

fn write_object(
    map: &serde_json::Map<String, Value>,
    out: &mut Vec<u8>,
) -> Result<(), CanonicalError> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_unstable();

    out.push(b'{');
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        let key_bytes = serde_json::to_vec(key)?;
        out.extend_from_slice(&key_bytes);
        out.push(b':');
        // Key is known to exist.
        if let Some(value) = map.get(key.as_str()) {
            write_value(value, out)?;
        }
    }
    out.push(b'}');
    Ok(())
}
