//! Structured payload carried from transmitter to receiver.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical::CanonicalError;

/// Hex-encoded detached signature over the application fields.
pub const SIGNATURE_FIELD: &str = "signature";
/// Epoch seconds (f64) stamped at signing time.
pub const TIMESTAMP_FIELD: &str = "timestamp";
/// Fixed string identifying the sender build.
pub const BUILD_ID_FIELD: &str = "build_id";
/// 64-char lowercase hex SHA-256 content digest.
pub const FINGERPRINT_FIELD: &str = "fingerprint";

/// The four derived fields added by signing-time augmentation.
///
/// Everything else in a payload is an application field and is part of the
/// signed byte sequence.
pub const ENVELOPE_FIELDS: [&str; 4] = [
    SIGNATURE_FIELD,
    TIMESTAMP_FIELD,
    BUILD_ID_FIELD,
    FINGERPRINT_FIELD,
];

/// A structured payload: a JSON object of caller-supplied fields, augmented
/// (never replaced) with envelope fields once signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a payload from any serializable value that maps to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalError` if the value cannot be represented as JSON
    /// (e.g. a non-finite float) or does not serialize to an object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, CanonicalError> {
        let value = serde_json::to_value(value).map_err(CanonicalError::from)?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CanonicalError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Wrap an existing JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether the payload carries a signature envelope.
    pub fn is_signed(&self) -> bool {
        self.0.contains_key(SIGNATURE_FIELD)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy of this payload with every envelope field removed.
    ///
    /// This is the view the signer signs and the receiver verifies; both
    /// sides must reconstruct the identical byte sequence, so this is the
    /// only sanctioned way to obtain it.
    pub fn application_fields(&self) -> Payload {
        let mut map = self.0.clone();
        for field in ENVELOPE_FIELDS {
            map.remove(field);
        }
        Self(map)
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_serialize_accepts_objects() {
        let payload = Payload::from_serialize(&json!({"event": "x", "value": 1})).unwrap();
        assert_eq!(payload.get("event"), Some(&json!("x")));
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_from_serialize_rejects_non_objects() {
        let err = Payload::from_serialize(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, CanonicalError::NotAnObject { found: "array" }));
    }

    #[test]
    fn test_from_serialize_rejects_non_finite() {
        assert!(Payload::from_serialize(&f64::NAN).is_err());
    }

    #[test]
    fn test_application_fields_strips_envelope() {
        let mut payload = Payload::from_serialize(&json!({"event": "x"})).unwrap();
        payload.insert(SIGNATURE_FIELD, json!("aa"));
        payload.insert(TIMESTAMP_FIELD, json!(1.0));
        payload.insert(BUILD_ID_FIELD, json!("BRG"));
        payload.insert(FINGERPRINT_FIELD, json!("ff"));
        assert!(payload.is_signed());

        let app = payload.application_fields();
        assert_eq!(app.len(), 1);
        assert!(!app.is_signed());
        assert_eq!(app.get("event"), Some(&json!("x")));
    }
}
