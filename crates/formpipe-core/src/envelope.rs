//! Wire envelope decoding
//!
//! Tagged-union decode at the boundary: a body either matches the success
//! envelope `{"status": "ok", "data": <defined>}`, the validation envelope
//! `{"message": ..., "errors": [...]}`, or neither. Nothing duck-typed
//! survives past this module.

use crate::types::{FieldError, Record};
use serde::Deserialize;
use serde_json::Value;

/// The successful wire envelope: `{"status": "ok", "data": <T>}`
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessEnvelope {
    /// The `data` payload, verbatim
    pub data: Value,
}

impl SuccessEnvelope {
    /// Shape check without extracting the payload
    #[inline]
    #[must_use]
    pub fn matches(body: &Value) -> bool {
        body.get("status").and_then(Value::as_str) == Some("ok") && body.get("data").is_some()
    }

    /// Decode the envelope, returning the `data` payload
    #[must_use]
    pub fn decode(body: &Value) -> Option<Self> {
        if Self::matches(body) {
            body.get("data").cloned().map(|data| Self { data })
        } else {
            None
        }
    }

    /// Decode the envelope and require an object payload
    #[must_use]
    pub fn decode_record(body: &Value) -> Option<Record> {
        Self::decode(body).and_then(|envelope| Record::from_value(envelope.data))
    }
}

/// The validation failure envelope:
/// `{"message": string, "errors": [{"field", "code", "message"}, ...]}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationEnvelope {
    /// Overall message from the server
    pub message: String,
    /// Field-level errors, order preserved
    pub errors: Vec<FieldError>,
}

impl ValidationEnvelope {
    /// Decode the envelope; `None` when the body has another shape
    #[must_use]
    pub fn decode(body: &Value) -> Option<Self> {
        serde_json::from_value(body.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_matches_ok_shape() {
        assert!(SuccessEnvelope::matches(&json!({"status": "ok", "data": {"id": 1}})));
        // data may be any defined value, including null
        assert!(SuccessEnvelope::matches(&json!({"status": "ok", "data": null})));
    }

    #[test]
    fn success_envelope_rejects_other_shapes() {
        assert!(!SuccessEnvelope::matches(&json!({"foo": "bar"})));
        assert!(!SuccessEnvelope::matches(&json!({"status": "ok"})));
        assert!(!SuccessEnvelope::matches(&json!({"status": "error", "data": 1})));
        assert!(!SuccessEnvelope::matches(&json!("ok")));
        assert!(!SuccessEnvelope::matches(&Value::Null));
    }

    #[test]
    fn success_envelope_yields_data_verbatim() {
        let envelope =
            SuccessEnvelope::decode(&json!({"status": "ok", "data": {"name": "ada"}})).unwrap();
        assert_eq!(envelope.data, json!({"name": "ada"}));
    }

    #[test]
    fn decode_record_requires_object_data() {
        assert!(SuccessEnvelope::decode_record(&json!({"status": "ok", "data": {"id": 1}}))
            .is_some());
        assert!(SuccessEnvelope::decode_record(&json!({"status": "ok", "data": [1, 2]})).is_none());
    }

    #[test]
    fn validation_envelope_decodes_errors_in_order() {
        let body = json!({
            "message": "Validation failed",
            "errors": [
                {"field": "name", "code": "required", "message": "Name is required."},
                {"field": "email", "code": "format", "message": "Invalid email."},
            ],
        });
        let envelope = ValidationEnvelope::decode(&body).unwrap();
        assert_eq!(envelope.errors.len(), 2);
        assert_eq!(envelope.errors[0].field, "name");
        assert_eq!(envelope.errors[1].code, "format");
    }

    #[test]
    fn validation_envelope_rejects_wrong_shape() {
        assert!(ValidationEnvelope::decode(&json!({"message": "no errors key"})).is_none());
        assert!(ValidationEnvelope::decode(&json!({"errors": []})).is_none());
        assert!(ValidationEnvelope::decode(&json!(null)).is_none());
    }
}
