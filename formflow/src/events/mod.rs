//! Form lifecycle events.
//!
//! Every form emits a small set of events to its configured [`EventSink`].
//! Payloads always carry the form name, the form instance id and a UTC
//! timestamp, plus event-specific fields.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

/// A field failed validation during input, blur or `set_value`.
pub const FIELD_INVALID: &str = "form.field.invalid";
/// A full validation pass finished.
pub const VALIDATED: &str = "form.validated";
/// A submission passed validation and the callback was invoked.
pub const SUBMITTED: &str = "form.submitted";
/// A submission was rejected, by validation or by typed conversion.
pub const SUBMIT_REJECTED: &str = "form.submit.rejected";
/// One field or the whole form was reset.
pub const RESET: &str = "form.reset";

/// Builds an event payload with the common envelope fields.
#[must_use]
pub fn event_payload(form: &str, form_id: Uuid, fields: Value) -> Value {
    let mut payload = Map::new();
    payload.insert("form".to_string(), Value::String(form.to_string()));
    payload.insert("form_id".to_string(), Value::String(form_id.to_string()));
    payload.insert("timestamp".to_string(), Value::String(Utc::now().to_rfc3339()));
    if let Value::Object(extra) = fields {
        payload.extend(extra);
    }
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_envelope() {
        let id = Uuid::new_v4();
        let payload = event_payload("signup", id, json!({"valid": true}));
        assert_eq!(payload["form"], "signup");
        assert_eq!(payload["form_id"], id.to_string());
        assert_eq!(payload["valid"], true);
        assert!(payload["timestamp"].is_string());
    }

    #[test]
    fn test_payload_ignores_non_object_fields() {
        let payload = event_payload("signup", Uuid::nil(), Value::Null);
        assert_eq!(payload.as_object().map(Map::len), Some(3));
    }
}
