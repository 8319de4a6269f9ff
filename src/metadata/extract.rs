//! Flattening the service's nested JSON into a [`MetadataRecord`]

use crate::types::{FetchOutcome, MetadataRecord, NOT_AVAILABLE, UserId};
use serde_json::Value;

/// Read the scalar at `pointer` (RFC 6901) as text.
///
/// Strings are returned verbatim, numbers and booleans in their JSON form.
/// A missing key, a missing or non-object parent, `null`, and objects or
/// arrays all yield [`NOT_AVAILABLE`].
pub fn text_at(value: &Value, pointer: &str) -> String {
    match value.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Build the record for a 200 response body.
///
/// Fields come from the `metadata` object; every field defaults on its own,
/// so a partially filled profile still yields a full row.
pub fn record_from_body(user_id: &UserId, body: &Value) -> MetadataRecord {
    let metadata = match body.get("metadata") {
        Some(m @ Value::Object(_)) => m,
        _ => &Value::Null,
    };

    let dob = format!(
        "{}-{}-{}",
        text_at(metadata, "/dob/day"),
        text_at(metadata, "/dob/month"),
        text_at(metadata, "/dob/year"),
    );

    MetadataRecord {
        user_id: user_id.clone(),
        display_name: text_at(metadata, "/displayName"),
        first_name: text_at(metadata, "/first_name"),
        last_name: text_at(metadata, "/last_name"),
        email: text_at(metadata, "/dh/newsLetter/email"),
        gender: text_at(metadata, "/gender"),
        dob,
        college: text_at(metadata, "/college"),
        outcome: FetchOutcome::Success,
    }
}
