//! Field sanitizer for reporter-supplied listing data.
//!
//! Every value is coerced to its string form and then filtered down to ASCII
//! letters, digits, `-`, `:`, space, `\n` and `\r`. Anything else is
//! stripped. The sanitizer never rejects a field; a value with nothing left
//! after filtering becomes `""`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Is `c` allowed to survive sanitization?
pub fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | ' ' | '\n' | '\r')
}

/// Strip every disallowed character from `raw`.
pub fn sanitize_str(raw: &str) -> String {
    raw.chars().filter(|c| is_allowed(*c)).collect()
}

/// Coerce a JSON value to its string form, then sanitize it.
///
/// Strings are taken as-is, scalars use their JSON text, and arrays/objects
/// their compact JSON encoding.
pub fn sanitize_value(value: &Value) -> String {
    match value {
        Value::String(s) => sanitize_str(s),
        other => sanitize_str(&other.to_string()),
    }
}

/// Sanitize every field of a raw server object.
pub fn sanitize_fields(fields: &Map<String, Value>) -> BTreeMap<String, String> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), sanitize_value(v)))
        .collect()
}
