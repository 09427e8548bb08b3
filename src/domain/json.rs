//! JSON object model shared by contract arguments, results and proof inputs
//!
//! `serde_json::Map` is backed by a `BTreeMap`, so keys always iterate in
//! sorted order and `==` is a deep comparison. Text sent over the wire is
//! produced by RFC 8785 canonicalization so equal objects always yield the
//! same bytes.

use serde_json::Value;

/// String-keyed JSON object
pub type JsonObject = serde_json::Map<String, Value>;

/// Canonical JSON text of an object.
///
/// Falls back to `serde_json`'s own (already key-sorted) encoding in the one
/// case the canonicalizer rejects: non-finite floats, which `serde_json`
/// cannot hold anyway.
pub fn to_canonical_string(object: &JsonObject) -> String {
    let value = Value::Object(object.clone());
    serde_json_canonicalizer::to_string(&value).unwrap_or_else(|_| value.to_string())
}

/// Parse JSON text into an object.
///
/// Returns `None` for empty text, invalid JSON or a non-object value.
pub fn parse_object(text: &str) -> Option<JsonObject> {
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Compare two JSON texts by value, falling back to byte comparison when
/// either side is not valid JSON.
pub fn json_text_eq(left: &str, right: &str) -> bool {
    match (
        serde_json::from_str::<Value>(left),
        serde_json::from_str::<Value>(right),
    ) {
        (Ok(l), Ok(r)) => l == r,
        _ => left == right,
    }
}
