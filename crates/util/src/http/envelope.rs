//! List-response envelopes.
//!
//! The two remote API surfaces answer list calls differently: a bare array, or
//! an object wrapping the array under `data` or `workflows`. The versioned API
//! also paginates with a `nextCursor` field next to `data`.

use serde_json::Value;

/// Wrapper keys checked, in order, when a list response is an object.
pub const LIST_ENVELOPE_KEYS: &[&str] = &["data", "workflows"];

/// Items and pagination state extracted from one list response.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

/// Extract list items from a response payload.
///
/// - A bare array is used as is.
/// - An object yields the first key in `envelope_keys` that is present. A
///   present key holding something other than an array yields no items, and so
///   does an object holding none of the keys.
/// - Any other payload is not a list response and yields `None`.
pub fn extract_list_page(payload: Value, envelope_keys: &[&str]) -> Option<ListPage> {
    match payload {
        Value::Array(items) => Some(ListPage {
            items,
            next_cursor: None,
        }),
        Value::Object(mut map) => {
            let next_cursor = match map.remove("nextCursor") {
                Some(Value::String(cursor)) if !cursor.is_empty() => Some(cursor),
                _ => None,
            };
            let items = envelope_keys
                .iter()
                .find_map(|key| map.remove(*key))
                .map(|value| match value {
                    Value::Array(items) => items,
                    _ => Vec::new(),
                })
                .unwrap_or_default();
            Some(ListPage { items, next_cursor })
        }
        _ => None,
    }
}

/// Pull an identifier out of a write response, unwrapping a `data` envelope.
pub fn extract_entity_id(payload: &Value) -> Option<String> {
    let entity = match payload.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => payload,
    };
    match entity.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
