use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// True when no string anywhere in the tree is non-empty and no list has an
/// element. Absent, null and empty are all the same thing here.
pub fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(_) => false,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.values().all(value_is_empty),
    }
}

/// Works over the serialized form so nesting depth and field names never
/// need to be known up front. A value that cannot be serialized counts as
/// empty, so nothing is generated from it.
pub fn is_empty<T: Serialize>(selections: &T) -> bool {
    match serde_json::to_value(selections) {
        Ok(value) => value_is_empty(&value),
        Err(err) => {
            warn!("Treating unserializable selections as empty: {}", err);
            true
        }
    }
}
