use serde_json::{Map, Value};

/// Whether an empty JSON object and an empty JSON array compare equal.
///
/// `Strict` keeps the container types apart; `Interchangeable` folds an
/// empty object into an empty array before comparison, for payloads built
/// by serializers that can't tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyContainers {
    Strict,
    Interchangeable,
}

impl Default for EmptyContainers {
    fn default() -> Self {
        EmptyContainers::Strict
    }
}

/// Rebuilds the value with every object's keys sorted ascending. Array
/// element order is preserved; order is semantically significant in
/// sequences, not in mappings.
pub fn canonicalize(value: &Value, empty_containers: EmptyContainers) -> Value {
    match value {
        Value::Object(map) => {
            if map.is_empty() && empty_containers == EmptyContainers::Interchangeable {
                return Value::Array(Vec::new());
            }

            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));

            let mut sorted = Map::new();
            for (key, item) in entries {
                sorted.insert(key.clone(), canonicalize(item, empty_containers));
            }

            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| canonicalize(item, empty_containers))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Canonical serialization; two values are equivalent iff their canonical
/// strings are byte-identical.
pub fn canonical_string(value: &Value, empty_containers: EmptyContainers) -> String {
    serde_json::to_string(&canonicalize(value, empty_containers))
        .expect("serializing a serde_json::Value cannot fail")
}

/// Canonicalizes a body string when it is valid JSON. Returns `None` for
/// anything that doesn't decode so the caller can fall back to raw string
/// comparison.
pub fn canonicalize_body(body: &str, empty_containers: EmptyContainers) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .map(|value| canonical_string(&value, empty_containers))
}
