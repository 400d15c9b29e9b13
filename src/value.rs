//! Document value model
//!
//! Documents are string-keyed maps of [`Value`]. A value is one of the shapes
//! JSON can carry, plus [`Value::Opaque`] for things that only have a display
//! form.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

/// A schemaless document: one row of the backing table
pub type Document = BTreeMap<String, Value>;

/// A single document value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
    /// Pre-rendered display form of a value with no structured encoding.
    /// Stored as text; it comes back as [`Value::Text`].
    Opaque(String),
}

impl Value {
    /// Wrap anything printable as an opaque value
    pub fn opaque(value: impl fmt::Display) -> Self {
        Value::Opaque(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value, or anything nested in it, is opaque
    pub fn contains_opaque(&self) -> bool {
        match self {
            Value::Opaque(_) => true,
            Value::Sequence(items) => items.iter().any(Value::contains_opaque),
            Value::Mapping(map) => map.values().any(Value::contains_opaque),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to a JSON value. Opaque values become JSON strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::Text(s) | Value::Opaque(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Mapping(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) | Value::Opaque(s) => f.write_str(s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::Text(s) | Value::Opaque(s) => serializer.serialize_str(s),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for Value {
    /// NaN and infinities have no JSON number form; they fall back to their
    /// display string.
    fn from(f: f64) -> Self {
        match Number::from_f64(f) {
            Some(n) => Value::Number(n),
            None => Value::opaque(f),
        }
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::from(f as f64)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Mapping(map)
    }
}

/// Build a [`Document`] from a JSON object. Returns `None` for any other JSON shape.
pub fn document_from_json(value: serde_json::Value) -> Option<Document> {
    match Value::from(value) {
        Value::Mapping(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let value = Value::from(json!({"a": [1, "two", null], "b": {"c": true}}));

        let Value::Mapping(map) = value else {
            panic!("Expected Mapping");
        };
        assert_eq!(
            map["a"],
            Value::Sequence(vec![Value::from(1), Value::from("two"), Value::Null])
        );
        assert_eq!(map["b"], Value::Mapping(BTreeMap::from([("c".to_string(), Value::Bool(true))])));
    }

    #[test]
    fn test_to_json_opaque_becomes_string() {
        let value = Value::Sequence(vec![Value::opaque("<function map>"), Value::from(2)]);
        assert_eq!(value.to_json(), json!(["<function map>", 2]));
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let mut map = BTreeMap::new();
        map.insert("f".to_string(), Value::opaque("<function map>"));
        map.insert("n".to_string(), Value::from(json!([1, null, {"a": true}])));
        let value = Value::Mapping(map);

        assert_eq!(serde_json::to_value(&value).unwrap(), value.to_json());
    }

    #[test]
    fn test_non_finite_float_is_opaque() {
        assert_eq!(Value::from(f64::NAN), Value::Opaque("NaN".to_string()));
        assert_eq!(Value::from(f64::INFINITY), Value::Opaque("inf".to_string()));
        assert_eq!(Value::from(2.75).as_f64(), Some(2.75));
    }

    #[test]
    fn test_contains_opaque() {
        assert!(!Value::from(json!({"a": [1, 2]})).contains_opaque());
        assert!(Value::Sequence(vec![Value::Sequence(vec![Value::opaque(1)])]).contains_opaque());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1,2]");
    }

    #[test]
    fn test_document_from_json() {
        let doc = document_from_json(json!({"title": "a", "n": 1})).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc["n"].as_i64(), Some(1));

        assert!(document_from_json(json!([1, 2])).is_none());
    }
}
