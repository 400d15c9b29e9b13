//! Value encoding for storage and query operands
//!
//! Every stored value is JSON text. Encoding never fails: opaque values are
//! written as the JSON string of their display form, which means
//! `decode(encode(v)) != v` for any `v` containing [`Value::Opaque`].

use tracing::debug;

use crate::value::Value;

/// Encode a value as JSON text
pub fn encode(value: &Value) -> String {
    if value.contains_opaque() {
        debug!("value has no structured encoding, storing its display form");
    }

    value.to_json().to_string()
}

/// Decode stored text back into a value
///
/// Text that is not valid JSON (for example written by another process, or
/// through a raw operand) is returned as [`Value::Text`].
pub fn decode(text: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => Value::from(json),
        Err(_) => {
            debug!("stored text is not JSON, returning it verbatim");
            Value::Text(text.to_string())
        }
    }
}

/// Encode a value as a bound parameter; `Null` binds SQL NULL
pub fn encode_param(value: &Value) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(encode(value))
    }
}

/// The right-hand side of a filter clause
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    /// Reaches the query exactly as given, without JSON encoding. Use it for
    /// pattern operands such as `%foo%` where a quoted JSON string would
    /// never match.
    Raw(String),
}

impl Operand {
    /// Create a raw operand
    pub fn raw(text: impl Into<String>) -> Self {
        Operand::Raw(text.into())
    }

    /// Encode as a bound parameter, passing raw operands through unchanged
    pub fn encode(&self) -> Option<String> {
        match self {
            Operand::Value(value) => encode_param(value),
            Operand::Raw(text) => Some(text.clone()),
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

macro_rules! impl_operand_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_operand_from!(&str, String, bool, i32, i64, u32, u64, f64, serde_json::Value);
