//! Raw and normalized option values.
//!
//! Callers hand the registry a [`RawValue`] (anything a user might type or a
//! program might pass). Validators turn it into a [`Value`], which is what the
//! tree stores as defaults and current values.

use serde::Serialize;
use std::fmt;

/// Unvalidated input to a validator.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Byte strings are decoded as UTF-8 by the text validators.
    Bytes(Vec<u8>),
}

impl RawValue {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Text(_) => "str",
            RawValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Text(s) => write!(f, "'{}'", s),
            RawValue::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(i64::from(v))
    }
}

impl From<u16> for RawValue {
    fn from(v: u16) -> Self {
        RawValue::Int(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<&[u8]> for RawValue {
    fn from(v: &[u8]) -> Self {
        RawValue::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(v: Vec<u8>) -> Self {
        RawValue::Bytes(v)
    }
}

impl From<Value> for RawValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Bool(b) => RawValue::Bool(b),
            Value::Int(i) => RawValue::Int(i),
            Value::Float(x) => RawValue::Float(x),
            Value::Str(s) => RawValue::Text(s),
        }
    }
}

/// A validated option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, with ints widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way describe output shows it: strings quoted,
    /// everything else bare.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_int() == Some(i64::from(*other))
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repr_quotes_strings_only() {
        assert_eq!(Value::from("tuple").repr(), "'tuple'");
        assert_eq!(Value::from("").repr(), "''");
        assert_eq!(Value::Int(3306).repr(), "3306");
        assert_eq!(Value::Bool(false).repr(), "false");
    }

    #[test]
    fn test_as_float_widens_ints() {
        assert_eq!(Value::Int(2).as_float(), Some(2.0));
        assert_eq!(Value::Str("2".into()).as_float(), None);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_value(vec![
            Value::Bool(true),
            Value::Int(7),
            Value::Str("dict".into()),
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!([true, 7, "dict"]));
    }

    #[test]
    fn test_raw_from_value_keeps_type() {
        assert_eq!(RawValue::from(Value::Int(5)), RawValue::Int(5));
        assert_eq!(
            RawValue::from(Value::Str("x".into())),
            RawValue::Text("x".into())
        );
    }
}
