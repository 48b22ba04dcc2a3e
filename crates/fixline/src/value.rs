//! Typed values exchanged with fields, and the field classification.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Which typed accessors a field supports.
///
/// Resolved once from kind, length and attached format when the field is
/// built. Alphanumeric fields are `String`, `Date` or `Boolean`; numeric
/// fields are `Long`, `Integer`, `Double` or `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldType {
    String,
    Date,
    Boolean,
    Long,
    Integer,
    Double,
    Float,
}

impl FieldType {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Long | FieldType::Integer | FieldType::Double | FieldType::Float
        )
    }

    pub fn is_big_decimal(self) -> bool {
        matches!(self, FieldType::Double | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Long => "long",
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::Float => "float",
        };
        f.write_str(s)
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Long(i64),
    Integer(i32),
    Double(f64),
    Float(f32),
    Decimal(Decimal),
    Date(NaiveDateTime),
    Boolean(bool),
}

impl Value {
    /// The classification a field needs to accept this value.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::String(_) => FieldType::String,
            Value::Long(_) => FieldType::Long,
            Value::Integer(_) => FieldType::Integer,
            Value::Double(_) => FieldType::Double,
            Value::Float(_) => FieldType::Float,
            Value::Decimal(_) => FieldType::Double,
            Value::Date(_) => FieldType::Date,
            Value::Boolean(_) => FieldType::Boolean,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Date(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_types() {
        assert!(FieldType::Long.is_numeric());
        assert!(FieldType::Float.is_big_decimal());
        assert!(!FieldType::Integer.is_big_decimal());
        assert!(!FieldType::Date.is_numeric());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(51), Value::Integer(51));
        assert_eq!(Value::from(51i64), Value::Long(51));
        assert_eq!(Value::from("Paolo"), Value::String("Paolo".to_string()));
        assert_eq!(Value::from(true).field_type(), FieldType::Boolean);
    }
}
