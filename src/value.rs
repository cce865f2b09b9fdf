use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::data_type::DataType;

/// Represents a single data value stored in the database.
///
/// This enum wraps all supported Rust types into a single type that can be
/// passed around the engine. It includes support for SQL `NULL` values.
///
/// Values are used as keys of the primary-key and unique indexes, so equality
/// is total: two floats are equal when their bit patterns are (with `-0.0`
/// read as `0.0`), and `Null` equals `Null`. Values of different kinds never
/// compare equal; [Value::sql_eq] is the comparison queries use.
#[derive(Debug, Clone)]
pub enum Value {
    /// represents an empty or missing value.
    Null,
    /// A 64-bit signed integer value.
    Int(i64),
    /// A 64-bit floating-point value.
    Float(f64),
    /// A UTF-8 string value, wrapped in an [Arc] for efficient,
    /// thread-safe sharing and cheap cloning.
    Text(Arc<str>),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// Returns `true` if the value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the logical [DataType] corresponding to this value.
    ///
    /// Returns `None` if the value is [Value::Null], because a standalone NULL
    /// value is untyped until it is placed in a column.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Int(_) => Some(DataType::Int),
            Self::Float(_) => Some(DataType::Float),
            Self::Text(_) => Some(DataType::Text),
            Self::Bool(_) => Some(DataType::Bool),
        }
    }

    /// Converts an integer into a float when the target type is `FLOAT`.
    /// Every other combination is returned untouched.
    pub fn widen_to(self, target: DataType) -> Value {
        match (self, target) {
            (Self::Int(i), DataType::Float) => Self::Float(i as f64),
            (value, _) => value,
        }
    }

    /// Equality as seen by `WHERE` and `JOIN ... ON`: like `==`, except that
    /// an integer and a float compare by numeric value.
    ///
    /// ```
    /// # use rdbms::Value;
    /// assert!(Value::Int(1).sql_eq(&Value::Float(1.0)));
    /// assert!(!Value::Int(1).sql_eq(&Value::from("1")));
    /// assert!(Value::Null.sql_eq(&Value::Null));
    /// ```
    pub fn sql_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => *i as f64 == *f,
            _ => self == other,
        }
    }
}

/// Bits of a float with both zeroes folded together.
fn float_bits(f: f64) -> u64 {
    if f == 0.0 { 0 } else { f.to_bits() }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(l), Self::Int(r)) => l == r,
            (Self::Float(l), Self::Float(r)) => float_bits(*l) == float_bits(*r),
            (Self::Text(l), Self::Text(r)) => l == r,
            (Self::Bool(l), Self::Bool(r)) => l == r,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Int(i) => i.hash(state),
            Self::Float(f) => float_bits(*f).hash(state),
            Self::Text(s) => s.hash(state),
            Self::Bool(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps the trailing `.0` so floats read back as floats
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(Arc::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // ─────────────────────────────────────────────────────────────
    // Test 1 : null
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(1).is_null());
        assert!(!Value::Text("".into()).is_null());
    }

    // ─────────────────────────────────────────────────────────────
    // Test 2 : data_type
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Int(1).data_type(), Some(DataType::Int));
        assert_eq!(Value::Float(1.0).data_type(), Some(DataType::Float));
        assert_eq!(Value::Text("x".into()).data_type(), Some(DataType::Text));
        assert_eq!(Value::Bool(true).data_type(), Some(DataType::Bool));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 3 : equality is by tag
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Int(10), Value::Int(10));
        assert_ne!(Value::Int(10), Value::Int(20));
        assert_eq!(Value::Float(1.5), Value::Float(1.5));
        assert_eq!(Value::Text("abc".into()), Value::Text("abc".into()));
        assert_ne!(Value::Bool(true), Value::Bool(false));

        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Null, Value::Int(0));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 4 : usable as an index key
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_hash_set_membership() {
        let mut set = HashSet::new();
        assert!(set.insert(Value::Text("Alice".into())));
        assert!(set.insert(Value::Null));
        assert!(set.insert(Value::Float(2.5)));

        assert!(!set.insert(Value::Text("Alice".into())));
        assert!(!set.insert(Value::Null));
        assert!(set.contains(&Value::Float(2.5)));
        assert!(!set.contains(&Value::Int(2)));
    }

    #[test]
    fn test_signed_zeroes_are_one_value() {
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));

        let mut set = HashSet::new();
        assert!(set.insert(Value::Float(0.0)));
        assert!(!set.insert(Value::Float(-0.0)));
    }

    #[test]
    fn test_sql_eq_compares_numbers_across_kinds() {
        assert!(Value::Int(30).sql_eq(&Value::Float(30.0)));
        assert!(Value::Float(30.0).sql_eq(&Value::Int(30)));
        assert!(!Value::Int(30).sql_eq(&Value::Float(30.5)));
        assert!(Value::Float(-0.0).sql_eq(&Value::Int(0)));

        assert!(Value::from("a").sql_eq(&Value::from("a")));
        assert!(!Value::Int(1).sql_eq(&Value::Bool(true)));
        assert!(!Value::Null.sql_eq(&Value::Int(0)));
    }

    #[test]
    fn test_widen_to() {
        assert_eq!(Value::Int(3).widen_to(DataType::Float), Value::Float(3.0));
        assert_eq!(Value::Int(3).widen_to(DataType::Int), Value::Int(3));
        assert_eq!(
            Value::Text("3".into()).widen_to(DataType::Float),
            Value::Text("3".into())
        );
        assert_eq!(Value::Null.widen_to(DataType::Float), Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(31.0).to_string(), "31.0");
        assert_eq!(Value::Text("Alice".into()).to_string(), "'Alice'");
        assert_eq!(Value::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_serialize_json() {
        let values = vec![
            Value::Null,
            Value::Int(1),
            Value::Float(2.5),
            Value::Text("Book".into()),
            Value::Bool(false),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,1,2.5,"Book",false]"#);
    }
}
