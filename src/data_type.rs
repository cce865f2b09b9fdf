use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A 64-bit signed integer, declared as `INTEGER`.
    Int,
    /// A 64-bit floating-point number, declared as `FLOAT`.
    Float,
    /// A variable-length UTF-8 character string, declared as `VARCHAR`.
    Text,
    /// A boolean value (true or false), declared as `BOOLEAN`.
    Bool,
}

impl DataType {
    /// The SQL type token for this type.
    pub fn sql_name(&self) -> &'static str {
        match self {
            Self::Int => "INTEGER",
            Self::Float => "FLOAT",
            Self::Text => "VARCHAR",
            Self::Bool => "BOOLEAN",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Resolves a type token case-insensitively.
///
/// ```
/// use rdbms::DataType;
/// assert_eq!("varchar".parse::<DataType>().unwrap(), DataType::Text);
/// assert!("TEXT".parse::<DataType>().is_err());
/// ```
impl FromStr for DataType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INTEGER" => Ok(Self::Int),
            "FLOAT" => Ok(Self::Float),
            "VARCHAR" => Ok(Self::Text),
            "BOOLEAN" => Ok(Self::Bool),
            _ => Err(ParseError::UnknownType(s.to_string())),
        }
    }
}
