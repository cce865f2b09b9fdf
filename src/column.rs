use std::fmt;

use crate::data_type::DataType;
use crate::error::SchemaError;
use crate::value::Value;

/// Represents a column within a table schema: its name, its logical type and
/// the constraints attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column, unique within its table.
    pub name: String,
    /// The logical data type of the column.
    pub data_type: DataType,
    /// The column holds the table's primary key.
    pub primary_key: bool,
    /// Every value of the column must be distinct.
    pub unique: bool,
    /// The column accepts `NULL`.
    pub nullable: bool,
}

impl Column {
    /// Creates a nullable column without constraints.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            unique: false,
            nullable: true,
        }
    }

    /// Marks the column as the primary key. Primary keys never hold `NULL`.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Checks a value against the column and returns it in the column's
    /// storage form.
    ///
    /// # Errors
    /// - [SchemaError::NullViolation] if the value is `NULL` and the column is not nullable.
    /// - [SchemaError::TypeMismatch] if the value's type does not match the column's data type.
    ///
    /// # Behavior
    /// Integers written to a `FLOAT` column are widened to floats, so the stored
    /// value always carries the declared type.
    ///
    /// # Example
    /// ```
    /// # use rdbms::{Column, DataType, Value};
    /// let price = Column::new("price", DataType::Float);
    /// assert_eq!(price.admit(Value::Int(3)).unwrap(), Value::Float(3.0));
    /// assert!(price.admit(Value::from("cheap")).is_err());
    /// ```
    pub fn admit(&self, value: Value) -> Result<Value, SchemaError> {
        if value.is_null() {
            if !self.nullable {
                return Err(SchemaError::NullViolation(self.name.clone()));
            }
            return Ok(value);
        }

        let value = value.widen_to(self.data_type);
        if value.data_type() != Some(self.data_type) {
            return Err(SchemaError::TypeMismatch {
                column: self.name.clone(),
                expected: self.data_type,
                found: value,
            });
        }

        Ok(value)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.primary_key {
            f.write_str(" PRIMARY KEY")?;
        }
        if self.unique {
            f.write_str(" UNIQUE")?;
        }
        if !self.nullable && !self.primary_key {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}
