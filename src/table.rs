use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::column::Column;
use crate::data_type::DataType;
use crate::error::{ConstraintError, DbResult, RowError, SchemaError};
use crate::row::Row;
use crate::value::Value;

/// A named table: its schema, its rows in insertion order, and the indexes
/// that enforce the primary-key and unique constraints.
///
/// Absent fields of a row read as `NULL`, both for validation and for the
/// indexes. `NULL` is an ordinary indexed value, so a unique column holds at
/// most one `NULL`.
#[derive(Debug)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
    /// primary-key value -> position in `rows`
    primary_key_index: HashMap<Value, usize>,
    /// unique column name -> values currently present in that column
    unique_indexes: HashMap<String, HashSet<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let unique_indexes = columns
            .iter()
            .filter(|column| column.unique)
            .map(|column| (column.name.clone(), HashSet::new()))
            .collect();

        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            primary_key_index: HashMap::new(),
            unique_indexes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema, in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|column| column.primary_key)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn primary_key_index(&self) -> &HashMap<Value, usize> {
        &self.primary_key_index
    }

    pub fn unique_index(&self, column: &str) -> Option<&HashSet<Value>> {
        self.unique_indexes.get(column)
    }

    /// Inserts a new row.
    ///
    /// Every check runs before anything is written, so a failed insert leaves
    /// the rows and the indexes untouched.
    ///
    /// # Errors
    /// In the order they are checked:
    /// - [SchemaError::UnknownColumn] if a field does not name a column.
    /// - [SchemaError::TypeMismatch] / [SchemaError::NullViolation] if a value
    ///   does not fit its column (absent fields count as `NULL`).
    /// - [ConstraintError::PrimaryKeyViolation] if the primary key is taken.
    /// - [ConstraintError::UniqueViolation] if a unique value is taken.
    pub fn insert(&mut self, row: Row) -> DbResult<()> {
        let row = self.check_row(row)?;

        let primary_key = match self.primary_key() {
            Some(column) => {
                let key = row.value_or_null(&column.name).clone();
                if self.primary_key_index.contains_key(&key) {
                    return Err(ConstraintError::PrimaryKeyViolation {
                        column: column.name.clone(),
                        value: key,
                    }
                    .into());
                }
                Some(key)
            }
            None => None,
        };

        for (column, index) in &self.unique_indexes {
            let value = row.value_or_null(column);
            if index.contains(value) {
                return Err(ConstraintError::UniqueViolation {
                    column: column.clone(),
                    value: value.clone(),
                }
                .into());
            }
        }

        for (column, index) in self.unique_indexes.iter_mut() {
            index.insert(row.value_or_null(column).clone());
        }
        self.rows.push(row);
        if let Some(key) = primary_key {
            self.primary_key_index.insert(key, self.rows.len() - 1);
        }
        Ok(())
    }

    /// Returns the row holding the given primary-key value.
    pub fn get_row_by_pk(&self, pk_value: &Value) -> Option<&Row> {
        let key = self.primary_key_value(pk_value.clone());
        self.primary_key_index
            .get(&key)
            .and_then(|position| self.rows.get(*position))
    }

    /// Applies `updates` to the row holding `pk_value`.
    ///
    /// Updated values are validated like on insert. Uniqueness of updated
    /// unique columns is not checked against other rows, but the unique
    /// indexes are rebuilt so they keep reflecting the stored values. A new
    /// primary-key value must not belong to another row.
    ///
    /// # Errors
    /// - [RowError::NotFound] if no row holds `pk_value` (always the case
    ///   for tables without a primary key).
    /// - [SchemaError::UnknownColumn], [SchemaError::TypeMismatch],
    ///   [SchemaError::NullViolation] for invalid assignments.
    /// - [ConstraintError::PrimaryKeyViolation] if the primary key would collide.
    pub fn update(&mut self, pk_value: &Value, updates: &Row) -> DbResult<()> {
        let key = self.primary_key_value(pk_value.clone());
        let position = *self
            .primary_key_index
            .get(&key)
            .ok_or_else(|| RowError::NotFound(pk_value.clone()))?;

        let mut checked = Vec::with_capacity(updates.len());
        for (name, value) in updates.iter() {
            let column = self
                .column(name)
                .ok_or_else(|| SchemaError::UnknownColumn(name.to_string()))?;
            checked.push((name.to_string(), column.admit(value.clone())?));
        }

        let mut new_key = None;
        if let Some(pk_column) = self.primary_key() {
            if let Some((_, value)) = checked.iter().find(|(name, _)| *name == pk_column.name) {
                if *value != key {
                    if self.primary_key_index.contains_key(value) {
                        return Err(ConstraintError::PrimaryKeyViolation {
                            column: pk_column.name.clone(),
                            value: value.clone(),
                        }
                        .into());
                    }
                    new_key = Some(value.clone());
                }
            }
        }

        let touched_unique: Vec<String> = checked
            .iter()
            .filter(|(name, _)| self.unique_indexes.contains_key(name))
            .map(|(name, _)| name.clone())
            .collect();

        let row = &mut self.rows[position];
        for (name, value) in checked {
            row.insert(name, value);
        }

        if let Some(new_key) = new_key {
            self.primary_key_index.remove(&key);
            self.primary_key_index.insert(new_key, position);
        }
        for column in touched_unique {
            self.rebuild_unique_index(&column);
        }
        Ok(())
    }

    /// Removes the row holding `pk_value`. Returns whether a row was removed;
    /// an unknown key is not an error.
    ///
    /// Positions after the removed row shift, so the primary-key index and
    /// every unique index are rebuilt from the remaining rows. This costs
    /// O(rows) per delete.
    pub fn delete(&mut self, pk_value: &Value) -> bool {
        let key = self.primary_key_value(pk_value.clone());
        let Some(position) = self.primary_key_index.remove(&key) else {
            return false;
        };

        self.rows.remove(position);
        self.rebuild_primary_key_index();
        let unique_columns: Vec<String> = self.unique_indexes.keys().cloned().collect();
        for column in unique_columns {
            self.rebuild_unique_index(&column);
        }
        true
    }

    /// Returns the rows matching every `(column, value)` pair of `predicate`,
    /// in storage order. Without a predicate every row is returned.
    ///
    /// Only equality is supported, with integers and floats compared by
    /// numeric value. A column missing from the schema reads as `NULL`.
    pub fn select(&self, predicate: Option<&Row>) -> Vec<&Row> {
        match predicate {
            Some(predicate) => self.rows.iter().filter(|row| row.matches(predicate)).collect(),
            None => self.rows.iter().collect(),
        }
    }

    /// Validates every field of `row` and every non-nullable column.
    fn check_row(&self, row: Row) -> Result<Row, SchemaError> {
        let mut checked = Row::with_capacity(row.len());
        for (name, value) in row {
            let column = self
                .column(&name)
                .ok_or_else(|| SchemaError::UnknownColumn(name.clone()))?;
            let value = column.admit(value)?;
            checked.insert(name, value);
        }

        if let Some(column) = self
            .columns
            .iter()
            .find(|column| !column.nullable && !checked.contains_key(&column.name))
        {
            return Err(SchemaError::NullViolation(column.name.clone()));
        }

        Ok(checked)
    }

    /// Brings a lookup value to the key column's type: integers widen for a
    /// `FLOAT` key, integral floats narrow for an `INTEGER` key.
    fn primary_key_value(&self, value: Value) -> Value {
        match (self.primary_key(), value) {
            (Some(column), Value::Float(f))
                if column.data_type == DataType::Int
                    && f.fract() == 0.0
                    && f >= i64::MIN as f64
                    && f < i64::MAX as f64 =>
            {
                Value::Int(f as i64)
            }
            (Some(column), value) => value.widen_to(column.data_type),
            (None, value) => value,
        }
    }

    fn rebuild_primary_key_index(&mut self) {
        let Some(column) = self.primary_key().map(|column| column.name.clone()) else {
            return;
        };
        self.primary_key_index = self
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| (row.value_or_null(&column).clone(), position))
            .collect();
        debug!(table = %self.name, rows = self.rows.len(), "rebuilt primary key index");
    }

    fn rebuild_unique_index(&mut self, column: &str) {
        let values: HashSet<Value> = self
            .rows
            .iter()
            .map(|row| row.value_or_null(column).clone())
            .collect();
        self.unique_indexes.insert(column.to_string(), values);
        debug!(table = %self.name, column, "rebuilt unique index");
    }
}
