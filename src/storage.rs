use std::collections::HashMap;

use tracing::info;

use crate::column::Column;
use crate::error::StorageError;
use crate::table::Table;

/// The registry of tables, keyed by name. Table names are unique.
#[derive(Debug, Default)]
pub struct Storage {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

impl Storage {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty table.
    ///
    /// # Errors
    /// Returns [StorageError::AlreadyExists] if a table with the same name exists.
    pub fn create_table(&mut self, name: &str, columns: Vec<Column>) -> Result<(), StorageError> {
        if self.tables.contains_key(name) {
            return Err(StorageError::AlreadyExists(name.to_string()));
        }
        info!(table = name, columns = columns.len(), "created table");
        self.tables.insert(name.to_string(), Table::new(name, columns));
        Ok(())
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Like [Storage::get_table], failing with [StorageError::NotFound].
    pub fn table(&self, name: &str) -> Result<&Table, StorageError> {
        self.get_table(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    /// Like [Storage::get_table_mut], failing with [StorageError::NotFound].
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, StorageError> {
        self.get_table_mut(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    /// Returns the names of all tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Drops every table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}
