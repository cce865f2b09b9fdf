use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::ast::{ColumnsSelect, CreateTable, Delete, Insert, Join, Select, Statement, Update};
use crate::column::Column;
use crate::error::{DbResult, SchemaError};
use crate::parser::parse;
use crate::row::Row;
use crate::storage::Storage;
use crate::table::Table;

/// Outcome of a successfully executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    /// Result set of a `SELECT`.
    Rows(Vec<Row>),
    /// Any other statement.
    Ack,
}

impl ExecResult {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Ack => None,
        }
    }
}

/// Rows serialize as an array of objects, `Ack` as `null`.
impl Serialize for ExecResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Rows(rows) => rows.serialize(serializer),
            Self::Ack => serializer.serialize_unit(),
        }
    }
}

/// Executes statements against the [Storage] it owns.
///
/// An executor is the whole state of one database: adapters build one and
/// pass it by reference to every request. It assumes a single caller at a
/// time; callers sharing it across threads must serialize access.
#[derive(Debug, Default)]
pub struct Executor {
    storage: Storage,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    /// Parses and executes one SQL statement.
    ///
    /// # Example
    /// ```
    /// use rdbms::{ExecResult, Executor, Row, Value};
    ///
    /// let mut executor = Executor::new();
    /// executor.run("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR)").unwrap();
    /// executor.run("INSERT INTO users VALUES (1, 'Alice')").unwrap();
    ///
    /// let result = executor.run("SELECT name FROM users WHERE id = 1").unwrap();
    /// assert_eq!(
    ///     result,
    ///     ExecResult::Rows(vec![Row::from_iter([("name", Value::from("Alice"))])])
    /// );
    /// ```
    pub fn run(&mut self, sql: &str) -> DbResult<ExecResult> {
        let statement = parse(sql)?;
        self.execute(statement)
    }

    /// Executes a parsed statement.
    ///
    /// There is no rollback beyond what [Table] guarantees: a failing insert
    /// changes nothing, and update/delete only touch the matched row.
    pub fn execute(&mut self, statement: Statement) -> DbResult<ExecResult> {
        debug!(kind = statement.kind(), "executing statement");

        match statement {
            Statement::CreateTable(create) => self.create_table(create)?,
            Statement::Insert(insert) => self.insert(insert)?,
            Statement::Select(select) => return self.select(select).map(ExecResult::Rows),
            Statement::Update(update) => self.update(update)?,
            Statement::Delete(delete) => self.delete(delete)?,
        };
        Ok(ExecResult::Ack)
    }

    fn create_table(&mut self, create: CreateTable) -> DbResult<()> {
        let columns = create
            .columns
            .into_iter()
            .map(|spec| {
                let mut column = Column::new(spec.name, spec.data_type);
                column.nullable = spec.nullable;
                if spec.unique {
                    column = column.unique();
                }
                if spec.primary_key {
                    column = column.primary_key();
                }
                column
            })
            .collect();

        self.storage.create_table(&create.name, columns)?;
        Ok(())
    }

    /// Maps the positional values onto the table's columns, in schema order.
    fn insert(&mut self, insert: Insert) -> DbResult<()> {
        let table = self.storage.table_mut(&insert.table)?;

        if insert.values.len() != table.columns().len() {
            return Err(SchemaError::ArityMismatch {
                expected: table.columns().len(),
                found: insert.values.len(),
            }
            .into());
        }

        let row: Row = table
            .columns()
            .iter()
            .map(|column| column.name.clone())
            .zip(insert.values)
            .collect();

        table.insert(row)
    }

    fn select(&self, select: Select) -> DbResult<Vec<Row>> {
        let table = self.storage.table(&select.table)?;

        let rows = match &select.join {
            Some(join) => {
                let right = self.storage.table(&join.table)?;
                let joined = nested_loop_join(table, right, join);
                match &select.where_clause {
                    Some(predicate) => joined
                        .into_iter()
                        .filter(|row| row.matches(predicate))
                        .collect(),
                    None => joined,
                }
            }
            None => table
                .select(select.where_clause.as_ref())
                .into_iter()
                .cloned()
                .collect(),
        };

        Ok(project(rows, &select.columns))
    }

    fn update(&mut self, update: Update) -> DbResult<()> {
        let table = self.storage.table_mut(&update.table)?;
        warn_if_not_primary_key(table, &update.pk_column);
        table.update(&update.pk_value, &update.assignments)
    }

    fn delete(&mut self, delete: Delete) -> DbResult<()> {
        let table = self.storage.table_mut(&delete.table)?;
        warn_if_not_primary_key(table, &delete.pk_column);
        if !table.delete(&delete.pk_value) {
            debug!(table = %delete.table, key = %delete.pk_value, "no row to delete");
        }
        Ok(())
    }
}

/// Pairs every left row with every right row whose `join.right` value equals
/// the left row's `join.left` value, in left-then-right order. Keys compare
/// with [Value::sql_eq](crate::value::Value::sql_eq).
fn nested_loop_join(left: &Table, right: &Table, join: &Join) -> Vec<Row> {
    let mut joined = Vec::new();
    for left_row in left.select(None) {
        let key = left_row.value_or_null(&join.left);
        for right_row in right.select(None) {
            if right_row.value_or_null(&join.right).sql_eq(key) {
                joined.push(merge_rows(left_row, right_row, right.name()));
            }
        }
    }
    joined
}

/// Copies the left row, then adds the right row's fields. A right field whose
/// name is already taken is stored as `<right_table>_<field>`.
///
/// ```
/// # use rdbms::{Row, Value, executor::merge_rows};
/// let user = Row::from_iter([("id", Value::Int(1)), ("name", Value::from("Alice"))]);
/// let order = Row::from_iter([("id", Value::Int(7)), ("user_id", Value::Int(1))]);
///
/// let merged = merge_rows(&user, &order, "orders");
/// assert_eq!(merged.get("id"), Some(&Value::Int(1)));
/// assert_eq!(merged.get("orders_id"), Some(&Value::Int(7)));
/// ```
pub fn merge_rows(left: &Row, right: &Row, right_table: &str) -> Row {
    let mut merged = left.clone();
    for (name, value) in right.iter() {
        if merged.contains_key(name) {
            merged.insert(format!("{right_table}_{name}"), value.clone());
        } else {
            merged.insert(name, value.clone());
        }
    }
    merged
}

/// Keeps the requested columns of each row, in the requested order. A
/// column missing from a row is left out of that row.
fn project(rows: Vec<Row>, columns: &ColumnsSelect) -> Vec<Row> {
    let ColumnsSelect::ColumnsNames(names) = columns else {
        return rows;
    };

    rows.into_iter()
        .map(|row| {
            names
                .iter()
                .filter_map(|name| row.get(name).map(|value| (name.as_str(), value.clone())))
                .collect()
        })
        .collect()
}

/// Row lookups for UPDATE and DELETE always go through the primary key.
fn warn_if_not_primary_key(table: &Table, column: &str) {
    match table.primary_key() {
        Some(pk) if pk.name == column => {}
        Some(pk) => warn!(
            table = table.name(),
            column,
            primary_key = %pk.name,
            "WHERE column is not the primary key, looking the value up as a primary key"
        ),
        None => warn!(
            table = table.name(),
            "table has no primary key, no row can match"
        ),
    }
}
