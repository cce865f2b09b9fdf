//! Error types for parsing, storage and execution.

use thiserror::Error;

use crate::data_type::DataType;
use crate::value::Value;

/// Raised while turning SQL text into a [Statement](crate::ast::Statement).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unsupported SQL statement")]
    UnsupportedStatement,

    #[error("unknown column type {0}")]
    UnknownType(String),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("duplicate column {0}")]
    DuplicateColumn(String),

    #[error("unexpected input after statement: {0}")]
    TrailingInput(String),

    #[error("character {0:?} is not supported")]
    InvalidCharacter(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number {0}")]
    InvalidNumber(String),
}

/// Table registry failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("table {0} already exists")]
    AlreadyExists(String),

    #[error("table {0} not found")]
    NotFound(String),
}

/// A value or row does not fit the table schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("unknown column {0}")]
    UnknownColumn(String),

    #[error("value for {column} must be {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: Value,
    },

    #[error("column {0} cannot be null")]
    NullViolation(String),

    #[error("expected {expected} values, got {found}")]
    ArityMismatch { expected: usize, found: usize },
}

/// Uniqueness failures detected on insert (and on primary-key updates).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    #[error("primary key violation: {column} = {value} already exists")]
    PrimaryKeyViolation { column: String, value: Value },

    #[error("unique constraint violation for {column}: {value} already exists")]
    UniqueViolation { column: String, value: Value },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("row not found: no row with primary key {0}")]
    NotFound(Value),
}

/// Any error the engine can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Row(#[from] RowError),
}

pub type DbResult<T> = Result<T, Error>;
