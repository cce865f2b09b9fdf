use crate::{DataType, Row, Value};

/// A parsed statement, tagged by kind.
#[derive(Debug, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// Short name of the statement kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "create_table",
            Self::Insert(_) => "insert",
            Self::Select(_) => "select",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Column definition as written in `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: DataType,
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
}

#[derive(Debug, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

/// `INSERT INTO table VALUES (...)`. Values are positional: the i-th value
/// belongs to the i-th column of the table.
#[derive(Debug, PartialEq)]
pub struct Insert {
    pub table: String,
    pub values: Vec<Value>,
}

#[derive(Debug, PartialEq)]
pub enum ColumnsSelect {
    Star,
    ColumnsNames(Vec<String>),
}

/// `JOIN table ON left = right`, with qualifiers already stripped.
#[derive(Debug, PartialEq)]
pub struct Join {
    pub table: String,
    pub left: String,
    pub right: String,
}

#[derive(Debug, PartialEq)]
pub struct Select {
    pub columns: ColumnsSelect,
    pub table: String,
    pub join: Option<Join>,
    /// Equality conditions, all of which must hold.
    pub where_clause: Option<Row>,
}

#[derive(Debug, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Row,
    pub pk_column: String,
    pub pk_value: Value,
}

#[derive(Debug, PartialEq)]
pub struct Delete {
    pub table: String,
    pub pk_column: String,
    pub pk_value: Value,
}
