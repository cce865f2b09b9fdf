//! A small in-memory relational database with a SQL front end.
//!
//! SQL text is tokenized, parsed into a [Statement](ast::Statement) and run
//! by an [Executor] against its [Storage]. The [shell] and [http] modules
//! expose the same executor interactively and over HTTP.

pub mod ast;
pub mod column;
pub mod data_type;
pub mod error;
pub mod executor;
pub mod http;
pub mod parser;
pub mod row;
pub mod shell;
pub mod storage;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use column::Column;
pub use data_type::DataType;
pub use error::{DbResult, Error};
pub use executor::{ExecResult, Executor};
pub use parser::parse;
pub use row::Row;
pub use storage::Storage;
pub use table::Table;
pub use value::Value;
