//! Whole-pipeline tests through the public API.

use rdbms::error::{ConstraintError, ParseError, RowError, SchemaError};
use rdbms::{Column, DataType, Error, ExecResult, Executor, Row, Storage, Value, parse};

fn run(executor: &mut Executor, sql: &str) -> Vec<Row> {
    match executor.run(sql) {
        Ok(ExecResult::Rows(rows)) => rows,
        Ok(ExecResult::Ack) => Vec::new(),
        Err(e) => panic!("{sql} failed: {e}"),
    }
}

fn user(id: i64, name: &str, age: i64) -> Row {
    Row::from_iter([
        ("id", Value::Int(id)),
        ("name", Value::from(name)),
        ("age", Value::Int(age)),
    ])
}

#[test]
fn test_users_lifecycle() {
    let mut db = Executor::new();

    assert_eq!(
        db.run("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR UNIQUE, age INTEGER)")
            .unwrap(),
        ExecResult::Ack
    );
    assert_eq!(
        db.run("INSERT INTO users VALUES (1,'Alice',30)").unwrap(),
        ExecResult::Ack
    );
    assert_eq!(run(&mut db, "SELECT * FROM users"), vec![user(1, "Alice", 30)]);

    db.run("UPDATE users SET age = 31 WHERE id = 1").unwrap();
    assert_eq!(
        run(&mut db, "SELECT * FROM users WHERE id = 1"),
        vec![user(1, "Alice", 31)]
    );

    db.run("DELETE FROM users WHERE id = 1").unwrap();
    assert!(run(&mut db, "SELECT * FROM users").is_empty());
}

#[test]
fn test_insert_then_select_returns_the_row() {
    let mut db = Executor::new();
    db.run("CREATE TABLE items (id INTEGER PRIMARY KEY, label VARCHAR, price FLOAT, active BOOLEAN)")
        .unwrap();
    db.run("INSERT INTO items VALUES (7, 'lamp', 12.5, true)")
        .unwrap();

    assert_eq!(
        run(&mut db, "SELECT * FROM items"),
        vec![Row::from_iter([
            ("id", Value::Int(7)),
            ("label", Value::from("lamp")),
            ("price", Value::Float(12.5)),
            ("active", Value::Bool(true)),
        ])]
    );
}

#[test]
fn test_duplicate_keys_leave_the_table_unchanged() {
    let mut db = Executor::new();
    db.run("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR UNIQUE, age INTEGER)")
        .unwrap();
    db.run("INSERT INTO users VALUES (1, 'Alice', 30)").unwrap();

    let err = db.run("INSERT INTO users VALUES (1, 'Bob', 25)").unwrap_err();
    assert_eq!(
        err,
        Error::Constraint(ConstraintError::PrimaryKeyViolation {
            column: "id".into(),
            value: Value::Int(1),
        })
    );

    let err = db.run("INSERT INTO users VALUES (2, 'Alice', 25)").unwrap_err();
    assert_eq!(
        err,
        Error::Constraint(ConstraintError::UniqueViolation {
            column: "name".into(),
            value: Value::from("Alice"),
        })
    );

    let table = db.storage().table("users").unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.primary_key_index().len(), 1);
    assert_eq!(table.unique_index("name").map(|index| index.len()), Some(1));
}

#[test]
fn test_update_missing_row_changes_nothing() {
    let mut db = Executor::new();
    db.run("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR UNIQUE, age INTEGER)")
        .unwrap();
    db.run("INSERT INTO users VALUES (1, 'Alice', 30)").unwrap();

    let err = db.run("UPDATE users SET age = 99 WHERE id = 2").unwrap_err();
    assert_eq!(err, Error::Row(RowError::NotFound(Value::Int(2))));
    assert_eq!(run(&mut db, "SELECT * FROM users"), vec![user(1, "Alice", 30)]);
}

#[test]
fn test_delete_then_reuse_primary_key() {
    let mut db = Executor::new();
    db.run("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR UNIQUE, age INTEGER)")
        .unwrap();
    db.run("INSERT INTO users VALUES (1, 'Alice', 30)").unwrap();
    db.run("INSERT INTO users VALUES (2, 'Bob', 25)").unwrap();

    db.run("DELETE FROM users WHERE id = 1").unwrap();
    assert_eq!(run(&mut db, "SELECT * FROM users"), vec![user(2, "Bob", 25)]);

    // both the key and the unique name are free again
    db.run("INSERT INTO users VALUES (1, 'Alice', 41)").unwrap();
    assert_eq!(
        run(&mut db, "SELECT * FROM users"),
        vec![user(2, "Bob", 25), user(1, "Alice", 41)]
    );

    // positions shifted, lookups by key still land on the right row
    db.run("UPDATE users SET age = 26 WHERE id = 2").unwrap();
    assert_eq!(
        run(&mut db, "SELECT age FROM users WHERE id = 2"),
        vec![Row::from_iter([("age", Value::Int(26))])]
    );
}

#[test]
fn test_join_merge_rule() {
    let mut db = Executor::new();
    db.run("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR)").unwrap();
    db.run("CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER, product VARCHAR)")
        .unwrap();
    db.run("CREATE TABLE purchases (user_id INTEGER, product VARCHAR)").unwrap();
    db.run("INSERT INTO users VALUES (1, 'Alice')").unwrap();
    db.run("INSERT INTO orders VALUES (1, 1, 'Book')").unwrap();
    db.run("INSERT INTO purchases VALUES (1, 'Book')").unwrap();

    assert_eq!(
        run(&mut db, "SELECT * FROM users JOIN purchases ON users.id = purchases.user_id"),
        vec![Row::from_iter([
            ("id", Value::Int(1)),
            ("name", Value::from("Alice")),
            ("user_id", Value::Int(1)),
            ("product", Value::from("Book")),
        ])]
    );

    let rows = run(&mut db, "SELECT * FROM users JOIN orders ON users.id = orders.user_id");
    assert_eq!(
        rows,
        vec![Row::from_iter([
            ("id", Value::Int(1)),
            ("name", Value::from("Alice")),
            ("orders_id", Value::Int(1)),
            ("user_id", Value::Int(1)),
            ("product", Value::from("Book")),
        ])]
    );
}

#[test]
fn test_join_without_matches_is_empty() {
    let mut db = Executor::new();
    db.run("CREATE TABLE a (id INTEGER PRIMARY KEY)").unwrap();
    db.run("CREATE TABLE b (id INTEGER PRIMARY KEY, a_id INTEGER)").unwrap();
    db.run("INSERT INTO a VALUES (1)").unwrap();
    db.run("INSERT INTO b VALUES (1, 2)").unwrap();

    assert!(run(&mut db, "SELECT * FROM a JOIN b ON id = a_id").is_empty());
}

#[test]
fn test_nullable_columns_and_widening() {
    let mut db = Executor::new();
    db.run("CREATE TABLE prices (id INTEGER PRIMARY KEY, amount FLOAT, note VARCHAR NOT NULL)")
        .unwrap();

    db.run("INSERT INTO prices VALUES (1, 10, 'int widened')").unwrap();
    db.run("INSERT INTO prices VALUES (2, NULL, 'no amount')").unwrap();

    let err = db.run("INSERT INTO prices VALUES (3, 1.5, NULL)").unwrap_err();
    assert_eq!(err, Error::Schema(SchemaError::NullViolation("note".into())));

    assert_eq!(
        run(&mut db, "SELECT id FROM prices WHERE amount = 10.0"),
        vec![Row::from_iter([("id", Value::Int(1))])]
    );
    assert_eq!(
        run(&mut db, "SELECT id FROM prices WHERE amount = 10"),
        vec![Row::from_iter([("id", Value::Int(1))])]
    );
    assert_eq!(
        run(&mut db, "SELECT note FROM prices WHERE amount = NULL"),
        vec![Row::from_iter([("note", Value::from("no amount"))])]
    );
}

#[test]
fn test_quoted_commas_survive_update() {
    let mut db = Executor::new();
    db.run("CREATE TABLE notes (id INTEGER PRIMARY KEY, a INTEGER, b VARCHAR)")
        .unwrap();
    db.run("INSERT INTO notes VALUES (1, 0, '')").unwrap();

    db.run("UPDATE notes SET a = 1, b = 'x,y' WHERE id = 1").unwrap();
    assert_eq!(
        run(&mut db, "SELECT a, b FROM notes"),
        vec![Row::from_iter([("a", Value::Int(1)), ("b", Value::from("x,y"))])]
    );
}

#[test]
fn test_keywords_as_table_and_column_names() {
    let mut db = Executor::new();
    db.run("CREATE TABLE kv (key VARCHAR PRIMARY KEY, value INTEGER, set BOOLEAN)")
        .unwrap();
    db.run("INSERT INTO kv VALUES ('a', 1, FALSE)").unwrap();
    db.run("UPDATE kv SET value = 2, set = TRUE WHERE key = 'a'").unwrap();

    assert_eq!(
        run(&mut db, "SELECT key, value, set FROM kv WHERE KEY = 'a'"),
        vec![Row::from_iter([
            ("key", Value::from("a")),
            ("value", Value::Int(2)),
            ("set", Value::Bool(true)),
        ])]
    );
}

#[test]
fn test_unsupported_statement() {
    assert_eq!(parse("DROP TABLE users"), Err(ParseError::UnsupportedStatement));

    assert_eq!(
        parse("EXPLAIN SELECT * FROM t WHERE a > 1"),
        Err(ParseError::UnsupportedStatement)
    );

    let mut db = Executor::new();
    assert_eq!(
        db.run("DROP TABLE users"),
        Err(Error::Parse(ParseError::UnsupportedStatement))
    );
}

#[test]
fn test_executor_over_prepared_storage() {
    let mut storage = Storage::new();
    storage
        .create_table(
            "flags",
            vec![
                Column::new("name", DataType::Text).primary_key(),
                Column::new("enabled", DataType::Bool).not_null(),
            ],
        )
        .unwrap();

    let mut db = Executor::with_storage(storage);
    db.run("INSERT INTO flags VALUES ('dark_mode', FALSE)").unwrap();
    db.run("UPDATE flags SET enabled = TRUE WHERE name = 'dark_mode'").unwrap();

    assert_eq!(
        run(&mut db, "SELECT enabled FROM flags"),
        vec![Row::from_iter([("enabled", Value::Bool(true))])]
    );

    db.storage_mut().clear();
    assert!(db.storage().list_tables().is_empty());
}
