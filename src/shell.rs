//! Line-oriented interactive shell over an [Executor].

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::executor::{ExecResult, Executor};

pub const PROMPT: &str = "rdbms> ";
pub const BANNER: &str = "Welcome to rdbms. Type SQL statements, .help for help, or 'quit' to exit.";

const HELP: &str = "\
Statements:
  CREATE TABLE t (col TYPE [PRIMARY KEY] [UNIQUE] [NOT NULL], ...)
  INSERT INTO t VALUES (v1, v2, ...)
  SELECT * | c1, c2 FROM t [JOIN u ON a = b] [WHERE col = value]
  UPDATE t SET c1 = v1, c2 = v2 WHERE pk = value
  DELETE FROM t WHERE pk = value
Types: INTEGER, FLOAT, VARCHAR, BOOLEAN
Meta commands:
  .tables          list tables
  .schema <table>  show a table definition
  .help            show this message
  quit | exit      leave the shell";

/// What the shell does with one input line.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Text to print.
    Output(String),
    /// Nothing to print (blank line).
    Nothing,
    /// End the session.
    Exit,
}

/// A shell session. Holds the database for as long as the session lasts.
#[derive(Debug, Default)]
pub struct Shell {
    executor: Executor,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executor(executor: Executor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Handles one line of input. Errors never end the session: they are
    /// rendered as `Error: <message>`.
    ///
    /// ```
    /// # use rdbms::shell::{Outcome, Shell};
    /// let mut shell = Shell::new();
    /// assert_eq!(
    ///     shell.handle_line("CREATE TABLE t (id INTEGER PRIMARY KEY)"),
    ///     Outcome::Output("OK".into())
    /// );
    /// assert_eq!(shell.handle_line("  "), Outcome::Nothing);
    /// assert_eq!(shell.handle_line("QUIT"), Outcome::Exit);
    /// ```
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::Nothing;
        }

        let lowered = line.to_lowercase();
        if lowered == "quit" || lowered == "exit" {
            return Outcome::Exit;
        }

        if line.starts_with('.') {
            return Outcome::Output(self.meta_command(line));
        }

        match self.executor.run(line) {
            Ok(result) => Outcome::Output(render(&result)),
            Err(e) => {
                debug!(error = %e, "statement failed");
                Outcome::Output(format!("Error: {e}"))
            }
        }
    }

    fn meta_command(&self, line: &str) -> String {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();

        match (command, argument) {
            (".help", _) => HELP.to_string(),
            (".tables", _) => self.executor.storage().list_tables().join("\n"),
            (".schema", Some(name)) => match self.executor.storage().table(name) {
                Ok(table) => {
                    let columns: Vec<String> =
                        table.columns().iter().map(ToString::to_string).collect();
                    format!("CREATE TABLE {} ({})", table.name(), columns.join(", "))
                }
                Err(e) => format!("Error: {e}"),
            },
            (".schema", None) => "Usage: .schema <table>".to_string(),
            _ => format!("Error: unknown command {command}, try .help"),
        }
    }

    /// Reads lines from the terminal until `quit`, `exit`, Ctrl-C or Ctrl-D.
    pub fn run(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        println!("{BANNER}");

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    match self.handle_line(&line) {
                        Outcome::Output(text) => {
                            if !text.is_empty() {
                                println!("{text}");
                            }
                        }
                        Outcome::Nothing => {}
                        Outcome::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

/// Renders a result the way the shell prints it: `OK` for acknowledgements,
/// one line per row followed by a row count for result sets.
pub fn render(result: &ExecResult) -> String {
    match result {
        ExecResult::Ack => "OK".to_string(),
        ExecResult::Rows(rows) => {
            let mut lines: Vec<String> = rows.iter().map(ToString::to_string).collect();
            let count = match rows.len() {
                1 => "(1 row)".to_string(),
                n => format!("({n} rows)"),
            };
            lines.push(count);
            lines.join("\n")
        }
    }
}
