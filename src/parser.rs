use crate::error::ParseError;
use crate::tokenizer::{Token, Tokenizer};
use crate::{DataType, Row, Value, ast::*};

/// Parses one SQL statement.
///
/// # Example
/// ```
/// use rdbms::ast::Statement;
/// use rdbms::error::ParseError;
///
/// let statement = rdbms::parse("SELECT * FROM users WHERE id = 1").unwrap();
/// assert!(matches!(statement, Statement::Select(_)));
///
/// assert_eq!(rdbms::parse("DROP TABLE users"), Err(ParseError::UnsupportedStatement));
/// ```
pub fn parse(sql: &str) -> Result<Statement, ParseError> {
    let tokens = match Tokenizer::new(sql).tokenize() {
        Ok(tokens) => tokens,
        Err(_) if !starts_like_statement(sql) => return Err(ParseError::UnsupportedStatement),
        Err(e) => return Err(e),
    };
    Parser::new(tokens).parse()
}

/// Whether the leading words of `sql` open one of the supported statements.
/// Lets text the tokenizer cannot read still report an unsupported statement.
fn starts_like_statement(sql: &str) -> bool {
    if !sql.trim_start().starts_with(|c: char| c.is_alphabetic()) {
        return false;
    }

    let mut words = sql
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_uppercase);
    let first = words.next().unwrap_or_default();
    let second = words.next().unwrap_or_default();

    matches!(
        (first.as_str(), second.as_str()),
        ("CREATE", "TABLE") | ("INSERT", "INTO") | ("SELECT", _) | ("UPDATE", _) | ("DELETE", "FROM")
    )
}

/// Recursive-descent parser over the token stream of a single statement.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last() != Some(&Token::Eof) {
            tokens.push(Token::Eof);
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Statement, ParseError> {
        let statement = match (self.current_token().clone(), self.peek_token().clone()) {
            (Token::Create, Token::Table) => self.parse_create_table(),
            (Token::Insert, Token::Into) => self.parse_insert(),
            (Token::Select, _) => self.parse_select(),
            (Token::Update, _) => self.parse_update(),
            (Token::Delete, Token::From) => self.parse_delete(),
            _ => Err(ParseError::UnsupportedStatement),
        }?;

        // semicolon is optional so skip it
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        // Check we are at the end of the statement
        if !self.is_at_end() {
            return Err(ParseError::TrailingInput(self.current_token().to_string()));
        }

        Ok(statement)
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_token(&self) -> &Token {
        let next = (self.position + 1).min(self.tokens.len() - 1);
        &self.tokens[next]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: self.current_token().to_string(),
        }
    }

    fn consume(&mut self, expected: Token) -> Result<(), ParseError> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected.to_string()))
        }
    }

    /// A table or column name. Grammar keywords are accepted in name
    /// positions and read in lowercase.
    fn consume_ident(&mut self) -> Result<String, ParseError> {
        let name = match self.current_token() {
            Token::Ident(string) => string.clone(),
            token => match token.keyword_name() {
                Some(keyword) => keyword.to_string(),
                None => return Err(self.unexpected("identifier")),
            },
        };
        self.advance();
        Ok(name)
    }

    fn consume_data_type(&mut self) -> Result<DataType, ParseError> {
        match self.current_token() {
            Token::Ident(name) => {
                let data_type: DataType = name.parse()?;
                self.advance();
                Ok(data_type)
            }
            _ => Err(self.unexpected("column type")),
        }
    }

    /// `column` or `table.column`; the qualifier is dropped.
    fn parse_column_ref(&mut self) -> Result<String, ParseError> {
        let name = self.consume_ident()?;
        if matches!(self.current_token(), Token::Dot) {
            self.advance();
            return self.consume_ident();
        }
        Ok(name)
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let value = match self.current_token() {
            Token::String(s) => Value::from(s.as_str()),
            Token::Number(n) => Value::Int(*n),
            Token::FloatNumber(f) => Value::Float(*f),
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Null => Value::Null,
            _ => return Err(self.unexpected("literal")),
        };
        self.advance();
        Ok(value)
    }

    /// `column = literal`
    fn parse_condition(&mut self) -> Result<(String, Value), ParseError> {
        let column = self.consume_ident()?;
        self.consume(Token::Equal)?;
        let value = self.parse_literal()?;
        Ok((column, value))
    }

    fn parse_column_spec(&mut self) -> Result<ColumnSpec, ParseError> {
        let name = self.consume_ident()?;
        let data_type = self.consume_data_type()?;
        let mut spec = ColumnSpec {
            name,
            data_type,
            primary_key: false,
            unique: false,
            nullable: true,
        };

        loop {
            match self.current_token() {
                Token::Primary => {
                    self.advance();
                    self.consume(Token::Key)?;
                    spec.primary_key = true;
                }
                Token::Unique => {
                    self.advance();
                    spec.unique = true;
                }
                Token::Not => {
                    self.advance();
                    self.consume(Token::Null)?;
                    spec.nullable = false;
                }
                Token::Null => {
                    self.advance();
                    spec.nullable = true;
                }
                _ => break,
            }
        }

        Ok(spec)
    }

    fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        self.consume(Token::Create)?; // advance if CREATE
        self.consume(Token::Table)?; // advance if TABLE
        let name = self.consume_ident()?;
        self.consume(Token::LeftParen)?;
        let mut columns: Vec<ColumnSpec> = vec![];
        loop {
            let spec = self.parse_column_spec()?;
            if columns.iter().any(|c| c.name == spec.name) {
                return Err(ParseError::DuplicateColumn(spec.name));
            }
            columns.push(spec);
            match self.current_token() {
                Token::RightParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    self.advance();
                    continue;
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
        Ok(Statement::CreateTable(CreateTable { name, columns }))
    }

    fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        self.consume(Token::Insert)?;
        self.consume(Token::Into)?;
        let table = self.consume_ident()?;
        self.consume(Token::Values)?;
        self.consume(Token::LeftParen)?;
        let mut values = vec![self.parse_literal()?];
        while matches!(self.current_token(), Token::Comma) {
            self.advance();
            values.push(self.parse_literal()?);
        }
        self.consume(Token::RightParen)?;
        Ok(Statement::Insert(Insert { table, values }))
    }

    fn parse_select(&mut self) -> Result<Statement, ParseError> {
        self.consume(Token::Select)?;

        let columns = if matches!(self.current_token(), Token::Star) {
            self.advance();
            ColumnsSelect::Star
        } else {
            let mut names = vec![self.parse_column_ref()?];
            while matches!(self.current_token(), Token::Comma) {
                self.advance();
                names.push(self.parse_column_ref()?);
            }
            ColumnsSelect::ColumnsNames(names)
        };

        self.consume(Token::From)?;
        let table = self.consume_ident()?;

        let join = if matches!(self.current_token(), Token::Join) {
            self.advance();
            let join_table = self.consume_ident()?;
            self.consume(Token::On)?;
            let left = self.parse_column_ref()?;
            self.consume(Token::Equal)?;
            let right = self.parse_column_ref()?;
            Some(Join {
                table: join_table,
                left,
                right,
            })
        } else {
            None
        };

        let where_clause = if matches!(self.current_token(), Token::Where) {
            self.advance();
            let (column, value) = self.parse_condition()?;
            Some(Row::from_iter([(column, value)]))
        } else {
            None
        };

        Ok(Statement::Select(Select {
            columns,
            table,
            join,
            where_clause,
        }))
    }

    fn parse_update(&mut self) -> Result<Statement, ParseError> {
        self.consume(Token::Update)?;
        let table = self.consume_ident()?;
        self.consume(Token::Set)?;

        let mut assignments = Row::new();
        loop {
            let (column, value) = self.parse_condition()?;
            assignments.insert(column, value);
            if !matches!(self.current_token(), Token::Comma) {
                break;
            }
            self.advance();
        }

        self.consume(Token::Where)?;
        let (pk_column, pk_value) = self.parse_condition()?;
        Ok(Statement::Update(Update {
            table,
            assignments,
            pk_column,
            pk_value,
        }))
    }

    fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        self.consume(Token::Delete)?;
        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        self.consume(Token::Where)?;
        let (pk_column, pk_value) = self.parse_condition()?;
        Ok(Statement::Delete(Delete {
            table,
            pk_column,
            pk_value,
        }))
    }
}
