use std::fmt;

use crate::error::ParseError;

/// Represents the smallest meaningful units (atoms) of the SQL language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- SQL Keywords ---
    Create,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Join,
    On,
    Where,
    Update,
    Set,
    Delete,
    Primary,
    Key,
    Unique,
    Not,
    Null,

    // --- Identifiers & Literals ---
    /// A name representing a table, a column or a type (e.g., `users`, `VARCHAR`).
    Ident(String),
    /// A 64-bit integer literal (e.g., `42`).
    Number(i64),
    /// A string literal, defined between single quotes (e.g., `'Alice'`).
    String(String),
    /// A 64-bit floating-point literal (e.g., `3.14`).
    FloatNumber(f64),
    /// The boolean literal `TRUE`.
    True,
    /// The boolean literal `FALSE`.
    False,

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Wildcard symbol `*`
    Star,
    /// Equal to
    Equal,
    /// Qualifier separator in `table.column`
    Dot,

    // --- Special ---
    /// Represents the End Of File/Input.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier {name}"),
            Self::Number(n) => write!(f, "number {n}"),
            Self::FloatNumber(n) => write!(f, "number {n:?}"),
            Self::String(s) => write!(f, "string '{s}'"),
            Self::LeftParen => f.write_str("'('"),
            Self::RightParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
            Self::Semicolon => f.write_str("';'"),
            Self::Star => f.write_str("'*'"),
            Self::Equal => f.write_str("'='"),
            Self::Dot => f.write_str("'.'"),
            Self::Eof => f.write_str("end of input"),
            keyword => f.write_str(&format!("{keyword:?}").to_uppercase()),
        }
    }
}

impl Token {
    /// Lowercase spelling of a grammar keyword. Keywords may stand in for
    /// table and column names, which then read in lowercase. The literal
    /// keywords `TRUE`, `FALSE` and `NULL` return `None`.
    pub fn keyword_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Create => "create",
            Self::Table => "table",
            Self::Insert => "insert",
            Self::Into => "into",
            Self::Values => "values",
            Self::Select => "select",
            Self::From => "from",
            Self::Join => "join",
            Self::On => "on",
            Self::Where => "where",
            Self::Update => "update",
            Self::Set => "set",
            Self::Delete => "delete",
            Self::Primary => "primary",
            Self::Key => "key",
            Self::Unique => "unique",
            Self::Not => "not",
            _ => return None,
        };
        Some(name)
    }
}

/// A lexical scanner (lexer) that converts a raw SQL string into a sequence of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens, always
    /// terminated by [Token::Eof].
    ///
    /// # Errors
    /// Returns an error if an invalid character is encountered or if a literal
    /// (like a string) is malformed.
    ///
    /// # Example
    /// ```
    /// # use rdbms::tokenizer::{Tokenizer, Token};
    /// let mut t = Tokenizer::new("SELECT *");
    /// let tokens = t.tokenize().unwrap();
    /// assert_eq!(tokens, vec![Token::Select, Token::Star, Token::Eof]);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> Result<Token, ParseError> {
        let ch = self.current_char();

        match ch {
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            '*' => {
                self.advance();
                Ok(Token::Star)
            }
            '=' => {
                self.advance();
                Ok(Token::Equal)
            }
            '.' => {
                self.advance();
                Ok(Token::Dot)
            }
            '-' if self.peek_char().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c if c.is_ascii_digit() => self.read_number(),
            '\'' => self.read_string(),
            _ => Err(ParseError::InvalidCharacter(ch)),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes any whitespace characters (spaces, tabs, newlines).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    // --- Extraction Logic ---

    /// Reads a sequence of alphanumeric characters and determines if it's
    /// a reserved SQL keyword or a user-defined identifier.
    ///
    /// Keywords are matched case-insensitively. Type names stay identifiers
    /// and are resolved by the parser.
    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.current_char().is_alphanumeric() || self.current_char() == '_')
        {
            ident.push(self.current_char());
            self.advance();
        }

        match ident.to_uppercase().as_str() {
            "CREATE" => Token::Create,
            "TABLE" => Token::Table,
            "INSERT" => Token::Insert,
            "INTO" => Token::Into,
            "VALUES" => Token::Values,
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "JOIN" => Token::Join,
            "ON" => Token::On,
            "WHERE" => Token::Where,
            "UPDATE" => Token::Update,
            "SET" => Token::Set,
            "DELETE" => Token::Delete,
            "PRIMARY" => Token::Primary,
            "KEY" => Token::Key,
            "UNIQUE" => Token::Unique,
            "NOT" => Token::Not,
            "NULL" => Token::Null,
            "TRUE" => Token::True,
            "FALSE" => Token::False,
            _ => Token::Ident(ident),
        }
    }

    /// Reads a numeric literal, with an optional leading `-`. If a dot `.` is
    /// encountered, it returns a [Token::FloatNumber], otherwise a [Token::Number].
    fn read_number(&mut self) -> Result<Token, ParseError> {
        let mut number = String::new();
        let mut has_dot = false;

        if self.current_char() == '-' {
            number.push('-');
            self.advance();
        }

        while !self.is_at_end()
            && (self.current_char().is_ascii_digit() || (self.current_char() == '.' && !has_dot))
        {
            if self.current_char() == '.' {
                has_dot = true;
            }
            number.push(self.current_char());
            self.advance();
        }

        if !self.is_at_end() && self.current_char() == '.' {
            return Err(ParseError::InvalidNumber(format!("{number}.")));
        }

        if has_dot {
            return number
                .parse::<f64>()
                .map(Token::FloatNumber)
                .map_err(|_| ParseError::InvalidNumber(number));
        }

        number
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|_| ParseError::InvalidNumber(number))
    }

    /// Reads a string literal enclosed in single quotes. Quotes cannot be escaped.
    fn read_string(&mut self) -> Result<Token, ParseError> {
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        while !self.is_at_end() && self.current_char() != '\'' {
            string.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            return Err(ParseError::UnterminatedString);
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::String(string))
    }
}
