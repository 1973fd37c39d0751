//! SQL tokenization
//!
//! This module handles breaking SQL input into tokens. Whitespace is dropped,
//! every other character of the input belongs to exactly one token, and each
//! token remembers the byte range it was read from.

use crate::error::{Error, Result};

/// Keywords recognized by the lexer. These are printed upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    In,
    Is,
    Null,
    Like,
    ILike,
    Between,
    Case,
    When,
    Then,
    Else,
    End,
    As,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Outer,
    Natural,
    Using,
    With,
    Recursive,
    Union,
    Intersect,
    Except,
    All,
    Any,
    Distinct,
    Group,
    By,
    Having,
    Order,
    Asc,
    Desc,
    Nulls,
    First,
    Last,
    Limit,
    Offset,
    Fetch,
    Next,
    Only,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Merge,
    Matched,
    Returning,
    Create,
    Table,
    View,
    Alter,
    Drop,
    Truncate,
    If,
    Exists,
    Replace,
    Default,
    True,
    False,
    Cast,
    Extract,
    Interval,
    Escape,
    Over,
    Partition,
    Window,
    Rows,
    Range,
    Unbounded,
    Preceding,
    Following,
    Current,
    Row,
    Qualify,
    Lateral,
}

impl Keyword {
    /// Every keyword, in declaration order
    pub const ALL: &'static [Keyword] = &[
        Keyword::Select,
        Keyword::From,
        Keyword::Where,
        Keyword::And,
        Keyword::Or,
        Keyword::Not,
        Keyword::In,
        Keyword::Is,
        Keyword::Null,
        Keyword::Like,
        Keyword::ILike,
        Keyword::Between,
        Keyword::Case,
        Keyword::When,
        Keyword::Then,
        Keyword::Else,
        Keyword::End,
        Keyword::As,
        Keyword::On,
        Keyword::Join,
        Keyword::Inner,
        Keyword::Left,
        Keyword::Right,
        Keyword::Full,
        Keyword::Cross,
        Keyword::Outer,
        Keyword::Natural,
        Keyword::Using,
        Keyword::With,
        Keyword::Recursive,
        Keyword::Union,
        Keyword::Intersect,
        Keyword::Except,
        Keyword::All,
        Keyword::Any,
        Keyword::Distinct,
        Keyword::Group,
        Keyword::By,
        Keyword::Having,
        Keyword::Order,
        Keyword::Asc,
        Keyword::Desc,
        Keyword::Nulls,
        Keyword::First,
        Keyword::Last,
        Keyword::Limit,
        Keyword::Offset,
        Keyword::Fetch,
        Keyword::Next,
        Keyword::Only,
        Keyword::Insert,
        Keyword::Into,
        Keyword::Values,
        Keyword::Update,
        Keyword::Set,
        Keyword::Delete,
        Keyword::Merge,
        Keyword::Matched,
        Keyword::Returning,
        Keyword::Create,
        Keyword::Table,
        Keyword::View,
        Keyword::Alter,
        Keyword::Drop,
        Keyword::Truncate,
        Keyword::If,
        Keyword::Exists,
        Keyword::Replace,
        Keyword::Default,
        Keyword::True,
        Keyword::False,
        Keyword::Cast,
        Keyword::Extract,
        Keyword::Interval,
        Keyword::Escape,
        Keyword::Over,
        Keyword::Partition,
        Keyword::Window,
        Keyword::Rows,
        Keyword::Range,
        Keyword::Unbounded,
        Keyword::Preceding,
        Keyword::Following,
        Keyword::Current,
        Keyword::Row,
        Keyword::Qualify,
        Keyword::Lateral,
    ];

    /// Canonical (upper-case) spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::In => "IN",
            Keyword::Is => "IS",
            Keyword::Null => "NULL",
            Keyword::Like => "LIKE",
            Keyword::ILike => "ILIKE",
            Keyword::Between => "BETWEEN",
            Keyword::Case => "CASE",
            Keyword::When => "WHEN",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::End => "END",
            Keyword::As => "AS",
            Keyword::On => "ON",
            Keyword::Join => "JOIN",
            Keyword::Inner => "INNER",
            Keyword::Left => "LEFT",
            Keyword::Right => "RIGHT",
            Keyword::Full => "FULL",
            Keyword::Cross => "CROSS",
            Keyword::Outer => "OUTER",
            Keyword::Natural => "NATURAL",
            Keyword::Using => "USING",
            Keyword::With => "WITH",
            Keyword::Recursive => "RECURSIVE",
            Keyword::Union => "UNION",
            Keyword::Intersect => "INTERSECT",
            Keyword::Except => "EXCEPT",
            Keyword::All => "ALL",
            Keyword::Any => "ANY",
            Keyword::Distinct => "DISTINCT",
            Keyword::Group => "GROUP",
            Keyword::By => "BY",
            Keyword::Having => "HAVING",
            Keyword::Order => "ORDER",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
            Keyword::Nulls => "NULLS",
            Keyword::First => "FIRST",
            Keyword::Last => "LAST",
            Keyword::Limit => "LIMIT",
            Keyword::Offset => "OFFSET",
            Keyword::Fetch => "FETCH",
            Keyword::Next => "NEXT",
            Keyword::Only => "ONLY",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::Delete => "DELETE",
            Keyword::Merge => "MERGE",
            Keyword::Matched => "MATCHED",
            Keyword::Returning => "RETURNING",
            Keyword::Create => "CREATE",
            Keyword::Table => "TABLE",
            Keyword::View => "VIEW",
            Keyword::Alter => "ALTER",
            Keyword::Drop => "DROP",
            Keyword::Truncate => "TRUNCATE",
            Keyword::If => "IF",
            Keyword::Exists => "EXISTS",
            Keyword::Replace => "REPLACE",
            Keyword::Default => "DEFAULT",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Cast => "CAST",
            Keyword::Extract => "EXTRACT",
            Keyword::Interval => "INTERVAL",
            Keyword::Escape => "ESCAPE",
            Keyword::Over => "OVER",
            Keyword::Partition => "PARTITION",
            Keyword::Window => "WINDOW",
            Keyword::Rows => "ROWS",
            Keyword::Range => "RANGE",
            Keyword::Unbounded => "UNBOUNDED",
            Keyword::Preceding => "PRECEDING",
            Keyword::Following => "FOLLOWING",
            Keyword::Current => "CURRENT",
            Keyword::Row => "ROW",
            Keyword::Qualify => "QUALIFY",
            Keyword::Lateral => "LATERAL",
        }
    }

    /// Look up a keyword by its spelling, ignoring case
    pub fn from_word(word: &str) -> Option<Keyword> {
        let upper = word.to_ascii_uppercase();
        Self::ALL.iter().copied().find(|k| k.as_str() == upper)
    }

    /// Keywords that are also ordinary function names, e.g. `LEFT(name, 3)`
    fn doubles_as_function(self) -> bool {
        matches!(
            self,
            Keyword::Left
                | Keyword::Right
                | Keyword::Replace
                | Keyword::If
                | Keyword::First
                | Keyword::Last
        )
    }
}

/// Token types for SQL lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),

    // Identifiers and literals (raw source text)
    Identifier(String),
    QuotedIdentifier(String),
    StringLiteral(String),
    NumberLiteral(String),
    /// Bind parameter: `?`, `$1` or `:name`
    Parameter(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    NotEq, // !=
    LtGt,  // <>
    Lt,
    LtEq,
    Gt,
    GtEq,
    Concat, // ||
    /// Any other operator, e.g. `->>` or `@>`
    Operator(String),

    // Punctuation
    Comma,
    Dot,
    Semicolon,
    Colon,
    DoubleColon, // ::
    LParen,
    RParen,
    LBracket,
    RBracket,

    // Comments
    SingleLineComment(String), // -- ...
    MultiLineComment(String),  // /* ... */
}

impl Token {
    /// The text this token prints as
    pub fn as_str(&self) -> &str {
        match self {
            Token::Keyword(k) => k.as_str(),
            Token::Identifier(s)
            | Token::QuotedIdentifier(s)
            | Token::StringLiteral(s)
            | Token::NumberLiteral(s)
            | Token::Parameter(s)
            | Token::Operator(s)
            | Token::SingleLineComment(s)
            | Token::MultiLineComment(s) => s,
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Eq => "=",
            Token::NotEq => "!=",
            Token::LtGt => "<>",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::Concat => "||",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::DoubleColon => "::",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Token::SingleLineComment(_) | Token::MultiLineComment(_))
    }

    /// Binary/unary operators, used for spacing decisions
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Percent
                | Token::Eq
                | Token::NotEq
                | Token::LtGt
                | Token::Lt
                | Token::LtEq
                | Token::Gt
                | Token::GtEq
                | Token::Concat
                | Token::Operator(_)
        )
    }
}

/// A token together with the byte range it covers in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

/// Tokenize SQL input, comments included
pub fn tokenize(input: &str) -> Result<Vec<Spanned>> {
    let tokens = Lexer::new(input).run()?;
    tracing::trace!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}

/// Tokenize SQL input and drop comment tokens
pub fn tokenize_without_comments(input: &str) -> Result<Vec<Spanned>> {
    let mut tokens = tokenize(input)?;
    tokens.retain(|t| !t.token.is_comment());
    Ok(tokens)
}

/// Characters that combine into a single operator token
const OPERATOR_CHARS: &str = "+-*/<>=~!@#%^&|";

/// An operator ending in `+` or `-` must contain one of these, otherwise the
/// trailing signs are read as separate unary operators (`a=-1` is `=`, `-`)
const SIGN_SUFFIX_CHARS: &str = "~!@#%^&|";

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Spanned>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Spanned>> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
                continue;
            }

            let start = self.pos;
            let token = match c {
                '-' if self.peek_at(1) == Some('-') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.block_comment(start)?,
                '\'' => Token::StringLiteral(self.quoted(start, '\'', "string literal")?),
                '"' => Token::QuotedIdentifier(self.quoted(start, '"', "quoted identifier")?),
                '`' => Token::QuotedIdentifier(self.quoted(start, '`', "quoted identifier")?),
                c if c.is_ascii_digit() => self.number(),
                c if is_word_start(c) => self.word(start)?,
                '@' if self.peek_at(1).is_some_and(is_word_char) => {
                    self.bump();
                    self.eat_while(is_word_char);
                    Token::Identifier(self.input[start..self.pos].to_string())
                }
                '$' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.bump();
                    self.eat_while(|c| c.is_ascii_digit());
                    Token::Parameter(self.input[start..self.pos].to_string())
                }
                '?' if matches!(self.peek_at(1), Some('|' | '&')) => {
                    self.bump();
                    self.bump();
                    Token::Operator(self.input[start..self.pos].to_string())
                }
                '?' => {
                    self.bump();
                    Token::Parameter("?".to_string())
                }
                ':' => self.colon(start),
                _ => self.punctuation(start)?,
            };

            self.tokens.push(Spanned {
                token,
                start,
                end: self.pos,
            });
        }

        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
    }

    fn previous(&self) -> Option<&Token> {
        self.tokens.last().map(|t| &t.token)
    }

    fn line_comment(&mut self) -> Token {
        let start = self.pos;
        self.eat_while(|c| c != '\n');
        Token::SingleLineComment(self.input[start..self.pos].trim_end().to_string())
    }

    fn block_comment(&mut self, start: usize) -> Result<Token> {
        // consume /*
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(Token::MultiLineComment(
                        self.input[start..self.pos].to_string(),
                    ));
                }
                Some(_) => {}
                None => return Err(unterminated(start, self.input.len(), "block comment")),
            }
        }
    }

    /// Read a quoted run starting at the opening quote; a doubled quote is an escape
    fn quoted(&mut self, start: usize, quote: char, what: &str) -> Result<String> {
        self.bump();
        loop {
            match self.bump() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.bump();
                        continue;
                    }
                    return Ok(self.input[start..self.pos].to_string());
                }
                Some(_) => {}
                None => return Err(unterminated(start, self.input.len(), what)),
            }
        }
    }

    fn number(&mut self) -> Token {
        let start = self.pos;
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_at(1), Some('+' | '-')) { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.bump();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        Token::NumberLiteral(self.input[start..self.pos].to_string())
    }

    fn word(&mut self, start: usize) -> Result<Token> {
        self.eat_while(is_word_char);
        let text = &self.input[start..self.pos];

        // Prefixed string literals: E'..', N'..', X'..', B'..'
        if text.len() == 1
            && matches!(text, "E" | "e" | "N" | "n" | "X" | "x" | "B" | "b")
            && self.peek() == Some('\'')
        {
            let quote_start = self.pos;
            self.quoted(quote_start, '\'', "string literal")?;
            return Ok(Token::StringLiteral(self.input[start..self.pos].to_string()));
        }

        // Either side of a qualifying dot is always a name
        let after_dot = matches!(self.previous(), Some(Token::Dot));
        let before_dot = self.peek() == Some('.');
        if after_dot || before_dot {
            return Ok(Token::Identifier(text.to_string()));
        }

        Ok(match Keyword::from_word(text) {
            Some(k) if k.doubles_as_function() && self.peek() == Some('(') => {
                Token::Identifier(text.to_string())
            }
            Some(k) => Token::Keyword(k),
            None => Token::Identifier(text.to_string()),
        })
    }

    fn colon(&mut self, start: usize) -> Token {
        self.bump();
        match self.peek() {
            Some(':') => {
                self.bump();
                Token::DoubleColon
            }
            Some('=') => {
                self.bump();
                Token::Operator(":=".to_string())
            }
            Some(c) if is_word_start(c) => {
                self.eat_while(is_word_char);
                Token::Parameter(self.input[start..self.pos].to_string())
            }
            _ => Token::Colon,
        }
    }

    fn punctuation(&mut self, start: usize) -> Result<Token> {
        if self.peek().is_some_and(is_operator_char) {
            return Ok(self.operator(start));
        }

        let c = self.bump().unwrap_or_default();
        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '.' => Token::Dot,
            ';' => Token::Semicolon,
            other => {
                return Err(Error::ParseError {
                    message: format!("Unexpected character '{}'", other),
                    span: Some((start, other.len_utf8())),
                })
            }
        };
        Ok(token)
    }

    /// Read the longest run of operator characters as one operator.
    ///
    /// The run stops before a comment start and before an `@name` variable.
    fn operator(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            let next = self.peek_at(1);
            let comment = matches!((c, next), ('-', Some('-')) | ('/', Some('*')));
            let variable = c == '@' && self.pos > start && next.is_some_and(is_word_char);
            if !is_operator_char(c) || (self.pos > start && comment) || variable {
                break;
            }
            self.bump();
        }

        let input = self.input;
        let mut text = &input[start..self.pos];
        if text.len() > 1 && !text.contains(|c: char| SIGN_SUFFIX_CHARS.contains(c)) {
            let kept = text.trim_end_matches(|c: char| c == '+' || c == '-');
            text = if kept.is_empty() { &text[..1] } else { kept };
            self.pos = start + text.len();
        }

        match text {
            "+" => Token::Plus,
            "-" => Token::Minus,
            "*" => Token::Star,
            "/" => Token::Slash,
            "%" => Token::Percent,
            "=" => Token::Eq,
            "<" => Token::Lt,
            ">" => Token::Gt,
            "<=" => Token::LtEq,
            ">=" => Token::GtEq,
            "<>" => Token::LtGt,
            "!=" => Token::NotEq,
            "||" => Token::Concat,
            other => Token::Operator(other.to_string()),
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(c)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn unterminated(start: usize, end: usize, what: &str) -> Error {
    Error::ParseError {
        message: format!("Unterminated {}", what),
        span: Some((start, end - start)),
    }
}
