//! SQL formatting / pretty-printing logic
//!
//! The formatter never builds a syntax tree. It walks the token stream once,
//! keeping a stack of parenthesis frames, and decides line breaks from the
//! clause keywords it meets at statement level. The output depends only on
//! the token sequence, so formatting formatted SQL gives the same text back.

pub mod printer;
pub mod rules;

use crate::error::{Error, Result};
use crate::parser::lexer::{tokenize, Keyword, Spanned, Token};
use printer::{Printer, INDENT_SIZE};
use rules::{Clause, CONDITION_INDENT};

/// Format SQL string
pub fn format_sql(input: &str) -> Result<String> {
    let tokens = tokenize(input)?;
    tracing::debug!(tokens = tokens.len(), "formatting SQL");

    let mut formatter = Formatter::new(&tokens);
    formatter.run()?;
    Ok(formatter.printer.finish())
}

/// Remove `--` and `/* */` comments, leaving all other text untouched
pub fn strip_comments(input: &str) -> Result<String> {
    let tokens = tokenize(input)?;
    let mut output = String::with_capacity(input.len());
    let mut last = 0;

    for comment in tokens.iter().filter(|t| t.token.is_comment()) {
        output.push_str(&input[last..comment.start]);
        if matches!(comment.token, Token::MultiLineComment(_)) {
            // keep the neighbouring tokens apart
            output.push(' ');
        }
        last = comment.end;
    }
    output.push_str(&input[last..]);

    Ok(output)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// The statement itself
    Statement,
    /// A parenthesised `SELECT`/`WITH`, formatted as an indented block
    Subquery,
    /// Any other parentheses, kept inline
    Group,
}

#[derive(Debug, Clone)]
struct Frame {
    kind: FrameKind,
    clause: Clause,
    /// Column clause keywords start at
    base: usize,
    /// Column the closing parenthesis returns to
    close_column: usize,
    /// Column SELECT items line up at, once the first one is written
    select_align: Option<usize>,
    awaiting_first_column: bool,
    in_between: bool,
}

impl Frame {
    fn new(kind: FrameKind, base: usize, close_column: usize) -> Self {
        Self {
            kind,
            clause: Clause::None,
            base,
            close_column,
            select_align: None,
            awaiting_first_column: false,
            in_between: false,
        }
    }

    fn statement() -> Self {
        Self::new(FrameKind::Statement, 0, 0)
    }

    fn is_statement_level(&self) -> bool {
        self.kind != FrameKind::Group
    }
}

struct Formatter<'a> {
    tokens: &'a [Spanned],
    printer: Printer,
    frames: Vec<Frame>,
    /// Last token written, comments included
    prev: Option<&'a Token>,
    /// Last non-comment token written
    prev_code: Option<&'a Token>,
    prev_unary: bool,
    pending_newline: bool,
}

impl<'a> Formatter<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Self {
            tokens,
            printer: Printer::new(),
            frames: vec![Frame::statement()],
            prev: None,
            prev_code: None,
            prev_unary: false,
            pending_newline: false,
        }
    }

    fn run(&mut self) -> Result<()> {
        let tokens = self.tokens;

        for (i, spanned) in tokens.iter().enumerate() {
            let token = &spanned.token;

            if self.pending_newline {
                let column = self.frame().base;
                self.printer.break_to(column);
                self.pending_newline = false;
            }

            match token {
                Token::SingleLineComment(text) => {
                    self.write(token, text);
                    self.pending_newline = true;
                }
                Token::Keyword(keyword) => self.keyword(i, *keyword, token),
                Token::Comma => self.comma(token),
                Token::LParen => self.open_paren(i, token),
                Token::RParen => self.close_paren(spanned)?,
                Token::Semicolon => self.semicolon(i, spanned)?,
                Token::Minus | Token::Plus if self.in_unary_position() => {
                    self.write(token, token.as_str());
                    self.prev_unary = true;
                }
                _ => self.write(token, token.as_str()),
            }
        }

        if self.frames.len() > 1 {
            return Err(Error::FormatError {
                message: "Unclosed parenthesis".to_string(),
            });
        }
        Ok(())
    }

    fn frame(&self) -> &Frame {
        // the statement frame is never popped
        &self.frames[self.frames.len() - 1]
    }

    fn frame_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Write a token, separated from the previous one by a space when needed
    fn write(&mut self, token: &'a Token, text: &str) {
        if !self.printer.at_line_start() && self.wants_space(token) {
            self.printer.write(" ");
        }

        let column = self.printer.column();
        let frame = self.frame_mut();
        if frame.awaiting_first_column
            && !token.is_comment()
            && !matches!(token, Token::Keyword(Keyword::Distinct | Keyword::All))
        {
            frame.select_align = Some(column);
            frame.awaiting_first_column = false;
        }

        self.printer.write(text);
        self.prev = Some(token);
        if !token.is_comment() {
            self.prev_code = Some(token);
        }
        self.prev_unary = false;
    }

    fn wants_space(&self, cur: &Token) -> bool {
        if self.prev_unary {
            // a sign glued to another operator would lex as one token
            return cur.is_operator() || cur.is_comment();
        }
        let Some(prev) = self.prev else {
            return false;
        };
        if prev.is_comment() || cur.is_comment() {
            return true;
        }

        match (prev, cur) {
            (Token::Colon, cur) if rules::joins_colon(cur) => true,
            (
                _,
                Token::Comma
                | Token::Semicolon
                | Token::RParen
                | Token::RBracket
                | Token::Dot
                | Token::DoubleColon
                | Token::Colon,
            ) => false,
            (Token::LParen | Token::LBracket | Token::Dot | Token::DoubleColon | Token::Colon, _) => {
                false
            }
            (Token::Identifier(_) | Token::QuotedIdentifier(_), Token::LParen | Token::LBracket) => {
                false
            }
            (Token::RBracket, Token::LBracket) => false,
            (Token::Keyword(k), Token::LParen) => !rules::is_function_keyword(*k),
            _ => true,
        }
    }

    fn in_unary_position(&self) -> bool {
        match self.prev_code {
            None => true,
            Some(Token::Keyword(k)) => !rules::ends_operand(*k),
            Some(
                Token::LParen | Token::LBracket | Token::Comma | Token::Semicolon | Token::Colon,
            ) => true,
            Some(t) => t.is_operator(),
        }
    }

    /// First non-comment token after position `i`
    fn next_code(&self, i: usize) -> Option<&'a Token> {
        let tokens = self.tokens;
        tokens[i + 1..]
            .iter()
            .map(|t| &t.token)
            .find(|t| !t.is_comment())
    }

    fn join_follows(&self, i: usize) -> bool {
        let tokens = self.tokens;
        for t in tokens[i + 1..].iter().map(|t| &t.token).filter(|t| !t.is_comment()) {
            match t {
                Token::Keyword(Keyword::Join) => return true,
                Token::Keyword(k) if rules::is_join_modifier(*k) => continue,
                _ => return false,
            }
        }
        false
    }

    fn prev_is_join_modifier(&self) -> bool {
        matches!(self.prev_code, Some(Token::Keyword(k)) if rules::is_join_modifier(*k))
    }

    fn keyword(&mut self, i: usize, keyword: Keyword, token: &'a Token) {
        let text = rules::format_keyword(keyword.as_str());

        if !self.frame().is_statement_level() {
            self.write(token, &text);
            return;
        }

        let opens = match keyword {
            Keyword::And | Keyword::Or => {
                let frame = self.frame_mut();
                if keyword == Keyword::And && frame.in_between {
                    frame.in_between = false;
                } else if frame.clause.breaks_conditions() {
                    let column = frame.base + CONDITION_INDENT;
                    self.printer.break_to(column);
                }
                None
            }
            Keyword::Between => {
                self.frame_mut().in_between = true;
                None
            }
            Keyword::On => {
                self.frame_mut().clause = Clause::On;
                None
            }
            Keyword::Join => {
                if self.prev_is_join_modifier() {
                    self.frame_mut().clause = Clause::Join;
                    None
                } else {
                    Some(Clause::Join)
                }
            }
            k if rules::is_join_modifier(k) => {
                if self.join_follows(i) && !self.prev_is_join_modifier() {
                    Some(Clause::Join)
                } else {
                    None
                }
            }
            Keyword::Group | Keyword::Order => {
                if matches!(self.next_code(i), Some(Token::Keyword(Keyword::By))) {
                    rules::clause_for(keyword)
                } else {
                    None
                }
            }
            Keyword::From if matches!(self.prev_code, Some(Token::Keyword(Keyword::Delete))) => {
                self.frame_mut().clause = Clause::From;
                None
            }
            k => rules::clause_for(k),
        };

        if let Some(clause) = opens {
            let column = self.frame().base;
            self.printer.break_to(column);
            let frame = self.frame_mut();
            frame.clause = clause;
            frame.in_between = false;
            frame.select_align = None;
        }

        self.write(token, &text);

        if keyword == Keyword::Select && opens.is_some() {
            self.frame_mut().awaiting_first_column = true;
        }
    }

    fn comma(&mut self, token: &'a Token) {
        self.write(token, ",");

        let frame = self.frame();
        if !frame.is_statement_level() {
            return;
        }
        match frame.clause {
            Clause::Select => {
                let column = frame.select_align.unwrap_or(frame.base + INDENT_SIZE);
                self.printer.newline_to(column);
            }
            Clause::With => {
                let column = frame.base;
                self.printer.newline_to(column);
            }
            _ => {}
        }
    }

    fn open_paren(&mut self, i: usize, token: &'a Token) {
        let subquery = matches!(
            self.next_code(i),
            Some(Token::Keyword(Keyword::Select | Keyword::With))
        );

        self.write(token, "(");

        let frame = if subquery {
            let outer = self.frame();
            let indent = match (outer.clause, outer.select_align) {
                (Clause::Select, Some(align)) if outer.is_statement_level() => align,
                _ => self.printer.line_indent(),
            };
            Frame::new(FrameKind::Subquery, indent + INDENT_SIZE, indent)
        } else {
            let base = self.frame().base;
            Frame::new(FrameKind::Group, base, base)
        };
        self.frames.push(frame);
    }

    fn close_paren(&mut self, spanned: &'a Spanned) -> Result<()> {
        if self.frames.len() <= 1 {
            return Err(Error::FormatError {
                message: format!("Unbalanced closing parenthesis at offset {}", spanned.start),
            });
        }
        if let Some(frame) = self.frames.pop() {
            if frame.kind == FrameKind::Subquery {
                self.printer.break_to(frame.close_column);
            }
        }
        self.write(&spanned.token, ")");
        Ok(())
    }

    fn semicolon(&mut self, i: usize, spanned: &'a Spanned) -> Result<()> {
        if self.frames.len() > 1 {
            return Err(Error::FormatError {
                message: format!("Unclosed parenthesis before offset {}", spanned.start),
            });
        }

        self.write(&spanned.token, ";");
        self.frames = vec![Frame::statement()];

        if i + 1 < self.tokens.len() {
            self.printer.newline();
            self.printer.newline();
        }
        Ok(())
    }
}
