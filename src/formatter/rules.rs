//! Formatting rules
//!
//! This module defines the fixed formatting style:
//! - Keywords: uppercase
//! - Indentation: 4 spaces
//! - Each major clause on its own line
//! - SELECT columns: one per line, aligned under the first column
//! - AND/OR conditions: on their own line, 2 spaces past the clause

use crate::parser::lexer::{Keyword, Token};

/// Width of one indentation level
pub const INDENT_WIDTH: usize = 4;

/// Extra indentation for AND/OR continuation lines
pub const CONDITION_INDENT: usize = 2;

/// Convert keyword to uppercase
pub fn format_keyword(keyword: &str) -> String {
    keyword.to_uppercase()
}

/// The clause a statement-level keyword opens, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    None,
    With,
    Select,
    From,
    Join,
    On,
    Where,
    GroupBy,
    Having,
    Qualify,
    Window,
    OrderBy,
    Limit,
    Values,
    Set,
    Returning,
    SetOperation,
    Statement,
}

impl Clause {
    /// Clauses whose top-level AND/OR start a new line
    pub fn breaks_conditions(self) -> bool {
        matches!(
            self,
            Clause::Where | Clause::Having | Clause::On | Clause::Qualify
        )
    }
}

/// Keywords that start a line and open a clause when they appear at
/// statement level. Join modifiers (`LEFT`, `INNER`, ...) are handled by
/// the formatter because they only count when a `JOIN` follows.
pub fn clause_for(keyword: Keyword) -> Option<Clause> {
    let clause = match keyword {
        Keyword::With => Clause::With,
        Keyword::Select => Clause::Select,
        Keyword::From => Clause::From,
        Keyword::Join => Clause::Join,
        Keyword::Where => Clause::Where,
        Keyword::Group => Clause::GroupBy,
        Keyword::Having => Clause::Having,
        Keyword::Qualify => Clause::Qualify,
        Keyword::Window => Clause::Window,
        Keyword::Order => Clause::OrderBy,
        Keyword::Limit | Keyword::Offset | Keyword::Fetch => Clause::Limit,
        Keyword::Values => Clause::Values,
        Keyword::Set => Clause::Set,
        Keyword::Returning => Clause::Returning,
        Keyword::Union | Keyword::Intersect | Keyword::Except => Clause::SetOperation,
        Keyword::Insert
        | Keyword::Update
        | Keyword::Delete
        | Keyword::Merge
        | Keyword::Create
        | Keyword::Alter
        | Keyword::Drop
        | Keyword::Truncate => Clause::Statement,
        _ => return None,
    };
    Some(clause)
}

/// Keywords that may precede `JOIN` and start the join line themselves
pub fn is_join_modifier(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::Inner
            | Keyword::Left
            | Keyword::Right
            | Keyword::Full
            | Keyword::Cross
            | Keyword::Natural
            | Keyword::Outer
    )
}

/// Keywords written directly against their opening parenthesis, like a function
pub fn is_function_keyword(keyword: Keyword) -> bool {
    matches!(keyword, Keyword::Cast | Keyword::Extract | Keyword::Any)
}

/// Tokens that would fuse with a preceding `:` into a parameter, `::` or `:=`
pub fn joins_colon(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(_)
            | Token::Keyword(_)
            | Token::Parameter(_)
            | Token::Colon
            | Token::DoubleColon
            | Token::Eq
    ) || matches!(token, Token::Operator(op) if op.starts_with('='))
}

/// Keywords that end an operand, so a following `-` or `+` is binary
pub fn ends_operand(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::Null | Keyword::True | Keyword::False | Keyword::End | Keyword::Current
    )
}
