//! Column aliasing for the outermost SELECT
//!
//! Every bare `table.column` item of the target SELECT list is rewritten as
//! `table.column AS table_column`. Items that already carry an alias, calls to
//! a recognized aggregate/window function, and anything that is not exactly a
//! two-part name are written back unchanged.

pub mod functions;

use crate::error::Result;
use crate::formatter;
use crate::parser::lexer::{tokenize_without_comments, Keyword, Spanned, Token};
use crate::parser::span::{locate_select, range_text};

/// Indentation used for columns in the reconstructed SELECT list
const COLUMN_INDENT: &str = "    ";

/// How a SELECT item is treated by the aliaser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Contains `AS` somewhere
    AlreadyAliased,
    /// Starts with a recognized function name directly followed by `(`
    FunctionCall,
    /// Exactly `table.column`
    Qualified { table: String, column: String },
    /// Everything else, including `schema.table.column`
    Unqualified,
}

/// One item of the split SELECT list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    /// Trimmed source text
    pub text: String,
    pub kind: ColumnKind,
}

impl ColumnEntry {
    pub fn new(text: &str, tokens: &[Spanned]) -> Self {
        Self {
            text: text.trim().to_string(),
            kind: classify_column(tokens),
        }
    }

    /// Text the entry is written back as
    pub fn render(&self) -> String {
        match &self.kind {
            ColumnKind::Qualified { table, column } => {
                format!("{} AS {}", self.text, alias_for(table, column))
            }
            _ => self.text.clone(),
        }
    }
}

/// Classify the tokens of one SELECT item.
///
/// Rules apply in order: an `AS` keyword anywhere, then a recognized function
/// call, then a two-part name.
pub fn classify_column(tokens: &[Spanned]) -> ColumnKind {
    if tokens.iter().any(|t| t.token.is_keyword(Keyword::As)) {
        return ColumnKind::AlreadyAliased;
    }

    if let [name, paren, ..] = tokens {
        if let Token::Identifier(function) = &name.token {
            if paren.token == Token::LParen
                && paren.start == name.end
                && functions::is_recognized_function(function)
            {
                return ColumnKind::FunctionCall;
            }
        }
    }

    match tokens {
        [table, dot, column] if dot.token == Token::Dot => {
            match (name_text(&table.token), name_text(&column.token)) {
                (Some(table), Some(column)) => ColumnKind::Qualified {
                    table: table.to_string(),
                    column: column.to_string(),
                },
                _ => ColumnKind::Unqualified,
            }
        }
        _ => ColumnKind::Unqualified,
    }
}

fn name_text(token: &Token) -> Option<&str> {
    match token {
        Token::Identifier(s) | Token::QuotedIdentifier(s) => Some(s),
        _ => None,
    }
}

/// Build `table_column`; quoted when either part is quoted
pub fn alias_for(table: &str, column: &str) -> String {
    let quote = quote_char(table).or_else(|| quote_char(column));
    let joined = format!("{}_{}", unquote(table), unquote(column));
    match quote {
        Some(q) => format!("{q}{joined}{q}"),
        None => joined,
    }
}

fn quote_char(name: &str) -> Option<char> {
    match name.chars().next() {
        Some(c @ ('"' | '`')) if name.len() >= 2 && name.ends_with(c) => Some(c),
        _ => None,
    }
}

fn unquote(name: &str) -> &str {
    if quote_char(name).is_some() {
        &name[1..name.len() - 1]
    } else {
        name
    }
}

/// Rewrite the target SELECT list without the final formatting pass.
///
/// Returns `None` when no `SELECT ... FROM` span can be located.
pub fn rewrite_select_columns(sql: &str) -> Result<Option<String>> {
    let tokens = tokenize_without_comments(sql)?;

    let Some(span) = locate_select(sql, &tokens) else {
        tracing::debug!("no SELECT ... FROM span found, columns left untouched");
        return Ok(None);
    };

    let entries: Vec<ColumnEntry> = span
        .column_tokens
        .iter()
        .map(|range| ColumnEntry::new(range_text(sql, &tokens, range), &tokens[range.clone()]))
        .collect();

    for entry in &entries {
        tracing::trace!(column = %entry.text, kind = ?entry.kind, "classified column");
    }
    tracing::debug!(
        columns = entries.len(),
        aliased = entries
            .iter()
            .filter(|e| matches!(e.kind, ColumnKind::Qualified { .. }))
            .count(),
        "rewriting SELECT list"
    );

    let columns: Vec<String> = entries.iter().map(ColumnEntry::render).collect();
    let separator = format!(",\n{}", COLUMN_INDENT);

    let mut rewritten = String::with_capacity(sql.len() + columns.len() * 16);
    rewritten.push_str(span.prefix);
    rewritten.push_str(span.head);
    rewritten.push('\n');
    rewritten.push_str(COLUMN_INDENT);
    rewritten.push_str(&columns.join(&separator));
    rewritten.push_str("\nFROM");
    rewritten.push_str(span.suffix);

    Ok(Some(rewritten))
}

/// Strip comments, alias the outermost SELECT list, then format
pub fn add_column_aliases(sql: &str) -> Result<String> {
    let stripped = formatter::strip_comments(sql)?;
    let rewritten = rewrite_select_columns(&stripped)?.unwrap_or(stripped);
    formatter::format_sql(&rewritten)
}
