//! Location of the target `SELECT ... FROM` clause
//!
//! Works on a comment-free token stream and tracks parenthesis depth, so a
//! `FROM` inside a subquery or a comma inside function arguments never
//! ends the span or splits a column.

use std::ops::Range;

use super::lexer::{Keyword, Spanned, Token};

/// The located column list of the outermost `SELECT`, as slices of the source
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseSpan<'a> {
    /// Text before the `SELECT` keyword
    pub prefix: &'a str,
    /// `SELECT` plus an optional `DISTINCT`/`ALL` modifier
    pub head: &'a str,
    /// Raw column-list text, trimmed
    pub columns: &'a str,
    /// Text after the matched `FROM` keyword
    pub suffix: &'a str,
    /// Token ranges of each comma-separated column, in order
    pub column_tokens: Vec<Range<usize>>,
}

/// Find the target `SELECT` column list.
///
/// For a statement starting with `WITH`, that is the first depth-0 `SELECT`
/// after the CTE block. Otherwise it is the first depth-0 `SELECT`. Returns
/// `None` when there is no such `SELECT`, when it has no `FROM` at its own
/// depth, or when its column list is empty.
pub fn locate_select<'a>(source: &'a str, tokens: &[Spanned]) -> Option<ClauseSpan<'a>> {
    let starts_with_cte = tokens
        .first()
        .is_some_and(|t| t.token.is_keyword(Keyword::With));

    let select = find_top_level(tokens, |t| t.is_keyword(Keyword::Select))?;
    tracing::trace!(select, starts_with_cte, "located top-level SELECT");

    let mut list_start = select + 1;
    if tokens.get(list_start).is_some_and(|t| {
        t.token.is_keyword(Keyword::Distinct) || t.token.is_keyword(Keyword::All)
    }) {
        list_start += 1;
    }

    let from = find_select_end(tokens, list_start)?;
    if from == list_start {
        return None;
    }

    let list = &tokens[list_start..from];
    let column_tokens = split_columns(list)
        .into_iter()
        .map(|r| (r.start + list_start)..(r.end + list_start))
        .collect();

    let list_text_start = tokens[list_start].start;
    let list_text_end = tokens[from - 1].end;

    Some(ClauseSpan {
        prefix: &source[..tokens[select].start],
        head: &source[tokens[select].start..tokens[list_start - 1].end],
        columns: &source[list_text_start..list_text_end],
        suffix: &source[tokens[from].end..],
        column_tokens,
    })
}

/// Split a column list on depth-0 commas, returning token ranges.
///
/// An empty piece (`a,,b`) yields an empty range so the column count is kept.
pub fn split_columns(list: &[Spanned]) -> Vec<Range<usize>> {
    let mut columns = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, t) in list.iter().enumerate() {
        match t.token {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                columns.push(start..i);
                start = i + 1;
            }
            _ => {}
        }
    }
    columns.push(start..list.len());
    columns
}

/// Source text covered by a token range, or `""` for an empty range
pub fn range_text<'a>(source: &'a str, tokens: &[Spanned], range: &Range<usize>) -> &'a str {
    if range.is_empty() {
        return "";
    }
    &source[tokens[range.start].start..tokens[range.end - 1].end]
}

/// Index of the first depth-0 token matching `pred`
fn find_top_level(tokens: &[Spanned], pred: impl Fn(&Token) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match t.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            _ if depth == 0 && pred(&t.token) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Index of the `FROM` closing the column list that starts at `list_start`.
///
/// A depth-0 statement or set-operation boundary first means this `SELECT`
/// has no `FROM` of its own.
fn find_select_end(tokens: &[Spanned], list_start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(list_start) {
        match &t.token {
            Token::LParen => depth += 1,
            Token::RParen => {
                if depth == 0 {
                    // the SELECT itself sits inside parentheses we never opened
                    return None;
                }
                depth -= 1;
            }
            Token::Keyword(Keyword::From) if depth == 0 => return Some(i),
            Token::Semicolon if depth == 0 => return None,
            Token::Keyword(Keyword::Union | Keyword::Intersect | Keyword::Except) if depth == 0 => {
                return None
            }
            _ => {}
        }
    }
    None
}
