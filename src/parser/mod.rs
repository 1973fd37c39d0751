//! SQL tokenizing and clause location
//!
//! There is no full parser: the formatter works on the token stream, and the
//! column aliaser only needs to find one `SELECT ... FROM` span.

pub mod lexer;
pub mod span;

pub use lexer::{tokenize, tokenize_without_comments, Keyword, Spanned, Token};
pub use span::{locate_select, ClauseSpan};
