//! Error types for sqltidy

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for sqltidy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sqltidy
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("No SQL provided")]
    #[diagnostic(code(sqltidy::empty_input))]
    EmptyInput,

    #[error("{message}")]
    #[diagnostic(code(sqltidy::parse_error))]
    ParseError {
        message: String,
        /// Byte offset and length
        #[label("here")]
        span: Option<(usize, usize)>,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(sqltidy::io_error))]
    IoError(#[from] std::io::Error),

    #[error("Format error: {message}")]
    #[diagnostic(code(sqltidy::format_error))]
    FormatError { message: String },
}

impl Error {
    /// True for failures caused by missing input rather than by formatting
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::EmptyInput)
    }
}

/// Calculate line and column number from byte offset
pub fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in input.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Get the line content at a given line number (1-indexed)
pub fn get_line_content(input: &str, line_num: usize) -> Option<&str> {
    input.lines().nth(line_num.saturating_sub(1))
}

/// Format a parse error with context
pub fn format_parse_error(input: &str, offset: usize, message: &str) -> String {
    let (line, col) = offset_to_line_col(input, offset);
    let line_content = get_line_content(input, line).unwrap_or("");

    // Create a pointer to the error position
    let pointer = " ".repeat(col.saturating_sub(1)) + "^";

    format!(
        "Parse error at line {}, column {}:\n  |\n{:>3} | {}\n  | {}\n  = {}",
        line, col, line, line_content, pointer, message
    )
}
