//! sqltidy - An opinionated SQL formatter that can alias qualified SELECT columns
//!
//! This library provides the core formatting functionality for the sqltidy CLI.

pub mod aliases;
pub mod cli;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod request;

use serde::Deserialize;

pub use error::{Error, Result};
pub use formatter::format_sql;

/// Options recognized by [`format_with_options`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Options {
    /// Alias qualified columns of the outermost SELECT
    #[serde(default)]
    pub add_aliases: bool,
}

/// Format SQL string and return the formatted result
pub fn format(input: &str) -> Result<String> {
    format_with_options(input, &Options::default())
}

/// Format SQL string, optionally aliasing qualified SELECT columns first
pub fn format_with_options(input: &str, options: &Options) -> Result<String> {
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    if options.add_aliases {
        aliases::add_column_aliases(input)
    } else {
        format_sql(input)
    }
}

/// Check if SQL string is already formatted
pub fn check(input: &str) -> Result<bool> {
    check_with_options(input, &Options::default())
}

/// Check if SQL string is already formatted under the given options
pub fn check_with_options(input: &str, options: &Options) -> Result<bool> {
    let formatted = format_with_options(input, options)?;
    Ok(formatted == input.trim_end())
}
