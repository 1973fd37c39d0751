//! Error handling tests for sqltidy
//!
//! Tests for empty input, lexing failures, unbalanced parentheses and the
//! rendered error context.

use sqltidy::error::{format_parse_error, get_line_content, offset_to_line_col};
use sqltidy::{check, format, format_with_options, Error, Options};

mod input_errors {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(matches!(format(""), Err(Error::EmptyInput)));
    }

    #[test]
    fn whitespace_only_input() {
        let result = format_with_options(" \n\t ", &Options { add_aliases: true });
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn empty_input_message() {
        assert_eq!(Error::EmptyInput.to_string(), "No SQL provided");
        assert!(Error::EmptyInput.is_input_error());
    }
}

mod parse_errors {
    use super::*;

    #[test]
    fn unclosed_string() {
        match format("SELECT 'unclosed string FROM t") {
            Err(Error::ParseError { message, span }) => {
                assert_eq!(message, "Unterminated string literal");
                assert_eq!(span, Some((7, 23)));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn unclosed_quoted_identifier() {
        let result = format("SELECT \"col FROM t");
        assert!(matches!(result, Err(Error::ParseError { .. })));
    }

    #[test]
    fn unclosed_block_comment() {
        match format("SELECT a /* never closed") {
            Err(Error::ParseError { message, .. }) => {
                assert_eq!(message, "Unterminated block comment")
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn unexpected_character() {
        match format("SELECT a } FROM t") {
            Err(Error::ParseError { message, span }) => {
                assert_eq!(message, "Unexpected character '}'");
                assert_eq!(span, Some((9, 1)));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn alias_path_reports_lexing_errors_too() {
        let result = format_with_options("SELECT t.a, 'x FROM t", &Options { add_aliases: true });
        assert!(matches!(result, Err(Error::ParseError { .. })));
    }
}

mod format_errors {
    use super::*;

    #[test]
    fn unclosed_parenthesis() {
        match format("SELECT (a + b FROM t") {
            Err(Error::FormatError { message }) => assert_eq!(message, "Unclosed parenthesis"),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn unbalanced_closing_parenthesis() {
        match format("SELECT a) FROM t") {
            Err(e @ Error::FormatError { .. }) => assert_eq!(
                e.to_string(),
                "Format error: Unbalanced closing parenthesis at offset 8"
            ),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn parenthesis_left_open_across_statements() {
        let result = format("SELECT (1; SELECT 2)");
        assert!(matches!(result, Err(Error::FormatError { .. })));
    }

    #[test]
    fn check_propagates_errors() {
        assert!(check("SELECT (").is_err());
    }
}

mod lenient_inputs {
    use super::*;

    #[test]
    fn unusual_but_lexable_sql_is_formatted() {
        for input in [
            "SELECT FROM users",
            "FROM users SELECT *",
            "SELECT a,, b FROM t",
            "SELECT CASE WHEN x = 1 THEN 'a' FROM t",
        ] {
            assert!(format(input).is_ok(), "{}", input);
        }
    }
}

mod error_context {
    use super::*;

    #[test]
    fn offset_on_first_line() {
        assert_eq!(offset_to_line_col("select x", 7), (1, 8));
    }

    #[test]
    fn offset_on_later_line() {
        assert_eq!(offset_to_line_col("select\nfrom\n  x", 14), (3, 3));
    }

    #[test]
    fn line_content_lookup() {
        assert_eq!(get_line_content("a\nb\nc", 2), Some("b"));
        assert_eq!(get_line_content("a", 5), None);
    }

    #[test]
    fn rendered_error_shows_line_and_pointer() {
        let rendered = format_parse_error("select a\nfrom }", 14, "Unexpected character '}'");
        assert!(rendered.starts_with("Parse error at line 2, column 6:"));
        assert!(rendered.contains("  2 | from }"));
        assert!(rendered.contains("  |      ^"));
        assert!(rendered.ends_with("= Unexpected character '}'"));
    }
}
