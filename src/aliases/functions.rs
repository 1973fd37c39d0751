//! Function calls that are never aliased

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Aggregate and window functions whose calls pass through the aliaser as-is
pub const RECOGNIZED_FUNCTIONS: &[&str] = &[
    "COUNT",
    "SUM",
    "AVG",
    "MAX",
    "MIN",
    "STRING_AGG",
    "DATE_TRUNC",
    "RANK",
];

static FUNCTION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RECOGNIZED_FUNCTIONS.iter().copied().collect());

/// Check if a function name is in the recognized set, ignoring case
pub fn is_recognized_function(name: &str) -> bool {
    FUNCTION_SET.contains(name.to_uppercase().as_str())
}
