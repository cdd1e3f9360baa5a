//! SQL text helpers: literal escaping, identifier checks and predicate joining.
//!
//! Client input only ever reaches SQL through [`quote_literal`] /
//! [`escape_single_quote`] or as a number re-rendered from its parsed value.
//! Column names come from configuration and are checked once at construction.

use crate::constants::MAX_IDENTIFIER_LENGTH;
use crate::error::ConfigError;

/// Double every single quote so the value can sit inside a `'...'` literal.
///
/// ```
/// use query_filter::escape_single_quote;
///
/// assert_eq!(escape_single_quote("o'neil"), "o''neil");
/// ```
#[inline]
#[must_use]
pub fn escape_single_quote(value: &str) -> String {
    value.replace('\'', "''")
}

/// Escape and wrap a value as a SQL string literal.
///
/// ```
/// use query_filter::quote_literal;
///
/// assert_eq!(quote_literal("opt'1"), "'opt''1'");
/// ```
#[inline]
#[must_use]
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_single_quote(value))
}

fn is_valid_segment(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate that a string is a safe, optionally dot-qualified SQL identifier.
///
/// Each dot-separated segment must start with an ASCII letter or underscore,
/// contain only ASCII alphanumerics and underscores, and be 1-63 chars.
///
/// ```
/// use query_filter::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("firstName"));
/// assert!(is_valid_sql_identifier("u.created_at"));
/// assert!(!is_valid_sql_identifier("name; DROP TABLE users"));
/// assert!(!is_valid_sql_identifier("u."));
/// ```
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_valid_segment)
}

/// Check an identifier, reporting what it was used for on failure.
pub fn check_sql_identifier(s: &str, context: &str) -> Result<(), ConfigError> {
    if is_valid_sql_identifier(s) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            context: context.to_string(),
            name: s.to_string(),
        })
    }
}

/// Combine predicates with `AND`.
///
/// No predicate yields `None`, one is returned as-is, and several are
/// parenthesized so the group stays intact when ANDed with sibling rules.
pub(crate) fn and_group(conds: Vec<String>) -> Option<String> {
    match conds.len() {
        0 => None,
        1 => conds.into_iter().next(),
        _ => Some(format!("({})", conds.join(" AND "))),
    }
}
