//! String equality / pattern rule.

use super::{Rule, param_key};
use crate::constants::{OP_CT, OP_EQ, OP_EW, OP_NULL, OP_SW};
use crate::error::FilterError;
use crate::i18n::{Locale, Message};
use crate::params::QueryParams;
use crate::sql::{escape_single_quote, quote_literal};

/// How a matched sub-operator renders its (escaped) value.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    Eq,
    Null,
    StartsWith,
    EndsWith,
    Contains,
}

/// Checked in this order; the first present operator wins.
const OPERATORS: [(&str, Pattern); 5] = [
    (OP_EQ, Pattern::Eq),
    (OP_NULL, Pattern::Null),
    (OP_SW, Pattern::StartsWith),
    (OP_EW, Pattern::EndsWith),
    (OP_CT, Pattern::Contains),
];

/// String filter with an optional maximum length.
///
/// Exactly one sub-operator applies per request. Every value, including the
/// ignored `[null]` value, is length-checked on the raw input before escaping.
#[derive(Debug, Clone)]
#[must_use = "rules do nothing until added to a FiltersConfig"]
pub struct StrFilter {
    key: String,
    column: String,
    max_len: Option<usize>,
}

impl StrFilter {
    /// Filter on `key`, emitted against a column of the same name.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            column: key.clone(),
            key,
            max_len: None,
        }
    }

    /// Emit predicates against `column` instead of the key.
    pub fn alias(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Reject values longer than `max_len` bytes.
    pub const fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Query key prefix.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Target column.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    fn check_len(&self, raw: &str, locale: &Locale<'_>) -> Result<(), FilterError> {
        match self.max_len {
            Some(max) if raw.len() > max => Err(FilterError::new(
                &self.key,
                raw,
                locale.message(Message::TextTooLong {
                    max,
                    actual: raw.len(),
                }),
            )),
            _ => Ok(()),
        }
    }

    fn render(&self, pattern: Pattern, raw: &str) -> String {
        let column = &self.column;
        match pattern {
            Pattern::Eq => format!("{column}={}", quote_literal(raw)),
            Pattern::Null => format!("{column}=NULL"),
            Pattern::StartsWith => format!("{column} LIKE '{}%'", escape_single_quote(raw)),
            Pattern::EndsWith => format!("{column} LIKE '%{}'", escape_single_quote(raw)),
            Pattern::Contains => format!("{column} LIKE '%{}%'", escape_single_quote(raw)),
        }
    }
}

impl Rule for StrFilter {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        for (op, pattern) in OPERATORS {
            if let Some(raw) = params.first(&param_key(&self.key, op)) {
                self.check_len(raw, locale)?;
                return Ok(Some(self.render(pattern, raw)));
            }
        }
        Ok(None)
    }
}
