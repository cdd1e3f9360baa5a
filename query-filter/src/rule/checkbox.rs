//! Set-membership ("checkbox") rules for integer and string options.
//!
//! Both variants share the same shape:
//! - `[in]` / `[nin]` (checked in that order) render `IN (...)` / `NOT IN (...)`
//! - with `null_opt`, `[null]` is ANDed onto the membership predicate, or
//!   stands alone; `"0"` selects `IS NOT NULL`, anything else `IS NULL`
//! - more values than configured options is rejected before any element check

use super::{Rule, param_key};
use crate::constants::{NOT_NULL_FLAG, OP_IN, OP_NIN, OP_NULL};
use crate::error::FilterError;
use crate::i18n::{Locale, Message};
use crate::params::QueryParams;
use crate::sql::quote_literal;

/// The `[in]` or `[nin]` value list, with its SQL operator.
fn membership<'p>(params: &'p QueryParams, key: &str) -> Option<(&'static str, &'p [String])> {
    params
        .all(&param_key(key, OP_IN))
        .map(|vals| (" IN ", vals))
        .or_else(|| params.all(&param_key(key, OP_NIN)).map(|vals| (" NOT IN ", vals)))
}

fn check_cardinality(
    key: &str,
    values: &[String],
    available: usize,
    locale: &Locale<'_>,
) -> Result<(), FilterError> {
    if values.len() > available {
        return Err(FilterError::new(
            key,
            values,
            locale.message(Message::TooManyOptions { available }),
        ));
    }
    Ok(())
}

/// Apply the optional `[null]` sub-operator to the membership predicate.
fn with_null(
    cond: Option<String>,
    params: &QueryParams,
    key: &str,
    column: &str,
    null_opt: bool,
) -> Option<String> {
    if !null_opt {
        return cond;
    }

    let Some(flag) = params.first(&param_key(key, OP_NULL)) else {
        return cond;
    };

    let null = if flag == NOT_NULL_FLAG {
        format!("{column} IS NOT NULL")
    } else {
        format!("{column} IS NULL")
    };

    Some(match cond {
        Some(cond) => format!("({cond} AND {null})"),
        None => null,
    })
}

/// Integer checkbox filter over a fixed option set.
///
/// ```
/// use query_filter::{CheckboxIntFilter, QueryParams, Rule, Locale, Lang, BuiltinCatalog};
///
/// let status = CheckboxIntFilter::new("userStatus", &[0, 1, 2]);
/// let q = QueryParams::parse("userStatus[in]=0&userStatus[in]=2");
/// let locale = Locale::new(Lang::En, &BuiltinCatalog);
/// assert_eq!(
///     status.validate_and_construct(&q, &locale).unwrap().as_deref(),
///     Some("userStatus IN (0,2)")
/// );
/// ```
#[derive(Debug, Clone)]
#[must_use = "rules do nothing until added to a FiltersConfig"]
pub struct CheckboxIntFilter {
    key: String,
    column: String,
    options: Vec<i64>,
    options_text: String,
    null_opt: bool,
}

impl CheckboxIntFilter {
    /// Filter on `key` accepting only `options`.
    pub fn new(key: impl Into<String>, options: &[i64]) -> Self {
        let key = key.into();
        Self {
            column: key.clone(),
            key,
            options: options.to_vec(),
            options_text: options
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            null_opt: false,
        }
    }

    /// Emit predicates against `column` instead of the key.
    pub fn alias(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Accept the `[null]` sub-operator.
    pub const fn null_opt(mut self, enabled: bool) -> Self {
        self.null_opt = enabled;
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

    fn validate_values(
        &self,
        values: &[String],
        locale: &Locale<'_>,
    ) -> Result<Vec<String>, FilterError> {
        check_cardinality(&self.key, values, self.options.len(), locale)?;

        values
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let num: i64 = raw.parse().map_err(|_| {
                    FilterError::new(&self.key, raw.as_str(), locale.message(Message::NotANumber))
                        .at_index(idx)
                })?;

                if !self.options.contains(&num) {
                    return Err(FilterError::new(
                        &self.key,
                        raw.as_str(),
                        locale.message(Message::NumberNotOneOf {
                            options: &self.options_text,
                        }),
                    )
                    .at_index(idx));
                }

                Ok(num.to_string())
            })
            .collect()
    }
}

impl Rule for CheckboxIntFilter {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        let cond = match membership(params, &self.key) {
            Some((op, values)) => {
                let safe = self.validate_values(values, locale)?;
                Some(format!("{}{op}({})", self.column, safe.join(",")))
            },
            None => None,
        };

        Ok(with_null(cond, params, &self.key, &self.column, self.null_opt))
    }
}

/// String checkbox filter over a fixed option set.
#[derive(Debug, Clone)]
#[must_use = "rules do nothing until added to a FiltersConfig"]
pub struct CheckboxStrFilter {
    key: String,
    column: String,
    options: Vec<String>,
    options_text: String,
    null_opt: bool,
}

impl CheckboxStrFilter {
    /// Filter on `key` accepting only `options`.
    pub fn new(key: impl Into<String>, options: &[&str]) -> Self {
        let key = key.into();
        Self {
            column: key.clone(),
            key,
            options: options.iter().map(|s| (*s).to_string()).collect(),
            options_text: options.join(", "),
            null_opt: false,
        }
    }

    /// Emit predicates against `column` instead of the key.
    pub fn alias(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Accept the `[null]` sub-operator.
    pub const fn null_opt(mut self, enabled: bool) -> Self {
        self.null_opt = enabled;
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

    fn validate_values(
        &self,
        values: &[String],
        locale: &Locale<'_>,
    ) -> Result<Vec<String>, FilterError> {
        check_cardinality(&self.key, values, self.options.len(), locale)?;

        values
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                if self.options.contains(raw) {
                    Ok(quote_literal(raw))
                } else {
                    Err(FilterError::new(
                        &self.key,
                        raw.as_str(),
                        locale.message(Message::OptionNotOneOf {
                            options: &self.options_text,
                        }),
                    )
                    .at_index(idx))
                }
            })
            .collect()
    }
}

impl Rule for CheckboxStrFilter {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        let cond = match membership(params, &self.key) {
            Some((op, values)) => {
                let safe = self.validate_values(values, locale)?;
                Some(format!("{}{op}({})", self.column, safe.join(",")))
            },
            None => None,
        };

        Ok(with_null(cond, params, &self.key, &self.column, self.null_opt))
    }
}
