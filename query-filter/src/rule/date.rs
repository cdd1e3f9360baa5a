//! Calendar-date range rule.

use chrono::{NaiveDate, Utc};

use super::{Rule, param_key};
use crate::constants::{
    DATE_FORMAT, DATE_LEN, NOT_NULL_FLAG, OP_EQ, OP_NULL, OP_PR, OP_PRE, OP_PS, OP_PSE,
};
use crate::error::{ConfigError, FilterError};
use crate::i18n::{Locale, Message};
use crate::params::QueryParams;
use crate::sql::{and_group, quote_literal};

/// Upper-bound operators, strict first: (suffix, path tag, SQL operator).
const UPPER: [(&str, &str, &str); 2] = [(OP_PR, "pr", "<"), (OP_PRE, "pre", "<=")];

/// Lower-bound operators, strict first.
const LOWER: [(&str, &str, &str); 2] = [(OP_PS, "ps", ">"), (OP_PSE, "pse", ">=")];

/// Parse an exact `YYYY-MM-DD` date.
///
/// Anything else, including a trailing time component or single-digit
/// month/day, is rejected.
///
/// ```
/// use query_filter::parse_date;
///
/// assert!(parse_date("2024-04-29").is_some());
/// assert!(parse_date("2024-4-29").is_none());
/// assert!(parse_date("2024-04-29T10:00:00").is_none());
/// assert!(parse_date("2024-02-30").is_none());
/// ```
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != DATE_LEN {
        return None;
    }

    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Date filter with static and/or "now" bounds.
///
/// `[eq]` short-circuits. Otherwise one upper condition (`[pr]` before
/// `[pre]`) and one lower condition (`[ps]` before `[pse]`) may combine,
/// upper term first. With `null_opt`, `[null]` either stands alone
/// (`IS NULL` / `IS NOT NULL` for `"0"`) or ORs `IS NULL` onto the range;
/// `"0"` next to a range leaves it untouched.
///
/// A static bound configured together with the matching "now" bound is
/// ignored.
///
/// ```
/// use query_filter::{DateFilter, QueryParams, Rule, Locale, Lang, BuiltinCatalog};
///
/// let modified = DateFilter::new("modified")
///     .after("2020-01-02")
///     .before("2024-05-01")
///     .null_opt(true);
/// let q = QueryParams::parse("modified[pre]=2024-04-29&modified[null]=1");
/// let locale = Locale::new(Lang::En, &BuiltinCatalog);
/// assert_eq!(
///     modified.validate_and_construct(&q, &locale).unwrap().as_deref(),
///     Some("(modified<='2024-04-29' OR modified IS NULL)")
/// );
/// ```
#[derive(Debug, Clone)]
#[must_use = "rules do nothing until added to a FiltersConfig"]
pub struct DateFilter {
    key: String,
    column: String,
    after: Option<NaiveDate>,
    after_now: bool,
    before: Option<NaiveDate>,
    before_now: bool,
    null_opt: bool,
}

impl DateFilter {
    /// Filter on `key`, emitted against a column of the same name.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            column: key.clone(),
            key,
            after: None,
            after_now: false,
            before: None,
            before_now: false,
            null_opt: false,
        }
    }

    /// Emit predicates against `column` instead of the key.
    pub fn alias(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Reject dates before `date` (`YYYY-MM-DD`).
    ///
    /// # Panics
    ///
    /// Panics if `date` is not a valid `YYYY-MM-DD` date.
    pub fn after(self, date: &str) -> Self {
        match self.try_after(date) {
            Ok(filter) => filter,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`after`](Self::after).
    pub fn try_after(self, date: &str) -> Result<Self, ConfigError> {
        let parsed = self.parse_bound(date)?;
        Ok(self.after_date(parsed))
    }

    /// Reject dates before `date`.
    pub fn after_date(mut self, date: NaiveDate) -> Self {
        self.after = Some(date);
        self.warn_if_shadowed();
        self
    }

    /// Reject dates before the current UTC date at request time.
    pub fn after_now(mut self) -> Self {
        self.after_now = true;
        self.warn_if_shadowed();
        self
    }

    /// Reject dates after `date` (`YYYY-MM-DD`).
    ///
    /// # Panics
    ///
    /// Panics if `date` is not a valid `YYYY-MM-DD` date.
    pub fn before(self, date: &str) -> Self {
        match self.try_before(date) {
            Ok(filter) => filter,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`before`](Self::before).
    pub fn try_before(self, date: &str) -> Result<Self, ConfigError> {
        let parsed = self.parse_bound(date)?;
        Ok(self.before_date(parsed))
    }

    /// Reject dates after `date`.
    pub fn before_date(mut self, date: NaiveDate) -> Self {
        self.before = Some(date);
        self.warn_if_shadowed();
        self
    }

    /// Reject dates after the current UTC date at request time.
    pub fn before_now(mut self) -> Self {
        self.before_now = true;
        self.warn_if_shadowed();
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

    fn parse_bound(&self, date: &str) -> Result<NaiveDate, ConfigError> {
        parse_date(date).ok_or_else(|| ConfigError::InvalidDateBound {
            key: self.key.clone(),
            value: date.to_string(),
        })
    }

    fn warn_if_shadowed(&self) {
        if self.after_now && self.after.is_some() {
            crate::log!(warn, "static date bound ignored", key: self.key, bound: "after");
        }
        if self.before_now && self.before.is_some() {
            crate::log!(warn, "static date bound ignored", key: self.key, bound: "before");
        }
    }

    /// Bounds in checking order: "now" bounds first, then the static ones
    /// they do not shadow. `true` marks a lower bound.
    fn bounds(&self, today: NaiveDate) -> impl Iterator<Item = (bool, NaiveDate)> {
        let after_now = self.after_now.then_some((true, today));
        let before_now = self.before_now.then_some((false, today));
        let after = self.after.filter(|_| !self.after_now).map(|d| (true, d));
        let before = self.before.filter(|_| !self.before_now).map(|d| (false, d));
        [after_now, before_now, after, before].into_iter().flatten()
    }

    /// Parse one value and check it against the bounds, returning the
    /// re-formatted date.
    fn validate_value(
        &self,
        raw: &str,
        op: &str,
        locale: &Locale<'_>,
        today: NaiveDate,
    ) -> Result<String, FilterError> {
        let Some(date) = parse_date(raw) else {
            return Err(
                FilterError::new(&self.key, raw, locale.message(Message::InvalidDate)).at_op(op),
            );
        };
        let input = format_date(date);

        for (lower, bound) in self.bounds(today) {
            let formatted = format_date(bound);
            let message = if lower && date < bound {
                Message::DateTooEarly {
                    bound: &formatted,
                    input: &input,
                }
            } else if !lower && date > bound {
                Message::DateTooLate {
                    bound: &formatted,
                    input: &input,
                }
            } else {
                continue;
            };
            let message = locale.message(message);
            return Err(FilterError::new(&self.key, input, message).at_op(op));
        }

        Ok(input)
    }

    /// First present operator of the group, rendered as `column<sql_op>'date'`.
    fn bound(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
        today: NaiveDate,
        ops: [(&str, &str, &str); 2],
    ) -> Result<Option<String>, FilterError> {
        for (suffix, op, sql_op) in ops {
            if let Some(raw) = params.first(&param_key(&self.key, suffix)) {
                let date = self.validate_value(raw, op, locale, today)?;
                return Ok(Some(format!("{}{sql_op}{}", self.column, quote_literal(&date))));
            }
        }
        Ok(None)
    }

    /// Evaluate against an explicit "today".
    pub(crate) fn construct_at(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
        today: NaiveDate,
    ) -> Result<Option<String>, FilterError> {
        let cond = if let Some(raw) = params.first(&param_key(&self.key, OP_EQ)) {
            let date = self.validate_value(raw, "eq", locale, today)?;
            Some(format!("{}={}", self.column, quote_literal(&date)))
        } else {
            let upper = self.bound(params, locale, today, UPPER)?;
            let lower = self.bound(params, locale, today, LOWER)?;
            and_group(upper.into_iter().chain(lower).collect())
        };

        if !self.null_opt {
            return Ok(cond);
        }

        let Some(flag) = params.first(&param_key(&self.key, OP_NULL)) else {
            return Ok(cond);
        };

        let column = &self.column;
        Ok(match cond {
            Some(cond) if flag == NOT_NULL_FLAG => Some(cond),
            Some(cond) => Some(format!("({cond} OR {column} IS NULL)")),
            None if flag == NOT_NULL_FLAG => Some(format!("{column} IS NOT NULL")),
            None => Some(format!("{column} IS NULL")),
        })
    }
}

impl Rule for DateFilter {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        self.construct_at(params, locale, Utc::now().date_naive())
    }
}
