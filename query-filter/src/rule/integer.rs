//! Integer comparison rule.

use super::{Rule, param_key};
use crate::constants::{OP_EQ, OP_GT, OP_GTE, OP_LT, OP_LTE, OP_NULL};
use crate::error::FilterError;
use crate::i18n::{Locale, Message};
use crate::params::QueryParams;
use crate::sql::and_group;

/// Integer filter with optional inclusive bounds.
///
/// `[eq]` wins over everything, then `[null]` (presence only). Otherwise one
/// lower (`[gt]` before `[gte]`) and one upper (`[lt]` before `[lte]`)
/// condition may combine.
///
/// ```
/// use query_filter::{IntFilter, QueryParams, Rule, Locale, Lang, BuiltinCatalog};
///
/// let age = IntFilter::new("age").min(2).max(10);
/// let q = QueryParams::parse("age[gt]=3&age[lte]=9");
/// let locale = Locale::new(Lang::En, &BuiltinCatalog);
/// assert_eq!(
///     age.validate_and_construct(&q, &locale).unwrap().as_deref(),
///     Some("(age>3 AND age<=9)")
/// );
/// ```
#[derive(Debug, Clone)]
#[must_use = "rules do nothing until added to a FiltersConfig"]
pub struct IntFilter {
    key: String,
    column: String,
    min: Option<i64>,
    max: Option<i64>,
}

impl IntFilter {
    /// Filter on `key`, emitted against a column of the same name.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            column: key.clone(),
            key,
            min: None,
            max: None,
        }
    }

    /// Emit predicates against `column` instead of the key.
    pub fn alias(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Reject values below `min`.
    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Reject values above `max`.
    pub const fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
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

    /// Parse and bound-check one value, re-rendering it from the parsed number.
    fn validate_value(&self, raw: &str, locale: &Locale<'_>) -> Result<String, FilterError> {
        let num: i64 = raw.parse().map_err(|_| {
            FilterError::new(&self.key, raw, locale.message(Message::InvalidNumber))
        })?;

        if let Some(min) = self.min
            && num < min
        {
            return Err(FilterError::new(
                &self.key,
                raw,
                locale.message(Message::NumberTooSmall { min }),
            ));
        }

        if let Some(max) = self.max
            && num > max
        {
            return Err(FilterError::new(
                &self.key,
                raw,
                locale.message(Message::NumberTooLarge { max }),
            ));
        }

        Ok(num.to_string())
    }

    /// First present operator of the pair, rendered as `column<sql_op><value>`.
    fn bound(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
        ops: [(&str, &str); 2],
    ) -> Result<Option<String>, FilterError> {
        for (op, sql_op) in ops {
            if let Some(raw) = params.first(&param_key(&self.key, op)) {
                let num = self.validate_value(raw, locale)?;
                return Ok(Some(format!("{}{sql_op}{num}", self.column)));
            }
        }
        Ok(None)
    }
}

impl Rule for IntFilter {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        if let Some(raw) = params.first(&param_key(&self.key, OP_EQ)) {
            let num = self.validate_value(raw, locale)?;
            return Ok(Some(format!("{}={num}", self.column)));
        }

        if params.contains_key(&param_key(&self.key, OP_NULL)) {
            return Ok(Some(format!("{}=NULL", self.column)));
        }

        let lower = self.bound(params, locale, [(OP_GT, ">"), (OP_GTE, ">=")])?;
        let upper = self.bound(params, locale, [(OP_LT, "<"), (OP_LTE, "<=")])?;

        Ok(and_group(lower.into_iter().chain(upper).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{ar, en, params};
    use super::*;

    fn age() -> IntFilter {
        IntFilter::new("age").min(2).max(10)
    }

    fn run(pairs: &[(&str, &str)]) -> Result<Option<String>, FilterError> {
        age().validate_and_construct(&params(pairs), &en())
    }

    #[test]
    fn test_eq() {
        assert_eq!(run(&[("age[eq]", "8")]).unwrap().as_deref(), Some("age=8"));
    }

    #[test]
    fn test_eq_short_circuits_other_operators() {
        let out = run(&[("age[eq]", "8"), ("age[gt]", "abc"), ("age[null]", "")]).unwrap();
        assert_eq!(out.as_deref(), Some("age=8"));
    }

    #[test]
    fn test_null_ignores_value() {
        assert_eq!(run(&[("age[null]", "whatever")]).unwrap().as_deref(), Some("age=NULL"));
    }

    #[test]
    fn test_null_present_with_empty_list() {
        let mut map = std::collections::HashMap::new();
        map.insert("age[null]".to_string(), Vec::new());
        let out = age()
            .validate_and_construct(&QueryParams::from(map), &en())
            .unwrap();
        assert_eq!(out.as_deref(), Some("age=NULL"));
    }

    #[test]
    fn test_single_bounds() {
        assert_eq!(run(&[("age[gt]", "8")]).unwrap().as_deref(), Some("age>8"));
        assert_eq!(run(&[("age[gte]", "8")]).unwrap().as_deref(), Some("age>=8"));
        assert_eq!(run(&[("age[lt]", "8")]).unwrap().as_deref(), Some("age<8"));
        assert_eq!(run(&[("age[lte]", "8")]).unwrap().as_deref(), Some("age<=8"));
    }

    #[test]
    fn test_combined_bounds() {
        assert_eq!(
            run(&[("age[gt]", "8"), ("age[lt]", "9")]).unwrap().as_deref(),
            Some("(age>8 AND age<9)")
        );
        assert_eq!(
            run(&[("age[gte]", "8"), ("age[lte]", "9")]).unwrap().as_deref(),
            Some("(age>=8 AND age<=9)")
        );
    }

    #[test]
    fn test_strict_operator_wins_within_pair() {
        let out = run(&[("age[gt]", "3"), ("age[gte]", "4"), ("age[lte]", "9"), ("age[lt]", "8")]);
        assert_eq!(out.unwrap().as_deref(), Some("(age>3 AND age<8)"));
    }

    #[test]
    fn test_reserializes_parsed_value() {
        assert_eq!(run(&[("age[eq]", "+07")]).unwrap().as_deref(), Some("age=7"));
    }

    #[test]
    fn test_alias() {
        let out = IntFilter::new("age")
            .alias("u.age")
            .validate_and_construct(&params(&[("age[gt]", "1")]), &en())
            .unwrap();
        assert_eq!(out.as_deref(), Some("u.age>1"));
    }

    #[test]
    fn test_invalid_number() {
        let err = run(&[("age[eq]", "8 OR 1=1")]).unwrap_err();
        assert_eq!(err.key, "age");
        assert_eq!(err.value, Some("8 OR 1=1".into()));
        assert_eq!(err.message, "invalid number");
    }

    #[test]
    fn test_bounds_errors() {
        let err = run(&[("age[eq]", "15")]).unwrap_err();
        assert_eq!(err.message, "The number should be less than or equal to 10");

        let err = run(&[("age[eq]", "1")]).unwrap_err();
        assert_eq!(err.message, "The number should be greater than or equal to 2");
        assert_eq!(err.value, Some("1".into()));
    }

    #[test]
    fn test_bounds_errors_arabic() {
        let err = age()
            .validate_and_construct(&params(&[("age[lt]", "15")]), &ar())
            .unwrap_err();
        assert_eq!(err.message, "يجب أن يكون العدد أصغر من أو يساوي 10");
    }

    #[test]
    fn test_error_in_upper_bound_only() {
        let err = run(&[("age[gt]", "3"), ("age[lt]", "x")]).unwrap_err();
        assert_eq!(err.value, Some("x".into()));
    }

    #[test]
    fn test_unbounded() {
        let out = IntFilter::new("n")
            .validate_and_construct(&params(&[("n[eq]", "-9223372036854775808")]), &en())
            .unwrap();
        assert_eq!(out.as_deref(), Some("n=-9223372036854775808"));
    }
}
