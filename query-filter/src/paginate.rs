//! `$page` / `$limit` handling.

use crate::constants::{DEFAULT_LIMIT_MIN, KEY_LIMIT, KEY_PAGE};
use crate::error::FilterError;
use crate::i18n::{Locale, Message};
use crate::params::QueryParams;
use crate::rule::Rule;

/// Validates page/limit and renders `LIMIT n OFFSET m`.
///
/// Pages are 1-indexed. A page of zero or below is not rejected and yields a
/// zero or negative offset.
///
/// ```
/// use query_filter::{Paginator, QueryParams, Rule, Locale, Lang, BuiltinCatalog};
///
/// let pager = Paginator::new(1, Some(50));
/// let q = QueryParams::parse("$page=5&$limit=10");
/// let locale = Locale::new(Lang::En, &BuiltinCatalog);
/// assert_eq!(
///     pager.validate_and_construct(&q, &locale).unwrap().as_deref(),
///     Some("LIMIT 10 OFFSET 40")
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    limit_min: i64,
    limit_max: Option<i64>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT_MIN, None)
    }
}

impl Paginator {
    /// Accept limits in `limit_min..=limit_max`. A minimum below 1 is raised
    /// to 1; `None` or a maximum of zero or below leaves the limit unbounded
    /// above.
    #[must_use]
    pub const fn new(limit_min: i64, limit_max: Option<i64>) -> Self {
        let limit_min = if limit_min < DEFAULT_LIMIT_MIN {
            DEFAULT_LIMIT_MIN
        } else {
            limit_min
        };
        let limit_max = match limit_max {
            Some(max) if max > 0 => Some(max),
            _ => None,
        };
        Self {
            limit_min,
            limit_max,
        }
    }

    /// Effective minimum limit.
    #[must_use]
    pub const fn limit_min(&self) -> i64 {
        self.limit_min
    }

    /// Maximum limit, if any.
    #[must_use]
    pub const fn limit_max(&self) -> Option<i64> {
        self.limit_max
    }

    /// Parse `$page` then `$limit`, and require both once either is given.
    fn page_and_limit(
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<(i64, i64)>, FilterError> {
        let page = params
            .first(KEY_PAGE)
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    FilterError::new(KEY_PAGE, raw, locale.message(Message::InvalidPage))
                })
            })
            .transpose()?;

        let limit = params
            .first(KEY_LIMIT)
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    FilterError::new(KEY_LIMIT, raw, locale.message(Message::InvalidLimit))
                })
            })
            .transpose()?;

        match (page, limit) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(FilterError::omitted(
                KEY_PAGE,
                locale.message(Message::MissingPage),
            )),
            (Some(_), None) => Err(FilterError::omitted(
                KEY_LIMIT,
                locale.message(Message::MissingLimit),
            )),
            (Some(page), Some(limit)) => Ok(Some((page, limit))),
        }
    }
}

impl Rule for Paginator {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        let Some((page, limit)) = Self::page_and_limit(params, locale)? else {
            return Ok(None);
        };

        if limit < self.limit_min {
            return Err(FilterError::new(
                KEY_LIMIT,
                limit,
                locale.message(Message::LimitTooSmall {
                    min: self.limit_min,
                }),
            ));
        }

        if let Some(max) = self.limit_max
            && limit > max
        {
            return Err(FilterError::new(
                KEY_LIMIT,
                limit,
                locale.message(Message::LimitTooLarge { max }),
            ));
        }

        let offset = limit.saturating_mul(page.saturating_sub(1));
        Ok(Some(format!("LIMIT {limit} OFFSET {offset}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorValue;
    use crate::rule::test_support::{ar, en, params};

    fn pager() -> Paginator {
        Paginator::new(5, Some(20))
    }

    fn run(pairs: &[(&str, &str)]) -> Result<Option<String>, FilterError> {
        pager().validate_and_construct(&params(pairs), &en())
    }

    #[test]
    fn test_noop_without_keys() {
        assert_eq!(run(&[("$order_by", "x")]).unwrap(), None);
    }

    #[test]
    fn test_limit_offset() {
        assert_eq!(
            run(&[("$page", "1"), ("$limit", "10")]).unwrap().as_deref(),
            Some("LIMIT 10 OFFSET 0")
        );
        assert_eq!(
            run(&[("$page", "5"), ("$limit", "10")]).unwrap().as_deref(),
            Some("LIMIT 10 OFFSET 40")
        );
    }

    #[test]
    fn test_non_positive_page_is_not_rejected() {
        assert_eq!(
            run(&[("$page", "0"), ("$limit", "10")]).unwrap().as_deref(),
            Some("LIMIT 10 OFFSET -10")
        );
        assert_eq!(
            run(&[("$page", "-1"), ("$limit", "5")]).unwrap().as_deref(),
            Some("LIMIT 5 OFFSET -10")
        );
    }

    #[test]
    fn test_offset_saturates() {
        let out = Paginator::new(1, None)
            .validate_and_construct(
                &params(&[("$page", "9223372036854775807"), ("$limit", "100")]),
                &en(),
            )
            .unwrap();
        assert_eq!(out.as_deref(), Some("LIMIT 100 OFFSET 9223372036854775807"));
    }

    #[test]
    fn test_missing_companion() {
        let err = run(&[("$limit", "10")]).unwrap_err();
        assert_eq!(err.key, "$page");
        assert_eq!(err.value, None);
        assert_eq!(err.message, "Page number is missing");

        let err = pager()
            .validate_and_construct(&params(&[("$page", "2")]), &ar())
            .unwrap_err();
        assert_eq!(err.key, "$limit");
        assert_eq!(err.value, None);
        assert_eq!(err.message, "الحد مفقود");
    }

    #[test]
    fn test_invalid_numbers() {
        let err = run(&[("$page", "one"), ("$limit", "10")]).unwrap_err();
        assert_eq!(err.key, "$page");
        assert_eq!(err.value, Some("one".into()));
        assert_eq!(err.message, "Page number is invalid");

        let err = run(&[("$page", "1"), ("$limit", "ten")]).unwrap_err();
        assert_eq!(err.key, "$limit");
        assert_eq!(err.message, "The limit is invalid");
    }

    #[test]
    fn test_invalid_page_reported_before_missing_limit() {
        let err = run(&[("$page", "x")]).unwrap_err();
        assert_eq!(err.message, "Page number is invalid");
    }

    #[test]
    fn test_limit_bounds() {
        let err = run(&[("$page", "1"), ("$limit", "4")]).unwrap_err();
        assert_eq!(err.value, Some(ErrorValue::Int(4)));
        assert_eq!(err.message, "The limit should be at least 5");

        let err = run(&[("$page", "1"), ("$limit", "+21")]).unwrap_err();
        assert_eq!(err.value, Some(ErrorValue::Int(21)));
        assert_eq!(err.message, "The limit should not exceed 20");
    }

    #[test]
    fn test_min_is_raised_to_one() {
        let p = Paginator::new(-3, None);
        assert_eq!(p.limit_min(), 1);
        let err = p
            .validate_and_construct(&params(&[("$page", "1"), ("$limit", "0")]), &en())
            .unwrap_err();
        assert_eq!(err.message, "The limit should be at least 1");
    }

    #[test]
    fn test_default_is_unbounded() {
        let p = Paginator::default();
        assert_eq!(p.limit_max(), None);
        assert_eq!(
            p.validate_and_construct(&params(&[("$page", "2"), ("$limit", "100000")]), &en())
                .unwrap()
                .as_deref(),
            Some("LIMIT 100000 OFFSET 100000")
        );
    }

    #[test]
    fn test_non_positive_max_is_unbounded() {
        for max in [0, -5] {
            let p = Paginator::new(1, Some(max));
            assert_eq!(p.limit_max(), None);
            assert_eq!(
                p.validate_and_construct(&params(&[("$page", "1"), ("$limit", "30")]), &en())
                    .unwrap()
                    .as_deref(),
                Some("LIMIT 30 OFFSET 0")
            );
        }
    }
}
