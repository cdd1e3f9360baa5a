//! The composing engine.
//!
//! A [`Filters`] value owns a base SQL template, an ordered list of
//! [`FilterRule`]s and optional ordering and pagination. Each request is
//! validated against every rule (no short-circuit) and either all errors or
//! one complete query come back, never a partial query.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, FilterErrors};
use crate::i18n::{BuiltinCatalog, Catalog, Lang, Locale};
use crate::order::Orderer;
use crate::paginate::Paginator;
use crate::params::QueryParams;
use crate::rule::{FilterRule, Rule};
use crate::sql::check_sql_identifier;

/// Everything an engine is built from.
///
/// ```
/// use query_filter::{Filters, FiltersConfig, IntFilter, QueryParams, StrFilter};
///
/// let filters = Filters::new(
///     FiltersConfig::new("SELECT * FROM users")
///         .paginate(1, Some(50))
///         .order_by(&["firstName", "lastName"])
///         .rule(StrFilter::new("firstName").max_len(50))
///         .rule(IntFilter::new("age").min(0)),
/// );
///
/// let q = QueryParams::parse("firstName[eq]=marwan&$order_by=lastName&$page=2&$limit=10");
/// assert_eq!(
///     filters.validate_and_construct(&q, "en").unwrap(),
///     "SELECT * FROM users WHERE firstName='marwan' ORDER BY lastName ASC LIMIT 10 OFFSET 10"
/// );
/// ```
#[derive(Debug, Clone)]
#[must_use = "a config does nothing until passed to Filters::new"]
pub struct FiltersConfig {
    sql: String,
    count_sql: Option<String>,
    paginator: Option<Paginator>,
    order_by: Option<Vec<String>>,
    rules: Vec<FilterRule>,
}

impl FiltersConfig {
    /// Start from the base `SELECT` template.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            count_sql: None,
            paginator: None,
            order_by: None,
            rules: Vec::new(),
        }
    }

    /// Also build a count query from this template (no ORDER BY / LIMIT).
    pub fn count_sql(mut self, sql: impl Into<String>) -> Self {
        self.count_sql = Some(sql.into());
        self
    }

    /// Enable `$page` / `$limit`.
    pub const fn paginate(mut self, limit_min: i64, limit_max: Option<i64>) -> Self {
        self.paginator = Some(Paginator::new(limit_min, limit_max));
        self
    }

    /// Enable `$order_by` over `columns`.
    pub fn order_by<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.order_by = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    /// Append a filter rule. Rules run and render in insertion order.
    pub fn rule(mut self, rule: impl Into<FilterRule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Append several filter rules.
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FilterRule>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }
}

/// Select query plus the matching count query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CountedQuery {
    /// Full query with WHERE, ORDER BY and LIMIT/OFFSET.
    pub select: String,
    /// Count template plus the WHERE clause; `None` without a count template.
    pub count: Option<String>,
}

/// The pieces of one successful request, before templates are prepended.
#[derive(Debug, Default)]
struct Clauses {
    where_clause: String,
    order_by: Option<String>,
    limit_offset: Option<String>,
}

impl Clauses {
    fn select_suffix(&self) -> String {
        let mut suffix = self.where_clause.clone();
        if let Some(order_by) = &self.order_by {
            suffix.push(' ');
            suffix.push_str(order_by);
        }
        if let Some(limit_offset) = &self.limit_offset {
            suffix.push(' ');
            suffix.push_str(limit_offset);
        }
        suffix
    }
}

/// A configured, immutable filter engine. Share it freely across threads.
pub struct Filters {
    sql: String,
    count_sql: Option<String>,
    rules: Vec<FilterRule>,
    orderer: Option<Orderer>,
    paginator: Option<Paginator>,
    catalog: Arc<dyn Catalog + Send + Sync>,
}

impl Filters {
    /// Build an engine.
    ///
    /// # Panics
    ///
    /// Panics if a column alias or order-by column is not a valid SQL
    /// identifier.
    #[must_use]
    pub fn new(config: FiltersConfig) -> Self {
        match Self::try_new(config) {
            Ok(filters) => filters,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(config: FiltersConfig) -> Result<Self, ConfigError> {
        for rule in &config.rules {
            check_sql_identifier(rule.column(), "column alias")?;
        }

        let orderer = config
            .order_by
            .as_deref()
            .map(Orderer::try_new)
            .transpose()?;

        Ok(Self {
            sql: config.sql,
            count_sql: config.count_sql,
            rules: config.rules,
            orderer,
            paginator: config.paginator,
            catalog: Arc::new(BuiltinCatalog),
        })
    }

    /// Replace the message catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog + Send + Sync>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Configured rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Whether a count template was configured.
    #[must_use]
    pub const fn has_count(&self) -> bool {
        self.count_sql.is_some()
    }

    /// Validate `params` and build the full select query.
    ///
    /// `lang` is a two-letter tag (`"ar"` selects Arabic, anything else
    /// English).
    ///
    /// # Errors
    ///
    /// Returns every validation failure from every rule, ordering and
    /// pagination, in that order.
    pub fn validate_and_construct(
        &self,
        params: &QueryParams,
        lang: &str,
    ) -> Result<String, FilterErrors> {
        let clauses = self.compile(params, lang)?;
        Ok(format!("{}{}", self.sql, clauses.select_suffix()))
    }

    /// Validate `params` and build the select query plus the count query.
    ///
    /// # Errors
    ///
    /// Same as [`validate_and_construct`](Self::validate_and_construct).
    pub fn validate_and_construct_with_count(
        &self,
        params: &QueryParams,
        lang: &str,
    ) -> Result<CountedQuery, FilterErrors> {
        let clauses = self.compile(params, lang)?;
        Ok(CountedQuery {
            select: format!("{}{}", self.sql, clauses.select_suffix()),
            count: self
                .count_sql
                .as_ref()
                .map(|sql| format!("{sql}{}", clauses.where_clause)),
        })
    }

    fn compile(&self, params: &QueryParams, lang: &str) -> Result<Clauses, FilterErrors> {
        let locale = Locale::new(Lang::from_tag(lang), self.catalog.as_ref());
        let mut errors = FilterErrors::with_capacity(self.rules.len());
        let mut conds = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            match rule.validate_and_construct(params, &locale) {
                Ok(Some(cond)) => conds.push(cond),
                Ok(None) => {},
                Err(err) => errors.push(err),
            }
        }

        let mut order_by = None;
        if let Some(orderer) = &self.orderer {
            match orderer.validate_and_construct(params, &locale) {
                Ok(clause) => order_by = clause,
                Err(err) => errors.push(err),
            }
        }

        let mut limit_offset = None;
        if let Some(paginator) = &self.paginator {
            match paginator.validate_and_construct(params, &locale) {
                Ok(clause) => limit_offset = clause,
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            crate::log_debug!(
                "filter request rejected: {} error(s), lang={}",
                errors.len(),
                locale.lang()
            );
            return Err(errors);
        }

        let where_clause = if conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conds.join(" AND "))
        };

        Ok(Clauses {
            where_clause,
            order_by,
            limit_offset,
        })
    }
}

impl fmt::Debug for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filters")
            .field("sql", &self.sql)
            .field("count_sql", &self.count_sql)
            .field("rules", &self.rules)
            .field("orderer", &self.orderer)
            .field("paginator", &self.paginator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Message;
    use crate::rule::test_support::params;
    use crate::rule::{CheckboxIntFilter, IntFilter, StrFilter};

    fn users() -> Filters {
        Filters::new(
            FiltersConfig::new("SELECT * FROM users")
                .count_sql("SELECT COUNT(*) AS count FROM users")
                .paginate(1, Some(50))
                .order_by(&["firstName", "lastName"])
                .rule(StrFilter::new("firstName").max_len(20))
                .rule(IntFilter::new("age").min(2).max(10))
                .rule(CheckboxIntFilter::new("userStatus", &[0, 1, 2])),
        )
    }

    #[test]
    fn test_no_params_returns_base_sql() {
        assert_eq!(
            users().validate_and_construct(&QueryParams::new(), "en").unwrap(),
            "SELECT * FROM users"
        );
    }

    #[test]
    fn test_rules_join_in_declaration_order() {
        let q = params(&[
            ("userStatus[in]", "1"),
            ("age[gte]", "3"),
            ("firstName[sw]", "ma"),
        ]);
        assert_eq!(
            users().validate_and_construct(&q, "en").unwrap(),
            "SELECT * FROM users WHERE firstName LIKE 'ma%' AND age>=3 AND userStatus IN (1)"
        );
    }

    #[test]
    fn test_with_count() {
        let q = params(&[
            ("firstName[eq]", "marwan"),
            ("$order_by", "lastName"),
            ("$arrange", "DESC"),
            ("$page", "5"),
            ("$limit", "10"),
        ]);
        let out = users().validate_and_construct_with_count(&q, "en").unwrap();
        assert_eq!(
            out.select,
            "SELECT * FROM users WHERE firstName='marwan' ORDER BY lastName DESC LIMIT 10 OFFSET 40"
        );
        assert_eq!(
            out.count.as_deref(),
            Some("SELECT COUNT(*) AS count FROM users WHERE firstName='marwan'")
        );
    }

    #[test]
    fn test_count_without_template() {
        let f = Filters::new(FiltersConfig::new("SELECT 1").rule(IntFilter::new("a")));
        assert!(!f.has_count());
        let out = f
            .validate_and_construct_with_count(&params(&[("a[eq]", "1")]), "en")
            .unwrap();
        assert_eq!(out.select, "SELECT 1 WHERE a=1");
        assert_eq!(out.count, None);
    }

    #[test]
    fn test_collects_every_error() {
        let q = params(&[
            ("age[eq]", "abc"),
            ("userStatus[in]", "9"),
            ("$order_by", "password"),
            ("$limit", "10"),
        ]);
        let errs = users().validate_and_construct(&q, "en").unwrap_err();
        let keys: Vec<&str> = errs.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["age", "userStatus", "$order_by", "$page"]);
    }

    #[test]
    fn test_language_tag() {
        let q = params(&[("age[eq]", "abc")]);
        let errs = users().validate_and_construct(&q, "ar").unwrap_err();
        assert_eq!(errs.as_slice()[0].message, "عدد غير صالح");

        let errs = users().validate_and_construct(&q, "de").unwrap_err();
        assert_eq!(errs.as_slice()[0].message, "invalid number");
    }

    #[test]
    fn test_order_and_limit_without_where() {
        let q = params(&[("$order_by", "firstName"), ("$page", "1"), ("$limit", "5")]);
        assert_eq!(
            users().validate_and_construct(&q, "en").unwrap(),
            "SELECT * FROM users ORDER BY firstName ASC LIMIT 5 OFFSET 0"
        );
    }

    #[test]
    fn test_unconfigured_order_and_paging_are_ignored() {
        let f = Filters::new(FiltersConfig::new("SELECT * FROM t"));
        let q = params(&[("$order_by", "x"), ("$page", "1")]);
        assert_eq!(f.validate_and_construct(&q, "en").unwrap(), "SELECT * FROM t");
    }

    #[test]
    fn test_try_new_rejects_bad_alias() {
        let err = Filters::try_new(
            FiltersConfig::new("SELECT 1").rule(IntFilter::new("age").alias("age; --")),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidIdentifier {
                context: "column alias".into(),
                name: "age; --".into(),
            }
        );
    }

    #[test]
    fn test_try_new_rejects_bad_order_column() {
        let err = Filters::try_new(FiltersConfig::new("SELECT 1").order_by(&["1st"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentifier { .. }));
    }

    #[test]
    #[should_panic(expected = "invalid SQL column alias")]
    fn test_new_panics_on_bad_alias() {
        let _ = Filters::new(FiltersConfig::new("SELECT 1").rule(StrFilter::new("a").alias("")));
    }

    struct Terse;

    impl Catalog for Terse {
        fn render(&self, message: &Message<'_>, _lang: Lang) -> String {
            match message {
                Message::InvalidNumber => "NaN".to_string(),
                other => BuiltinCatalog.render(other, Lang::En),
            }
        }
    }

    #[test]
    fn test_custom_catalog() {
        let f = users().with_catalog(Arc::new(Terse));
        let errs = f
            .validate_and_construct(&params(&[("age[eq]", "x")]), "ar")
            .unwrap_err();
        assert_eq!(errs.to_string(), "[\nNaN\n]");
    }

    #[test]
    fn test_rules_builder_accepts_iterators() {
        let f = Filters::new(
            FiltersConfig::new("SELECT 1").rules([IntFilter::new("a"), IntFilter::new("b")]),
        );
        assert_eq!(f.rules().len(), 2);
    }
}
