//! TOML filter configuration.
//!
//! These types exist only for deserialization; [`FileConfig::into_filters`]
//! turns them into a [`Filters`] engine.
//!
//! ```toml
//! sql = "SELECT * FROM users"
//! count_sql = "SELECT COUNT(*) AS count FROM users"
//! order_by = ["firstName", "lastName"]
//!
//! [paginate]
//! limit_min = 1
//! limit_max = 50
//!
//! [[rule]]
//! kind = "int"
//! key = "age"
//! min = 0
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use query_filter::{
    CheckboxIntFilter, CheckboxStrFilter, DateFilter, FilterRule, Filters, FiltersConfig,
    IntFilter, StrFilter,
};
use serde::Deserialize;

/// Whole configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Base select template.
    pub sql: String,
    /// Base count template.
    #[serde(default)]
    pub count_sql: Option<String>,
    /// Pagination bounds; absent disables `$page` / `$limit`.
    #[serde(default)]
    pub paginate: Option<PaginateConfig>,
    /// Sortable columns; absent disables `$order_by`.
    #[serde(default)]
    pub order_by: Option<Vec<String>>,
    /// Filter rules, in evaluation order.
    #[serde(rename = "rule", default)]
    pub rules: Vec<RuleConfig>,
}

/// `[paginate]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginateConfig {
    /// Smallest accepted limit (raised to 1 if lower).
    #[serde(default = "default_limit_min")]
    pub limit_min: i64,
    /// Largest accepted limit; absent, zero or negative means unbounded.
    #[serde(default)]
    pub limit_max: Option<i64>,
}

const fn default_limit_min() -> i64 {
    1
}

/// One `[[rule]]` table, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Integer comparisons.
    Int {
        /// Query key.
        key: String,
        /// Column, defaults to the key.
        #[serde(default)]
        alias: Option<String>,
        /// Inclusive minimum.
        #[serde(default)]
        min: Option<i64>,
        /// Inclusive maximum.
        #[serde(default)]
        max: Option<i64>,
    },
    /// String equality and patterns.
    #[serde(rename = "string")]
    Str {
        /// Query key.
        key: String,
        /// Column, defaults to the key.
        #[serde(default)]
        alias: Option<String>,
        /// Maximum length in bytes.
        #[serde(default)]
        max_len: Option<usize>,
    },
    /// Integer set membership.
    CheckboxInt {
        /// Query key.
        key: String,
        /// Column, defaults to the key.
        #[serde(default)]
        alias: Option<String>,
        /// Allowed values.
        options: Vec<i64>,
        /// Accept `[null]`.
        #[serde(default)]
        null_opt: bool,
    },
    /// String set membership.
    CheckboxString {
        /// Query key.
        key: String,
        /// Column, defaults to the key.
        #[serde(default)]
        alias: Option<String>,
        /// Allowed values.
        options: Vec<String>,
        /// Accept `[null]`.
        #[serde(default)]
        null_opt: bool,
    },
    /// Calendar-date ranges.
    Date {
        /// Query key.
        key: String,
        /// Column, defaults to the key.
        #[serde(default)]
        alias: Option<String>,
        /// Static lower bound, `YYYY-MM-DD`.
        #[serde(default)]
        after: Option<String>,
        /// Lower bound is today.
        #[serde(default)]
        after_now: bool,
        /// Static upper bound, `YYYY-MM-DD`.
        #[serde(default)]
        before: Option<String>,
        /// Upper bound is today.
        #[serde(default)]
        before_now: bool,
        /// Accept `[null]`.
        #[serde(default)]
        null_opt: bool,
    },
}

impl RuleConfig {
    /// Build the library rule.
    pub fn into_rule(self) -> Result<FilterRule> {
        let rule = match self {
            Self::Int {
                key,
                alias,
                min,
                max,
            } => {
                let mut f = IntFilter::new(key);
                if let Some(alias) = alias {
                    f = f.alias(alias);
                }
                if let Some(min) = min {
                    f = f.min(min);
                }
                if let Some(max) = max {
                    f = f.max(max);
                }
                f.into()
            },
            Self::Str {
                key,
                alias,
                max_len,
            } => {
                let mut f = StrFilter::new(key);
                if let Some(alias) = alias {
                    f = f.alias(alias);
                }
                if let Some(max_len) = max_len {
                    f = f.max_len(max_len);
                }
                f.into()
            },
            Self::CheckboxInt {
                key,
                alias,
                options,
                null_opt,
            } => {
                let mut f = CheckboxIntFilter::new(key, &options).null_opt(null_opt);
                if let Some(alias) = alias {
                    f = f.alias(alias);
                }
                f.into()
            },
            Self::CheckboxString {
                key,
                alias,
                options,
                null_opt,
            } => {
                let options: Vec<&str> = options.iter().map(String::as_str).collect();
                let mut f = CheckboxStrFilter::new(key, &options).null_opt(null_opt);
                if let Some(alias) = alias {
                    f = f.alias(alias);
                }
                f.into()
            },
            Self::Date {
                key,
                alias,
                after,
                after_now,
                before,
                before_now,
                null_opt,
            } => {
                let mut f = DateFilter::new(key).null_opt(null_opt);
                if let Some(alias) = alias {
                    f = f.alias(alias);
                }
                if let Some(after) = after {
                    f = f.try_after(&after)?;
                }
                if let Some(before) = before {
                    f = f.try_before(&before)?;
                }
                if after_now {
                    f = f.after_now();
                }
                if before_now {
                    f = f.before_now();
                }
                f.into()
            },
        };
        Ok(rule)
    }
}

impl FileConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid filter configuration")
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Build the engine.
    pub fn into_filters(self) -> Result<Filters> {
        let mut config = FiltersConfig::new(self.sql);
        if let Some(count_sql) = self.count_sql {
            config = config.count_sql(count_sql);
        }
        if let Some(paginate) = self.paginate {
            config = config.paginate(paginate.limit_min, paginate.limit_max);
        }
        if let Some(order_by) = self.order_by {
            config = config.order_by(order_by.as_slice());
        }
        for rule in self.rules {
            config = config.rule(rule.into_rule()?);
        }
        Ok(Filters::try_new(config)?)
    }
}
