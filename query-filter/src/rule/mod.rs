//! Filter rules: each one reads its own keys from the query and emits one
//! boolean SQL predicate.
//!
//! | Rule | Sub-operators | Example output |
//! |------|---------------|----------------|
//! | [`IntFilter`] | `[eq]` `[null]` `[gt]` `[gte]` `[lt]` `[lte]` | `(age>8 AND age<=9)` |
//! | [`StrFilter`] | `[eq]` `[null]` `[sw]` `[ew]` `[ct]` | `name LIKE 'ma%'` |
//! | [`CheckboxIntFilter`] | `[in]` `[nin]` `[null]` | `status IN (0,2)` |
//! | [`CheckboxStrFilter`] | `[in]` `[nin]` `[null]` | `kind NOT IN ('a','b')` |
//! | [`DateFilter`] | `[eq]` `[pr]` `[pre]` `[ps]` `[pse]` `[null]` | `(d<='2024-04-29' OR d IS NULL)` |
//!
//! A rule whose keys are all absent contributes nothing.

mod checkbox;
mod date;
mod integer;
mod string;

pub use checkbox::{CheckboxIntFilter, CheckboxStrFilter};
pub use date::{DateFilter, parse_date};
pub use integer::IntFilter;
pub use string::StrFilter;

use crate::error::FilterError;
use crate::i18n::Locale;
use crate::params::QueryParams;

/// The contract shared by every filter, the orderer and the paginator.
///
/// Implementations are pure: the result depends only on the immutable rule
/// configuration and the arguments.
pub trait Rule {
    /// Validate this rule's keys and build its SQL fragment.
    ///
    /// Returns `Ok(None)` when none of the rule's keys are present.
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError>;
}

/// The closed set of filter rules an engine can hold.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum FilterRule {
    /// Integer comparisons.
    Int(IntFilter),
    /// String equality and pattern matching.
    Str(StrFilter),
    /// Integer set membership.
    CheckboxInt(CheckboxIntFilter),
    /// String set membership.
    CheckboxStr(CheckboxStrFilter),
    /// Calendar-date ranges.
    Date(DateFilter),
}

impl FilterRule {
    /// Query key prefix the rule listens on.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Int(f) => f.key(),
            Self::Str(f) => f.key(),
            Self::CheckboxInt(f) => f.key(),
            Self::CheckboxStr(f) => f.key(),
            Self::Date(f) => f.key(),
        }
    }

    /// Column the predicate is emitted against.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Int(f) => f.column(),
            Self::Str(f) => f.column(),
            Self::CheckboxInt(f) => f.column(),
            Self::CheckboxStr(f) => f.column(),
            Self::Date(f) => f.column(),
        }
    }
}

impl Rule for FilterRule {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        match self {
            Self::Int(f) => f.validate_and_construct(params, locale),
            Self::Str(f) => f.validate_and_construct(params, locale),
            Self::CheckboxInt(f) => f.validate_and_construct(params, locale),
            Self::CheckboxStr(f) => f.validate_and_construct(params, locale),
            Self::Date(f) => f.validate_and_construct(params, locale),
        }
    }
}

impl From<IntFilter> for FilterRule {
    fn from(f: IntFilter) -> Self {
        Self::Int(f)
    }
}

impl From<StrFilter> for FilterRule {
    fn from(f: StrFilter) -> Self {
        Self::Str(f)
    }
}

impl From<CheckboxIntFilter> for FilterRule {
    fn from(f: CheckboxIntFilter) -> Self {
        Self::CheckboxInt(f)
    }
}

impl From<CheckboxStrFilter> for FilterRule {
    fn from(f: CheckboxStrFilter) -> Self {
        Self::CheckboxStr(f)
    }
}

impl From<DateFilter> for FilterRule {
    fn from(f: DateFilter) -> Self {
        Self::Date(f)
    }
}

/// `key` + `[op]`, the full query key for one sub-operator.
#[inline]
pub(crate) fn param_key(key: &str, op: &str) -> String {
    let mut full = String::with_capacity(key.len() + op.len());
    full.push_str(key);
    full.push_str(op);
    full
}
