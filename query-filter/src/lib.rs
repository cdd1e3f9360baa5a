// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::cast_possible_truncation)] // usize -> u64 for JSON path indices

//! # query-filter - Query-string filters compiled to SQL
//!
//! Declare which query keys a listing endpoint understands, and the engine
//! turns untrusted input such as
//! `?age[gte]=18&status[in]=1&$order_by=name&$page=2&$limit=20` into a
//! validated `WHERE` / `ORDER BY` / `LIMIT OFFSET` suffix, or a localized list
//! of every problem it found.
//!
//! ## Quick Start
//!
//! ```
//! use query_filter::prelude::*;
//!
//! let filters = Filters::new(
//!     FiltersConfig::new("SELECT * FROM users")
//!         .count_sql("SELECT COUNT(*) AS count FROM users")
//!         .paginate(1, Some(100))
//!         .order_by(&["firstName", "lastName"])
//!         .rule(StrFilter::new("firstName").max_len(50))
//!         .rule(CheckboxIntFilter::new("userStatus", &[0, 1, 2]).null_opt(true)),
//! );
//!
//! let q = QueryParams::parse("firstName[sw]=mar&userStatus[in]=1&$page=1&$limit=10");
//! let out = filters.validate_and_construct_with_count(&q, "en").unwrap();
//! assert_eq!(
//!     out.select,
//!     "SELECT * FROM users WHERE firstName LIKE 'mar%' AND userStatus IN (1) LIMIT 10 OFFSET 0"
//! );
//! assert_eq!(
//!     out.count.as_deref(),
//!     Some("SELECT COUNT(*) AS count FROM users WHERE firstName LIKE 'mar%' AND userStatus IN (1)")
//! );
//! ```
//!
//! ## Errors
//!
//! Every rule runs on every request. Failures are collected into
//! [`FilterErrors`], with messages in English or Arabic:
//!
//! ```
//! use query_filter::prelude::*;
//!
//! let filters = Filters::new(
//!     FiltersConfig::new("SELECT * FROM users")
//!         .paginate(1, None)
//!         .rule(IntFilter::new("age").min(0)),
//! );
//!
//! let errs = filters
//!     .validate_and_construct(&QueryParams::parse("age[eq]=old&$limit=10"), "en")
//!     .unwrap_err();
//! assert_eq!(errs.to_string(), "[\ninvalid number,\nPage number is missing\n]");
//! ```
//!
//! ## Safety model
//!
//! Client values reach SQL only as re-rendered integers or as single-quote
//! escaped string literals. Column names come from configuration and are
//! checked as SQL identifiers when the engine is built.

pub mod constants;
mod error;
mod filters;
mod i18n;
pub mod log;
mod order;
mod paginate;
mod params;
mod rule;
mod sql;

pub use error::{ConfigError, ErrorValue, FilterError, FilterErrors, PathSegment};
pub use filters::{CountedQuery, Filters, FiltersConfig};
pub use i18n::{BuiltinCatalog, Catalog, Lang, Locale, Message};
pub use order::{Arrange, Orderer};
pub use paginate::Paginator;
pub use params::{DecodeError, QueryParams, url_decode};
pub use rule::{
    CheckboxIntFilter, CheckboxStrFilter, DateFilter, FilterRule, IntFilter, Rule, StrFilter,
    parse_date,
};
pub use sql::{check_sql_identifier, escape_single_quote, is_valid_sql_identifier, quote_literal};

/// Prelude module for convenient imports.
///
/// ```
/// use query_filter::prelude::*;
///
/// let filters = Filters::new(FiltersConfig::new("SELECT * FROM t").rule(IntFilter::new("id")));
/// assert_eq!(
///     filters.validate_and_construct(&QueryParams::parse("id[eq]=7"), "en").unwrap(),
///     "SELECT * FROM t WHERE id=7"
/// );
/// ```
pub mod prelude {
    pub use crate::{
        CheckboxIntFilter, CheckboxStrFilter, CountedQuery, DateFilter, FilterError,
        FilterErrors, FilterRule, Filters, FiltersConfig, IntFilter, Lang, QueryParams, Rule,
        StrFilter,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Filters: Send, Sync);
    assert_impl_all!(FilterRule: Send, Sync, Clone);
    assert_impl_all!(FilterErrors: Send, Sync, std::error::Error);
    assert_impl_all!(ConfigError: Send, Sync, std::error::Error);

    #[test]
    fn test_engine_shared_across_threads() {
        let filters = std::sync::Arc::new(Filters::new(
            FiltersConfig::new("SELECT * FROM t").rule(IntFilter::new("n").min(0)),
        ));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let filters = std::sync::Arc::clone(&filters);
                std::thread::spawn(move || {
                    let q = QueryParams::parse(&format!("n[eq]={i}"));
                    filters.validate_and_construct(&q, "en")
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap(), format!("SELECT * FROM t WHERE n={i}"));
        }
    }
}
