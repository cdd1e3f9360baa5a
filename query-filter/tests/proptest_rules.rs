//! Property-based tests for rule output safety using proptest.

use proptest::prelude::*;
use query_filter::prelude::*;
use query_filter::{BuiltinCatalog, Locale, quote_literal};

fn en() -> Locale<'static> {
    Locale::new(Lang::En, &BuiltinCatalog)
}

fn one(key: &str, value: &str) -> QueryParams {
    [(key, value)].into_iter().collect()
}

// =============================================================================
// String literal safety
// =============================================================================

proptest! {
    /// A quoted literal never has an unpaired quote inside its delimiters
    #[test]
    fn quoted_literal_has_only_doubled_quotes(value in ".{0,40}") {
        let quoted = quote_literal(&value);
        let inner = &quoted[1..quoted.len() - 1];
        prop_assert!(quoted.starts_with('\'') && quoted.ends_with('\''));
        prop_assert_eq!(inner.replace("''", ""), value.replace('\'', ""));
    }

    /// String equality always renders `col='<escaped>'`
    #[test]
    fn string_eq_is_escaped(value in ".{0,40}") {
        let out = StrFilter::new("name")
            .validate_and_construct(&one("name[eq]", &value), &en())
            .unwrap();
        prop_assert_eq!(out, Some(format!("name={}", quote_literal(&value))));
    }

    /// Checkbox members are only ever emitted from the configured set
    #[test]
    fn checkbox_rejects_unknown_options(value in "[a-z]{1,8}") {
        prop_assume!(value != "alpha" && value != "beta");
        let result = CheckboxStrFilter::new("tag", &["alpha", "beta"])
            .validate_and_construct(&one("tag[in]", &value), &en());
        prop_assert!(result.is_err());
    }
}

// =============================================================================
// Integer re-serialization
// =============================================================================

proptest! {
    /// Accepted integers are rendered from the parsed value
    #[test]
    fn integer_roundtrips(n in any::<i64>()) {
        let out = IntFilter::new("n")
            .validate_and_construct(&one("n[eq]", &n.to_string()), &en())
            .unwrap();
        prop_assert_eq!(out, Some(format!("n={n}")));
    }

    /// Leading zeros and plus signs never reach the SQL text
    #[test]
    fn integer_output_is_canonical(n in 0i64..1_000_000, zeros in 0usize..4) {
        let raw = format!("+{}{n}", "0".repeat(zeros));
        let out = IntFilter::new("n")
            .validate_and_construct(&one("n[gt]", &raw), &en())
            .unwrap();
        prop_assert_eq!(out, Some(format!("n>{n}")));
    }

    /// Anything with a non-digit tail is rejected, never embedded
    #[test]
    fn integer_rejects_trailing_garbage(n in any::<i32>(), tail in "[ a-zA-Z;'-]{1,10}") {
        let raw = format!("{n}{tail}");
        let result = IntFilter::new("n").validate_and_construct(&one("n[eq]", &raw), &en());
        prop_assert!(result.is_err());
    }

    /// Offset is limit * (page - 1) for ordinary pages
    #[test]
    fn pagination_offset(page in 1i64..10_000, limit in 1i64..500) {
        let filters = Filters::new(FiltersConfig::new("SELECT 1").paginate(1, Some(500)));
        let q = QueryParams::parse(&format!("$page={page}&$limit={limit}"));
        let out = filters.validate_and_construct(&q, "en").unwrap();
        prop_assert_eq!(out, format!("SELECT 1 LIMIT {limit} OFFSET {}", limit * (page - 1)));
    }
}

// =============================================================================
// No-op behavior
// =============================================================================

proptest! {
    /// Keys that no rule listens on never change the base SQL
    #[test]
    fn unknown_keys_are_noop(key in "[a-z]{1,10}", value in "[a-zA-Z0-9]{0,10}") {
        prop_assume!(!["age", "name", "tag", "day"].iter().any(|k| key.starts_with(k)));
        let filters = Filters::new(
            FiltersConfig::new("SELECT * FROM t")
                .rule(IntFilter::new("age"))
                .rule(StrFilter::new("name"))
                .rule(CheckboxStrFilter::new("tag", &["a"]).null_opt(true))
                .rule(DateFilter::new("day").null_opt(true)),
        );
        let q = QueryParams::parse(&format!("{key}={value}"));
        prop_assert_eq!(filters.validate_and_construct(&q, "en").unwrap(), "SELECT * FROM t");
    }
}
