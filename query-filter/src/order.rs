//! `$order_by` / `$arrange` handling.

use crate::constants::{KEY_ARRANGE, KEY_ORDER_BY};
use crate::error::{ConfigError, FilterError};
use crate::i18n::{Locale, Message};
use crate::params::QueryParams;
use crate::rule::Rule;
use crate::sql::check_sql_identifier;

/// Sort direction. Only the literal `DESC` selects descending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Arrange {
    /// `ASC`
    #[default]
    Asc,
    /// `DESC`
    Desc,
}

impl Arrange {
    /// Read a client value; anything but `"DESC"` is ascending.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("DESC") => Self::Desc,
            _ => Self::Asc,
        }
    }

    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validates the client's sort column against an allow-list.
#[derive(Debug, Clone)]
pub struct Orderer {
    columns: Vec<String>,
    columns_text: String,
}

impl Orderer {
    /// Allow sorting by any of `columns`.
    ///
    /// # Panics
    ///
    /// Panics if a column is not a valid SQL identifier.
    #[must_use]
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        match Self::try_new(columns) {
            Ok(orderer) => orderer,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new<S: AsRef<str>>(columns: &[S]) -> Result<Self, ConfigError> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        for column in &columns {
            check_sql_identifier(column, "order-by column")?;
        }
        Ok(Self {
            columns_text: columns.join(", "),
            columns,
        })
    }

    /// The allowed columns, in configuration order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Rule for Orderer {
    fn validate_and_construct(
        &self,
        params: &QueryParams,
        locale: &Locale<'_>,
    ) -> Result<Option<String>, FilterError> {
        let Some(column) = params.first(KEY_ORDER_BY) else {
            return Ok(None);
        };

        if !self.columns.iter().any(|c| c == column) {
            return Err(FilterError::new(
                KEY_ORDER_BY,
                column,
                locale.message(Message::ColumnNotOneOf {
                    columns: &self.columns_text,
                }),
            ));
        }

        let arrange = Arrange::from_param(params.first(KEY_ARRANGE));
        Ok(Some(format!("ORDER BY {column} {}", arrange.as_sql())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::test_support::{ar, en, params};

    fn orderer() -> Orderer {
        Orderer::new(&["firstName", "lastName"])
    }

    #[test]
    fn test_absent_is_noop() {
        let q = params(&[("$arrange", "DESC")]);
        assert_eq!(orderer().validate_and_construct(&q, &en()).unwrap(), None);
    }

    #[test]
    fn test_default_ascending() {
        let q = params(&[("$order_by", "firstName")]);
        assert_eq!(
            orderer().validate_and_construct(&q, &en()).unwrap().as_deref(),
            Some("ORDER BY firstName ASC")
        );
    }

    #[test]
    fn test_arrange() {
        let q = params(&[("$order_by", "lastName"), ("$arrange", "DESC")]);
        assert_eq!(
            orderer().validate_and_construct(&q, &en()).unwrap().as_deref(),
            Some("ORDER BY lastName DESC")
        );

        let q = params(&[("$order_by", "lastName"), ("$arrange", "desc")]);
        assert_eq!(
            orderer().validate_and_construct(&q, &en()).unwrap().as_deref(),
            Some("ORDER BY lastName ASC")
        );
    }

    #[test]
    fn test_column_not_allowed() {
        let q = params(&[("$order_by", "password")]);
        let err = orderer().validate_and_construct(&q, &en()).unwrap_err();
        assert_eq!(err.key, "$order_by");
        assert_eq!(err.value, Some("password".into()));
        assert!(err.path.is_empty());
        assert_eq!(err.message, "Should select one of the following: (firstName, lastName)");

        let err = orderer().validate_and_construct(&q, &ar()).unwrap_err();
        assert_eq!(err.message, "يجب اختيار واحد مما يلي: (firstName, lastName)");
    }

    #[test]
    fn test_try_new_rejects_bad_column() {
        let err = Orderer::try_new(&["ok", "bad col"]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidIdentifier {
                context: "order-by column".into(),
                name: "bad col".into(),
            }
        );
    }

    #[test]
    #[should_panic(expected = "invalid SQL order-by column 'x;y'")]
    fn test_new_panics_on_bad_column() {
        let _ = Orderer::new(&["x;y"]);
    }

    #[test]
    fn test_arrange_from_param() {
        assert_eq!(Arrange::from_param(None), Arrange::Asc);
        assert_eq!(Arrange::from_param(Some("DESC")), Arrange::Desc);
        assert_eq!(Arrange::from_param(Some("ASC")), Arrange::Asc);
        assert_eq!(Arrange::from_param(Some("")), Arrange::Asc);
    }
}
