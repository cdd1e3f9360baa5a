//! Validation errors reported back to the client.
//!
//! A [`FilterError`] describes one rejected parameter; a [`FilterErrors`]
//! collection is what the engine returns when any rule fails.

use miniserde::json::{self, Array, Number, Object, Value};
use std::fmt;

/// The offending value carried by a [`FilterError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorValue {
    /// A single raw string from the query.
    Text(String),
    /// A whole value list (e.g. too many checkbox options).
    List(Vec<String>),
    /// A parsed integer (e.g. an out-of-range limit).
    Int(i64),
}

impl ErrorValue {
    fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => {
                let mut arr = Array::new();
                for item in items {
                    arr.push(Value::String(item.clone()));
                }
                Value::Array(arr)
            },
            Self::Int(n) => Value::Number(Number::I64(*n)),
        }
    }
}

impl From<&str> for ErrorValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ErrorValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ErrorValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&[String]> for ErrorValue {
    fn from(items: &[String]) -> Self {
        Self::List(items.to_vec())
    }
}

/// One step of the path to the offending element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathSegment {
    /// Position inside a value list.
    Index(usize),
    /// Sub-operator that carried the value (e.g. `"pre"`).
    Op(String),
}

impl PathSegment {
    fn to_json(&self) -> Value {
        match self {
            Self::Index(i) => Value::Number(Number::U64(*i as u64)),
            Self::Op(op) => Value::String(op.clone()),
        }
    }
}

/// A single localized validation failure.
///
/// `value` is `None` when the value must not be rendered at all (for example
/// a missing companion parameter); this is distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct FilterError {
    /// Query key the error belongs to (the rule key, or `$page`, `$limit`, ...).
    pub key: String,
    /// Offending value, or `None` to omit it from the representation.
    pub value: Option<ErrorValue>,
    /// Index / sub-operator path for per-element errors. May be empty.
    pub path: Vec<PathSegment>,
    /// Localized message.
    pub message: String,
}

impl FilterError {
    /// Create an error with a value and an empty path.
    pub fn new(key: impl Into<String>, value: impl Into<ErrorValue>, message: String) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            path: Vec::new(),
            message,
        }
    }

    /// Create an error whose value is intentionally omitted.
    pub fn omitted(key: impl Into<String>, message: String) -> Self {
        Self {
            key: key.into(),
            value: None,
            path: Vec::new(),
            message,
        }
    }

    /// Append a list index to the path.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    /// Append a sub-operator tag to the path.
    #[must_use]
    pub fn at_op(mut self, op: impl Into<String>) -> Self {
        self.path.push(PathSegment::Op(op.into()));
        self
    }

    /// Fields present in the structured representation, in output order.
    fn json_fields(&self) -> Vec<(&'static str, Value)> {
        let mut fields = Vec::with_capacity(4);
        if !self.key.is_empty() {
            fields.push(("key", Value::String(self.key.clone())));
        }
        if let Some(value) = &self.value {
            fields.push(("value", value.to_json()));
        }
        let mut path = Array::new();
        for segment in &self.path {
            path.push(segment.to_json());
        }
        fields.push(("path", Value::Array(path)));
        if !self.message.is_empty() {
            fields.push(("message", Value::String(self.message.clone())));
        }
        fields
    }

    /// Structured representation: `{key?, value?, path, message?}`.
    ///
    /// miniserde objects are key-sorted; use
    /// [`to_json_string`](Self::to_json_string) for the `key, value, path,
    /// message` field order.
    pub fn to_json(&self) -> Value {
        let mut obj = Object::new();
        for (name, value) in self.json_fields() {
            obj.insert(name.to_string(), value);
        }
        Value::Object(obj)
    }

    /// Structured representation serialized as a JSON string, fields in
    /// `key, value, path, message` order.
    pub fn to_json_string(&self) -> String {
        let fields: Vec<String> = self
            .json_fields()
            .into_iter()
            .map(|(name, value)| format!("{}:{}", json::to_string(name), json::to_string(&value)))
            .collect();
        format!("{{{}}}", fields.join(","))
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FilterError {}

/// Ordered collection of validation errors from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct FilterErrors {
    errors: Vec<FilterError>,
}

impl FilterErrors {
    /// Create an empty collection with room for `capacity` errors.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            errors: Vec::with_capacity(capacity),
        }
    }

    /// Add an error at the end.
    pub fn push(&mut self, error: FilterError) {
        self.errors.push(error);
    }

    /// Number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no error was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate the errors in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterError> {
        self.errors.iter()
    }

    /// Borrow the errors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[FilterError] {
        &self.errors
    }

    /// Consume the collection.
    #[must_use]
    pub fn into_vec(self) -> Vec<FilterError> {
        self.errors
    }

    /// JSON array of every error's structured representation.
    pub fn to_json(&self) -> Value {
        let mut arr = Array::new();
        for err in &self.errors {
            arr.push(err.to_json());
        }
        Value::Array(arr)
    }

    /// JSON array serialized as a string, each object in
    /// [`FilterError::to_json_string`] field order.
    pub fn to_json_string(&self) -> String {
        let items: Vec<String> = self.errors.iter().map(FilterError::to_json_string).collect();
        format!("[{}]", items.join(","))
    }
}

impl fmt::Display for FilterErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("[]");
        }
        f.write_str("[")?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "\n{err}")?;
        }
        f.write_str("\n]")
    }
}

impl std::error::Error for FilterErrors {}

impl From<FilterError> for FilterErrors {
    fn from(err: FilterError) -> Self {
        Self { errors: vec![err] }
    }
}

impl FromIterator<FilterError> for FilterErrors {
    fn from_iter<I: IntoIterator<Item = FilterError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FilterErrors {
    type Item = FilterError;
    type IntoIter = std::vec::IntoIter<FilterError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a FilterErrors {
    type Item = &'a FilterError;
    type IntoIter = std::slice::Iter<'a, FilterError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{ErrorValue, FilterError, FilterErrors, PathSegment};
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    impl Serialize for ErrorValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Text(s) => serializer.serialize_str(s),
                Self::List(items) => items.serialize(serializer),
                Self::Int(n) => serializer.serialize_i64(*n),
            }
        }
    }

    impl Serialize for PathSegment {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Index(i) => serializer.serialize_u64(*i as u64),
                Self::Op(op) => serializer.serialize_str(op),
            }
        }
    }

    impl Serialize for FilterError {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            if !self.key.is_empty() {
                map.serialize_entry("key", &self.key)?;
            }
            if let Some(value) = &self.value {
                map.serialize_entry("value", value)?;
            }
            map.serialize_entry("path", &self.path)?;
            if !self.message.is_empty() {
                map.serialize_entry("message", &self.message)?;
            }
            map.end()
        }
    }

    impl Serialize for FilterErrors {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.errors.len()))?;
            for err in &self.errors {
                seq.serialize_element(err)?;
            }
            seq.end()
        }
    }
}

/// Error raised while building a rule or engine configuration.
///
/// These are programmer errors; the panicking builders (`Filters::new`,
/// `Orderer::new`, `DateFilter::after`, ...) panic with this error's message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A column alias or order-by column is not a safe SQL identifier.
    InvalidIdentifier {
        /// What the identifier was used for (e.g. "column alias").
        context: String,
        /// The rejected identifier.
        name: String,
    },
    /// A static date bound is not a `YYYY-MM-DD` calendar date.
    InvalidDateBound {
        /// Rule key.
        key: String,
        /// The rejected bound.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier { context, name } => write!(
                f,
                "invalid SQL {context} '{name}': must start with letter/underscore, \
                 contain only alphanumerics/underscores, optionally dot-qualified"
            ),
            Self::InvalidDateBound { key, value } => {
                write!(f, "invalid date bound '{value}' for `{key}`: expected YYYY-MM-DD")
            },
        }
    }
}

impl std::error::Error for ConfigError {}
