//! The multi-valued query mapping every rule reads from.
//!
//! Keys are case-sensitive and map to an ordered list of values, the way a
//! query string like `?tag[in]=1&tag[in]=2` repeats keys. The lookups used by
//! the rules ([`QueryParams::first`] and [`QueryParams::all`]) treat an absent
//! key and a key with an empty list the same way.

use crate::constants::MAX_URL_DECODED_LEN;
use std::collections::HashMap;
use std::fmt;

/// Error returned when URL decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Decoded output would exceed maximum length.
    TooLong,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(
                f,
                "url decoded output exceeds maximum length ({}KB limit)",
                MAX_URL_DECODED_LEN / 1024
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode `%XX` sequences and `+` as space.
///
/// Malformed escapes are kept verbatim; invalid UTF-8 is replaced lossily.
///
/// ```
/// use query_filter::url_decode;
///
/// assert_eq!(url_decode("age%5Bgt%5D").unwrap(), "age[gt]");
/// assert_eq!(url_decode("hello+world").unwrap(), "hello world");
/// ```
pub fn url_decode(s: &str) -> Result<String, DecodeError> {
    let mut bytes = Vec::with_capacity(s.len());
    let mut input = s.bytes();

    while let Some(b) = input.next() {
        if bytes.len() >= MAX_URL_DECODED_LEN {
            return Err(DecodeError::TooLong);
        }

        match b {
            b'%' => {
                let h1 = input.next();
                let h2 = input.next();
                if let (Some(h1), Some(h2)) = (h1, h2) {
                    if let (Some(hi), Some(lo)) = (hex_value(h1), hex_value(h2)) {
                        bytes.push((hi << 4) | lo);
                        continue;
                    }
                    bytes.extend_from_slice(&[b'%', h1, h2]);
                } else {
                    bytes.push(b'%');
                    if let Some(h1) = h1 {
                        bytes.push(h1);
                    }
                }
            },
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Immutable mapping from query key to its ordered values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Repeated keys accumulate in order, a pair
    /// without `=` maps to an empty value, and pairs with an empty key are
    /// dropped. Pairs that fail to decode are dropped with a warning.
    ///
    /// ```
    /// use query_filter::QueryParams;
    ///
    /// let params = QueryParams::parse("?status[in]=1&status[in]=2&$page=3");
    /// assert_eq!(params.all("status[in]").unwrap(), ["1", "2"]);
    /// assert_eq!(params.first("$page"), Some("3"));
    /// ```
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        let mut dropped_count = 0u32;

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match (url_decode(key), url_decode(value)) {
                (Ok(key), Ok(value)) if !key.is_empty() => {
                    values.entry(key).or_default().push(value);
                },
                (Ok(_), Ok(_)) => {},
                _ => dropped_count += 1,
            }
        }

        if dropped_count > 0 {
            crate::log_warn!(
                "query param decode failed: dropped {} param(s) exceeding {} bytes after decoding",
                dropped_count,
                MAX_URL_DECODED_LEN
            );
        }

        Self { values }
    }

    /// First value for `key`, or `None` if the key is absent or has no values.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values for `key`, or `None` if the key is absent or has no values.
    #[must_use]
    pub fn all(&self, key: &str) -> Option<&[String]> {
        self.values
            .get(key)
            .filter(|v| !v.is_empty())
            .map(Vec::as_slice)
    }

    /// Whether `key` is present at all, even with an empty value list.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the mapping has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for QueryParams {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    /// Collect `(key, value)` pairs; repeated keys accumulate in order.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (k, v) in iter {
            values.entry(k.into()).or_default().push(v.into());
        }
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("hello%20world").unwrap(), "hello world");
        assert_eq!(url_decode("a+b").unwrap(), "a b");
        assert_eq!(url_decode("%24order_by").unwrap(), "$order_by");
        assert_eq!(url_decode("caf%C3%A9").unwrap(), "café");
    }

    #[test]
    fn test_url_decode_invalid_sequences() {
        assert_eq!(url_decode("%GG").unwrap(), "%GG");
        assert_eq!(url_decode("%2").unwrap(), "%2");
        assert_eq!(url_decode("%").unwrap(), "%");
        assert_eq!(url_decode("a%20b%GGc%2").unwrap(), "a b%GGc%2");
    }

    #[test]
    fn test_url_decode_too_long() {
        let long = "a".repeat(MAX_URL_DECODED_LEN + 1);
        assert_eq!(url_decode(&long), Err(DecodeError::TooLong));
    }

    #[test]
    fn test_parse_repeated_keys() {
        let params = QueryParams::parse("tag[in]=1&tag[in]=2&tag[in]=3&name[eq]=o%27neil");
        assert_eq!(params.all("tag[in]").unwrap(), ["1", "2", "3"]);
        assert_eq!(params.first("name[eq]"), Some("o'neil"));
    }

    #[test]
    fn test_parse_malformed_pairs() {
        let params = QueryParams::parse("?age[null]&=nokey&&key2=");
        assert!(params.contains_key("age[null]"));
        assert_eq!(params.first("age[null]"), Some(""));
        assert_eq!(params.first("key2"), Some(""));
        assert!(!params.contains_key(""));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_absent_and_empty_are_equivalent() {
        let mut map = HashMap::new();
        map.insert("empty".to_string(), Vec::new());
        let params = QueryParams::from(map);

        assert_eq!(params.first("empty"), None);
        assert_eq!(params.all("empty"), None);
        assert_eq!(params.first("missing"), None);
        assert_eq!(params.all("missing"), None);

        assert!(params.contains_key("empty"));
        assert!(!params.contains_key("missing"));
    }

    #[test]
    fn test_from_iter_keeps_order() {
        let params: QueryParams = [("a", "1"), ("b", "x"), ("a", "2")].into_iter().collect();
        assert_eq!(params.all("a").unwrap(), ["1", "2"]);
        assert_eq!(params.first("b"), Some("x"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let params = QueryParams::parse("Age[eq]=1");
        assert_eq!(params.first("age[eq]"), None);
        assert_eq!(params.first("Age[eq]"), Some("1"));
    }
}
