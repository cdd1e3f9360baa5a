//! Structured JSON logging to stderr.
//!
//! Every line is a single JSON object:
//!
//! ```json
//! {"level":"debug","msg":"filter request rejected","errors":"2","ts":"2025-01-16T10:30:00.000Z"}
//! ```
//!
//! - `level`: "debug", "info", "warn" or "error"
//! - `msg`: the log message
//! - additional key-value fields, in call order
//! - `ts`: ISO 8601 UTC timestamp with millisecond precision
//!
//! # Usage
//!
//! ```no_run
//! # use query_filter::log;
//! log!(warn, "static bound ignored", key: "modified");
//! query_filter::log_info!("compiled {} rules", 3);
//! ```
//!
//! `log_debug!` is compiled out of release builds. The structured `log!(debug, ...)`
//! form is not.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[doc(hidden)]
#[must_use]
pub fn __format_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Escape a string for JSON output per RFC 7159.
#[doc(hidden)]
#[must_use]
pub fn __escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + (s.len() / 10).max(8));
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(result, "\\u{:04x}", c as u32);
            },
            c => result.push(c),
        }
    }
    result
}

/// Build one JSON log line from level, message and fields.
#[doc(hidden)]
#[must_use]
pub fn __build_structured_log(level: &str, msg: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(50 + msg.len() * 2 + fields.len() * 30);

    output.push_str(r#"{"level":""#);
    output.push_str(level);
    output.push_str(r#"","msg":""#);
    output.push_str(&__escape_json(msg));
    output.push('"');

    for (key, value) in fields {
        output.push_str(r#",""#);
        output.push_str(&__escape_json(key));
        output.push_str(r#"":""#);
        output.push_str(&__escape_json(value));
        output.push('"');
    }

    output.push_str(r#","ts":""#);
    output.push_str(&__format_timestamp());
    output.push_str(r#""}"#);

    output
}

/// Write a finished line to stderr, ignoring I/O failures.
#[doc(hidden)]
pub fn __emit(line: &str) {
    use std::io::Write;
    let _ = writeln!(std::io::stderr(), "{line}");
}

/// Log an informational message to stderr.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::log::__emit(&$crate::log::__build_structured_log("info", &format!($($arg)*), &[]));
    }};
}

/// Log a warning message to stderr.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::log::__emit(&$crate::log::__build_structured_log("warn", &format!($($arg)*), &[]));
    }};
}

/// Log an error message to stderr.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::log::__emit(&$crate::log::__build_structured_log("error", &format!($($arg)*), &[]));
    }};
}

/// Log a debug message to stderr (only in debug builds).
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        {
            $crate::log::__emit(&$crate::log::__build_structured_log("debug", &format!($($arg)*), &[]));
        }
    }};
}

/// Structured logging macro with key-value pairs.
///
/// ```no_run
/// # use query_filter::log;
/// log!(debug, "filter request rejected", errors: 2, lang: "en");
/// ```
#[macro_export]
macro_rules! log {
    ($level:ident, $msg:expr $(, $key:ident : $value:expr)* $(,)?) => {{
        let fields: &[(&str, &str)] = &[
            $( (stringify!($key), &format!("{}", $value)) ),*
        ];
        $crate::log::__emit(&$crate::log::__build_structured_log(stringify!($level), $msg, fields));
    }};
}

pub use crate::log_debug as debug;
pub use crate::log_error as error;
pub use crate::log_info as info;
pub use crate::log_warn as warn;
