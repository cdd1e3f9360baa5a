//! Centralized constants for the query-filter crate.
//!
//! Operator suffixes, reserved query keys and default limits live here so the
//! rules and the engine agree on the exact wire names.

// ============================================================================
// OPERATOR SUFFIXES
// ============================================================================

/// Equality (`key[eq]=value`).
pub const OP_EQ: &str = "[eq]";

/// Null check (`key[null]=1` / `key[null]=0`).
pub const OP_NULL: &str = "[null]";

/// Strictly greater than.
pub const OP_GT: &str = "[gt]";

/// Greater than or equal.
pub const OP_GTE: &str = "[gte]";

/// Strictly less than.
pub const OP_LT: &str = "[lt]";

/// Less than or equal.
pub const OP_LTE: &str = "[lte]";

/// Starts with (`LIKE 'value%'`).
pub const OP_SW: &str = "[sw]";

/// Ends with (`LIKE '%value'`).
pub const OP_EW: &str = "[ew]";

/// Contains (`LIKE '%value%'`).
pub const OP_CT: &str = "[ct]";

/// Membership (`IN (...)`).
pub const OP_IN: &str = "[in]";

/// Exclusion (`NOT IN (...)`).
pub const OP_NIN: &str = "[nin]";

/// Date strictly before.
pub const OP_PR: &str = "[pr]";

/// Date at or before.
pub const OP_PRE: &str = "[pre]";

/// Date strictly after.
pub const OP_PS: &str = "[ps]";

/// Date at or after.
pub const OP_PSE: &str = "[pse]";

// ============================================================================
// RESERVED KEYS
// ============================================================================

/// Sort column chosen by the client.
pub const KEY_ORDER_BY: &str = "$order_by";

/// Sort direction (`DESC`, anything else is `ASC`).
pub const KEY_ARRANGE: &str = "$arrange";

/// 1-indexed page number.
pub const KEY_PAGE: &str = "$page";

/// Page size.
pub const KEY_LIMIT: &str = "$limit";

// ============================================================================
// LIMITS AND FORMATS
// ============================================================================

/// Smallest page size a paginator will ever accept.
pub const DEFAULT_LIMIT_MIN: i64 = 1;

/// Calendar date layout accepted by the date rule (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Exact byte length of a `YYYY-MM-DD` date.
pub const DATE_LEN: usize = 10;

/// Maximum length for a single SQL identifier segment (`PostgreSQL` limit is 63).
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Value of a `[null]` parameter that selects `IS NOT NULL`.
pub const NOT_NULL_FLAG: &str = "0";

/// Maximum decoded size of one query key or value (64KB).
pub const MAX_URL_DECODED_LEN: usize = 64 * 1024;
