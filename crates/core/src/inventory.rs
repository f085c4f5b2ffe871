//! Stock-in / stock-out rules shared by the repository and HTTP layers.
//!
//! Quantities travel over the wire as JSON numbers (`i64`) and are stored as
//! PostgreSQL `INTEGER`; the validators here narrow them to `i32` and enforce
//! sign rules before any write happens.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix for barcodes generated when a product is stocked without one.
pub const SYNTHETIC_BARCODE_PREFIX: &str = "NO_BARCODE_";

/// Number of random hex characters appended to a synthetic barcode.
const SYNTHETIC_BARCODE_SUFFIX_LEN: usize = 8;

/// Unit used when none can be derived from a product specification.
pub const DEFAULT_UNIT: &str = "个";

/// Maximum length for room, cabinet, product and unit names.
pub const MAX_NAME_LEN: usize = 200;

/// `<number><unit>` inside a specification string such as `500ml*12瓶`.
static SPEC_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?([a-zA-Z]+|个|包|瓶|盒)").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Movement type
// ---------------------------------------------------------------------------

/// Direction of a stock movement recorded in the inventory log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    In,
    Out,
}

impl MovementType {
    /// Value stored in the `movement_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Parse a stored `movement_type` value.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "IN" => Some(Self::In),
            "OUT" => Some(Self::Out),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Unwrap a required request field, naming it in the validation error.
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

/// Validate a quantity that must be a positive 32-bit integer
/// (stock-in batch size, stock-out amount).
pub fn validate_positive_quantity(quantity: i64, field: &str) -> Result<i32, CoreError> {
    if quantity <= 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a positive integer, got {quantity}"
        )));
    }
    i32::try_from(quantity)
        .map_err(|_| CoreError::Validation(format!("{field} must be at most {}", i32::MAX)))
}

/// Validate a corrected on-hand quantity, where zero (a depleted batch) is allowed.
pub fn validate_on_hand_quantity(quantity: i64) -> Result<i32, CoreError> {
    if quantity < 0 {
        return Err(CoreError::Validation(format!(
            "quantity must not be negative, got {quantity}"
        )));
    }
    i32::try_from(quantity)
        .map_err(|_| CoreError::Validation(format!("quantity must be at most {}", i32::MAX)))
}

/// Trim a display name and check it is non-empty and reasonably short.
pub fn validate_name(value: &str, field: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Barcodes
// ---------------------------------------------------------------------------

/// The caller's barcode, trimmed; `None` when missing or blank, in which
/// case the product gets a [`synthesize_barcode`] value.
pub fn supplied_barcode(barcode: Option<&str>) -> Option<&str> {
    barcode.map(str::trim).filter(|code| !code.is_empty())
}

/// Generate a barcode for a product that has none. Collisions are possible,
/// so callers must insert without overwriting and retry.
pub fn synthesize_barcode() -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SYNTHETIC_BARCODE_SUFFIX_LEN)
        .collect();
    format!("{SYNTHETIC_BARCODE_PREFIX}{suffix}")
}

/// Whether `barcode` was generated by [`synthesize_barcode`].
pub fn is_synthetic_barcode(barcode: &str) -> bool {
    barcode.starts_with(SYNTHETIC_BARCODE_PREFIX)
}

// ---------------------------------------------------------------------------
// Dates and units
// ---------------------------------------------------------------------------

/// Parse an expiration date from a client.
///
/// A date-only value (`2025-03-01`) becomes midnight UTC of that day; a full
/// RFC 3339 timestamp is converted to UTC unchanged.
pub fn parse_expiration_date(value: &str) -> Result<Timestamp, CoreError> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(midnight_utc(date));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            CoreError::Validation(format!(
                "expiration_date must be YYYY-MM-DD or an RFC 3339 timestamp, got '{value}'"
            ))
        })
}

/// Parse an optional expiration date, treating blank strings as absent.
pub fn parse_optional_expiration_date(value: Option<&str>) -> Result<Option<Timestamp>, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => parse_expiration_date(v).map(Some),
        _ => Ok(None),
    }
}

fn midnight_utc(date: NaiveDate) -> Timestamp {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Guess the counting unit from a product specification, e.g. `"500ml"` -> `"ml"`.
pub fn derive_unit(specification: Option<&str>) -> String {
    specification
        .and_then(|spec| SPEC_UNIT_RE.captures(spec))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_UNIT.to_string())
}
