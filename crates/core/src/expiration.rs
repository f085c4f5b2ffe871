//! Expiration window for the "expiring soon" listing.

use chrono::{Duration, NaiveDate};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Window used when the client does not ask for one.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Largest window a client may request (about ten years).
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Closed interval `[from, until]` of expiration timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationWindow {
    pub from: Timestamp,
    pub until: Timestamp,
}

impl ExpirationWindow {
    /// Window starting at `now` and spanning `days` days.
    pub fn starting_at(now: Timestamp, days: Option<i64>) -> Result<Self, CoreError> {
        let days = days.unwrap_or(DEFAULT_WINDOW_DAYS);
        if !(0..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(CoreError::Validation(format!(
                "window_days must be between 0 and {MAX_WINDOW_DAYS}"
            )));
        }
        Ok(Self {
            from: now,
            until: now + Duration::days(days),
        })
    }

    /// Whether `expires_at` falls inside the window, both ends inclusive.
    pub fn contains(&self, expires_at: Timestamp) -> bool {
        self.from <= expires_at && expires_at <= self.until
    }
}

/// Expiration date of a product made on `produced` with a shelf life of
/// `shelf_life_days`, as midnight UTC.
pub fn expiration_from_production(
    produced: NaiveDate,
    shelf_life_days: i64,
) -> Result<Timestamp, CoreError> {
    if !(1..=MAX_WINDOW_DAYS).contains(&shelf_life_days) {
        return Err(CoreError::Validation(format!(
            "shelf life must be between 1 and {MAX_WINDOW_DAYS} days"
        )));
    }
    produced
        .checked_add_signed(Duration::days(shelf_life_days))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CoreError::Validation("expiration date out of range".into()))
}
