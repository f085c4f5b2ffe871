//! Phone + SMS code login rules.
//!
//! Codes are six random digits, valid for [`CODE_TTL_MINS`] minutes and
//! stored only as a SHA-256 digest bound to the phone number.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Minutes a verification code stays valid after it is issued.
pub const CODE_TTL_MINS: i64 = 5;

/// Wrong guesses a code survives before it is invalidated.
pub const MAX_CODE_ATTEMPTS: i32 = 5;

/// Mainland mobile number: 11 digits starting with 1 and a 3-9 carrier digit.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid regex"));

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim and validate a phone number.
pub fn validate_phone(phone: &str) -> Result<String, CoreError> {
    let phone = phone.trim();
    if !PHONE_RE.is_match(phone) {
        return Err(CoreError::Validation("invalid phone number".into()));
    }
    Ok(phone.to_string())
}

/// Trim and validate the shape of a submitted verification code.
pub fn validate_code(code: &str) -> Result<String, CoreError> {
    let code = code.trim();
    if !CODE_RE.is_match(code) {
        return Err(CoreError::Validation(format!(
            "verification code must be {CODE_LENGTH} digits"
        )));
    }
    Ok(code.to_string())
}

// ---------------------------------------------------------------------------
// Code generation and hashing
// ---------------------------------------------------------------------------

/// Generate a random six-digit code, zero-padded.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

/// Digest stored in place of the plaintext code.
pub fn hash_code(phone: &str, code: &str) -> String {
    let digest = Sha256::digest(format!("{phone}:{code}").as_bytes());
    format!("{digest:x}")
}

/// Mask the middle of a phone number for logs, e.g. `138****8000`.
pub fn mask_phone(phone: &str) -> String {
    if phone.len() != 11 || !phone.is_ascii() {
        return "***".to_string();
    }
    format!("{}****{}", &phone[..3], &phone[7..])
}
