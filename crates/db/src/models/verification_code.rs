use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// An outstanding login code. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    pub id: DbId,
    pub phone: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
    /// Wrong guesses made against this code so far.
    pub failed_attempts: i32,
    pub created_at: Timestamp,
}
