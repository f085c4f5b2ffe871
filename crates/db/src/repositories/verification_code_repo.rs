//! Repository for the `verification_codes` table.

use sqlx::PgPool;
use stockroom_core::types::Timestamp;

use crate::models::verification_code::VerificationCode;

const COLUMNS: &str = "id, phone, code_hash, expires_at, failed_attempts, created_at";

pub struct VerificationCodeRepo;

impl VerificationCodeRepo {
    /// Replace any outstanding codes for `phone` with a new one.
    pub async fn replace(
        pool: &PgPool,
        phone: &str,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<VerificationCode, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM verification_codes WHERE phone = $1")
            .bind(phone)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO verification_codes (phone, code_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let code = sqlx::query_as::<_, VerificationCode>(&query)
            .bind(phone)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(code)
    }

    /// Consume a matching, unexpired code. A code can be consumed once;
    /// concurrent attempts race on the single `DELETE`.
    pub async fn consume(
        pool: &PgPool,
        phone: &str,
        code_hash: &str,
        now: Timestamp,
    ) -> Result<Option<VerificationCode>, sqlx::Error> {
        let query = format!(
            "DELETE FROM verification_codes
             WHERE phone = $1 AND code_hash = $2 AND expires_at > $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(phone)
            .bind(code_hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Count a wrong guess against the outstanding code for `phone`, deleting
    /// the code once it has taken `max_attempts` wrong guesses.
    ///
    /// Returns `true` when the code was deleted.
    pub async fn record_failure(
        pool: &PgPool,
        phone: &str,
        max_attempts: i32,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE verification_codes SET failed_attempts = failed_attempts + 1 WHERE phone = $1",
        )
        .bind(phone)
        .execute(&mut *tx)
        .await?;

        let burned = sqlx::query(
            "DELETE FROM verification_codes WHERE phone = $1 AND failed_attempts >= $2",
        )
        .bind(phone)
        .bind(max_attempts)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(burned.rows_affected() > 0)
    }

    /// Delete codes that expired before `now`. Returns the number removed.
    pub async fn purge_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at <= $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
