//! Repository for the `users` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::user::User;

const COLUMNS: &str = "id, phone, name, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE phone = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Return the user for `phone`, creating it on first login.
    pub async fn find_or_create_by_phone(pool: &PgPool, phone: &str) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (phone) VALUES ($1)
             ON CONFLICT ON CONSTRAINT uq_users_phone
             DO UPDATE SET updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_one(pool)
            .await
    }
}
