//! Repository for the `cabinets` table.

use sqlx::PgPool;
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;

use crate::models::cabinet::{Cabinet, CabinetDeleteOutcome, CabinetListing, UpdateCabinet};

const COLUMNS: &str = "id, name, room_id, owner_id, created_at, updated_at";

/// Names used when a tenant without any location needs a default one.
pub const DEFAULT_ROOM_NAME: &str = "Default room";
pub const DEFAULT_CABINET_NAME: &str = "Default cabinet";

/// Provides tenant-scoped CRUD for cabinets.
pub struct CabinetRepo;

impl CabinetRepo {
    /// Insert a cabinet into one of the tenant's rooms.
    ///
    /// Returns `None` if `room_id` is not a room owned by the tenant.
    pub async fn create(
        pool: &PgPool,
        tenant: &Tenant,
        room_id: DbId,
        name: &str,
    ) -> Result<Option<Cabinet>, sqlx::Error> {
        let query = format!(
            "INSERT INTO cabinets (name, room_id, owner_id)
             SELECT $1, r.id, r.owner_id FROM rooms r WHERE r.id = $2 AND r.owner_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cabinet>(&query)
            .bind(name)
            .bind(room_id)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
    ) -> Result<Option<Cabinet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cabinets WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Cabinet>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    /// List cabinets newest first with room name and item count, optionally
    /// restricted to one room.
    pub async fn list(
        pool: &PgPool,
        tenant: &Tenant,
        room_id: Option<DbId>,
    ) -> Result<Vec<CabinetListing>, sqlx::Error> {
        sqlx::query_as::<_, CabinetListing>(
            "SELECT c.id, c.name, c.room_id, r.name AS room_name,
                    (SELECT COUNT(*) FROM items i WHERE i.cabinet_id = c.id) AS item_count,
                    c.created_at, c.updated_at
             FROM cabinets c
             JOIN rooms r ON r.id = c.room_id
             WHERE c.owner_id = $1 AND ($2::BIGINT IS NULL OR c.room_id = $2)
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(tenant.user_id())
        .bind(room_id)
        .fetch_all(pool)
        .await
    }

    /// Rename and/or move a cabinet. A target room must belong to the tenant.
    ///
    /// Returns `None` if the cabinet or the target room is not the tenant's.
    pub async fn update(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
        input: &UpdateCabinet,
    ) -> Result<Option<Cabinet>, sqlx::Error> {
        let query = format!(
            "UPDATE cabinets SET
                name = COALESCE($3, name),
                room_id = COALESCE($4, room_id),
                updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
               AND ($4::BIGINT IS NULL
                    OR EXISTS (SELECT 1 FROM rooms WHERE id = $4 AND owner_id = $2))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cabinet>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .bind(&input.name)
            .bind(input.room_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a cabinet unless it still holds items.
    pub async fn delete(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
    ) -> Result<CabinetDeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM cabinets WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(tenant.user_id())
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Ok(CabinetDeleteOutcome::NotFound);
        }

        let has_items: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM items WHERE cabinet_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if has_items {
            return Ok(CabinetDeleteOutcome::HasItems);
        }

        sqlx::query("DELETE FROM cabinets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CabinetDeleteOutcome::Deleted)
    }

    /// The tenant's first cabinet (oldest room, then oldest cabinet), creating
    /// a default room and cabinet when the tenant has none.
    ///
    /// A transaction-scoped advisory lock on the owner id serializes
    /// concurrent callers, so at most one default pair is ever created.
    pub async fn first_or_create_default(
        pool: &PgPool,
        tenant: &Tenant,
    ) -> Result<Cabinet, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(tenant.user_id())
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, Cabinet>(
            "SELECT c.id, c.name, c.room_id, c.owner_id, c.created_at, c.updated_at
             FROM cabinets c
             JOIN rooms r ON r.id = c.room_id
             WHERE c.owner_id = $1
             ORDER BY r.id, c.id
             LIMIT 1",
        )
        .bind(tenant.user_id())
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(cabinet) = existing {
            tx.commit().await?;
            return Ok(cabinet);
        }

        let room_id: DbId =
            sqlx::query_scalar("INSERT INTO rooms (name, owner_id) VALUES ($1, $2) RETURNING id")
                .bind(DEFAULT_ROOM_NAME)
                .bind(tenant.user_id())
                .fetch_one(&mut *tx)
                .await?;

        let insert = format!(
            "INSERT INTO cabinets (name, room_id, owner_id) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let cabinet = sqlx::query_as::<_, Cabinet>(&insert)
            .bind(DEFAULT_CABINET_NAME)
            .bind(room_id)
            .bind(tenant.user_id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(user_id = tenant.user_id(), cabinet_id = cabinet.id, "Created default location");
        Ok(cabinet)
    }
}
