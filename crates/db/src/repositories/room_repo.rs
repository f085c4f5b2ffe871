//! Repository for the `rooms` table.

use std::collections::HashMap;

use sqlx::PgPool;
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;

use crate::models::cabinet::Cabinet;
use crate::models::room::{Room, RoomDeleteOutcome, RoomWithCabinets};

const COLUMNS: &str = "id, name, owner_id, created_at, updated_at";

/// Provides tenant-scoped CRUD for rooms.
pub struct RoomRepo;

impl RoomRepo {
    pub async fn create(pool: &PgPool, tenant: &Tenant, name: &str) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (name, owner_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(name)
            .bind(tenant.user_id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    /// All of the tenant's rooms ordered by name, each with its cabinets
    /// ordered by name.
    pub async fn list_with_cabinets(
        pool: &PgPool,
        tenant: &Tenant,
    ) -> Result<Vec<RoomWithCabinets>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE owner_id = $1 ORDER BY name, id");
        let rooms = sqlx::query_as::<_, Room>(&query)
            .bind(tenant.user_id())
            .fetch_all(pool)
            .await?;

        let cabinets = sqlx::query_as::<_, Cabinet>(
            "SELECT id, name, room_id, owner_id, created_at, updated_at
             FROM cabinets WHERE owner_id = $1 ORDER BY name, id",
        )
        .bind(tenant.user_id())
        .fetch_all(pool)
        .await?;

        let mut by_room: HashMap<DbId, Vec<Cabinet>> = HashMap::new();
        for cabinet in cabinets {
            by_room.entry(cabinet.room_id).or_default().push(cabinet);
        }

        Ok(rooms
            .into_iter()
            .map(|room| RoomWithCabinets {
                cabinets: by_room.remove(&room.id).unwrap_or_default(),
                room,
            })
            .collect())
    }

    /// Rename a room. Returns `None` if the tenant has no such room.
    pub async fn rename(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
        name: &str,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET name = $3, updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a room and its cabinets in one transaction, refusing when any
    /// cabinet in it still holds items.
    ///
    /// The room row is locked first so a concurrent cabinet insert waits; a
    /// concurrent stock-in into one of its cabinets fails on the
    /// `items.cabinet_id` foreign key instead of orphaning.
    pub async fn delete(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
    ) -> Result<RoomDeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM rooms WHERE id = $1 AND owner_id = $2 FOR UPDATE")
                .bind(id)
                .bind(tenant.user_id())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(RoomDeleteOutcome::NotFound);
        }

        let has_items: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM items i
                JOIN cabinets c ON c.id = i.cabinet_id
                WHERE c.room_id = $1
             )",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if has_items {
            return Ok(RoomDeleteOutcome::HasItems);
        }

        sqlx::query("DELETE FROM cabinets WHERE room_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RoomDeleteOutcome::Deleted)
    }
}
