//! Repository for the append-only `inventory_logs` table.

use sqlx::PgPool;
use stockroom_core::inventory::MovementType;
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;

use crate::models::inventory_log::InventoryLog;

const COLUMNS: &str = "id, item_id, owner_id, movement_type, quantity, created_at";

pub struct InventoryLogRepo;

impl InventoryLogRepo {
    /// Movement history of one item, newest first.
    pub async fn list_for_item(
        pool: &PgPool,
        tenant: &Tenant,
        item_id: DbId,
    ) -> Result<Vec<InventoryLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_logs
             WHERE item_id = $1 AND owner_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, InventoryLog>(&query)
            .bind(item_id)
            .bind(tenant.user_id())
            .fetch_all(pool)
            .await
    }

    /// Append a movement within an existing transaction.
    pub(crate) async fn record_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tenant: &Tenant,
        item_id: DbId,
        movement: MovementType,
        quantity: i32,
    ) -> Result<InventoryLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_logs (item_id, owner_id, movement_type, quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryLog>(&query)
            .bind(item_id)
            .bind(tenant.user_id())
            .bind(movement.as_str())
            .bind(quantity)
            .fetch_one(&mut **tx)
            .await
    }
}
