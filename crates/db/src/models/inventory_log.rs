//! Inventory movement log model.

use serde::Serialize;
use sqlx::FromRow;
use stockroom_core::inventory::MovementType;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `inventory_logs` table. `item_id` is `None` once the
/// batch it described has been deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryLog {
    pub id: DbId,
    pub item_id: Option<DbId>,
    pub owner_id: DbId,
    pub movement_type: String,
    pub quantity: i32,
    pub created_at: Timestamp,
}

impl InventoryLog {
    pub fn movement(&self) -> Option<MovementType> {
        MovementType::from_db(&self.movement_type)
    }
}
