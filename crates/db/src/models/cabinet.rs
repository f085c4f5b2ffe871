//! Cabinet entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `cabinets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cabinet {
    pub id: DbId,
    pub name: String,
    pub room_id: DbId,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cabinet with its room name and the number of batches stored in it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CabinetListing {
    pub id: DbId,
    pub name: String,
    pub room_id: DbId,
    pub room_name: String,
    pub item_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a cabinet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCabinet {
    pub name: String,
    pub room_id: DbId,
}

/// DTO for updating a cabinet. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCabinet {
    pub name: Option<String>,
    pub room_id: Option<DbId>,
}

/// Result of a guarded cabinet deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinetDeleteOutcome {
    Deleted,
    NotFound,
    HasItems,
}
