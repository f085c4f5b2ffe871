//! Room entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

use crate::models::cabinet::Cabinet;

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub name: String,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A room with its cabinets nested, both ordered by name.
#[derive(Debug, Clone, Serialize)]
pub struct RoomWithCabinets {
    #[serde(flatten)]
    pub room: Room,
    pub cabinets: Vec<Cabinet>,
}

/// DTO for creating or renaming a room.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomInput {
    pub name: String,
}

/// Result of a guarded room deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomDeleteOutcome {
    Deleted,
    NotFound,
    /// At least one cabinet in the room still holds items.
    HasItems,
}
