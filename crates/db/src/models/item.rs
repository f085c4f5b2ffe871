//! Item (stocked batch) model, joined listing rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub product_id: DbId,
    pub brick_id: DbId,
    pub cabinet_id: DbId,
    pub owner_id: DbId,
    pub quantity: i32,
    pub unit: String,
    pub expiration_date: Option<Timestamp>,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An item joined with the names a listing view shows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemListing {
    pub id: DbId,
    pub product_id: DbId,
    pub brick_id: DbId,
    pub cabinet_id: DbId,
    pub quantity: i32,
    pub unit: String,
    pub expiration_date: Option<Timestamp>,
    pub note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub product_name: String,
    pub product_barcode: String,
    pub product_brand: Option<String>,
    pub product_image_url: Option<String>,
    pub cabinet_name: String,
    pub room_id: DbId,
    pub room_name: String,
    pub brick_name: String,
}

/// Validated stock-in input.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub product_id: DbId,
    pub brick_id: DbId,
    pub cabinet_id: DbId,
    pub quantity: i32,
    pub unit: String,
    pub expiration_date: Option<Timestamp>,
    pub note: Option<String>,
}

/// Validated item correction. `None` fields are left unchanged; set
/// `clear_expiration_date` to remove a stored expiration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    pub cabinet_id: Option<DbId>,
    pub brick_id: Option<DbId>,
    pub expiration_date: Option<Timestamp>,
    #[serde(default)]
    pub clear_expiration_date: bool,
    pub note: Option<String>,
}

/// Defaults carried over from the most recent batch of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastItemDefaults {
    pub unit: String,
    pub cabinet_id: DbId,
    pub brick_id: DbId,
}

impl From<&Item> for LastItemDefaults {
    fn from(item: &Item) -> Self {
        Self {
            unit: item.unit.clone(),
            cabinet_id: item.cabinet_id,
            brick_id: item.brick_id,
        }
    }
}

/// Result of a stock-in.
#[derive(Debug, Clone)]
pub enum StockInOutcome {
    /// Batch created and an `IN` log written.
    Created(Item),
    /// The product is not the tenant's; nothing written.
    ProductNotFound,
    /// The cabinet is not the tenant's; nothing written.
    CabinetNotFound,
}

/// Result of a conditional stock-out.
#[derive(Debug, Clone)]
pub enum StockOutOutcome {
    /// Quantity decremented and an `OUT` log written.
    Applied(Item),
    /// No item with that id for the tenant.
    NotFound,
    /// The item holds fewer units than requested; nothing changed.
    Insufficient { available: i32 },
}
