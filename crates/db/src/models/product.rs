//! Product entity model and the attribute set accepted by upsert.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub barcode: String,
    pub name: String,
    pub english_name: Option<String>,
    pub brand: Option<String>,
    pub manufacturer: Option<String>,
    pub specification: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub depth: Option<String>,
    pub gross_weight: Option<String>,
    pub net_weight: Option<String>,
    pub origin_country: Option<String>,
    pub goods_type: Option<String>,
    pub category_code: Option<String>,
    pub category_name: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub first_ship_date: Option<String>,
    pub packaging_type: Option<String>,
    pub shelf_life: Option<String>,
    pub min_sales_unit: Option<String>,
    pub certification_standard: Option<String>,
    pub certificate_license: Option<String>,
    pub note: Option<String>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Descriptive attributes written by an upsert. On conflict every column is
/// replaced by the latest input, including with `NULL`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductAttrs {
    #[serde(default)]
    pub name: String,
    pub english_name: Option<String>,
    pub brand: Option<String>,
    pub manufacturer: Option<String>,
    pub specification: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub depth: Option<String>,
    pub gross_weight: Option<String>,
    pub net_weight: Option<String>,
    pub origin_country: Option<String>,
    pub goods_type: Option<String>,
    pub category_code: Option<String>,
    pub category_name: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub first_ship_date: Option<String>,
    pub packaging_type: Option<String>,
    pub shelf_life: Option<String>,
    pub min_sales_unit: Option<String>,
    pub certification_standard: Option<String>,
    pub certificate_license: Option<String>,
    pub note: Option<String>,
}
