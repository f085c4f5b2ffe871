//! Handlers for item batches: stock-in, stock-out, corrections and the
//! expiring-soon listing.
//!
//! Quantities arrive as JSON numbers and are narrowed to `i32` by the
//! validators in `stockroom_core::inventory` before anything is written.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::expiration::ExpirationWindow;
use stockroom_core::inventory::{
    parse_optional_expiration_date, require, validate_name, validate_on_hand_quantity,
    validate_positive_quantity,
};
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;
use stockroom_db::models::item::{CreateItem, StockInOutcome, StockOutOutcome, UpdateItem};
use stockroom_db::repositories::{
    CabinetRepo, CategoryRepo, InventoryLogRepo, ItemRepo, ProductRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Stock-in body. Fields are optional here so a missing one is reported by
/// name instead of as a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub product_id: Option<DbId>,
    pub brick_id: Option<DbId>,
    pub cabinet_id: Option<DbId>,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub expiration_date: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StockOutRequest {
    pub item_id: Option<DbId>,
    pub quantity: Option<i64>,
}

/// Correction body. An empty `expiration_date` string clears the stored date.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: Option<i64>,
    pub unit: Option<String>,
    pub cabinet_id: Option<DbId>,
    pub brick_id: Option<DbId>,
    pub expiration_date: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemListParams {
    pub product_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct ExpiringParams {
    pub window_days: Option<i64>,
}

// ---------------------------------------------------------------------------
// Stock movements
// ---------------------------------------------------------------------------

/// POST /api/v1/items
///
/// Stock-in: always creates a new batch and an `IN` log row.
pub async fn create_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateItemRequest>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();

    let product_id = require(input.product_id, "product_id")?;
    let brick_id = require(input.brick_id, "brick_id")?;
    let cabinet_id = require(input.cabinet_id, "cabinet_id")?;
    let quantity = validate_positive_quantity(require(input.quantity, "quantity")?, "quantity")?;
    let unit = validate_name(&require(input.unit, "unit")?, "unit")?;
    let expiration_date = parse_optional_expiration_date(input.expiration_date.as_deref())?;

    ensure_references(&state, &tenant, Some(product_id), Some(brick_id), Some(cabinet_id)).await?;

    let create = CreateItem {
        product_id,
        brick_id,
        cabinet_id,
        quantity,
        unit,
        expiration_date,
        note: input.note,
    };
    let item = match ItemRepo::create(&state.pool, &tenant, &create).await? {
        StockInOutcome::Created(item) => item,
        StockInOutcome::ProductNotFound => return Err(AppError::not_found("Product", product_id)),
        StockInOutcome::CabinetNotFound => return Err(AppError::not_found("Cabinet", cabinet_id)),
    };

    tracing::info!(
        item_id = item.id,
        product_id,
        quantity,
        user_id = auth.user_id,
        "Stocked in"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// POST /api/v1/items/out
///
/// Stock-out: decrement a batch. Never drives the quantity negative.
pub async fn stock_out(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<StockOutRequest>,
) -> AppResult<impl IntoResponse> {
    let item_id = require(input.item_id, "item_id")?;
    let quantity = validate_positive_quantity(require(input.quantity, "quantity")?, "quantity")?;

    match ItemRepo::stock_out(&state.pool, &auth.tenant(), item_id, quantity).await? {
        StockOutOutcome::Applied(item) => {
            tracing::info!(
                item_id,
                quantity,
                remaining = item.quantity,
                user_id = auth.user_id,
                "Stocked out"
            );
            Ok(Json(DataResponse { data: item }))
        }
        StockOutOutcome::NotFound => Err(AppError::not_found("Item", item_id)),
        StockOutOutcome::Insufficient { available } => {
            Err(AppError::Core(CoreError::InsufficientQuantity {
                requested: quantity,
                available,
            }))
        }
    }
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/items?product_id=
///
/// Newest first. With `product_id`, only batches that still hold stock.
pub async fn list_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ItemListParams>,
) -> AppResult<impl IntoResponse> {
    let items = ItemRepo::list(&state.pool, &auth.tenant(), params.product_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/items/expiring?window_days=
pub async fn list_expiring(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ExpiringParams>,
) -> AppResult<impl IntoResponse> {
    let window = ExpirationWindow::starting_at(Utc::now(), params.window_days)?;
    let items = ItemRepo::list_expiring(&state.pool, &auth.tenant(), &window).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/items/{id}
pub async fn get_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::find_listing(&state.pool, &auth.tenant(), item_id)
        .await?
        .ok_or(AppError::not_found("Item", item_id))?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/items/{id}/logs
pub async fn list_item_logs(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    ItemRepo::find_by_id(&state.pool, &tenant, item_id)
        .await?
        .ok_or(AppError::not_found("Item", item_id))?;

    let logs = InventoryLogRepo::list_for_item(&state.pool, &tenant, item_id).await?;
    Ok(Json(DataResponse { data: logs }))
}

// ---------------------------------------------------------------------------
// Corrections
// ---------------------------------------------------------------------------

/// PUT /api/v1/items/{id}
///
/// Correct a batch. `quantity` may be zero here; it is an on-hand count, not
/// a movement, and writes no log row.
pub async fn update_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();

    let quantity = input.quantity.map(validate_on_hand_quantity).transpose()?;
    let unit = input
        .unit
        .as_deref()
        .map(|u| validate_name(u, "unit"))
        .transpose()?;
    let clear_expiration_date = input
        .expiration_date
        .as_deref()
        .is_some_and(|d| d.trim().is_empty());
    let expiration_date = parse_optional_expiration_date(input.expiration_date.as_deref())?;

    ItemRepo::find_by_id(&state.pool, &tenant, item_id)
        .await?
        .ok_or(AppError::not_found("Item", item_id))?;
    ensure_references(&state, &tenant, None, input.brick_id, input.cabinet_id).await?;

    let update = UpdateItem {
        quantity,
        unit,
        cabinet_id: input.cabinet_id,
        brick_id: input.brick_id,
        expiration_date,
        clear_expiration_date,
        note: input.note,
    };
    let item = ItemRepo::update(&state.pool, &tenant, item_id, &update)
        .await?
        .ok_or(AppError::not_found("Item", item_id))?;

    tracing::info!(item_id, user_id = auth.user_id, "Item updated");

    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/items/{id}
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ItemRepo::delete(&state.pool, &auth.tenant(), item_id).await? {
        tracing::info!(item_id, user_id = auth.user_id, "Item deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Item", item_id))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Check that referenced rows exist and, for owner-scoped ones, belong to
/// the tenant, so the caller gets a NotFound naming the entity rather than a
/// constraint error.
async fn ensure_references(
    state: &AppState,
    tenant: &Tenant,
    product_id: Option<DbId>,
    brick_id: Option<DbId>,
    cabinet_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = product_id {
        ProductRepo::find_by_id(&state.pool, tenant, id)
            .await?
            .ok_or(AppError::not_found("Product", id))?;
    }
    if let Some(id) = brick_id {
        CategoryRepo::find_brick(&state.pool, id)
            .await?
            .ok_or(AppError::not_found("Brick", id))?;
    }
    if let Some(id) = cabinet_id {
        CabinetRepo::find_by_id(&state.pool, tenant, id)
            .await?
            .ok_or(AppError::not_found("Cabinet", id))?;
    }
    Ok(())
}
