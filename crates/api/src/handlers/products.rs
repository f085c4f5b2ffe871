//! Handlers for the tenant's product catalog.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stockroom_core::inventory::{supplied_barcode, synthesize_barcode, validate_name};
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;
use stockroom_db::models::product::{Product, ProductAttrs};
use stockroom_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fresh synthetic barcodes tried before giving up.
const SYNTHETIC_BARCODE_ATTEMPTS: usize = 5;

/// Request body for `POST /products`.
///
/// A missing or blank `barcode` gets a synthetic `NO_BARCODE_*` value.
#[derive(Debug, Deserialize)]
pub struct UpsertProductRequest {
    pub barcode: Option<String>,
    #[serde(flatten)]
    pub attrs: ProductAttrs,
}

/// GET /api/v1/products
pub async fn list_products(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list(&state.pool, &auth.tenant()).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, &auth.tenant(), product_id)
        .await?
        .ok_or(AppError::not_found("Product", product_id))?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/products
///
/// Insert, or replace the attributes of the caller's product with the same
/// barcode. Products without a barcode are always inserted as new rows.
pub async fn upsert_product(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpsertProductRequest>,
) -> AppResult<impl IntoResponse> {
    let mut attrs = input.attrs;
    attrs.name = validate_name(&attrs.name, "name")?;
    let tenant = auth.tenant();

    let product = match supplied_barcode(input.barcode.as_deref()) {
        Some(barcode) => ProductRepo::upsert(&state.pool, &tenant, barcode, &attrs).await?,
        None => insert_with_synthetic_barcode(&state, &tenant, &attrs).await?,
    };

    tracing::info!(
        product_id = product.id,
        barcode = %product.barcode,
        user_id = auth.user_id,
        "Product upserted"
    );

    Ok(Json(DataResponse { data: product }))
}

async fn insert_with_synthetic_barcode(
    state: &AppState,
    tenant: &Tenant,
    attrs: &ProductAttrs,
) -> AppResult<Product> {
    for _ in 0..SYNTHETIC_BARCODE_ATTEMPTS {
        let barcode = synthesize_barcode();
        if let Some(product) = ProductRepo::insert(&state.pool, tenant, &barcode, attrs).await? {
            return Ok(product);
        }
        tracing::warn!(%barcode, user_id = tenant.user_id(), "Synthetic barcode taken, retrying");
    }
    Err(AppError::InternalError(
        "could not allocate a synthetic barcode".into(),
    ))
}
