//! Product lookup feeding defaults into the stock-in form.
//!
//! A barcode is resolved against the caller's catalog first and the barcode
//! directory second; a directory hit creates the product on the spot, with a
//! brick, cabinet and unit picked so the form can be submitted unchanged.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stockroom_cloud::BarcodeRecord;
use stockroom_core::activity::{ActivityEntry, ActivityLevel};
use stockroom_core::category::normalize_code;
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{derive_unit, validate_name};
use stockroom_core::tenant::Tenant;
use stockroom_db::models::category::Brick;
use stockroom_db::models::item::LastItemDefaults;
use stockroom_db::models::product::{Product, ProductAttrs};
use stockroom_db::repositories::{CabinetRepo, CategoryRepo, ItemRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub barcode: Option<String>,
    pub image_url: Option<String>,
}

/// Where a found product came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSource {
    Local,
    Directory,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LookupSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    /// Unit, cabinet and brick to prefill, from the latest batch or, for a
    /// product just created from the directory, the picked defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_item: Option<LastItemDefaults>,
}

impl LookupResponse {
    fn not_found() -> Self {
        Self {
            found: false,
            source: None,
            product: None,
            last_item: None,
        }
    }
}

/// GET /api/v1/items/lookup?barcode=|image_url=
pub async fn lookup_product(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    let barcode = non_blank(params.barcode.as_deref());
    let image_url = non_blank(params.image_url.as_deref());

    let local = match (barcode, image_url) {
        (Some(code), _) => ProductRepo::find_by_barcode(&state.pool, &tenant, code).await?,
        (None, Some(url)) => ProductRepo::find_by_image_url(&state.pool, &tenant, url).await?,
        (None, None) => {
            return Err(AppError::Core(CoreError::Validation(
                "barcode or image_url is required".into(),
            )))
        }
    };

    let response = match (local, barcode) {
        (Some(product), _) => {
            let last_item = ItemRepo::latest_for_product(&state.pool, &tenant, product.id)
                .await?
                .as_ref()
                .map(LastItemDefaults::from);
            LookupResponse {
                found: true,
                source: Some(LookupSource::Local),
                product: Some(product),
                last_item,
            }
        }
        (None, Some(code)) => create_from_directory(&state, &tenant, code).await?,
        (None, None) => LookupResponse::not_found(),
    };

    tracing::debug!(
        user_id = auth.user_id,
        found = response.found,
        source = ?response.source,
        "Product lookup"
    );

    Ok(Json(DataResponse { data: response }))
}

async fn create_from_directory(
    state: &AppState,
    tenant: &Tenant,
    barcode: &str,
) -> AppResult<LookupResponse> {
    let record = match state.cloud.barcode.lookup(barcode).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            state.record_activity(
                ActivityEntry::new("barcode", ActivityLevel::Info, "Barcode not in directory")
                    .with_details(json!({ "barcode": barcode }))
                    .for_tenant(tenant),
            );
            return Ok(LookupResponse::not_found());
        }
        Err(err) => {
            state.record_activity(
                ActivityEntry::new("barcode", ActivityLevel::Error, "Barcode directory failed")
                    .with_details(json!({ "barcode": barcode, "error": err.to_string() }))
                    .for_tenant(tenant),
            );
            return Err(err.into());
        }
    };

    let attrs = attrs_from_record(&record)?;
    let brick = pick_brick(state, record.category_code.as_deref()).await?;
    let cabinet = CabinetRepo::first_or_create_default(&state.pool, tenant).await?;
    let unit = derive_unit(attrs.specification.as_deref());

    let product = ProductRepo::upsert(&state.pool, tenant, barcode, &attrs).await?;

    state.record_activity(
        ActivityEntry::new("barcode", ActivityLevel::Success, "Product created from directory")
            .with_details(json!({ "barcode": barcode, "product_id": product.id }))
            .for_tenant(tenant),
    );

    Ok(LookupResponse {
        found: true,
        source: Some(LookupSource::Directory),
        product: Some(product),
        last_item: Some(LastItemDefaults {
            unit,
            cabinet_id: cabinet.id,
            brick_id: brick.id,
        }),
    })
}

/// The brick matching the directory's category code, else the first brick.
async fn pick_brick(state: &AppState, category_code: Option<&str>) -> AppResult<Brick> {
    if let Some(code) = category_code.and_then(|c| normalize_code(c).ok()) {
        if let Some(brick) = CategoryRepo::find_brick_by_code(&state.pool, &code).await? {
            return Ok(brick);
        }
    }
    CategoryRepo::first_brick(&state.pool)
        .await?
        .ok_or_else(|| AppError::InternalError("category taxonomy is empty".into()))
}

fn attrs_from_record(record: &BarcodeRecord) -> AppResult<ProductAttrs> {
    let name = validate_name(record.goods_name.as_deref().unwrap_or_default(), "goods_name")?;
    Ok(ProductAttrs {
        name,
        english_name: None,
        brand: record.brand.clone(),
        manufacturer: record.company.clone(),
        specification: record.spec.clone(),
        width: record.width.clone(),
        height: record.height.clone(),
        depth: record.depth.clone(),
        gross_weight: record.gross_weight.clone(),
        net_weight: record.net_weight.clone(),
        origin_country: record.origin_country.clone(),
        goods_type: record.goods_type.clone(),
        category_code: record.category_code.clone(),
        category_name: record.category_name.clone(),
        price: record.price_value(),
        image_url: record.image.clone(),
        first_ship_date: record.first_ship_date.clone(),
        packaging_type: record.packaging_type.clone(),
        shelf_life: record.shelf_life.clone(),
        min_sales_unit: record.min_sales_unit.clone(),
        certification_standard: record.certification_standard.clone(),
        certificate_license: record.certificate_license.clone(),
        note: record.remark.clone(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
