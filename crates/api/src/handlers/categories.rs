//! Handlers for the read-only category taxonomy.
//!
//! Parent-filtered listings return an empty list for a parent without
//! children. Brick codes are accepted at this boundary and resolved to ids.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use stockroom_cloud::vision::Recognized;
use stockroom_core::category::{
    build_tree, normalize_code, CategoryNode, CategoryPath, CategoryTree,
};
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{require, validate_name};
use stockroom_core::types::DbId;
use stockroom_db::models::category::{Brick, BrickPathRow};
use stockroom_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FamilyParams {
    pub segment_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct ClassParams {
    pub family_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct BrickParams {
    pub class_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SmartCategoryRequest {
    pub product_name: String,
}

/// A brick with its resolved ancestors.
#[derive(Debug, Serialize)]
pub struct BrickHierarchy {
    pub segment: CategoryNode,
    pub family: CategoryNode,
    pub class: CategoryNode,
    pub brick: Brick,
    pub full_path: String,
}

impl From<BrickPathRow> for BrickHierarchy {
    fn from(row: BrickPathRow) -> Self {
        let path = row.path();
        Self {
            full_path: path.full_path(),
            brick: row.brick(),
            segment: path.segment,
            family: path.family,
            class: path.class,
        }
    }
}

/// One entry of `GET /bricks`.
#[derive(Debug, Serialize)]
pub struct BrickWithPath {
    #[serde(flatten)]
    pub brick: Brick,
    pub full_path: String,
    pub hierarchy: CategoryPath,
}

#[derive(Debug, Serialize)]
pub struct BrickCatalog {
    pub items: Vec<BrickWithPath>,
    pub tree: CategoryTree,
}

// ---------------------------------------------------------------------------
// Level listings
// ---------------------------------------------------------------------------

/// GET /api/v1/categories/segments
pub async fn list_segments(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let segments = CategoryRepo::list_segments(&state.pool).await?;
    Ok(Json(DataResponse { data: segments }))
}

/// GET /api/v1/categories/families?segment_id=
pub async fn list_families(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<FamilyParams>,
) -> AppResult<impl IntoResponse> {
    let segment_id = require(params.segment_id, "segment_id")?;
    let families = CategoryRepo::list_families(&state.pool, segment_id).await?;
    Ok(Json(DataResponse { data: families }))
}

/// GET /api/v1/categories/classes?family_id=
pub async fn list_classes(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ClassParams>,
) -> AppResult<impl IntoResponse> {
    let family_id = require(params.family_id, "family_id")?;
    let classes = CategoryRepo::list_classes(&state.pool, family_id).await?;
    Ok(Json(DataResponse { data: classes }))
}

/// GET /api/v1/categories/bricks?class_id=
pub async fn list_bricks(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BrickParams>,
) -> AppResult<impl IntoResponse> {
    let class_id = require(params.class_id, "class_id")?;
    let bricks = CategoryRepo::list_bricks(&state.pool, class_id).await?;
    Ok(Json(DataResponse { data: bricks }))
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// GET /api/v1/categories/lookup?code=
///
/// Resolve a brick code to the brick and its class, family and segment.
pub async fn lookup(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> AppResult<impl IntoResponse> {
    let code = normalize_code(&require(params.code, "code")?)?;
    let hierarchy = resolve_brick_code(&state, &code).await?;
    Ok(Json(DataResponse { data: hierarchy }))
}

/// POST /api/v1/categories/smart
///
/// Ask the vision model for the brick matching a product name, then resolve
/// it against the local taxonomy.
pub async fn smart_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SmartCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let product_name = validate_name(&input.product_name, "product_name")?;

    let recognition = state
        .cloud
        .vision
        .recognize_category(&product_name)
        .await?
        .ensure_ok()?;
    let code = recognition.code.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Upstream(
            "category recognition returned no code".into(),
        ))
    })?;
    let code = normalize_code(code)?;

    let hierarchy = resolve_brick_code(&state, &code).await?;
    tracing::info!(user_id = auth.user_id, %code, "Category recognized");

    Ok(Json(DataResponse { data: hierarchy }))
}

async fn resolve_brick_code(state: &AppState, code: &str) -> AppResult<BrickHierarchy> {
    CategoryRepo::find_path_by_brick_code(&state.pool, code)
        .await?
        .map(BrickHierarchy::from)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByCode {
                entity: "Brick",
                code: code.to_string(),
            })
        })
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/bricks
///
/// Every brick with its full path, plus the segment > family > class tree
/// used by filtering UIs.
pub async fn list_bricks_with_paths(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = CategoryRepo::list_brick_paths(&state.pool).await?;

    let items: Vec<BrickWithPath> = rows
        .iter()
        .map(|row| {
            let hierarchy = row.path();
            BrickWithPath {
                brick: row.brick(),
                full_path: hierarchy.full_path(),
                hierarchy,
            }
        })
        .collect();
    let tree = build_tree(items.iter().map(|item| &item.hierarchy));

    Ok(Json(DataResponse {
        data: BrickCatalog { items, tree },
    }))
}
