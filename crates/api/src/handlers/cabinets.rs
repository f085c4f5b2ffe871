//! Handlers for cabinets. All endpoints are scoped to the caller's tenant.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::inventory::validate_name;
use stockroom_core::types::DbId;
use stockroom_db::models::cabinet::{CabinetDeleteOutcome, CreateCabinet, UpdateCabinet};
use stockroom_db::repositories::CabinetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CabinetListParams {
    pub room_id: Option<DbId>,
}

/// GET /api/v1/cabinets?room_id=
///
/// Newest first, with room name and item count.
pub async fn list_cabinets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CabinetListParams>,
) -> AppResult<impl IntoResponse> {
    let cabinets = CabinetRepo::list(&state.pool, &auth.tenant(), params.room_id).await?;
    Ok(Json(DataResponse { data: cabinets }))
}

/// POST /api/v1/cabinets
pub async fn create_cabinet(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCabinet>,
) -> AppResult<impl IntoResponse> {
    let name = validate_name(&input.name, "name")?;
    let cabinet = CabinetRepo::create(&state.pool, &auth.tenant(), input.room_id, &name)
        .await?
        .ok_or(AppError::not_found("Room", input.room_id))?;

    tracing::info!(
        cabinet_id = cabinet.id,
        room_id = cabinet.room_id,
        user_id = auth.user_id,
        "Cabinet created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: cabinet })))
}

/// PUT /api/v1/cabinets/{id}
///
/// Rename and/or move to another room owned by the caller.
pub async fn update_cabinet(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(cabinet_id): Path<DbId>,
    Json(input): Json<UpdateCabinet>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    let input = UpdateCabinet {
        name: input
            .name
            .as_deref()
            .map(|n| validate_name(n, "name"))
            .transpose()?,
        room_id: input.room_id,
    };

    CabinetRepo::find_by_id(&state.pool, &tenant, cabinet_id)
        .await?
        .ok_or(AppError::not_found("Cabinet", cabinet_id))?;

    let cabinet = CabinetRepo::update(&state.pool, &tenant, cabinet_id, &input)
        .await?
        .ok_or_else(|| match input.room_id {
            Some(room_id) => AppError::not_found("Room", room_id),
            None => AppError::not_found("Cabinet", cabinet_id),
        })?;

    tracing::info!(cabinet_id, user_id = auth.user_id, "Cabinet updated");

    Ok(Json(DataResponse { data: cabinet }))
}

/// DELETE /api/v1/cabinets/{id}
pub async fn delete_cabinet(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(cabinet_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match CabinetRepo::delete(&state.pool, &auth.tenant(), cabinet_id).await? {
        CabinetDeleteOutcome::Deleted => {
            tracing::info!(cabinet_id, user_id = auth.user_id, "Cabinet deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        CabinetDeleteOutcome::NotFound => Err(AppError::not_found("Cabinet", cabinet_id)),
        CabinetDeleteOutcome::HasItems => Err(AppError::Core(CoreError::Conflict(
            "Cabinet still holds items".into(),
        ))),
    }
}
