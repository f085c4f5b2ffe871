//! Handlers for rooms. All endpoints are scoped to the caller's tenant.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::inventory::validate_name;
use stockroom_core::types::DbId;
use stockroom_db::models::room::{RoomDeleteOutcome, RoomInput};
use stockroom_db::repositories::RoomRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/rooms
///
/// Rooms by name, each with its cabinets nested.
pub async fn list_rooms(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rooms = RoomRepo::list_with_cabinets(&state.pool, &auth.tenant()).await?;
    Ok(Json(DataResponse { data: rooms }))
}

/// POST /api/v1/rooms
pub async fn create_room(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RoomInput>,
) -> AppResult<impl IntoResponse> {
    let name = validate_name(&input.name, "name")?;
    let room = RoomRepo::create(&state.pool, &auth.tenant(), &name).await?;

    tracing::info!(room_id = room.id, user_id = auth.user_id, "Room created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: room })))
}

/// PUT /api/v1/rooms/{id}
pub async fn update_room(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
    Json(input): Json<RoomInput>,
) -> AppResult<impl IntoResponse> {
    let name = validate_name(&input.name, "name")?;
    let room = RoomRepo::rename(&state.pool, &auth.tenant(), room_id, &name)
        .await?
        .ok_or(AppError::not_found("Room", room_id))?;

    tracing::info!(room_id, user_id = auth.user_id, "Room renamed");

    Ok(Json(DataResponse { data: room }))
}

/// DELETE /api/v1/rooms/{id}
///
/// Deletes the room and its (empty) cabinets in one transaction.
pub async fn delete_room(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(room_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match RoomRepo::delete(&state.pool, &auth.tenant(), room_id).await? {
        RoomDeleteOutcome::Deleted => {
            tracing::info!(room_id, user_id = auth.user_id, "Room deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        RoomDeleteOutcome::NotFound => Err(AppError::not_found("Room", room_id)),
        RoomDeleteOutcome::HasItems => Err(AppError::Core(CoreError::Conflict(
            "Room still has items in its cabinets".into(),
        ))),
    }
}
