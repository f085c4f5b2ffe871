use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/logs
///
/// The caller's recent activity entries, newest first, plus system-wide ones.
pub async fn list_activity(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    let entries: Vec<_> = state
        .activity
        .recent()
        .into_iter()
        .filter(|entry| entry.is_visible_to(&tenant))
        .collect();
    Ok(Json(DataResponse { data: entries }))
}
