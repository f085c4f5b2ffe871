//! Session authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stockroom_core::error::CoreError;
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;

use crate::auth::cookie::token_from_headers;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user, from the `token` cookie or an `Authorization: Bearer`
/// header. The cookie is tried first; an invalid cookie falls back to the
/// header.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<()>> {
///     let rooms = RoomRepo::list_with_cabinets(&state.pool, &auth.tenant()).await?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The phone number the session was issued for.
    pub phone: String,
}

impl AuthUser {
    /// Owner scope for repository calls made on this user's behalf.
    pub fn tenant(&self) -> Tenant {
        Tenant::authenticated(self.user_id)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let candidates: Vec<&str> = token_from_headers(&parts.headers)
            .into_iter()
            .chain(bearer)
            .collect();
        if candidates.is_empty() {
            return Err(AppError::Core(CoreError::Unauthorized("Not logged in".into())));
        }

        let claims = candidates
            .into_iter()
            .find_map(|token| validate_token(token, &state.config.jwt).ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            })?;

        Ok(AuthUser {
            user_id: claims.sub,
            phone: claims.phone,
        })
    }
}
