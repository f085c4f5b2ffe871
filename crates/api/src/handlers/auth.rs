//! Handlers for the `/auth` resource (SMS code login, logout, current user).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::auth::{
    generate_code, hash_code, mask_phone, validate_code, validate_phone, CODE_TTL_MINS,
    MAX_CODE_ATTEMPTS,
};
use stockroom_core::error::CoreError;
use stockroom_db::models::user::User;
use stockroom_db::repositories::{UserRepo, VerificationCodeRepo};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/send-code`.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    /// Seconds until the code expires.
    pub expires_in: i64,
    /// The issued code, only when `SMS_TEST_MODE` is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Also set as the `token` cookie; returned for non-browser clients.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/send-code
///
/// Issue a fresh verification code for the phone, replacing any previous one.
pub async fn send_code(
    State(state): State<AppState>,
    Json(input): Json<SendCodeRequest>,
) -> AppResult<impl IntoResponse> {
    let phone = validate_phone(&input.phone)?;
    let now = Utc::now();

    let purged = VerificationCodeRepo::purge_expired(&state.pool, now).await?;
    if purged > 0 {
        tracing::debug!(purged, "Purged expired verification codes");
    }

    let code = generate_code();
    VerificationCodeRepo::replace(
        &state.pool,
        &phone,
        &hash_code(&phone, &code),
        now + Duration::minutes(CODE_TTL_MINS),
    )
    .await?;

    state.cloud.sms.send_code(&phone, &code).await?;
    tracing::info!(phone = %mask_phone(&phone), "Verification code sent");

    Ok(Json(DataResponse {
        data: SendCodeResponse {
            expires_in: CODE_TTL_MINS * 60,
            code: state.config.sms_test_mode.then_some(code),
        },
    }))
}

/// POST /api/v1/auth/verify
///
/// Consume a verification code, creating the user on first login, and set
/// the session cookie.
pub async fn verify(
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<impl IntoResponse> {
    let phone = validate_phone(&input.phone)?;
    let code = validate_code(&input.code)?;

    let consumed =
        VerificationCodeRepo::consume(&state.pool, &phone, &hash_code(&phone, &code), Utc::now())
            .await?;
    if consumed.is_none() {
        let burned =
            VerificationCodeRepo::record_failure(&state.pool, &phone, MAX_CODE_ATTEMPTS).await?;
        if burned {
            tracing::warn!(
                phone = %mask_phone(&phone),
                "Verification code invalidated after repeated failures"
            );
        }
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid or expired verification code".into(),
        )));
    }

    let user = UserRepo::find_or_create_by_phone(&state.pool, &phone).await?;
    let jwt = &state.config.jwt;
    let token = generate_access_token(user.id, &user.phone, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token, jwt))]),
        Json(DataResponse {
            data: SessionResponse {
                token,
                expires_in: jwt.expiry_secs(),
                user,
            },
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Expire the session cookie. Tokens are stateless, so this always succeeds.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, clear_session_cookie(&state.config.jwt))]),
    )
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(DataResponse { data: user }))
}
