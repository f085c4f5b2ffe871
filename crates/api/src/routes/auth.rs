//! Route definitions for phone login.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes mounted at `/auth`.
///
/// ```text
/// POST   /send-code          -> send_code (public)
/// POST   /verify             -> verify (public, sets session cookie)
/// POST   /logout             -> logout (clears session cookie)
/// GET    /me                 -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(auth::send_code))
        .route("/verify", post(auth::verify))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}
