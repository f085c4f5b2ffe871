//! Route definitions for photo uploads, recognition, image search and the
//! activity feed. Mounted directly under `/api/v1`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{activity, media};
use crate::state::AppState;

/// ```text
/// POST   /uploads                         -> upload_product_image
/// POST   /recognition/expiration          -> recognize_expiration
/// POST   /recognition/production-date     -> recognize_production_date
/// POST   /search/image                    -> search_by_image
/// GET    /images/sign?key=                -> sign_image
/// GET    /logs                            -> list_activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/uploads", post(media::upload_product_image))
        .route("/recognition/expiration", post(media::recognize_expiration))
        .route(
            "/recognition/production-date",
            post(media::recognize_production_date),
        )
        .route("/search/image", post(media::search_by_image))
        .route("/images/sign", get(media::sign_image))
        .route("/logs", get(activity::list_activity))
}
