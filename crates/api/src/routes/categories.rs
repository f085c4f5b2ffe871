//! Route definitions for the category taxonomy.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Taxonomy routes mounted at `/categories`.
///
/// ```text
/// GET    /segments                 -> list_segments
/// GET    /families?segment_id=     -> list_families
/// GET    /classes?family_id=       -> list_classes
/// GET    /bricks?class_id=         -> list_bricks
/// GET    /lookup?code=             -> lookup
/// POST   /smart                    -> smart_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/segments", get(categories::list_segments))
        .route("/families", get(categories::list_families))
        .route("/classes", get(categories::list_classes))
        .route("/bricks", get(categories::list_bricks))
        .route("/lookup", get(categories::lookup))
        .route("/smart", post(categories::smart_category))
}

/// Flat brick catalog mounted at `/bricks`.
///
/// ```text
/// GET    /                         -> list_bricks_with_paths
/// ```
pub fn bricks_router() -> Router<AppState> {
    Router::new().route("/", get(categories::list_bricks_with_paths))
}
