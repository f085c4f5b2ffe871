use axum::routing::{get, put};
use axum::Router;

use crate::handlers::cabinets;
use crate::state::AppState;

/// Cabinet routes mounted at `/cabinets`.
///
/// ```text
/// GET    /?room_id=  -> list_cabinets
/// POST   /           -> create_cabinet
/// PUT    /{id}       -> update_cabinet
/// DELETE /{id}       -> delete_cabinet
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cabinets::list_cabinets).post(cabinets::create_cabinet),
        )
        .route(
            "/{id}",
            put(cabinets::update_cabinet).delete(cabinets::delete_cabinet),
        )
}
