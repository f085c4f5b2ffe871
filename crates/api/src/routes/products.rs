use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Product routes mounted at `/products`.
///
/// ```text
/// GET    /          -> list_products
/// POST   /          -> upsert_product
/// GET    /{id}      -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::upsert_product),
        )
        .route("/{id}", get(products::get_product))
}
