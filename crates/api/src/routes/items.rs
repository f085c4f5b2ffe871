//! Route definitions for item batches.
//!
//! Static segments (`/out`, `/lookup`, `/expiring`) are matched before
//! `/{id}` by the router, so they never parse as ids.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{items, lookup};
use crate::state::AppState;

/// Item routes mounted at `/items`.
///
/// ```text
/// GET    /?product_id=              -> list_items
/// POST   /                          -> create_item (stock-in)
/// POST   /out                       -> stock_out
/// GET    /lookup?barcode=|image_url= -> lookup_product
/// GET    /expiring?window_days=     -> list_expiring
/// GET    /{id}                      -> get_item
/// PUT    /{id}                      -> update_item
/// DELETE /{id}                      -> delete_item
/// GET    /{id}/logs                 -> list_item_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items).post(items::create_item))
        .route("/out", post(items::stock_out))
        .route("/lookup", get(lookup::lookup_product))
        .route("/expiring", get(items::list_expiring))
        .route(
            "/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/{id}/logs", get(items::list_item_logs))
}
