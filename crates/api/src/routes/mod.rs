pub mod auth;
pub mod cabinets;
pub mod categories;
pub mod health;
pub mod items;
pub mod media;
pub mod products;
pub mod rooms;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/send-code                                  issue SMS code (public)
/// /auth/verify                                     log in (public)
/// /auth/logout                                     clear session
/// /auth/me                                         current user
///
/// /categories/segments                             list segments
/// /categories/families?segment_id=                 list families
/// /categories/classes?family_id=                   list classes
/// /categories/bricks?class_id=                     list bricks
/// /categories/lookup?code=                         brick + ancestors by code
/// /categories/smart                                classify a product name (POST)
/// /bricks                                          all bricks with paths + tree
///
/// /rooms                                           list, create
/// /rooms/{id}                                      rename, delete
/// /cabinets                                        list (?room_id=), create
/// /cabinets/{id}                                   update, delete
///
/// /products                                        list, upsert
/// /products/{id}                                   get
///
/// /items                                           list (?product_id=), stock-in
/// /items/out                                       stock-out (POST)
/// /items/lookup                                    barcode / image URL lookup
/// /items/expiring                                  expiring soon
/// /items/{id}                                      get, update, delete
/// /items/{id}/logs                                 movement history
///
/// /uploads                                         product photo (multipart)
/// /recognition/expiration                          shelf life from a label
/// /recognition/production-date                     production date from a label
/// /search/image                                    similar products by photo
/// /images/sign                                     signed URL for a stored key
/// /logs                                            recent activity
/// ```
///
/// Everything except `send-code`, `verify` and `logout` requires a session.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Phone login and session cookie.
        .nest("/auth", auth::router())
        // Read-only taxonomy.
        .nest("/categories", categories::router())
        .nest("/bricks", categories::bricks_router())
        // Locations.
        .nest("/rooms", rooms::router())
        .nest("/cabinets", cabinets::router())
        // Catalog and stock.
        .nest("/products", products::router())
        .nest("/items", items::router())
        // Photos, recognition and the activity feed.
        .merge(media::router())
}
