//! HTTP-level tests for barcode / image URL product lookup.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_location, create_product, get_auth, login, post_json_auth, seed_taxonomy,
    DIRECTORY_BARCODE, FAILING_BARCODE,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn local_product_returns_last_item_defaults(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    let (_, pantry) = create_location(&app, &token, "Kitchen", "Pantry").await;
    let product_id = create_product(&app, &token, "123", "Milk").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/items/lookup?barcode=123", &token).await).await;
    assert_eq!(json["data"]["found"], true);
    assert_eq!(json["data"]["source"], "local");
    assert!(json["data"].get("last_item").is_none());

    post_json_auth(
        app.clone(),
        "/api/v1/items",
        &token,
        json!({
            "product_id": product_id,
            "brick_id": taxonomy.yogurt_brick_id,
            "cabinet_id": pantry,
            "quantity": 1,
            "unit": "瓶",
        }),
    )
    .await;

    let json = body_json(get_auth(app, "/api/v1/items/lookup?barcode=123", &token).await).await;
    let last = &json["data"]["last_item"];
    assert_eq!(last["unit"], "瓶");
    assert_eq!(last["cabinet_id"], pantry);
    assert_eq!(last["brick_id"], taxonomy.yogurt_brick_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn directory_hit_creates_product_with_defaults(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let uri = format!("/api/v1/items/lookup?barcode={DIRECTORY_BARCODE}");
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    let data = &json["data"];
    assert_eq!(data["found"], true);
    assert_eq!(data["source"], "directory");
    assert_eq!(data["product"]["name"], "Whole Milk 250ml");
    assert_eq!(data["product"]["price"], 59.9);
    assert_eq!(data["last_item"]["brick_id"], taxonomy.milk_brick_id);
    assert_eq!(data["last_item"]["unit"], "ml");

    // No location existed, so a default room and cabinet were created.
    let rooms = body_json(get_auth(app.clone(), "/api/v1/rooms", &token).await).await;
    assert_eq!(rooms["data"][0]["name"], "Default room");
    assert_eq!(
        rooms["data"][0]["cabinets"][0]["id"],
        data["last_item"]["cabinet_id"]
    );

    // The second lookup is served from the local catalog.
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["source"], "local");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn directory_uses_existing_cabinet(pool: PgPool) {
    seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    let (_, pantry) = create_location(&app, &token, "Kitchen", "Pantry").await;

    let uri = format!("/api/v1/items/lookup?barcode={DIRECTORY_BARCODE}");
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["last_item"]["cabinet_id"], pantry);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_barcode_is_not_found(pool: PgPool) {
    seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let response = get_auth(app, "/api/v1/items/lookup?barcode=000111", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["found"], false);
    assert!(json["data"].get("product").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn directory_failure_is_an_upstream_error(pool: PgPool) {
    seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let uri = format!("/api/v1/items/lookup?barcode={FAILING_BARCODE}");
    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");

    let json = body_json(get_auth(app, "/api/v1/logs", &token).await).await;
    let entry = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["source"] == "barcode")
        .cloned()
        .unwrap();
    assert_eq!(entry["level"], "error");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lookup_by_image_url(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    post_json_auth(
        app.clone(),
        "/api/v1/products",
        &token,
        json!({ "barcode": "123", "name": "Milk", "image_url": "https://bucket.test/products/a.png" }),
    )
    .await;

    let uri = "/api/v1/items/lookup?image_url=https://bucket.test/products/a.png";
    let json = body_json(get_auth(app.clone(), uri, &token).await).await;
    assert_eq!(json["data"]["found"], true);
    assert_eq!(json["data"]["product"]["barcode"], "123");

    let uri = "/api/v1/items/lookup?image_url=https://bucket.test/products/none.png";
    let json = body_json(get_auth(app.clone(), uri, &token).await).await;
    assert_eq!(json["data"]["found"], false);

    let response = get_auth(app, "/api/v1/items/lookup", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lookup_is_scoped_to_tenant(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = login(&app, "13800138000").await;
    let bob = login(&app, "13900139000").await;
    create_product(&app, &alice, "123", "Milk").await;

    let json = body_json(get_auth(app, "/api/v1/items/lookup?barcode=123", &bob).await).await;
    assert_eq!(json["data"]["found"], false);
}
