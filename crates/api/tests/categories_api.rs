//! HTTP-level tests for the category taxonomy endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, login, post_json_auth, seed_taxonomy};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn levels_are_filtered_by_parent(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/categories/segments", &token).await).await;
    assert_eq!(json["data"][0]["code"], "50000000");

    let uri = format!("/api/v1/categories/families?segment_id={}", taxonomy.segment_id);
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["data"][0]["name"], "Dairy");

    let uri = format!("/api/v1/categories/bricks?class_id={}", taxonomy.class_id);
    let json = body_json(get_auth(app.clone(), &uri, &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let uri = format!("/api/v1/categories/classes?family_id={}", taxonomy.family_id + 1000);
    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_parent_param_is_named(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let response = get_auth(app, "/api/v1/categories/families", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "segment_id is required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn lookup_by_code_resolves_ancestors(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let response = get_auth(app.clone(), "/api/v1/categories/lookup?code=10000025", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["brick"]["id"], taxonomy.milk_brick_id);
    assert_eq!(data["brick"]["definition"], "Liquid milk");
    assert_eq!(data["class"]["id"], taxonomy.class_id);
    assert_eq!(data["family"]["id"], taxonomy.family_id);
    assert_eq!(data["segment"]["name"], "Food");
    assert_eq!(data["full_path"], "Food > Dairy > Milk Products > Fresh Milk");

    let response = get_auth(app, "/api/v1/categories/lookup?code=99999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn brick_catalog_has_paths_and_tree(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let json = body_json(get_auth(app, "/api/v1/bricks", &token).await).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["code"], "10000025");
    assert_eq!(items[0]["full_path"], "Food > Dairy > Milk Products > Fresh Milk");
    assert_eq!(items[0]["hierarchy"]["class"]["id"], taxonomy.class_id);

    let segment = &json["data"]["tree"][taxonomy.segment_id.to_string()];
    assert_eq!(segment["level"], 1);
    let family = &segment["children"][taxonomy.family_id.to_string()];
    assert_eq!(family["parent_id"], taxonomy.segment_id);
    let class = &family["children"][taxonomy.class_id.to_string()];
    assert_eq!(class["level"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn smart_category_resolves_recognized_code(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories/smart",
        &token,
        json!({ "product_name": "Whole Milk" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["brick"]["id"], taxonomy.milk_brick_id);

    let response = post_json_auth(
        app,
        "/api/v1/categories/smart",
        &token,
        json!({ "product_name": "Mystery box" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("no matching category"));
}
