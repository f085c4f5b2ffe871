//! HTTP-level tests for rooms and cabinets, including tenant isolation.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_location, create_product, delete_auth, get_auth, login, post_json_auth,
    put_json_auth, seed_taxonomy,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn rooms_are_listed_with_nested_cabinets(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    let (room_id, _) = create_location(&app, &token, "Kitchen", "Pantry").await;
    create_location(&app, &token, "Bathroom", "Shelf").await;

    let json = body_json(get_auth(app, "/api/v1/rooms", &token).await).await;
    let rooms = json["data"].as_array().unwrap();
    let names: Vec<_> = rooms.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Bathroom", "Kitchen"]);

    let kitchen = rooms.iter().find(|r| r["id"] == room_id).unwrap();
    assert_eq!(kitchen["cabinets"][0]["name"], "Pantry");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_room_name_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;

    let response = post_json_auth(app, "/api/v1/rooms", &token, json!({ "name": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "name must not be empty");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn room_rename_trims_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    let (room_id, _) = create_location(&app, &token, "Kitchen", "Pantry").await;

    let response = put_json_auth(
        app,
        &format!("/api/v1/rooms/{room_id}"),
        &token,
        json!({ "name": "  Larder " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Larder");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cabinet_list_filters_by_room_and_counts_items(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    let (kitchen, pantry) = create_location(&app, &token, "Kitchen", "Pantry").await;
    create_location(&app, &token, "Garage", "Rack").await;
    let product_id = create_product(&app, &token, "123", "Milk").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/items",
        &token,
        json!({
            "product_id": product_id,
            "brick_id": taxonomy.milk_brick_id,
            "cabinet_id": pantry,
            "quantity": 2,
            "unit": "个",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get_auth(app, &format!("/api/v1/cabinets?room_id={kitchen}"), &token).await).await;
    let cabinets = json["data"].as_array().unwrap();
    assert_eq!(cabinets.len(), 1);
    assert_eq!(cabinets[0]["room_name"], "Kitchen");
    assert_eq!(cabinets[0]["item_count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cabinet_with_items_cannot_be_deleted(pool: PgPool) {
    let taxonomy = seed_taxonomy(&pool).await;
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    let (room_id, cabinet_id) = create_location(&app, &token, "Kitchen", "Pantry").await;
    let product_id = create_product(&app, &token, "123", "Milk").await;
    post_json_auth(
        app.clone(),
        "/api/v1/items",
        &token,
        json!({
            "product_id": product_id,
            "brick_id": taxonomy.milk_brick_id,
            "cabinet_id": cabinet_id,
            "quantity": 1,
            "unit": "个",
        }),
    )
    .await;

    let response = delete_auth(app.clone(), &format!("/api/v1/cabinets/{cabinet_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_auth(app.clone(), &format!("/api/v1/rooms/{room_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(get_auth(app, "/api/v1/cabinets", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_empty_room_removes_its_cabinets(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = login(&app, "13800138000").await;
    let (room_id, _) = create_location(&app, &token, "Kitchen", "Pantry").await;

    let response = delete_auth(app.clone(), &format!("/api/v1/rooms/{room_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get_auth(app, "/api/v1/cabinets", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cabinet_can_move_between_own_rooms_only(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = login(&app, "13800138000").await;
    let bob = login(&app, "13900139000").await;
    let (_, cabinet_id) = create_location(&app, &alice, "Kitchen", "Pantry").await;
    let (alice_garage, _) = create_location(&app, &alice, "Garage", "Rack").await;
    let (bob_room, _) = create_location(&app, &bob, "Study", "Desk").await;

    let uri = format!("/api/v1/cabinets/{cabinet_id}");
    let response = put_json_auth(app.clone(), &uri, &alice, json!({ "room_id": alice_garage })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["room_id"], alice_garage);

    let response = put_json_auth(app, &uri, &alice, json!({ "room_id": bob_room })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"].as_str().unwrap().contains("Room"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tenants_cannot_see_or_touch_each_others_locations(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = login(&app, "13800138000").await;
    let bob = login(&app, "13900139000").await;
    let (room_id, cabinet_id) = create_location(&app, &alice, "Kitchen", "Pantry").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/rooms", &bob).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let response = post_json_auth(
        app.clone(),
        "/api/v1/cabinets",
        &bob,
        json!({ "name": "Intruder", "room_id": room_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("/api/v1/cabinets/{cabinet_id}"), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(
        app,
        &format!("/api/v1/rooms/{room_id}"),
        &bob,
        json!({ "name": "Mine" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
