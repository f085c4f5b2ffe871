//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use sqlx::PgPool;
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;
use stockroom_db::models::item::{CreateItem, Item, StockInOutcome};
use stockroom_db::models::product::ProductAttrs;
use stockroom_db::repositories::{CabinetRepo, ItemRepo, ProductRepo, RoomRepo, UserRepo};

/// Ids of the small taxonomy inserted by [`seed_taxonomy`].
pub struct Taxonomy {
    pub segment_id: DbId,
    pub family_id: DbId,
    pub class_id: DbId,
    pub milk_brick_id: DbId,
    pub yogurt_brick_id: DbId,
}

/// Food > Dairy > Milk Products > {Fresh Milk (10000025), Yogurt (10000026)}
/// plus an unrelated Cleaning segment with no families.
pub async fn seed_taxonomy(pool: &PgPool) -> Taxonomy {
    let segment_id: DbId = sqlx::query_scalar(
        "INSERT INTO segments (code, name) VALUES ('50000000', 'Food') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO segments (code, name) VALUES ('47000000', 'Cleaning')")
        .execute(pool)
        .await
        .unwrap();
    let family_id: DbId = sqlx::query_scalar(
        "INSERT INTO families (code, name, segment_id) VALUES ('50200000', 'Dairy', $1) RETURNING id",
    )
    .bind(segment_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let class_id: DbId = sqlx::query_scalar(
        "INSERT INTO classes (code, name, family_id) VALUES ('50201700', 'Milk Products', $1) RETURNING id",
    )
    .bind(family_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let milk_brick_id: DbId = sqlx::query_scalar(
        "INSERT INTO bricks (code, name, definition, class_id)
         VALUES ('10000025', 'Fresh Milk', 'Liquid milk', $1) RETURNING id",
    )
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let yogurt_brick_id: DbId = sqlx::query_scalar(
        "INSERT INTO bricks (code, name, class_id) VALUES ('10000026', 'Yogurt', $1) RETURNING id",
    )
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap();

    Taxonomy {
        segment_id,
        family_id,
        class_id,
        milk_brick_id,
        yogurt_brick_id,
    }
}

pub async fn tenant(pool: &PgPool, phone: &str) -> Tenant {
    let user = UserRepo::find_or_create_by_phone(pool, phone).await.unwrap();
    Tenant::authenticated(user.id)
}

pub fn attrs(name: &str) -> ProductAttrs {
    ProductAttrs {
        name: name.to_string(),
        ..Default::default()
    }
}

/// A room named `room` holding one cabinet named `cabinet`; returns the cabinet id.
pub async fn location(pool: &PgPool, tenant: &Tenant, room: &str, cabinet: &str) -> DbId {
    let room = RoomRepo::create(pool, tenant, room).await.unwrap();
    CabinetRepo::create(pool, tenant, room.id, cabinet)
        .await
        .unwrap()
        .unwrap()
        .id
}

/// Upsert a product and stock one batch of it.
pub async fn stock(
    pool: &PgPool,
    tenant: &Tenant,
    barcode: &str,
    cabinet_id: DbId,
    brick_id: DbId,
    quantity: i32,
) -> Item {
    let product = ProductRepo::upsert(pool, tenant, barcode, &attrs("Milk"))
        .await
        .unwrap();
    ItemRepo::create(
        pool,
        tenant,
        &CreateItem {
            product_id: product.id,
            brick_id,
            cabinet_id,
            quantity,
            unit: "个".to_string(),
            expiration_date: None,
            note: None,
        },
    )
    .await
    .map(created)
    .unwrap()
}

/// Unwrap a stock-in that is expected to succeed.
pub fn created(outcome: StockInOutcome) -> Item {
    match outcome {
        StockInOutcome::Created(item) => item,
        other => panic!("expected a created batch, got {other:?}"),
    }
}
