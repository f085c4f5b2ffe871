//! Integration tests for the read-only taxonomy queries.

mod common;

use sqlx::PgPool;
use stockroom_core::category::build_tree;
use stockroom_db::repositories::CategoryRepo;

#[sqlx::test(migrations = "./migrations")]
async fn test_levels_filter_by_parent(pool: PgPool) {
    let tax = common::seed_taxonomy(&pool).await;

    let segments = CategoryRepo::list_segments(&pool).await.unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].code, "47000000"); // ordered by code

    let families = CategoryRepo::list_families(&pool, tax.segment_id).await.unwrap();
    assert_eq!(families.len(), 1);
    assert_eq!(families[0].name, "Dairy");

    let classes = CategoryRepo::list_classes(&pool, tax.family_id).await.unwrap();
    assert_eq!(classes.len(), 1);

    let bricks = CategoryRepo::list_bricks(&pool, tax.class_id).await.unwrap();
    let codes: Vec<_> = bricks.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes, ["10000025", "10000026"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_without_children_returns_empty(pool: PgPool) {
    common::seed_taxonomy(&pool).await;
    let cleaning = CategoryRepo::list_segments(&pool).await.unwrap()[0].id;

    assert!(CategoryRepo::list_families(&pool, cleaning).await.unwrap().is_empty());
    assert!(CategoryRepo::list_classes(&pool, 999_999).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lookup_by_brick_code_round_trip(pool: PgPool) {
    let tax = common::seed_taxonomy(&pool).await;

    let row = CategoryRepo::find_path_by_brick_code(&pool, "10000025")
        .await
        .unwrap()
        .expect("brick should resolve");
    let path = row.path();

    assert_eq!(path.brick.id, tax.milk_brick_id);
    assert_eq!(path.class.id, tax.class_id);
    assert_eq!(path.family.id, tax.family_id);
    assert_eq!(path.segment.id, tax.segment_id);
    assert_eq!(path.full_path(), "Food > Dairy > Milk Products > Fresh Milk");
    assert_eq!(row.brick().definition.as_deref(), Some("Liquid milk"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lookup_unknown_code_is_none(pool: PgPool) {
    common::seed_taxonomy(&pool).await;
    assert!(CategoryRepo::find_path_by_brick_code(&pool, "00000000")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_brick_paths_build_tree(pool: PgPool) {
    let tax = common::seed_taxonomy(&pool).await;

    let rows = CategoryRepo::list_brick_paths(&pool).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].brick_code, "10000025");

    let paths: Vec<_> = rows.iter().map(|r| r.path()).collect();
    let tree = build_tree(&paths);
    assert_eq!(tree.len(), 1);
    let class = &tree[&tax.segment_id].children[&tax.family_id].children[&tax.class_id];
    assert_eq!(class.parent_id, Some(tax.family_id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_first_brick_is_lowest_code(pool: PgPool) {
    let tax = common::seed_taxonomy(&pool).await;
    let first = CategoryRepo::first_brick(&pool).await.unwrap().unwrap();
    assert_eq!(first.id, tax.milk_brick_id);

    let by_code = CategoryRepo::find_brick_by_code(&pool, "10000026").await.unwrap().unwrap();
    assert_eq!(by_code.id, tax.yogurt_brick_id);
}
