//! Read-only queries over the four taxonomy tables.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::category::{Brick, BrickPathRow, Class, Family, Segment};

const BRICK_COLUMNS: &str = "id, code, name, definition, class_id";

/// Brick joined through class and family to its segment.
const BRICK_PATH_SELECT: &str = "SELECT
        b.id AS brick_id, b.code AS brick_code, b.name AS brick_name,
        b.definition AS brick_definition,
        c.id AS class_id, c.code AS class_code, c.name AS class_name,
        f.id AS family_id, f.code AS family_code, f.name AS family_name,
        s.id AS segment_id, s.code AS segment_code, s.name AS segment_name
     FROM bricks b
     JOIN classes c ON c.id = b.class_id
     JOIN families f ON f.id = c.family_id
     JOIN segments s ON s.id = f.segment_id";

/// Provides lookups over segments, families, classes and bricks.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn list_segments(pool: &PgPool) -> Result<Vec<Segment>, sqlx::Error> {
        sqlx::query_as::<_, Segment>("SELECT id, code, name FROM segments ORDER BY code")
            .fetch_all(pool)
            .await
    }

    pub async fn list_families(
        pool: &PgPool,
        segment_id: DbId,
    ) -> Result<Vec<Family>, sqlx::Error> {
        sqlx::query_as::<_, Family>(
            "SELECT id, code, name, segment_id FROM families WHERE segment_id = $1 ORDER BY code",
        )
        .bind(segment_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_classes(pool: &PgPool, family_id: DbId) -> Result<Vec<Class>, sqlx::Error> {
        sqlx::query_as::<_, Class>(
            "SELECT id, code, name, family_id FROM classes WHERE family_id = $1 ORDER BY code",
        )
        .bind(family_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_bricks(pool: &PgPool, class_id: DbId) -> Result<Vec<Brick>, sqlx::Error> {
        let query =
            format!("SELECT {BRICK_COLUMNS} FROM bricks WHERE class_id = $1 ORDER BY code");
        sqlx::query_as::<_, Brick>(&query)
            .bind(class_id)
            .fetch_all(pool)
            .await
    }

    /// Find a brick by its internal ID.
    pub async fn find_brick(pool: &PgPool, id: DbId) -> Result<Option<Brick>, sqlx::Error> {
        let query = format!("SELECT {BRICK_COLUMNS} FROM bricks WHERE id = $1");
        sqlx::query_as::<_, Brick>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_brick_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Brick>, sqlx::Error> {
        let query = format!("SELECT {BRICK_COLUMNS} FROM bricks WHERE code = $1");
        sqlx::query_as::<_, Brick>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// The brick with the lowest code, used when nothing better is known.
    pub async fn first_brick(pool: &PgPool) -> Result<Option<Brick>, sqlx::Error> {
        let query = format!("SELECT {BRICK_COLUMNS} FROM bricks ORDER BY code LIMIT 1");
        sqlx::query_as::<_, Brick>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a brick code to the brick and its three ancestors.
    pub async fn find_path_by_brick_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<BrickPathRow>, sqlx::Error> {
        let query = format!("{BRICK_PATH_SELECT} WHERE b.code = $1");
        sqlx::query_as::<_, BrickPathRow>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Every brick with its ancestor chain, ordered by brick code.
    pub async fn list_brick_paths(pool: &PgPool) -> Result<Vec<BrickPathRow>, sqlx::Error> {
        let query = format!("{BRICK_PATH_SELECT} ORDER BY b.code");
        sqlx::query_as::<_, BrickPathRow>(&query)
            .fetch_all(pool)
            .await
    }
}
