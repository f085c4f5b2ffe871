//! Repository for the `items` table: stock-in, stock-out and listings.

use sqlx::PgPool;
use stockroom_core::expiration::ExpirationWindow;
use stockroom_core::inventory::MovementType;
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;

use crate::models::item::{
    CreateItem, Item, ItemListing, StockInOutcome, StockOutOutcome, UpdateItem,
};
use crate::repositories::InventoryLogRepo;

const COLUMNS: &str = "id, product_id, brick_id, cabinet_id, owner_id, quantity, unit, \
     expiration_date, note, created_at, updated_at";

/// Item joined with product, cabinet, room and brick names.
const LISTING_SELECT: &str = "SELECT
        i.id, i.product_id, i.brick_id, i.cabinet_id, i.quantity, i.unit,
        i.expiration_date, i.note, i.created_at, i.updated_at,
        p.name AS product_name, p.barcode AS product_barcode,
        p.brand AS product_brand, p.image_url AS product_image_url,
        c.name AS cabinet_name, r.id AS room_id, r.name AS room_name,
        b.name AS brick_name
     FROM items i
     JOIN products p ON p.id = i.product_id
     JOIN cabinets c ON c.id = i.cabinet_id
     JOIN rooms r ON r.id = c.room_id
     JOIN bricks b ON b.id = i.brick_id";

/// Provides tenant-scoped item operations. Every quantity change writes an
/// inventory log row in the same transaction.
pub struct ItemRepo;

impl ItemRepo {
    /// Stock-in: create a new batch and its `IN` log row.
    ///
    /// Writes nothing when the product or cabinet is not owned by the
    /// tenant, and reports which one. A missing brick surfaces as a
    /// foreign-key error.
    pub async fn create(
        pool: &PgPool,
        tenant: &Tenant,
        input: &CreateItem,
    ) -> Result<StockInOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO items
                (product_id, brick_id, cabinet_id, owner_id, quantity, unit, expiration_date, note)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8
             WHERE EXISTS (SELECT 1 FROM products WHERE id = $1 AND owner_id = $4)
               AND EXISTS (SELECT 1 FROM cabinets WHERE id = $3 AND owner_id = $4)
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(input.product_id)
            .bind(input.brick_id)
            .bind(input.cabinet_id)
            .bind(tenant.user_id())
            .bind(input.quantity)
            .bind(&input.unit)
            .bind(input.expiration_date)
            .bind(&input.note)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(item) = item else {
            let product_owned: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM products WHERE id = $1 AND owner_id = $2)",
            )
            .bind(input.product_id)
            .bind(tenant.user_id())
            .fetch_one(&mut *tx)
            .await?;
            return Ok(if product_owned {
                StockInOutcome::CabinetNotFound
            } else {
                StockInOutcome::ProductNotFound
            });
        };

        InventoryLogRepo::record_in_tx(&mut tx, tenant, item.id, MovementType::In, item.quantity)
            .await?;

        tx.commit().await?;
        Ok(StockInOutcome::Created(item))
    }

    /// Stock-out: decrement `quantity` by `amount` and write an `OUT` log.
    ///
    /// The decrement is conditional on enough stock, so concurrent
    /// stock-outs can never drive the quantity negative. When nothing is
    /// updated the row is re-read to tell a missing item from a short one,
    /// and the transaction is rolled back.
    pub async fn stock_out(
        pool: &PgPool,
        tenant: &Tenant,
        item_id: DbId,
        amount: i32,
    ) -> Result<StockOutOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE items SET quantity = quantity - $3, updated_at = NOW()
             WHERE id = $1 AND owner_id = $2 AND quantity >= $3
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Item>(&query)
            .bind(item_id)
            .bind(tenant.user_id())
            .bind(amount)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(item) = updated else {
            let available: Option<i32> =
                sqlx::query_scalar("SELECT quantity FROM items WHERE id = $1 AND owner_id = $2")
                    .bind(item_id)
                    .bind(tenant.user_id())
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Ok(match available {
                Some(available) => StockOutOutcome::Insufficient { available },
                None => StockOutOutcome::NotFound,
            });
        };

        InventoryLogRepo::record_in_tx(&mut tx, tenant, item.id, MovementType::Out, amount).await?;

        tx.commit().await?;
        Ok(StockOutOutcome::Applied(item))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    /// One item with the names shown on its detail view.
    pub async fn find_listing(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
    ) -> Result<Option<ItemListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} WHERE i.id = $1 AND i.owner_id = $2");
        sqlx::query_as::<_, ItemListing>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    /// Items newest first. With `product_id`, only that product's batches
    /// that still hold stock.
    pub async fn list(
        pool: &PgPool,
        tenant: &Tenant,
        product_id: Option<DbId>,
    ) -> Result<Vec<ItemListing>, sqlx::Error> {
        let query = format!(
            "{LISTING_SELECT}
             WHERE i.owner_id = $1
               AND ($2::BIGINT IS NULL OR (i.product_id = $2 AND i.quantity > 0))
             ORDER BY i.created_at DESC, i.id DESC"
        );
        sqlx::query_as::<_, ItemListing>(&query)
            .bind(tenant.user_id())
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// The most recently created batch of a product.
    pub async fn latest_for_product(
        pool: &PgPool,
        tenant: &Tenant,
        product_id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE product_id = $1 AND owner_id = $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(product_id)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    /// Items whose expiration falls inside `window`, soonest first. Items
    /// without an expiration date never match.
    pub async fn list_expiring(
        pool: &PgPool,
        tenant: &Tenant,
        window: &ExpirationWindow,
    ) -> Result<Vec<ItemListing>, sqlx::Error> {
        let query = format!(
            "{LISTING_SELECT}
             WHERE i.owner_id = $1
               AND i.expiration_date IS NOT NULL
               AND i.expiration_date >= $2
               AND i.expiration_date <= $3
             ORDER BY i.expiration_date ASC, i.id ASC"
        );
        sqlx::query_as::<_, ItemListing>(&query)
            .bind(tenant.user_id())
            .bind(window.from)
            .bind(window.until)
            .fetch_all(pool)
            .await
    }

    /// Correct an item. Only non-`None` fields are applied; a new cabinet
    /// must belong to the tenant.
    ///
    /// Returns `None` if the item or the target cabinet is not the tenant's.
    pub async fn update(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                quantity = COALESCE($3, quantity),
                unit = COALESCE($4, unit),
                cabinet_id = COALESCE($5, cabinet_id),
                brick_id = COALESCE($6, brick_id),
                expiration_date = CASE WHEN $8 THEN NULL
                                       ELSE COALESCE($7, expiration_date) END,
                note = COALESCE($9, note),
                updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
               AND ($5::BIGINT IS NULL
                    OR EXISTS (SELECT 1 FROM cabinets WHERE id = $5 AND owner_id = $2))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .bind(input.quantity)
            .bind(&input.unit)
            .bind(input.cabinet_id)
            .bind(input.brick_id)
            .bind(input.expiration_date)
            .bind(input.clear_expiration_date)
            .bind(&input.note)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Its log rows remain with a null `item_id`.
    pub async fn delete(pool: &PgPool, tenant: &Tenant, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(tenant.user_id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
