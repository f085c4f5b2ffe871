//! Repository for the `products` table.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use stockroom_core::tenant::Tenant;
use stockroom_core::types::DbId;

use crate::models::product::{Product, ProductAttrs};

const COLUMNS: &str = "id, barcode, name, english_name, brand, manufacturer, specification, \
     width, height, depth, gross_weight, net_weight, origin_country, goods_type, \
     category_code, category_name, price, image_url, first_ship_date, packaging_type, \
     shelf_life, min_sales_unit, certification_standard, certificate_license, note, \
     owner_id, created_at, updated_at";

const INSERT: &str = "INSERT INTO products (
        barcode, name, english_name, brand, manufacturer, specification,
        width, height, depth, gross_weight, net_weight, origin_country, goods_type,
        category_code, category_name, price, image_url, first_ship_date, packaging_type,
        shelf_life, min_sales_unit, certification_standard, certificate_license, note,
        owner_id)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
             $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)";

type ProductQuery<'q> = QueryAs<'q, Postgres, Product, PgArguments>;

/// Bind `$1..=$25` of [`INSERT`].
fn bind_product<'q>(
    query: ProductQuery<'q>,
    tenant: &Tenant,
    barcode: &'q str,
    attrs: &'q ProductAttrs,
) -> ProductQuery<'q> {
    query
        .bind(barcode)
        .bind(&attrs.name)
        .bind(&attrs.english_name)
        .bind(&attrs.brand)
        .bind(&attrs.manufacturer)
        .bind(&attrs.specification)
        .bind(&attrs.width)
        .bind(&attrs.height)
        .bind(&attrs.depth)
        .bind(&attrs.gross_weight)
        .bind(&attrs.net_weight)
        .bind(&attrs.origin_country)
        .bind(&attrs.goods_type)
        .bind(&attrs.category_code)
        .bind(&attrs.category_name)
        .bind(attrs.price)
        .bind(&attrs.image_url)
        .bind(&attrs.first_ship_date)
        .bind(&attrs.packaging_type)
        .bind(&attrs.shelf_life)
        .bind(&attrs.min_sales_unit)
        .bind(&attrs.certification_standard)
        .bind(&attrs.certificate_license)
        .bind(&attrs.note)
        .bind(tenant.user_id())
}

/// Provides the tenant-scoped catalog: upsert by barcode and lookups.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product or, when the tenant already has one with `barcode`,
    /// replace its attributes. One statement; concurrent upserts of the same
    /// barcode converge on a single row.
    pub async fn upsert(
        pool: &PgPool,
        tenant: &Tenant,
        barcode: &str,
        attrs: &ProductAttrs,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "{INSERT}
             ON CONFLICT ON CONSTRAINT uq_products_owner_barcode DO UPDATE SET
                name = EXCLUDED.name,
                english_name = EXCLUDED.english_name,
                brand = EXCLUDED.brand,
                manufacturer = EXCLUDED.manufacturer,
                specification = EXCLUDED.specification,
                width = EXCLUDED.width,
                height = EXCLUDED.height,
                depth = EXCLUDED.depth,
                gross_weight = EXCLUDED.gross_weight,
                net_weight = EXCLUDED.net_weight,
                origin_country = EXCLUDED.origin_country,
                goods_type = EXCLUDED.goods_type,
                category_code = EXCLUDED.category_code,
                category_name = EXCLUDED.category_name,
                price = EXCLUDED.price,
                image_url = EXCLUDED.image_url,
                first_ship_date = EXCLUDED.first_ship_date,
                packaging_type = EXCLUDED.packaging_type,
                shelf_life = EXCLUDED.shelf_life,
                min_sales_unit = EXCLUDED.min_sales_unit,
                certification_standard = EXCLUDED.certification_standard,
                certificate_license = EXCLUDED.certificate_license,
                note = EXCLUDED.note,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        bind_product(sqlx::query_as::<_, Product>(&query), tenant, barcode, attrs)
            .fetch_one(pool)
            .await
    }

    /// Insert a new product, leaving any existing row untouched.
    ///
    /// Returns `None` if the tenant already has a product with `barcode`.
    pub async fn insert(
        pool: &PgPool,
        tenant: &Tenant,
        barcode: &str,
        attrs: &ProductAttrs,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "{INSERT}
             ON CONFLICT ON CONSTRAINT uq_products_owner_barcode DO NOTHING
             RETURNING {COLUMNS}"
        );
        bind_product(sqlx::query_as::<_, Product>(&query), tenant, barcode, attrs)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant: &Tenant,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_barcode(
        pool: &PgPool,
        tenant: &Tenant,
        barcode: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM products WHERE barcode = $1 AND owner_id = $2");
        sqlx::query_as::<_, Product>(&query)
            .bind(barcode)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    /// Most recently updated product carrying `image_url`.
    pub async fn find_by_image_url(
        pool: &PgPool,
        tenant: &Tenant,
        image_url: &str,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE image_url = $1 AND owner_id = $2
             ORDER BY updated_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(image_url)
            .bind(tenant.user_id())
            .fetch_optional(pool)
            .await
    }

    /// All of the tenant's products, most recently updated first.
    pub async fn list(pool: &PgPool, tenant: &Tenant) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products WHERE owner_id = $1 ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(tenant.user_id())
            .fetch_all(pool)
            .await
    }
}
