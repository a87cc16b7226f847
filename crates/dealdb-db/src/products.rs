//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dealdb_core::Product;

use crate::DbError;

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_rate_percent: i32,
    pub image_url: String,
    pub product_url: String,
    pub platform: String,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
}

/// Result of an idempotent product upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was written; carries its id.
    Inserted(i64),
    /// The `(platform, external_id)` key already existed. Not an error:
    /// re-scraping the same listing is expected and must not duplicate.
    AlreadyPresent,
}

/// Inserts a scraped product, ignoring duplicates on the
/// `(platform, external_id)` identity key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails for any reason other
/// than the dedup conflict.
pub async fn upsert_product(pool: &PgPool, product: &Product) -> Result<UpsertOutcome, DbError> {
    let id: Option<i64> = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products \
           (title, price, original_price, discount_rate_percent, \
            image_url, product_url, platform, external_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (platform, external_id) DO NOTHING \
         RETURNING id",
    )
    .bind(&product.title)
    .bind(product.price)
    .bind(product.original_price)
    .bind(product.discount_rate_percent)
    .bind(&product.image_url)
    .bind(&product.product_url)
    .bind(&product.platform)
    .bind(&product.external_id)
    .fetch_optional(pool)
    .await?;

    Ok(match id {
        Some(id) => UpsertOutcome::Inserted(id),
        None => UpsertOutcome::AlreadyPresent,
    })
}

/// Most recently captured products for a platform, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_products(
    pool: &PgPool,
    platform: &str,
    limit: i64,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, title, price, original_price, discount_rate_percent, \
                image_url, product_url, platform, external_id, created_at \
         FROM products \
         WHERE platform = $1 \
         ORDER BY created_at DESC \
         LIMIT $2",
    )
    .bind(platform)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Total persisted products for a platform.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_products(pool: &PgPool, platform: &str) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE platform = $1")
        .bind(platform)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
