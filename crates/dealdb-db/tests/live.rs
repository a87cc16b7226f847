//! Live integration tests for dealdb-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/dealdb-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use dealdb_core::Product;
use dealdb_db::{count_products, list_recent_products, upsert_product, UpsertOutcome};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_product(platform: &str, external_id: &str) -> Product {
    Product {
        title: "Acme Runner 2".to_string(),
        price: 80.0,
        original_price: 160.0,
        discount_rate_percent: 50,
        image_url: "https://cdn.example.com/r2.jpg".to_string(),
        product_url: external_id.to_string(),
        platform: platform.to_string(),
        external_id: external_id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Upsert idempotence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn product_upsert_is_idempotent(pool: sqlx::PgPool) {
    let product = make_product("umico", "https://umico.az/product/1");

    let first = upsert_product(&pool, &product)
        .await
        .expect("first upsert_product failed");
    assert!(
        matches!(first, UpsertOutcome::Inserted(_)),
        "first upsert should insert, got: {first:?}"
    );

    let second = upsert_product(&pool, &product)
        .await
        .expect("second upsert_product failed");
    assert_eq!(
        second,
        UpsertOutcome::AlreadyPresent,
        "second upsert of the same (platform, external_id) must be a no-op success"
    );

    let count = count_products(&pool, "umico")
        .await
        .expect("count_products failed");
    assert_eq!(
        count, 1,
        "exactly one product row should exist after two upserts"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn same_external_id_on_other_platform_is_a_new_row(pool: sqlx::PgPool) {
    let link = "https://shop.example.com/p/1";

    let first = upsert_product(&pool, &make_product("umico", link))
        .await
        .expect("umico upsert failed");
    let second = upsert_product(&pool, &make_product("trendyol", link))
        .await
        .expect("trendyol upsert failed");

    assert!(matches!(first, UpsertOutcome::Inserted(_)));
    assert!(
        matches!(second, UpsertOutcome::Inserted(_)),
        "dedup key is (platform, external_id), not external_id alone"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_recent_products_returns_persisted_fields(pool: sqlx::PgPool) {
    let product = make_product("umico", "https://umico.az/product/2");
    upsert_product(&pool, &product)
        .await
        .expect("upsert_product failed");

    let rows = list_recent_products(&pool, "umico", 10)
        .await
        .expect("list_recent_products failed");

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.title, "Acme Runner 2");
    assert!((row.price - 80.0).abs() < f64::EPSILON);
    assert!((row.original_price - 160.0).abs() < f64::EPSILON);
    assert_eq!(row.discount_rate_percent, 50);
    assert_eq!(row.external_id, "https://umico.az/product/2");
}
