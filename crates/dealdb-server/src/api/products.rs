//! Read-side listing of previously persisted products.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    id: i64,
    title: String,
    price: f64,
    original_price: f64,
    discount_rate_percent: i32,
    image_url: String,
    product_url: String,
    platform: String,
    external_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductList {
    total: i64,
    data: Vec<ProductItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub limit: Option<i64>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductList>, ApiError> {
    if state.registry.get(&platform).is_none() {
        return Err(ApiError::unknown_platform());
    }

    let limit = normalize_limit(query.limit);
    let rows = dealdb_db::list_recent_products(&state.pool, &platform, limit)
        .await
        .map_err(|e| map_db_error(&e))?;
    let total = dealdb_db::count_products(&state.pool, &platform)
        .await
        .map_err(|e| map_db_error(&e))?;

    let data = rows
        .into_iter()
        .map(|row| ProductItem {
            id: row.id,
            title: row.title,
            price: row.price,
            original_price: row.original_price,
            discount_rate_percent: row.discount_rate_percent,
            image_url: row.image_url,
            product_url: row.product_url,
            platform: row.platform,
            external_id: row.external_id,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ProductList { total, data }))
}

fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

fn map_db_error(error: &dealdb_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::internal("database query failed")
}
