//! The scrape-and-persist cycle behind `GET /scrape/{platform}`.
//!
//! Each request runs one fully independent cycle: fetch the rendered
//! listing page, extract raw items, normalize and filter, persist the
//! survivors sequentially, respond with a summary. Nothing is shared
//! across requests beyond the read-only state injected at startup.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use dealdb_core::{Product, RawItem};
use dealdb_scraper::{extract_items, normalize_item, PageFetcher, ScraperError};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// Accepted products echoed back per response; the rest are only persisted.
const MAX_PRODUCTS_IN_RESPONSE: usize = 50;
/// Pre-filter raw items echoed back as extraction diagnostics.
const MAX_RAW_ITEMS_IN_RESPONSE: usize = 10;

#[derive(Debug, Serialize)]
pub(super) struct ScrapeSummary {
    status: &'static str,
    total_found: usize,
    filtered_count: usize,
    saved_count: usize,
    data: Vec<Product>,
    debug_raw_data: Vec<RawItem>,
}

pub(super) async fn scrape_platform(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(platform): Path<String>,
) -> Result<Json<ScrapeSummary>, ApiError> {
    let Some(config) = state.registry.get(&platform) else {
        return Err(ApiError::unknown_platform());
    };

    tracing::info!(request_id = %req_id.0, platform = %config.key, url = %config.url, "starting scrape cycle");

    let fetcher = PageFetcher::new((*state.fetch_settings).clone());
    let html = fetcher
        .fetch_rendered(config)
        .await
        .map_err(|e| map_scrape_error(&req_id.0, &e))?;

    let raw_items = extract_items(&html, config).map_err(|e| map_scrape_error(&req_id.0, &e))?;

    let products: Vec<Product> = raw_items
        .iter()
        .filter_map(|item| normalize_item(item, &config.key))
        .collect();

    // Sequential upserts; a failing record is logged and skipped, the
    // cycle carries on.
    let mut saved_count = 0usize;
    for product in &products {
        match dealdb_db::upsert_product(&state.pool, product).await {
            Ok(_) => saved_count += 1,
            Err(e) => {
                tracing::warn!(
                    request_id = %req_id.0,
                    external_id = %product.external_id,
                    error = %e,
                    "failed to persist product, skipping"
                );
            }
        }
    }

    let summary = build_summary(raw_items, products, saved_count);
    tracing::info!(
        request_id = %req_id.0,
        platform = %config.key,
        total_found = summary.total_found,
        filtered_count = summary.filtered_count,
        saved_count = summary.saved_count,
        "scrape cycle complete"
    );

    Ok(Json(summary))
}

fn build_summary(
    raw_items: Vec<RawItem>,
    products: Vec<Product>,
    saved_count: usize,
) -> ScrapeSummary {
    ScrapeSummary {
        status: "ok",
        total_found: raw_items.len(),
        filtered_count: products.len(),
        saved_count,
        data: products
            .into_iter()
            .take(MAX_PRODUCTS_IN_RESPONSE)
            .collect(),
        debug_raw_data: raw_items
            .into_iter()
            .take(MAX_RAW_ITEMS_IN_RESPONSE)
            .collect(),
    }
}

fn map_scrape_error(request_id: &str, error: &ScraperError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "scrape cycle failed");
    if error.is_navigation() {
        ApiError::bad_gateway(error.to_string())
    } else {
        ApiError::internal(error.to_string())
    }
}
