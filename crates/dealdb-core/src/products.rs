//! Shared entities crossing the scrape pipeline.

use serde::{Deserialize, Serialize};

/// Raw strings pulled from one listing card, before any normalization.
///
/// Transient: exists only within one scrape cycle. The first few are
/// echoed back in the HTTP response as diagnostics, hence `Serialize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    pub brand: String,
    pub name: String,
    pub raw_price_text: String,
    pub raw_original_price_text: String,
    pub link: String,
    pub image_url: String,
}

/// A deep-discount listing accepted by the filter and persisted.
///
/// Identity is `(platform, external_id)` where `external_id` is the
/// scraped link; re-scraping the same listing never creates a second
/// row. `discount_rate_percent` is `round((original - price) /
/// original * 100)` when `original > price > 0`, else `0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_rate_percent: i32,
    pub image_url: String,
    pub product_url: String,
    pub platform: String,
    pub external_id: String,
}
