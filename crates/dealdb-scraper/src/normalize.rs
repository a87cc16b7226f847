//! Price-string normalization and the deep-discount filter.
//!
//! The separator heuristic below is deliberately literal, not
//! locale-aware. When both `.` and `,` are present the dot is a
//! thousands separator and the comma the decimal point (`"1.250,50"`
//! → `1250.50`). When only a comma is present it becomes the decimal
//! point (`"28,07"` → `28.07`). When only a dot is present it is left
//! alone, so `"1.200"` parses as `1.2` — NOT twelve hundred. Known
//! mis-parse for dot-grouped integer prices; upstream sources disagree
//! on the intended semantics, so the rule is kept as-is rather than
//! second-guessed with digit-count heuristics.

use dealdb_core::{Product, RawItem};

/// Items below this discount percentage are dropped.
pub const MIN_DISCOUNT_PERCENT: i32 = 40;

/// Parses a raw scraped price string into a number.
///
/// Strips everything but digits, `.` and `,`, applies the separator
/// rules documented on this module, then parses as `f64`. Empty or
/// unparseable input yields `0.0`.
#[must_use]
pub fn clean_and_parse(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');

    let normalized = if has_dot && has_comma {
        cleaned.replace('.', "").replace(',', ".")
    } else if has_comma {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Integer-rounded percentage drop from `original` to `price`.
///
/// Zero unless `original > price > 0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn discount_percent(price: f64, original: f64) -> i32 {
    if original > price && price > 0.0 {
        ((original - price) / original * 100.0).round() as i32
    } else {
        0
    }
}

/// Turns one raw card into a persistable [`Product`], or rejects it.
///
/// The original price falls back to the sale price when it parses to
/// zero, which forces a 0% discount and a rejection. Kept only when
/// the discount clears [`MIN_DISCOUNT_PERCENT`] and the sale price is
/// positive. The scraped link doubles as the external dedup id.
#[must_use]
pub fn normalize_item(item: &RawItem, platform_key: &str) -> Option<Product> {
    let price = clean_and_parse(&item.raw_price_text);

    let mut original_price = clean_and_parse(&item.raw_original_price_text);
    if original_price <= 0.0 {
        original_price = price;
    }

    let discount_rate_percent = discount_percent(price, original_price);
    if discount_rate_percent < MIN_DISCOUNT_PERCENT || price <= 0.0 {
        return None;
    }

    let title = format!("{} {}", item.brand, item.name).trim().to_string();

    Some(Product {
        title,
        price,
        original_price,
        discount_rate_percent,
        image_url: item.image_url.clone(),
        product_url: item.link.clone(),
        platform: platform_key.to_string(),
        external_id: item.link.clone(),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
