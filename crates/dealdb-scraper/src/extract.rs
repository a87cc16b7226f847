//! Field extraction from a rendered listing page.
//!
//! Pure read of the document: every element matching the platform's
//! item selector becomes one [`RawItem`], in DOM order. Fields are
//! resolved through the platform's ordered selector chains (first
//! non-empty text wins); the sale price additionally has a regex
//! fallback that scans the card's visible text for currency-tagged
//! numeric tokens when every selector misses.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use dealdb_core::{PlatformConfig, RawItem};

use crate::error::ScraperError;

/// Extracts one [`RawItem`] per listing card found in `html`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] if the platform's item
/// selector does not parse. Invalid selectors inside fallback chains
/// are skipped instead, so one bad rule cannot blank a whole platform.
pub fn extract_items(html: &str, platform: &PlatformConfig) -> Result<Vec<RawItem>, ScraperError> {
    let document = Html::parse_document(html);
    let item_selector =
        Selector::parse(&platform.item_selector).map_err(|_| ScraperError::InvalidSelector {
            selector: platform.item_selector.clone(),
        })?;

    let token_regex = currency_token_regex(&platform.currency_markers);

    let items = document
        .select(&item_selector)
        .map(|card| extract_card(card, platform, token_regex.as_ref()))
        .collect();

    Ok(items)
}

fn extract_card(
    card: ElementRef<'_>,
    platform: &PlatformConfig,
    token_regex: Option<&Regex>,
) -> RawItem {
    let brand = first_text(card, &platform.brand_rules);
    let name = first_text(card, &platform.name_rules);

    let mut raw_price_text = first_text(card, &platform.price_rules);
    let mut raw_original_price_text = first_text(card, &platform.original_price_rules);

    // Selector miss on the sale price: scan the card's full visible
    // text for currency-tagged tokens. Two or more tokens means the
    // strikethrough price renders first, so the last one is the sale
    // price; a single token is the sale price with no original. When
    // the original-price chain already matched, that selector text
    // wins over the first token: a targeted selector hit is more
    // trustworthy than a positional guess across the whole card.
    if raw_price_text.is_empty() {
        if let Some(regex) = token_regex {
            let tokens = currency_tokens(&visible_text(card), regex);
            match tokens.as_slice() {
                [] => {}
                [only] => raw_price_text = only.clone(),
                [first, .., last] => {
                    if raw_original_price_text.is_empty() {
                        raw_original_price_text = first.clone();
                    }
                    raw_price_text = last.clone();
                }
            }
        }
    }

    if raw_original_price_text.is_empty() {
        raw_original_price_text = raw_price_text.clone();
    }

    let link = resolve_link(card, &platform.origin);
    let image_url = first_image_src(card);

    RawItem {
        brand,
        name,
        raw_price_text,
        raw_original_price_text,
        link,
        image_url,
    }
}

/// First non-empty text match across the chain, whitespace-collapsed.
fn first_text(card: ElementRef<'_>, rules: &[String]) -> String {
    for rule in rules {
        let Ok(selector) = Selector::parse(rule) else {
            tracing::debug!(selector = %rule, "skipping unparseable selector rule");
            continue;
        };
        if let Some(element) = card.select(&selector).next() {
            let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// The card's own `href` when it is itself an anchor, else the first
/// descendant anchor's `href`; relative results get the site origin
/// prefixed, protocol-relative ones get `https:`.
fn resolve_link(card: ElementRef<'_>, origin: &str) -> String {
    let href = card
        .value()
        .attr("href")
        .map(ToOwned::to_owned)
        .or_else(|| {
            let anchor = Selector::parse("a[href]").ok()?;
            card.select(&anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(ToOwned::to_owned)
        })
        .unwrap_or_default();

    if href.is_empty() || href.starts_with("http") {
        href
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else {
        format!("{}{}", origin.trim_end_matches('/'), href)
    }
}

fn first_image_src(card: ElementRef<'_>) -> String {
    let Ok(img) = Selector::parse("img") else {
        return String::new();
    };
    card.select(&img)
        .next()
        .and_then(|e| e.value().attr("src"))
        .unwrap_or_default()
        .to_string()
}

fn visible_text(card: ElementRef<'_>) -> String {
    collapse_whitespace(&card.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds the fallback matcher for numeric tokens tagged with one of
/// the platform's currency markers, e.g. `1.250,50 TL` or `80₼`.
fn currency_token_regex(markers: &[String]) -> Option<Regex> {
    if markers.is_empty() {
        return None;
    }
    let alternatives = markers
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(\d+(?:[.,]\d+)*)\s*(?:{alternatives})");
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(error = %e, "currency marker pattern failed to compile");
            None
        }
    }
}

fn currency_tokens(text: &str, regex: &Regex) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
