use dealdb_core::{BrowserProfile, Viewport};

use super::*;

fn test_profile() -> BrowserProfile {
    BrowserProfile {
        user_agent: "test-agent".to_string(),
        viewport: Viewport {
            width: 390,
            height: 844,
            device_scale: 3.0,
        },
        headers: vec![],
        cookies: vec![],
    }
}

fn test_platform() -> PlatformConfig {
    PlatformConfig {
        key: "example".to_string(),
        label: "Example".to_string(),
        url: "https://shop.example.com/deals".to_string(),
        origin: "https://shop.example.com".to_string(),
        item_selector: "div.card".to_string(),
        brand_rules: vec!["span.brand".to_string(), "span.brand-alt".to_string()],
        name_rules: vec!["span.name".to_string(), "span.name-alt".to_string()],
        price_rules: vec!["span.sale".to_string(), "span.sale-alt".to_string()],
        original_price_rules: vec!["span.was".to_string()],
        currency_markers: vec!["₼".to_string(), "AZN".to_string()],
        profile: test_profile(),
    }
}

#[test]
fn extracts_fields_via_primary_selectors() {
    let html = r#"
        <div class="card">
            <span class="brand">Acme</span>
            <span class="name">Runner 2</span>
            <span class="sale">80 ₼</span>
            <span class="was">160 ₼</span>
            <a href="/p/runner-2"><img src="https://cdn.example.com/r2.jpg"></a>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.brand, "Acme");
    assert_eq!(item.name, "Runner 2");
    assert_eq!(item.raw_price_text, "80 ₼");
    assert_eq!(item.raw_original_price_text, "160 ₼");
    assert_eq!(item.link, "https://shop.example.com/p/runner-2");
    assert_eq!(item.image_url, "https://cdn.example.com/r2.jpg");
}

#[test]
fn fallback_selector_wins_when_primary_is_empty() {
    let html = r#"
        <div class="card">
            <span class="brand"> </span>
            <span class="brand-alt">Acme</span>
            <span class="name-alt">Runner 2</span>
            <span class="sale-alt">99 ₼</span>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].brand, "Acme");
    assert_eq!(items[0].name, "Runner 2");
    assert_eq!(items[0].raw_price_text, "99 ₼");
}

#[test]
fn regex_fallback_splits_original_and_sale_tokens() {
    // No price selector matches; the visible text carries two tagged
    // tokens. First is the strikethrough original, last is the sale.
    let html = r#"
        <div class="card">
            <span class="name">Runner 2</span>
            <p>Endirim! <s>160 ₼</s> indi 80 ₼</p>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].raw_price_text, "80");
    assert_eq!(items[0].raw_original_price_text, "160");
}

#[test]
fn original_price_selector_hit_beats_first_regex_token() {
    // Sale-price selectors miss, so the token scan supplies the sale
    // price, but the original already matched via its own chain and
    // keeps precedence over the first token.
    let html = r#"
        <div class="card">
            <span class="name">Runner 2</span>
            <span class="was">200 ₼</span>
            <p><s>160 ₼</s> indi 80 ₼</p>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].raw_price_text, "80");
    assert_eq!(items[0].raw_original_price_text, "200 ₼");
}

#[test]
fn regex_fallback_single_token_is_sale_only() {
    let html = r#"
        <div class="card">
            <span class="name">Runner 2</span>
            <p>yalnız 45,90 AZN</p>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].raw_price_text, "45,90");
    // No separate original: defaults to the sale string.
    assert_eq!(items[0].raw_original_price_text, "45,90");
}

#[test]
fn regex_fallback_ignores_untagged_numbers() {
    let html = r#"
        <div class="card">
            <span class="name">Runner 2 (2024)</span>
            <p>4.5 stars, 120 reviews</p>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].raw_price_text, "");
}

#[test]
fn missing_original_defaults_to_sale_text() {
    let html = r#"
        <div class="card">
            <span class="name">Runner 2</span>
            <span class="sale">80 ₼</span>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].raw_original_price_text, "80 ₼");
}

#[test]
fn card_own_href_beats_descendant_anchor() {
    let mut platform = test_platform();
    platform.item_selector = "a.card".to_string();
    let html = r#"
        <a class="card" href="/p/outer">
            <span class="name">Runner 2</span>
        </a>"#;

    let items = extract_items(html, &platform).unwrap();
    assert_eq!(items[0].link, "https://shop.example.com/p/outer");
}

#[test]
fn protocol_relative_link_gets_https() {
    let html = r#"
        <div class="card">
            <a href="//shop.example.com/p/1"><span class="name">X</span></a>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].link, "https://shop.example.com/p/1");
}

#[test]
fn absolute_link_is_left_alone() {
    let html = r#"
        <div class="card">
            <a href="https://other.example.com/p/1"><span class="name">X</span></a>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].link, "https://other.example.com/p/1");
}

#[test]
fn missing_image_and_link_yield_empty_strings() {
    let html = r#"<div class="card"><span class="name">X</span></div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].image_url, "");
    assert_eq!(items[0].link, "");
}

#[test]
fn cards_come_back_in_dom_order() {
    let html = r#"
        <div class="card"><span class="name">First</span></div>
        <div class="card"><span class="name">Second</span></div>
        <div class="card"><span class="name">Third</span></div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn no_matching_cards_yields_empty_vec() {
    let items = extract_items("<html><body></body></html>", &test_platform()).unwrap();
    assert!(items.is_empty());
}

#[test]
fn invalid_item_selector_is_an_error() {
    let mut platform = test_platform();
    platform.item_selector = "div..".to_string();
    let err = extract_items("<div class=\"card\"></div>", &platform).unwrap_err();
    assert!(matches!(err, ScraperError::InvalidSelector { .. }));
}

#[test]
fn invalid_rule_in_chain_is_skipped() {
    let mut platform = test_platform();
    platform.name_rules = vec!["span..bad".to_string(), "span.name".to_string()];
    let html = r#"<div class="card"><span class="name">Runner 2</span></div>"#;

    let items = extract_items(html, &platform).unwrap();
    assert_eq!(items[0].name, "Runner 2");
}

#[test]
fn nested_text_is_whitespace_collapsed() {
    let html = r#"
        <div class="card">
            <span class="name">
                Runner
                <b>2</b>
            </span>
        </div>"#;

    let items = extract_items(html, &test_platform()).unwrap();
    assert_eq!(items[0].name, "Runner 2");
}
