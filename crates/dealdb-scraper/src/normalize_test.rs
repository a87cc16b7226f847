use super::*;

fn raw_item(price: &str, original: &str) -> RawItem {
    RawItem {
        brand: "Acme".to_string(),
        name: "Sneaker".to_string(),
        raw_price_text: price.to_string(),
        raw_original_price_text: original.to_string(),
        link: "https://shop.example.com/p/1".to_string(),
        image_url: "https://cdn.example.com/1.jpg".to_string(),
    }
}

// -----------------------------------------------------------------------
// clean_and_parse
// -----------------------------------------------------------------------

#[test]
fn parse_mixed_separators_dot_thousands_comma_decimal() {
    assert!((clean_and_parse("1.250,50") - 1250.50).abs() < f64::EPSILON);
}

#[test]
fn parse_comma_only_is_decimal() {
    assert!((clean_and_parse("28,07") - 28.07).abs() < f64::EPSILON);
}

#[test]
fn parse_dot_without_comma_stays_a_decimal_point() {
    // The lone dot is NOT treated as a thousands separator: "1.200"
    // parses as 1.2. Documented behavior, see the module doc.
    assert!((clean_and_parse("1.200") - 1.2).abs() < f64::EPSILON);
}

#[test]
fn parse_strips_currency_markers_and_whitespace() {
    assert!((clean_and_parse("1.250,50 TL") - 1250.50).abs() < f64::EPSILON);
    assert!((clean_and_parse("80 ₼") - 80.0).abs() < f64::EPSILON);
    assert!((clean_and_parse("AZN 45,90") - 45.90).abs() < f64::EPSILON);
}

#[test]
fn parse_empty_yields_zero() {
    assert!(clean_and_parse("").abs() < f64::EPSILON);
}

#[test]
fn parse_no_digits_yields_zero() {
    assert!(clean_and_parse("Sold out").abs() < f64::EPSILON);
}

#[test]
fn parse_garbage_separators_yield_zero() {
    // Two dots survive the no-comma branch and fail the float parse.
    assert!(clean_and_parse("1.2.3").abs() < f64::EPSILON);
}

// -----------------------------------------------------------------------
// discount_percent
// -----------------------------------------------------------------------

#[test]
fn discount_rounds_to_nearest_integer() {
    assert_eq!(discount_percent(60.0, 100.0), 40);
    assert_eq!(discount_percent(61.0, 100.0), 39);
    assert_eq!(discount_percent(80.0, 160.0), 50);
}

#[test]
fn discount_zero_when_original_not_greater() {
    assert_eq!(discount_percent(100.0, 100.0), 0);
    assert_eq!(discount_percent(100.0, 80.0), 0);
}

#[test]
fn discount_zero_when_price_not_positive() {
    assert_eq!(discount_percent(0.0, 100.0), 0);
}

// -----------------------------------------------------------------------
// normalize_item
// -----------------------------------------------------------------------

#[test]
fn keeps_item_at_exactly_forty_percent() {
    let product = normalize_item(&raw_item("60,00 TL", "100,00 TL"), "trendyol").unwrap();
    assert_eq!(product.discount_rate_percent, 40);
    assert!((product.price - 60.0).abs() < f64::EPSILON);
    assert!((product.original_price - 100.0).abs() < f64::EPSILON);
}

#[test]
fn drops_item_at_thirty_nine_percent() {
    assert!(normalize_item(&raw_item("61,00 TL", "100,00 TL"), "trendyol").is_none());
}

#[test]
fn manat_half_price_item_is_kept() {
    let product = normalize_item(&raw_item("80 ₼", "160 ₼"), "umico").unwrap();
    assert!((product.price - 80.0).abs() < f64::EPSILON);
    assert!((product.original_price - 160.0).abs() < f64::EPSILON);
    assert_eq!(product.discount_rate_percent, 50);
    assert_eq!(product.platform, "umico");
}

#[test]
fn unparseable_original_falls_back_to_price_and_drops() {
    // Original collapses to the sale price, discount becomes 0%, and
    // the item is dropped even though the sale price is positive.
    assert!(normalize_item(&raw_item("50 ₼", "n/a"), "umico").is_none());
}

#[test]
fn priceless_item_is_dropped_regardless_of_original() {
    assert!(normalize_item(&raw_item("", "160 ₼"), "umico").is_none());
}

#[test]
fn title_joins_brand_and_name_trimmed() {
    let product = normalize_item(&raw_item("60 ₼", "160 ₼"), "umico").unwrap();
    assert_eq!(product.title, "Acme Sneaker");

    let mut item = raw_item("60 ₼", "160 ₼");
    item.brand = String::new();
    let product = normalize_item(&item, "umico").unwrap();
    assert_eq!(product.title, "Sneaker");
}

#[test]
fn external_id_is_the_link() {
    let product = normalize_item(&raw_item("60 ₼", "160 ₼"), "umico").unwrap();
    assert_eq!(product.external_id, product.product_url);
    assert_eq!(product.external_id, "https://shop.example.com/p/1");
}
