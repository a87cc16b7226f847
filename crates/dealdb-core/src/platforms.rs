//! Platform registry: which sites get scraped and how.
//!
//! Each platform is pure data — a listing URL, a CSS selector for one
//! item card, and ordered fallback chains of sub-selectors per field.
//! Adding a platform means adding an entry here (or to the optional
//! YAML override file), not touching extraction code. The chains exist
//! because these sites serve different markup to mobile and desktop
//! clients and shuffle class names between the two; the first selector
//! that yields non-empty text wins.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Browser viewport dimensions for the spoofed mobile identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale: f64,
}

/// One static HTTP header sent with every request of a scrape session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSpec {
    pub name: String,
    pub value: String,
}

/// A cookie installed before navigating to the listing URL, used to pin
/// region/currency/storefront so markup and price formatting are
/// deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieSpec {
    pub name: String,
    pub value: String,
    pub domain: String,
}

/// The spoofed mobile-browser identity used when fetching a platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub viewport: Viewport,
    #[serde(default)]
    pub headers: Vec<HeaderSpec>,
    #[serde(default)]
    pub cookies: Vec<CookieSpec>,
}

/// Static scrape configuration for one platform. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Registry key, also the `platform` column of persisted products.
    pub key: String,
    /// Human-readable site name.
    pub label: String,
    /// Listing page to fetch.
    pub url: String,
    /// Site origin used to absolutize relative links and to install
    /// cookies before navigating to `url`.
    pub origin: String,
    /// CSS selector matching one listing card.
    pub item_selector: String,
    /// Fallback chain for the brand part of the title.
    #[serde(default)]
    pub brand_rules: Vec<String>,
    /// Fallback chain for the name part of the title.
    #[serde(default)]
    pub name_rules: Vec<String>,
    /// Fallback chain for the sale-price text.
    #[serde(default)]
    pub price_rules: Vec<String>,
    /// Fallback chain for the strikethrough/original-price text.
    #[serde(default)]
    pub original_price_rules: Vec<String>,
    /// Currency markers recognized by the regex price fallback when
    /// every selector in `price_rules` comes up empty ("TL", "₼", ...).
    #[serde(default)]
    pub currency_markers: Vec<String>,
    pub profile: BrowserProfile,
}

/// Shape of the optional `DEALDB_PLATFORMS_PATH` YAML file.
#[derive(Debug, Deserialize)]
pub struct PlatformsFile {
    pub platforms: Vec<PlatformConfig>,
}

/// Immutable lookup table from platform key to its config.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: Vec<PlatformConfig>,
}

impl PlatformRegistry {
    /// Builds a registry from already-validated configs.
    #[must_use]
    pub fn new(platforms: Vec<PlatformConfig>) -> Self {
        Self { platforms }
    }

    /// The registry of built-in platforms shipped with the service.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![trendyol(), umico()])
    }

    /// Looks up a platform by key. `None` means the platform is not
    /// supported; callers surface that without launching a browser.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PlatformConfig> {
        self.platforms.iter().find(|p| p.key == key)
    }

    /// All registered platform keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.platforms.iter().map(|p| p.key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

/// Load and validate a platform registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_platforms(path: &Path) -> Result<PlatformRegistry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PlatformsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: PlatformsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::PlatformsFileParse)?;

    validate_platforms(&file.platforms)?;

    Ok(PlatformRegistry::new(file.platforms))
}

fn validate_platforms(platforms: &[PlatformConfig]) -> Result<(), ConfigError> {
    if platforms.is_empty() {
        return Err(ConfigError::InvalidPlatforms(
            "platforms list is empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for p in platforms {
        if p.key.trim().is_empty() {
            return Err(ConfigError::InvalidPlatforms(
                "platform with empty key".to_string(),
            ));
        }
        if !seen.insert(p.key.as_str()) {
            return Err(ConfigError::InvalidPlatforms(format!(
                "duplicate platform key: {}",
                p.key
            )));
        }
        if p.item_selector.trim().is_empty() {
            return Err(ConfigError::InvalidPlatforms(format!(
                "platform {} has an empty item_selector",
                p.key
            )));
        }
        for (field, value) in [("url", &p.url), ("origin", &p.origin)] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::InvalidPlatforms(format!(
                    "platform {} has a non-absolute {field}: {value}",
                    p.key
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Built-in platforms
// ---------------------------------------------------------------------------

/// Mobile Safari identity shared by the built-in platforms. Listing
/// markup is noticeably simpler (and price classes more stable) on the
/// mobile variants of both sites.
fn mobile_profile(accept_language: &str, cookies: Vec<CookieSpec>) -> BrowserProfile {
    BrowserProfile {
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) \
                     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 \
                     Mobile/15E148 Safari/604.1"
            .to_string(),
        viewport: Viewport {
            width: 390,
            height: 844,
            device_scale: 3.0,
        },
        headers: vec![
            HeaderSpec {
                name: "Accept".to_string(),
                value: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                    .to_string(),
            },
            HeaderSpec {
                name: "Accept-Language".to_string(),
                value: accept_language.to_string(),
            },
            HeaderSpec {
                name: "Sec-Fetch-Dest".to_string(),
                value: "document".to_string(),
            },
            HeaderSpec {
                name: "Sec-Fetch-Mode".to_string(),
                value: "navigate".to_string(),
            },
            HeaderSpec {
                name: "Sec-Fetch-Site".to_string(),
                value: "none".to_string(),
            },
        ],
        cookies,
    }
}

fn trendyol() -> PlatformConfig {
    PlatformConfig {
        key: "trendyol".to_string(),
        label: "Trendyol".to_string(),
        url: "https://www.trendyol.com/sr?sst=MOST_DISCOUNTED".to_string(),
        origin: "https://www.trendyol.com".to_string(),
        item_selector: "div.p-card-wrppr".to_string(),
        brand_rules: vec![
            "span.prdct-desc-cntnr-ttl".to_string(),
            "div.product-desc-cntnr .brand".to_string(),
        ],
        name_rules: vec![
            "span.prdct-desc-cntnr-name".to_string(),
            "div.product-desc-cntnr .name".to_string(),
        ],
        price_rules: vec![
            "div.prc-box-dscntd".to_string(),
            "div.prc-box-sllng".to_string(),
            "div.price-item.discounted".to_string(),
        ],
        original_price_rules: vec![
            "div.prc-box-orgnl".to_string(),
            "div.price-item.original".to_string(),
        ],
        currency_markers: vec!["TL".to_string(), "₺".to_string()],
        profile: mobile_profile(
            "tr-TR,tr;q=0.9,en;q=0.8",
            vec![CookieSpec {
                name: "countryCode".to_string(),
                value: "TR".to_string(),
                domain: ".trendyol.com".to_string(),
            }],
        ),
    }
}

fn umico() -> PlatformConfig {
    PlatformConfig {
        key: "umico".to_string(),
        label: "Umico".to_string(),
        url: "https://umico.az/promotions".to_string(),
        origin: "https://umico.az".to_string(),
        item_selector: "div.product-card".to_string(),
        brand_rules: vec![
            "div.product-card__brand".to_string(),
            "span.brand-name".to_string(),
        ],
        name_rules: vec![
            "div.product-card__title".to_string(),
            "div.product-card__name".to_string(),
        ],
        price_rules: vec![
            "span.product-card__price--new".to_string(),
            "div.product-price__current".to_string(),
        ],
        original_price_rules: vec![
            "span.product-card__price--old".to_string(),
            "div.product-price__old".to_string(),
        ],
        currency_markers: vec!["₼".to_string(), "AZN".to_string()],
        profile: mobile_profile(
            "az-AZ,az;q=0.9,ru;q=0.8",
            vec![CookieSpec {
                name: "currency".to_string(),
                value: "AZN".to_string(),
                domain: ".umico.az".to_string(),
            }],
        ),
    }
}

#[cfg(test)]
#[path = "platforms_test.rs"]
mod tests;
