//! Rendered-page fetching through a WebDriver session.
//!
//! One session per call, torn down on every exit path. The listing
//! sites populate cards from client-side JS, so instead of a fixed
//! settle sleep the fetcher polls an in-page readiness predicate
//! (matched card count) under a bounded deadline: zero cards at the
//! deadline is fatal to the cycle, exactly like a navigation timeout.

use std::time::Duration;

use serde_json::json;
use thirtyfour::extensions::cdp::ChromeDevTools;
use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, Cookie, DesiredCapabilities, PageLoadStrategy, WebDriver};

use dealdb_core::{BrowserProfile, PlatformConfig};

use crate::error::ScraperError;

/// Tunables for one fetch. Built once at startup from `AppConfig` and
/// shared read-only across requests.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// WebDriver endpoint (chromedriver / Selenium hub).
    pub webdriver_url: String,
    /// Page-load budget per navigation.
    pub nav_timeout: Duration,
    /// Deadline for each readiness poll phase.
    pub ready_timeout: Duration,
    /// Interval between readiness polls.
    pub poll_interval: Duration,
}

impl FetchSettings {
    #[must_use]
    pub fn new(webdriver_url: String, nav_timeout_secs: u64, ready_timeout_secs: u64) -> Self {
        Self {
            webdriver_url,
            nav_timeout: Duration::from_secs(nav_timeout_secs),
            ready_timeout: Duration::from_secs(ready_timeout_secs),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Fetches rendered listing pages under a spoofed mobile identity.
pub struct PageFetcher {
    settings: FetchSettings,
}

impl PageFetcher {
    #[must_use]
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// Loads the platform's listing URL and returns the rendered HTML.
    ///
    /// Navigates to the site origin first so the profile's
    /// region/currency cookies can be installed, then to the listing
    /// URL with an eager (DOM-parsed) load strategy, waits for item
    /// cards, scrolls one viewport to trigger lazy loading, and waits
    /// for the card count to settle.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Navigation`] on page-load failure or timeout,
    /// [`ScraperError::ReadyTimeout`] when no card appears before the
    /// readiness deadline, [`ScraperError::WebDriver`] for any other
    /// session error. The session is quit on every path.
    pub async fn fetch_rendered(&self, platform: &PlatformConfig) -> Result<String, ScraperError> {
        let caps = build_capabilities(&platform.profile)?;
        let driver = WebDriver::new(&self.settings.webdriver_url, caps).await?;

        let result = self.drive(&driver, platform).await;

        // Teardown must not mask the scrape outcome.
        if let Err(e) = driver.quit().await {
            tracing::warn!(error = %e, platform = %platform.key, "failed to quit webdriver session");
        }

        result
    }

    async fn drive(
        &self,
        driver: &WebDriver,
        platform: &PlatformConfig,
    ) -> Result<String, ScraperError> {
        driver.set_page_load_timeout(self.settings.nav_timeout).await?;
        apply_emulation(driver, &platform.profile).await?;

        // Cookies can only be set against the current document's origin.
        if !platform.profile.cookies.is_empty() {
            driver
                .goto(&platform.origin)
                .await
                .map_err(|source| ScraperError::Navigation {
                    url: platform.origin.clone(),
                    source,
                })?;
            for spec in &platform.profile.cookies {
                let mut cookie = Cookie::new(spec.name.clone(), spec.value.clone());
                cookie.domain = Some(spec.domain.clone());
                cookie.path = Some("/".to_string());
                driver.add_cookie(cookie).await?;
            }
        }

        driver
            .goto(&platform.url)
            .await
            .map_err(|source| ScraperError::Navigation {
                url: platform.url.clone(),
                source,
            })?;

        self.await_cards(driver, platform).await?;

        // One viewport-height scroll triggers lazy-loaded cards below
        // the fold.
        driver
            .execute("window.scrollBy(0, window.innerHeight);", vec![])
            .await?;
        self.settle(driver, platform).await?;

        let html = driver.source().await?;
        tracing::debug!(
            platform = %platform.key,
            bytes = html.len(),
            "captured rendered page source"
        );
        Ok(html)
    }

    /// Polls until at least one item card exists. Fatal at deadline.
    async fn await_cards(
        &self,
        driver: &WebDriver,
        platform: &PlatformConfig,
    ) -> Result<(), ScraperError> {
        let deadline = tokio::time::Instant::now() + self.settings.ready_timeout;
        loop {
            if count_cards(driver, &platform.item_selector).await? > 0 {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScraperError::ReadyTimeout {
                    url: platform.url.clone(),
                    selector: platform.item_selector.clone(),
                    waited_secs: self.settings.ready_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    /// Polls until the card count stops growing or the deadline passes.
    /// Best effort: lazy content that never settles is not fatal, the
    /// page is scraped as-is.
    async fn settle(
        &self,
        driver: &WebDriver,
        platform: &PlatformConfig,
    ) -> Result<(), ScraperError> {
        let deadline = tokio::time::Instant::now() + self.settings.ready_timeout;
        let mut last = count_cards(driver, &platform.item_selector).await?;
        while tokio::time::Instant::now() < deadline {
            tokio::time::sleep(self.settings.poll_interval).await;
            let current = count_cards(driver, &platform.item_selector).await?;
            if current == last {
                break;
            }
            last = current;
        }
        Ok(())
    }
}

async fn count_cards(driver: &WebDriver, selector: &str) -> Result<u64, ScraperError> {
    let ret = driver
        .execute(
            "return document.querySelectorAll(arguments[0]).length;",
            vec![serde_json::Value::String(selector.to_string())],
        )
        .await?;
    Ok(ret.convert::<u64>()?)
}

fn build_capabilities(profile: &BrowserProfile) -> Result<ChromeCapabilities, ScraperError> {
    let mut caps = DesiredCapabilities::chrome();
    caps.set_headless()?;
    caps.set_disable_gpu()?;
    caps.add_arg("--no-sandbox")?;
    caps.add_arg("--disable-dev-shm-usage")?;
    caps.add_arg(&format!("--user-agent={}", profile.user_agent))?;
    caps.add_arg(&format!(
        "--window-size={},{}",
        profile.viewport.width, profile.viewport.height
    ))?;
    // Eager: resolve navigation when the DOM is parsed, not when every
    // resource finished loading.
    caps.set_page_load_strategy(PageLoadStrategy::Eager)?;
    Ok(caps)
}

/// Applies viewport/device-scale emulation and the profile's static
/// headers through the Chrome devtools protocol.
async fn apply_emulation(driver: &WebDriver, profile: &BrowserProfile) -> Result<(), ScraperError> {
    let dev_tools = ChromeDevTools::new(driver.handle.clone());

    dev_tools
        .execute_cdp_with_params(
            "Emulation.setDeviceMetricsOverride",
            json!({
                "width": profile.viewport.width,
                "height": profile.viewport.height,
                "deviceScaleFactor": profile.viewport.device_scale,
                "mobile": true,
            }),
        )
        .await?;

    if !profile.headers.is_empty() {
        let headers: serde_json::Map<String, serde_json::Value> = profile
            .headers
            .iter()
            .map(|h| (h.name.clone(), serde_json::Value::String(h.value.clone())))
            .collect();
        dev_tools.execute_cdp("Network.enable").await?;
        dev_tools
            .execute_cdp_with_params("Network.setExtraHTTPHeaders", json!({ "headers": headers }))
            .await?;
    }

    Ok(())
}
