use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: thirtyfour::error::WebDriverError,
    },

    #[error("no listing cards matched \"{selector}\" on {url} within {waited_secs}s")]
    ReadyTimeout {
        url: String,
        selector: String,
        waited_secs: u64,
    },

    #[error("invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
}

impl ScraperError {
    /// Whether this failure is the navigation/readiness class that maps
    /// to an upstream (bad gateway) response rather than an internal one.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            ScraperError::Navigation { .. } | ScraperError::ReadyTimeout { .. }
        )
    }
}
