use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, read once at startup and shared read-only.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// WebDriver endpoint the page fetcher opens sessions against
    /// (chromedriver or a Selenium hub).
    pub webdriver_url: String,
    /// Optional YAML file overriding the built-in platform registry.
    pub platforms_path: Option<PathBuf>,
    /// Page-load budget for one navigation. Exceeding it is fatal for
    /// the scrape cycle; there is no retry.
    pub nav_timeout_secs: u64,
    /// Deadline for the item-card readiness poll after navigation and
    /// after the lazy-load scroll.
    pub ready_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("webdriver_url", &self.webdriver_url)
            .field("platforms_path", &self.platforms_path)
            .field("nav_timeout_secs", &self.nav_timeout_secs)
            .field("ready_timeout_secs", &self.ready_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
