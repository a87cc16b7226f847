mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(dealdb_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = match &config.platforms_path {
        Some(path) => dealdb_core::load_platforms(path)?,
        None => dealdb_core::PlatformRegistry::builtin(),
    };
    tracing::info!(
        platforms = ?registry.keys().collect::<Vec<_>>(),
        "loaded platform registry"
    );

    let pool_config = dealdb_db::PoolConfig::from_app_config(&config);
    let pool = dealdb_db::connect_pool(&config.database_url, pool_config).await?;
    dealdb_db::run_migrations(&pool).await?;

    let fetch_settings = dealdb_scraper::FetchSettings::new(
        config.webdriver_url.clone(),
        config.nav_timeout_secs,
        config.ready_timeout_secs,
    );

    let app = build_app(AppState {
        pool,
        registry: Arc::new(registry),
        fetch_settings: Arc::new(fetch_settings),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
