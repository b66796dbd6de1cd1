use anyhow::{Context, Result};
use realty_catalog::api::sessions::SessionStore;
use realty_catalog::api::{router, AppState};
use realty_catalog::catalog::load::load_catalog;
use realty_catalog::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("🏠 Starting realty catalog API server...");

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    info!("📦 Loading catalog...");
    let catalog = load_catalog(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {:?}", config.catalog_path))?;
    info!("✅ Loaded {} properties", catalog.len());

    let sessions = SessionStore::new(config.session_idle_timeout, config.max_sessions);
    let app = router(AppState::new(catalog, config.similar_limit).with_sessions(sessions));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🚀 Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
