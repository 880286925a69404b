use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkstub::{
    auth::SessionStore,
    config::AppConfig,
    store::{Latency, LinkStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkstub=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    tracing::info!("Starting linkstub on {}:{}", config.host, config.port);
    tracing::info!("Base URL: {}", config.base_url);

    // Seed the in-memory store
    let latency = if config.mock_latency {
        Latency::realistic()
    } else {
        Latency::none()
    };
    let store = LinkStore::seeded(config.seed, latency);
    match config.seed {
        Some(seed) => tracing::info!("Fixtures generated from fixed seed {seed}"),
        None => tracing::info!("Fixtures generated from OS entropy (set SEED to pin them)"),
    }

    let sessions = SessionStore::new(config.session_duration_hours);

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        config,
        store,
        sessions,
    });

    let app = linkstub::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
