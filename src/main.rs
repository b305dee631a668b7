use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use focused_news::config::Config;
use focused_news::fetcher::Fetcher;
use focused_news::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "focused_news=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load("feeds.toml")?;
    info!(
        "Loaded {} feeds and {} watch keywords from configuration",
        config.feeds.len(),
        config.filter.watch_keywords.len()
    );

    let fetcher = Fetcher::new(config.utc_offset_hours)?;
    let bind = config.bind.clone();

    let state = Arc::new(AppState {
        config: Arc::new(config),
        fetcher,
    });

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!("Server starting on http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
