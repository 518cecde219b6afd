use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod app;
mod config;
mod inference;
mod model;
mod prompts;
mod rate_limit;
#[cfg(test)]
mod test_support;

use app::AppState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Config / shared state
    // -----------------------------
    let config = Config::from_env()?;
    let state = AppState::from_config(&config);

    let app = app::router(state, &config.public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(model = %config.gemini.model, "server running on http://localhost:{}", config.port);
    info!(public_dir = %config.public_dir.display(), "serving static front-end");

    // Peer addresses key the rate limiter.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
