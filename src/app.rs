use std::{path::Path, sync::Arc};

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};

use crate::{
    api,
    config::Config,
    inference::{GeminiClient, InferenceService},
    rate_limit::FixedWindowLimiter,
};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub infer: Arc<InferenceService>,
    pub limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            infer: Arc::new(InferenceService::new(GeminiClient::new(&config.gemini))),
            limiter: Arc::new(FixedWindowLimiter::new(config.rate_limit)),
        }
    }
}

#[derive(Serialize)]
struct Health {
    ok: bool,
    service: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        ok: true,
        service: env!("CARGO_PKG_NAME"),
    })
}

/// Full application: generation API, health check, and the static front-end
/// with `index.html` served for any path that is not a file.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    let static_files =
        ServeDir::new(public_dir).fallback(ServeFile::new(public_dir.join("index.html")));

    Router::new()
        .merge(api::router(state.clone()))
        .route("/healthz", get(health))
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
