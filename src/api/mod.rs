use axum::{middleware, routing::post, Router};

use crate::{app::AppState, rate_limit::enforce_rate_limit};

pub mod error;
pub mod handlers;
pub mod types;

/// Generation API, gated by the per-client rate limiter.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/generate",
            post(handlers::generate).fallback(handlers::method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(state, enforce_rate_limit))
}
