use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::Decision;
use crate::{api::error::ApiError, app::AppState};

/// Charges one permit to the peer address before the inner route runs.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = peer.ip().to_string();

    match state.limiter.consume(&key).await {
        Decision::Allowed { remaining } => {
            debug!(client = %key, remaining, "rate limit permit granted");
            Ok(next.run(req).await)
        }
        Decision::Denied { retry_after } => {
            debug!(client = %key, ?retry_after, "rate limit exceeded");
            Err(ApiError::RateLimited { retry_after })
        }
    }
}
