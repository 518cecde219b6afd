use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::{api::types::ErrorBody, inference::GeminiError, model::generation::InvalidTopic};

/// Every way a request can fail. Each kind maps to exactly one status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidTopic(#[from] InvalidTopic),
    #[error("Request body too large.")]
    PayloadTooLarge,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Rate limit exceeded. Try again later.")]
    RateLimited { retry_after: Duration },
    /// Upstream answered with a non-success status; its code and raw body are forwarded.
    #[error("Gemini API request failed.")]
    Upstream { status: u16, details: String },
    #[error("Empty response from model.")]
    EmptyOutput,
    #[error("Server error")]
    Unexpected { details: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidTopic(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::EmptyOutput => StatusCode::BAD_GATEWAY,
            ApiError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::Upstream { details, .. } | ApiError::Unexpected { details } => {
                Some(details.clone())
            }
            _ => None,
        }
    }
}

impl From<GeminiError> for ApiError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Status { status, body } => ApiError::Upstream {
                status,
                details: body,
            },
            other => ApiError::Unexpected {
                details: other.to_string(),
            },
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        ApiError::Unexpected {
            details: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unexpected { details } = &self {
            error!(%details, "generation failed unexpectedly");
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        let mut res = (status, Json(body)).into_response();

        if let ApiError::RateLimited { retry_after } = self {
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            res.headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        res
    }
}
