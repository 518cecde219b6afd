use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::{
    api::{error::ApiError, types::GenerateResponse},
    app::AppState,
    model::generation::{GenerationRequest, InvalidTopic},
    prompts::build_blog_prompt,
};

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    generate_markdown(&state, payload)
        .instrument(info_span!("generate", %request_id))
        .await
        .map(Json)
}

async fn generate_markdown(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<GenerateResponse, ApiError> {
    // Unparseable bodies and a bad topic get the same answer.
    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::from(InvalidTopic)
        }
    })?;

    let req = GenerationRequest::from_json(&body)?;
    let prompt = build_blog_prompt(&req)?;

    debug!(words = req.words, prompt_len = prompt.len(), "calling Gemini");
    let markdown = state.infer.generate_completion(prompt).await?;
    if markdown.is_empty() {
        return Err(ApiError::EmptyOutput);
    }

    debug!(markdown_len = markdown.len(), "generation complete");
    Ok(GenerateResponse { markdown })
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
