use reqwest::Client as HttpClient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::GeminiConfig;

#[derive(Debug, Error)]
pub enum GeminiError {
    /// Non-2xx answer; `body` is the raw upstream text.
    #[error("Gemini API returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to parse Gemini response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".into()),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    /// A `null` entry stands for a candidate with no content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Option<Candidate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GenerateContentResponse {
    /// Parses a success body. Anything that is valid JSON but not an object
    /// (`null`, a string, an array) carries no candidates.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }

    /// Newline-joined text of every part of the first candidate. Parts without
    /// text contribute an empty string; no candidate yields an empty string.
    pub fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(Option::as_ref)
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self::with_http_client(HttpClient::new(), config)
    }

    pub fn with_http_client(http: HttpClient, config: &GeminiConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                config.model
            ),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One `generateContent` call. No retries.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(GenerateContentResponse::from_body(&body)?)
    }
}
