use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
