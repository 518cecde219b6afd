pub mod gemini;

pub use gemini::{GeminiClient, GeminiError};

use gemini::{Content, GenerateContentRequest, GenerationConfig};

/// Sampling settings used for every blog post.
pub const BLOG_GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    top_p: 0.95,
    max_output_tokens: 4096,
};

pub struct InferenceService {
    client: GeminiClient,
}

impl InferenceService {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Sends `prompt` as the only user message and returns the first
    /// candidate's text, which may be empty.
    pub async fn generate_completion(&self, prompt: String) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: BLOG_GENERATION_CONFIG,
        };

        let response = self.client.generate_content(&request).await?;
        Ok(response.first_candidate_text())
    }
}
