//! Google Gemini provider (`generateContent` REST API).

use async_trait::async_trait;
use docchat_core::provider::{GenerationRequest, GenerationResponse, Provider, Usage};
use docchat_core::GenerationError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::http;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, Duration::from_secs(120))
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.into(),
            api_key: api_key.into(),
            client: http::build_client(timeout),
        }
    }

    /// Point the provider at a different endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_request_body(request: &GenerationRequest) -> serde_json::Value {
        let mut generation_config = json!({ "temperature": request.temperature });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        })
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: &ApiResponse) -> Option<String> {
        let candidate = response.candidates.first()?;
        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::NotConfigured(
                "No API key for provider 'gemini'".into(),
            ));
        }

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = Self::build_request_body(&request);

        debug!(model = %request.model, prompt_chars = request.prompt.len(), "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(http::transport_error)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, "Gemini returned error");
            return Err(http::status_error(status, error_body, &request.model));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let text = Self::extract_text(&api_response).ok_or_else(|| {
            GenerationError::MalformedResponse("missing candidates[0].content.parts[*].text".into())
        })?;

        let usage = api_response.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(GenerationResponse {
            text,
            usage,
            model: api_response.model_version.unwrap_or(request.model),
        })
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    usage_metadata: Option<ApiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}
