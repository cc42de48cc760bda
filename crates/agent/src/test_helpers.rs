//! Shared test helpers for service tests.

use docchat_core::error::GenerationError;
use docchat_core::provider::{GenerationRequest, GenerationResponse, Provider, Usage};
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted results and records
/// every prompt it was sent.
///
/// Panics if more calls are made than results provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<Result<GenerationResponse, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<GenerationResponse, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that answers every call in order with `texts`.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(make_text_response(t))).collect())
    }

    /// Create a provider whose only call fails with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let mut prompts = self.prompts.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let count = prompts.len();

        if count >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                count,
                responses.len()
            );
        }

        prompts.push(request.prompt);
        responses[count].clone()
    }
}

/// Create a plain text response.
pub fn make_text_response(text: &str) -> GenerationResponse {
    GenerationResponse {
        text: text.to_string(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}
