//! Text-generation backend abstractions.
//!
//! The advice service talks to a remote model through [`TextProvider`], so the
//! concrete backend (OpenAI-compatible chat completions today) can be swapped
//! or faked in tests.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Authentication rejected by provider")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Sampling parameters for a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: f32,

    /// Number of candidates to generate.
    pub candidate_count: u32,
}

/// A remote "complete this prompt" backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text for `prompt` with the given model.
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}
