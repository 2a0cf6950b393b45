//! Energy-efficiency advice generation.
//!
//! [`AdviceProvider`] has two implementations: [`FallbackAdviceProvider`]
//! serves a fixed list, [`LlmAdviceProvider`] asks a text-generation backend.
//! [`select_advice_provider`] picks one from configuration at startup.

mod fallback;
mod llm;

pub use fallback::{FallbackAdviceProvider, FALLBACK_RECOMMENDATIONS};
pub use llm::{build_prompt, parse_recommendations, LlmAdviceProvider, ADVICE_TEMPERATURE};

use crate::config::LlmConfig;
use crate::models::Home;
use crate::services::providers::openai::{OpenAiConfig, OpenAiTextProvider};
use crate::services::providers::{ProviderError, TextProvider};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use secrecy::Secret;
use service_core::error::AppError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdviceError {
    #[error("Advice backend unavailable: {0}")]
    BackendUnavailable(#[from] ProviderError),
}

/// Produces an ordered list of recommendations for a home.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn generate_advice(&self, home: &Home) -> Result<Vec<String>, AdviceError>;

    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// Pick the backend-backed provider when a credential is configured,
/// otherwise the fixed fallback.
pub fn select_advice_provider(config: &LlmConfig) -> Result<Arc<dyn AdviceProvider>, AppError> {
    let Some(credential) = config.credential() else {
        tracing::info!("No text-generation credential configured, serving fallback advice");
        return Ok(Arc::new(FallbackAdviceProvider));
    };

    let client = cached_client(credential, config).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("Failed to create advice backend client: {}", e))
    })?;

    tracing::info!(model = %config.model, "Serving advice from text-generation backend");
    Ok(Arc::new(LlmAdviceProvider::new(client, config.model.clone())))
}

/// Cache key: credential plus endpoint.
type ClientKey = (String, String);

static CLIENT_CACHE: Lazy<Mutex<Option<(ClientKey, Arc<OpenAiTextProvider>)>>> =
    Lazy::new(|| Mutex::new(None));

/// Process-wide backend client, rebuilt only when the credential or endpoint changes.
///
/// Construction happens under the lock so concurrent first use builds one client.
fn cached_client(
    credential: &str,
    config: &LlmConfig,
) -> Result<Arc<dyn TextProvider>, ProviderError> {
    let key = (credential.to_string(), config.base_url.clone());
    let mut slot = CLIENT_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some((cached_key, client)) = slot.as_ref() {
        if *cached_key == key {
            return Ok(client.clone());
        }
    }

    let client = Arc::new(OpenAiTextProvider::new(OpenAiConfig {
        api_key: Secret::new(credential.to_string()),
        base_url: config.base_url.clone(),
        timeout: Duration::from_secs(config.timeout_seconds),
    })?);
    *slot = Some((key, client.clone()));

    Ok(client)
}
