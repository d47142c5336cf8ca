//! LLM provider client with mock fallback
//!
//! [`ProviderClient::respond`] never fails: missing credentials, transport
//! errors and empty completions all degrade to [`FallbackResponder`].

mod gemini;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiProvider};

use std::sync::Arc;

use async_trait::async_trait;

use crate::emotion::{extract_emotion_tag, strip_emotion_tag};
use crate::{FallbackResponder, Persona, Reply, Result};

/// A chat-completion backend
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the persona, its examples and `message`; return the raw model text
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it
    async fn complete(&self, persona: &Persona, message: &str) -> Result<String>;

    /// Provider name for logging and status
    fn name(&self) -> &'static str;

    /// Model identifier
    fn model(&self) -> &str;
}

/// Turns user messages into companion replies
pub struct ProviderClient {
    backend: Option<Arc<dyn ChatProvider>>,
    persona: Persona,
    fallback: FallbackResponder,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("provider", &self.provider_name())
            .field("model", &self.model())
            .field("persona", &self.persona.name)
            .finish_non_exhaustive()
    }
}

impl ProviderClient {
    /// Client that only ever answers from the fallback templates
    #[must_use]
    pub fn mock() -> Self {
        Self {
            backend: None,
            persona: Persona::nova(),
            fallback: FallbackResponder::new(),
        }
    }

    /// Client backed by a live provider
    #[must_use]
    pub fn with_backend(backend: Arc<dyn ChatProvider>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::mock()
        }
    }

    /// Build from configuration, degrading to mock when no key is set
    #[must_use]
    pub fn from_config(config: crate::config::LlmConfig) -> Self {
        let Some(api_key) = config.api_key else {
            tracing::info!("no Gemini API key configured, using mock replies");
            return Self::mock();
        };

        let model = config.model;
        match GeminiProvider::new(api_key, model.clone(), config.base_url) {
            Ok(provider) => {
                tracing::info!(model = %model, "Gemini provider configured");
                Self::with_backend(Arc::new(provider))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Gemini init failed, using mock fallback");
                Self::mock()
            }
        }
    }

    /// Whether a live provider is configured
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.backend.is_some()
    }

    /// Name of the active provider, `mock` when none
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.backend.as_ref().map_or("mock", |b| b.name())
    }

    /// Model identifier of the active provider
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.backend.as_ref().map(|b| b.model())
    }

    /// Produce a reply for `message`
    pub async fn respond(&self, message: &str) -> Reply {
        let Some(backend) = &self.backend else {
            return self.fallback.respond(message);
        };

        let raw = match backend.complete(&self.persona, message).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    provider = backend.name(),
                    error = %e,
                    "provider request failed, using mock fallback"
                );
                return self.fallback.respond(message);
            }
        };

        let raw = raw.trim();
        if raw.is_empty() {
            tracing::warn!(provider = backend.name(), "provider returned empty reply, using mock fallback");
            return self.fallback.respond(message);
        }

        let reply = self.parse_completion(raw);
        if reply.text.is_empty() {
            tracing::warn!(provider = backend.name(), "provider reply was only an emotion tag, using mock fallback");
            return self.fallback.respond(message);
        }

        reply
    }

    /// Split raw model output into visible text and emotion
    fn parse_completion(&self, raw: &str) -> Reply {
        let emotion = extract_emotion_tag(raw).unwrap_or_default();
        let text = strip_emotion_tag(raw);
        let tts_duration_ms = self.fallback.estimate_tts_duration(&text);

        tracing::debug!(%emotion, chars = text.chars().count(), "parsed provider reply");

        Reply {
            text,
            emotion,
            tts_duration_ms,
        }
    }
}
