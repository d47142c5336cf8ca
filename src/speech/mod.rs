//! Speech-to-text for uploaded voice messages
//!
//! [`SpeechTranscriber::transcribe`] always yields text. When no backend is
//! configured, the backend fails, or it hears nothing, the transcript is a
//! placeholder that mentions the upload size.

mod whisper;

pub use whisper::WhisperHttpBackend;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// One recognized span of speech
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    /// Start offset in seconds, when the backend reports it
    pub start: Option<f64>,
    /// End offset in seconds, when the backend reports it
    pub end: Option<f64>,
}

impl TranscriptSegment {
    /// Segment with text only
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            end: None,
        }
    }
}

/// A speech recognition backend
#[async_trait]
pub trait SttBackend: Send + Sync {
    /// Recognize speech in the audio file at `audio_path`
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or recognition fails
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Transcribes audio files, degrading to a size placeholder
#[derive(Clone, Default)]
pub struct SpeechTranscriber {
    backend: Option<Arc<dyn SttBackend>>,
}

impl std::fmt::Debug for SpeechTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechTranscriber")
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl SpeechTranscriber {
    /// Transcriber without a model; every call returns the placeholder
    #[must_use]
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// Transcriber using `backend`
    #[must_use]
    pub fn with_backend(backend: Arc<dyn SttBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Build from configuration, leaving the transcriber unavailable when no
    /// endpoint is set
    #[must_use]
    pub fn from_config(config: crate::config::SttConfig) -> Self {
        let Some(base_url) = config.base_url else {
            tracing::info!("no STT endpoint configured, voice transcripts will be placeholders");
            return Self::unavailable();
        };

        tracing::info!(url = %base_url, model = %config.model, "Whisper STT configured");
        Self::with_backend(Arc::new(WhisperHttpBackend::new(
            base_url,
            config.model,
            config.language,
            config.api_key,
        )))
    }

    /// Whether a recognition backend is configured
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Transcribe the audio file at `audio_path`
    pub async fn transcribe(&self, audio_path: &Path) -> String {
        if let Some(backend) = &self.backend {
            match backend.transcribe(audio_path).await {
                Ok(segments) => {
                    let text = join_segments(&segments);
                    if !text.is_empty() {
                        tracing::info!(backend = backend.name(), chars = text.chars().count(), "transcription complete");
                        return text;
                    }
                    tracing::debug!(backend = backend.name(), "transcription was empty");
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), error = %e, "transcription failed");
                }
            }
        }

        let size = tokio::fs::metadata(audio_path)
            .await
            .map(|m| m.len())
            .unwrap_or_default();
        placeholder(size)
    }
}

/// Join non-empty segment texts with single spaces
#[must_use]
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Placeholder transcript describing an upload of `bytes` bytes
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn placeholder(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    format!("음성으로 전달된 메시지 (약 {kb:.1}KB)")
}
