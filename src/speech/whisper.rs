//! OpenAI-compatible Whisper transcription backend
//!
//! Works against OpenAI itself or a self-hosted server exposing the same
//! `/v1/audio/transcriptions` route (faster-whisper-server, whisper.cpp).

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{SttBackend, TranscriptSegment};
use crate::{Error, Result};

/// `verbose_json` transcription response
#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Vec<SegmentResponse>,
}

#[derive(Deserialize)]
struct SegmentResponse {
    #[serde(default)]
    text: String,
    start: Option<f64>,
    end: Option<f64>,
}

impl TranscriptionResponse {
    fn into_segments(self) -> Vec<TranscriptSegment> {
        if self.segments.is_empty() {
            return vec![TranscriptSegment::text(self.text)];
        }

        self.segments
            .into_iter()
            .map(|s| TranscriptSegment {
                text: s.text,
                start: s.start,
                end: s.end,
            })
            .collect()
    }
}

/// Whisper transcription over HTTP
pub struct WhisperHttpBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    language: Option<String>,
    api_key: Option<SecretString>,
}

impl WhisperHttpBackend {
    /// Create a new Whisper backend
    #[must_use]
    pub fn new(
        base_url: String,
        model: String,
        language: Option<String>,
        api_key: Option<SecretString>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            language,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/audio/transcriptions", self.base_url)
    }

    /// MIME type for an audio file extension
    fn mime_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "mp3" | "mpeg" => "audio/mpeg",
            "m4a" | "mp4" => "audio/mp4",
            "wav" => "audio/wav",
            "webm" => "audio/webm",
            "ogg" | "oga" | "opus" => "audio/ogg",
            "flac" => "audio/flac",
            _ => "application/octet-stream",
        }
    }
}

#[async_trait]
impl SttBackend for WhisperHttpBackend {
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>> {
        let audio = tokio::fs::read(audio_path).await?;
        let extension = audio_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("webm");
        let mime_type = Self::mime_for_extension(extension);

        tracing::debug!(audio_bytes = audio.len(), mime_type, "starting Whisper transcription");

        let part = Part::bytes(audio)
            .file_name(format!("audio.{extension}"))
            .mime_str(mime_type)
            .map_err(|e| Error::Stt(format!("invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .part("file", part);

        if let Some(ref lang) = self.language {
            form = form.text("language", lang.clone());
        }

        let mut request = self.client.post(self.endpoint()).multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: TranscriptionResponse = response.json().await?;
        Ok(result.into_segments())
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}
