//! Voice message endpoint
//!
//! Upload → scoped temp file → transcript → provider reply. The temp file is
//! owned by a `NamedTempFile`, so it is removed on every exit path.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    routing::post,
};
use serde::Serialize;
use tempfile::NamedTempFile;

use super::{ApiError, ApiState};
use crate::Reply;

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Multipart field carrying the audio
pub const AUDIO_FIELD: &str = "audio";

/// Transcript used when recognition produced only whitespace
pub const BLANK_TRANSCRIPT: &str = "음성 메시지를 받았어요.";

const DEFAULT_FILE_NAME: &str = "voice-message.webm";
const DEFAULT_SUFFIX: &str = ".webm";

/// Voice response: the transcript plus the usual reply fields
#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub transcript: String,
    #[serde(flatten)]
    pub reply: Reply,
}

/// Uploaded audio blob
struct AudioUpload {
    file_name: String,
    data: Bytes,
}

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/voice", post(voice))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Transcribe an uploaded voice message and reply to it
async fn voice(
    State(state): State<Arc<ApiState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VoiceResponse>, ApiError> {
    let upload = read_audio(multipart?).await?;
    if upload.data.is_empty() {
        return Err(ApiError::BadRequest("Empty audio upload".to_string()));
    }

    tracing::debug!(file_name = %upload.file_name, bytes = upload.data.len(), "voice upload received");

    let temp = write_temp_audio(&upload.data, &audio_suffix(&upload.file_name))?;
    let transcript = state.transcriber.transcribe(temp.path()).await;
    if let Err(e) = temp.close() {
        tracing::warn!(error = %e, "failed to remove temporary audio file");
    }

    let transcript = if transcript.trim().is_empty() {
        BLANK_TRANSCRIPT.to_string()
    } else {
        transcript
    };

    let reply = state.provider.respond(&transcript).await;
    tracing::info!(emotion = %reply.emotion, tts_ms = reply.tts_duration_ms, "voice reply");

    Ok(Json(VoiceResponse { transcript, reply }))
}

/// Pull the `audio` field out of the form
async fn read_audio(mut multipart: Multipart) -> Result<AudioUpload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let data = field.bytes().await?;

        return Ok(AudioUpload { file_name, data });
    }

    Err(ApiError::BadRequest(format!("missing `{AUDIO_FIELD}` field")))
}

/// Temp file suffix taken from the upload name, `.webm` when unusable
fn audio_suffix(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| DEFAULT_SUFFIX.to_string(), |e| format!(".{e}"))
}

fn write_temp_audio(data: &[u8], suffix: &str) -> Result<NamedTempFile, ApiError> {
    let mut file = tempfile::Builder::new()
        .prefix("companion-voice-")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}
