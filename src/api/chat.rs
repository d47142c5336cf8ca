//! Text chat endpoint

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::Deserialize;

use super::{ApiError, ApiState};
use crate::Reply;

/// Longest accepted message, in characters
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .with_state(state)
}

/// Relay a message to the provider and return text, emotion and duration
async fn chat(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Reply>, ApiError> {
    let Json(request) = payload?;
    validate_message(&request.message)?;

    let reply = state.provider.respond(&request.message).await;
    tracing::info!(emotion = %reply.emotion, tts_ms = reply.tts_duration_ms, "chat reply");

    Ok(Json(reply))
}

/// Check the 1..=4000 character bound
///
/// # Errors
///
/// Returns `ApiError::InvalidMessage` when the message is empty or too long
pub fn validate_message(message: &str) -> Result<(), ApiError> {
    let chars = message.chars().count();
    if chars == 0 {
        return Err(ApiError::InvalidMessage("message must not be empty".to_string()));
    }
    if chars > MAX_MESSAGE_CHARS {
        return Err(ApiError::InvalidMessage(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters (got {chars})"
        )));
    }
    Ok(())
}
