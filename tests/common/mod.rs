//! Shared test utilities

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request};
use companion_gateway::api::{self, ApiState};
use companion_gateway::{Error, ProviderClient, Result, SpeechTranscriber, SttBackend, TranscriptSegment};
use tokio::net::TcpListener;

pub const TEST_ORIGIN: &str = "http://localhost:3000";

pub const BOUNDARY: &str = "companion-test-boundary";

/// Build the full API router around the given backends
pub fn build_router(provider: ProviderClient, transcriber: SpeechTranscriber) -> Router {
    api::router(Arc::new(ApiState::new(provider, transcriber)), TEST_ORIGIN)
        .expect("valid test origin")
}

/// Router with mock replies and no transcription model
pub fn mock_router() -> Router {
    build_router(ProviderClient::mock(), SpeechTranscriber::unavailable())
}

/// Collect a response body as JSON
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// POST a JSON body to `/api/chat`
pub fn chat_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart body with one file field
pub fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart upload to `/api/voice`
pub fn voice_request(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/voice")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(field, file_name, data)))
        .unwrap()
}

/// STT backend that remembers which file it was given
pub struct RecordingBackend {
    segments: Option<Vec<&'static str>>,
    seen: Mutex<Option<(PathBuf, bool, Vec<u8>)>>,
}

impl RecordingBackend {
    /// Backend that recognizes `segments`, or fails when `None`
    pub fn new(segments: Option<Vec<&'static str>>) -> Arc<Self> {
        Arc::new(Self {
            segments,
            seen: Mutex::new(None),
        })
    }

    /// Whether `transcribe` ran at all
    pub fn was_called(&self) -> bool {
        self.seen.lock().unwrap().is_some()
    }

    /// Path of the file handed to the backend
    pub fn seen_path(&self) -> PathBuf {
        self.seen.lock().unwrap().as_ref().expect("backend was called").0.clone()
    }

    /// Whether the file existed while the backend ran
    pub fn existed_during_call(&self) -> bool {
        self.seen.lock().unwrap().as_ref().expect("backend was called").1
    }

    /// File contents seen by the backend
    pub fn seen_bytes(&self) -> Vec<u8> {
        self.seen.lock().unwrap().as_ref().expect("backend was called").2.clone()
    }
}

#[async_trait]
impl SttBackend for RecordingBackend {
    async fn transcribe(&self, audio_path: &Path) -> Result<Vec<TranscriptSegment>> {
        let bytes = std::fs::read(audio_path).unwrap_or_default();
        *self.seen.lock().unwrap() = Some((audio_path.to_path_buf(), audio_path.exists(), bytes));

        self.segments
            .clone()
            .map(|texts| texts.into_iter().map(TranscriptSegment::text).collect())
            .ok_or_else(|| Error::Stt("recognizer unavailable".to_string()))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Serve `router` on a loopback port and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
