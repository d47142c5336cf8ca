//! Provider and transcription backends against loopback HTTP servers

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use companion_gateway::{
    Emotion, GeminiProvider, ProviderClient, SpeechTranscriber, WhisperHttpBackend,
};
use secrecy::SecretString;
use serde_json::{Value, json};

mod common;
use common::spawn_server;

const MODEL: &str = "gemini-test";
const API_KEY: &str = "test-gemini-key";

/// What the fake Gemini endpoint received
#[derive(Default)]
struct Captured {
    api_key: Option<String>,
    body: Option<Value>,
}

type Shared = Arc<Mutex<Captured>>;

/// Fake `generateContent` endpoint answering with `reply`
fn gemini_router(captured: Shared, status: StatusCode, reply: Value) -> Router {
    Router::new()
        .route(
            "/v1beta/models/gemini-test:generateContent",
            post(
                move |State(captured): State<Shared>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        let mut guard = captured.lock().unwrap();
                        guard.api_key = headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(ToString::to_string);
                        guard.body = Some(body);
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured)
}

fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn gemini_client(base_url: String) -> ProviderClient {
    let provider = GeminiProvider::new(
        SecretString::from(API_KEY.to_string()),
        MODEL.to_string(),
        base_url,
    )
    .unwrap();
    ProviderClient::with_backend(Arc::new(provider))
}

#[tokio::test]
async fn test_gemini_reply_is_tagged_and_stripped() {
    let captured = Shared::default();
    let base_url = spawn_server(gemini_router(
        captured.clone(),
        StatusCode::OK,
        gemini_text("오, 그 소식 반갑다! 어떤 기분이었어?\nEmotion: HAPPY\n"),
    ))
    .await;

    let client = gemini_client(base_url);
    assert_eq!(client.provider_name(), "gemini");
    assert_eq!(client.model(), Some(MODEL));

    let reply = client.respond("시험 끝났어").await;

    assert_eq!(reply.emotion, Emotion::Happy);
    assert_eq!(reply.text, "오, 그 소식 반갑다! 어떤 기분이었어?");
    assert!(reply.tts_duration_ms >= 2100);

    let guard = captured.lock().unwrap();
    assert_eq!(guard.api_key.as_deref(), Some(API_KEY));

    let body = guard.body.as_ref().unwrap();
    assert!(
        body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Nova")
    );
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 7);
    assert_eq!(contents[6]["role"], "user");
    assert_eq!(contents[6]["parts"][0]["text"], "시험 끝났어");
}

#[tokio::test]
async fn test_gemini_reply_without_tag_is_neutral() {
    let base_url = spawn_server(gemini_router(
        Shared::default(),
        StatusCode::OK,
        gemini_text("너무 슬퍼하지 마. 같이 있어줄게."),
    ))
    .await;

    let reply = gemini_client(base_url).respond("hello").await;

    assert_eq!(reply.emotion, Emotion::Neutral);
    assert_eq!(reply.text, "너무 슬퍼하지 마. 같이 있어줄게.");
}

#[tokio::test]
async fn test_gemini_error_status_falls_back() {
    let base_url = spawn_server(gemini_router(
        Shared::default(),
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": { "code": 500, "message": "internal" } }),
    ))
    .await;

    let reply = gemini_client(base_url).respond("오늘 좀 우울해").await;

    assert_eq!(reply.emotion, Emotion::Sad);
    assert!(reply.text.contains("오늘 좀 우울해"));
}

#[tokio::test]
async fn test_gemini_empty_candidates_fall_back() {
    let base_url = spawn_server(gemini_router(
        Shared::default(),
        StatusCode::OK,
        json!({ "candidates": [] }),
    ))
    .await;

    let reply = gemini_client(base_url).respond("yay").await;

    assert_eq!(reply.emotion, Emotion::Happy);
    assert!(reply.text.contains("yay"));
}

#[tokio::test]
async fn test_gemini_unreachable_falls_back() {
    let reply = gemini_client("http://127.0.0.1:1".to_string())
        .respond("안녕")
        .await;

    assert_eq!(reply.emotion, Emotion::Neutral);
    assert!(reply.text.contains("안녕"));
}

/// Fake OpenAI-compatible transcription endpoint
fn whisper_router(fields: Arc<Mutex<Vec<(String, String)>>>, response: Value) -> Router {
    Router::new()
        .route(
            "/v1/audio/transcriptions",
            post(
                move |State(fields): State<Arc<Mutex<Vec<(String, String)>>>>,
                      headers: HeaderMap,
                      mut multipart: Multipart| {
                    let response = response.clone();
                    async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default()
                            .to_string();

                        let mut seen = vec![("authorization".to_string(), auth)];
                        while let Some(field) = multipart.next_field().await.unwrap() {
                            let name = field.name().unwrap_or_default().to_string();
                            let value = if name == "file" {
                                let file_name = field.file_name().unwrap_or_default().to_string();
                                let bytes = field.bytes().await.unwrap();
                                format!("{file_name}:{}", bytes.len())
                            } else {
                                field.text().await.unwrap()
                            };
                            seen.push((name, value));
                        }
                        *fields.lock().unwrap() = seen;

                        Json(response)
                    }
                },
            ),
        )
        .with_state(fields)
}

fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn test_whisper_segments_are_joined() {
    let fields = Arc::new(Mutex::new(Vec::new()));
    let base_url = spawn_server(whisper_router(
        fields.clone(),
        json!({
            "text": "ignored when segments exist",
            "segments": [
                { "id": 0, "start": 0.0, "end": 1.2, "text": " 오늘은 " },
                { "id": 1, "start": 1.2, "end": 1.4, "text": "  " },
                { "id": 2, "start": 1.4, "end": 2.8, "text": "별이 잘 보여" }
            ]
        }),
    ))
    .await;

    let backend = WhisperHttpBackend::new(
        base_url,
        "whisper-1".to_string(),
        Some("ko".to_string()),
        Some(SecretString::from("sk-test".to_string())),
    );
    let transcriber = SpeechTranscriber::with_backend(Arc::new(backend));

    let audio = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
    std::fs::write(audio.path(), [7_u8; 300]).unwrap();

    let transcript = transcriber.transcribe(audio.path()).await;
    assert_eq!(transcript, "오늘은 별이 잘 보여");

    let fields = fields.lock().unwrap();
    assert_eq!(field(&fields, "authorization"), Some("Bearer sk-test"));
    assert_eq!(field(&fields, "model"), Some("whisper-1"));
    assert_eq!(field(&fields, "response_format"), Some("verbose_json"));
    assert_eq!(field(&fields, "language"), Some("ko"));
    assert_eq!(field(&fields, "file"), Some("audio.wav:300"));
}

#[tokio::test]
async fn test_whisper_plain_text_response() {
    let base_url = spawn_server(whisper_router(
        Arc::new(Mutex::new(Vec::new())),
        json!({ "text": " 안녕 노바 " }),
    ))
    .await;

    let backend = WhisperHttpBackend::new(base_url, "whisper-1".to_string(), None, None);
    let transcriber = SpeechTranscriber::with_backend(Arc::new(backend));

    let audio = tempfile::Builder::new().suffix(".webm").tempfile().unwrap();
    std::fs::write(audio.path(), b"webm").unwrap();

    assert_eq!(transcriber.transcribe(audio.path()).await, "안녕 노바");
}

#[tokio::test]
async fn test_whisper_unreachable_returns_placeholder() {
    let backend = WhisperHttpBackend::new("http://127.0.0.1:1".to_string(), "whisper-1".to_string(), None, None);
    let transcriber = SpeechTranscriber::with_backend(Arc::new(backend));

    let audio = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(audio.path(), vec![0_u8; 5120]).unwrap();

    assert_eq!(
        transcriber.transcribe(audio.path()).await,
        "음성으로 전달된 메시지 (약 5.0KB)"
    );
}
