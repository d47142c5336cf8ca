//! Companion Gateway - chat and voice relay for an LLM companion persona
//!
//! Accepts a text or voice message, optionally transcribes it, asks an LLM
//! provider for a reply in the companion's voice, and returns the reply with
//! an emotion tag and an estimated speech duration.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    HTTP API                          │
//! │   /health  │  /api/status  │  /api/chat  │ /api/voice│
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │   SpeechTranscriber (Whisper)  →  ProviderClient    │
//! │                                   (Gemini)          │
//! └────────────────────┬────────────────────────────────┘
//!                      │ on failure / no key
//! ┌────────────────────▼────────────────────────────────┐
//! │              FallbackResponder (templates)          │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod emotion;
pub mod error;
pub mod fallback;
pub mod persona;
pub mod provider;
pub mod reply;
pub mod speech;

pub use config::Config;
pub use emotion::Emotion;
pub use error::{Error, Result};
pub use fallback::FallbackResponder;
pub use persona::Persona;
pub use provider::{ChatProvider, GeminiProvider, ProviderClient};
pub use reply::Reply;
pub use speech::{SpeechTranscriber, SttBackend, TranscriptSegment, WhisperHttpBackend};
