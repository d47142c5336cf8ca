//! Reply returned to clients

use serde::Serialize;

use crate::Emotion;

/// A generated companion reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Visible reply text, without any emotion marker
    #[serde(rename = "reply")]
    pub text: String,
    /// Emotion tag for the avatar
    pub emotion: Emotion,
    /// Estimated speech synthesis duration in milliseconds
    pub tts_duration_ms: u64,
}
