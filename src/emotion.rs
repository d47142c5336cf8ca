//! Coarse emotion tags attached to companion replies
//!
//! Models are asked to end their output with a line such as `emotion: happy`.
//! The tag is read back here and removed from the text shown to the user.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// First `emotion: <label>` marker anywhere in the text
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)emotion\s*[:\-]\s*(neutral|base|happy|sad)").expect("valid regex")
});

/// Marker at the very end of the text, with the whitespace before it
static TRAILING_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*emotion\s*[:\-]\s*(neutral|base|happy|sad)\s*$").expect("valid regex")
});

/// Emotional state of the companion for a single reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Calm, default state (`base` in older clients)
    #[default]
    #[serde(alias = "base")]
    Neutral,
    Happy,
    Sad,
}

impl Emotion {
    /// All emotions, in declaration order
    pub const ALL: [Self; 3] = [Self::Neutral, Self::Happy, Self::Sad];

    /// Wire label for this emotion
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Sad => "sad",
        }
    }

    /// Parse a label case-insensitively, accepting `base` for neutral
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "neutral" | "base" => Some(Self::Neutral),
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            _ => None,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read the emotion marker from raw model output
#[must_use]
pub fn extract_emotion_tag(text: &str) -> Option<Emotion> {
    TAG_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Emotion::from_label(m.as_str()))
}

/// Remove a trailing emotion marker so it never reaches the user
#[must_use]
pub fn strip_emotion_tag(text: &str) -> String {
    TRAILING_TAG_REGEX.replace(text, "").trim().to_string()
}
