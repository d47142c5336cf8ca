//! Mock replies used when no LLM provider is configured or reachable
//!
//! Classification is a keyword scan; the reply is a template with the user's
//! message spliced in. Nothing here can fail.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Emotion, Reply};

/// Duration floor for every reply
pub const BASE_TTS_MS: u64 = 2100;

/// Extra milliseconds per reply character
pub const TTS_MS_PER_CHAR: u64 = 25;

/// Cap on the length-proportional bonus
pub const MAX_TTS_BONUS_MS: u64 = 2000;

const HAPPY_KEYWORDS: &[&str] = &["기뻐", "좋아", "행복", "yay", "great"];

const SAD_KEYWORDS: &[&str] = &["슬퍼", "우울", "down", "힘들", "외로", "sad", "ㅠ", "ㅜ"];

const PLACEHOLDER: &str = "{user_message}";

const NEUTRAL_TEMPLATES: &[&str] = &[
    "들려주신 \"{user_message}\" 얘기, 밤공기처럼 조용히 마음에 스며드네요.",
    "{user_message} 라고 했을 때 떠오르는 생각을 천천히 풀어볼게요.",
];

const HAPPY_TEMPLATES: &[&str] = &[
    "그 얘기만 들어도 얼굴이 환해져요. \"{user_message}\" 덕분에 밤하늘이 더 밝은 느낌이에요.",
    "{user_message}라니, 소소한 기쁨이 파도처럼 번지네요.",
];

const SAD_TEMPLATES: &[&str] = &[
    "\"{user_message}\" 이야기를 들으니 마음이 조금 내려앉네요. 이 감정을 함께 살펴볼까요?",
    "조용히 듣고 있어요. {user_message}라고 말할 때 마음이 어떤지 더 알려줄래요?",
];

/// Deterministic stand-in for a live model
#[derive(Debug, Clone, Copy)]
pub struct FallbackResponder {
    base_tts_ms: u64,
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackResponder {
    /// Create a fallback responder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base_tts_ms: BASE_TTS_MS,
        }
    }

    /// Classify a message by keyword; happy wins over sad
    #[must_use]
    pub fn detect_emotion(message: &str) -> Emotion {
        let lowered = message.to_lowercase();
        if HAPPY_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            Emotion::Happy
        } else if SAD_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            Emotion::Sad
        } else {
            Emotion::Neutral
        }
    }

    /// Estimate how long speaking `reply` would take
    #[must_use]
    pub fn estimate_tts_duration(&self, reply: &str) -> u64 {
        let chars = u64::try_from(reply.chars().count()).unwrap_or(u64::MAX);
        self.base_tts_ms + chars.saturating_mul(TTS_MS_PER_CHAR).min(MAX_TTS_BONUS_MS)
    }

    /// Build a mock reply using the thread-local RNG
    #[must_use]
    pub fn respond(&self, message: &str) -> Reply {
        self.respond_with(message, &mut rand::thread_rng())
    }

    /// Build a mock reply with a caller-supplied RNG
    #[must_use]
    pub fn respond_with<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> Reply {
        let emotion = Self::detect_emotion(message);
        let template = templates(emotion)
            .choose(rng)
            .copied()
            .unwrap_or(NEUTRAL_TEMPLATES[0]);
        let text = template.replace(PLACEHOLDER, message.trim());
        let tts_duration_ms = self.estimate_tts_duration(&text);

        Reply {
            text,
            emotion,
            tts_duration_ms,
        }
    }
}

const fn templates(emotion: Emotion) -> &'static [&'static str] {
    match emotion {
        Emotion::Neutral => NEUTRAL_TEMPLATES,
        Emotion::Happy => HAPPY_TEMPLATES,
        Emotion::Sad => SAD_TEMPLATES,
    }
}
