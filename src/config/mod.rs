//! Configuration management for the companion gateway
//!
//! Every setting resolves env > TOML file > default. A `.env` file in the
//! working directory is read into the environment first.

pub mod file;

use secrecy::SecretString;

use crate::provider::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::{Error, Result};

use file::CompanionConfigFile;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default frontend origin (local Next.js dev server)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Default STT model
pub const DEFAULT_STT_MODEL: &str = "whisper-1";

/// Companion gateway configuration
#[derive(Debug)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Speech-to-text configuration
    pub stt: SttConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

/// LLM provider configuration
#[derive(Debug)]
pub struct LlmConfig {
    /// Gemini API key; `None` selects mock replies
    pub api_key: Option<SecretString>,

    /// Gemini model identifier
    pub model: String,

    /// Gemini API base URL
    pub base_url: String,
}

/// Speech-to-text configuration
#[derive(Debug)]
pub struct SttConfig {
    /// Transcription server base URL; `None` disables transcription
    pub base_url: Option<String>,

    /// Model identifier sent with each request
    pub model: String,

    /// Spoken language hint
    pub language: Option<String>,

    /// Bearer token for the transcription server
    pub api_key: Option<SecretString>,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Single origin allowed by CORS
    pub cors_origin: String,
}

impl Config {
    /// Load configuration from `.env`, the process environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a resolved setting is invalid
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }

        let fc = file::load_config_file();
        Self::from_sources(|key| std::env::var(key).ok(), fc)
    }

    /// Resolve configuration from an environment lookup and a parsed config file
    ///
    /// # Errors
    ///
    /// Returns error if a resolved setting is invalid
    pub fn from_sources<F>(env: F, fc: CompanionConfigFile) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let llm = LlmConfig {
            api_key: var("GEMINI_API_KEY")
                .or(fc.llm.api_key)
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            model: var("COMPANION_LLM_MODEL")
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: var("COMPANION_LLM_BASE_URL")
                .or(fc.llm.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let stt = SttConfig {
            base_url: var("COMPANION_STT_URL").or(fc.stt.base_url),
            model: var("COMPANION_STT_MODEL")
                .or(fc.stt.model)
                .unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
            language: var("COMPANION_STT_LANGUAGE").or(fc.stt.language),
            api_key: var("COMPANION_STT_API_KEY")
                .or_else(|| var("OPENAI_API_KEY"))
                .or(fc.stt.api_key)
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
        };

        let port = match var("COMPANION_PORT").or_else(|| var("PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid port: {raw}")))?,
            None => fc.server.port.unwrap_or(DEFAULT_PORT),
        };

        let server = ServerConfig {
            host: var("COMPANION_HOST")
                .or(fc.server.host)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            cors_origin: var("COMPANION_CORS_ORIGIN")
                .or(fc.server.cors_origin)
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        };

        let config = Self { llm, stt, server };
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would otherwise fail at request time
    ///
    /// # Errors
    ///
    /// Returns error if the CORS origin is not an http(s) origin
    pub fn validate(&self) -> Result<()> {
        validate_origin(&self.server.cors_origin)
    }
}

/// Ensure `origin` is a bare `http(s)://host[:port]` origin
///
/// # Errors
///
/// Returns error if `origin` has another scheme, a path, or invalid characters
pub fn validate_origin(origin: &str) -> Result<()> {
    let rest = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .ok_or_else(|| Error::Config(format!("CORS origin must start with http:// or https://: {origin}")))?;

    if rest.is_empty() || rest.contains('/') || rest.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::Config(format!("invalid CORS origin: {origin}")));
    }

    Ok(())
}
