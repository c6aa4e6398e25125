//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// The OpenAI-compatible endpoint of the Gemini API, used when a Gemini key
/// is configured without an explicit base URL.
const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// When absent the service runs against the in-memory store.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub llm_api_key: Option<String>,
    pub llm_api_base: Option<String>,
    pub tutor_model: String,
    pub quiz_model: String,
    pub diagram_model: String,
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL").ok();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load LLM Settings ---
        // A Gemini key takes precedence and implies the Gemini OpenAI-compatible
        // endpoint unless an explicit base URL is configured.
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let llm_api_base = std::env::var("LLM_API_BASE").ok().or_else(|| {
            gemini_api_key
                .as_ref()
                .map(|_| GEMINI_OPENAI_BASE.to_string())
        });
        let llm_api_key = gemini_api_key.or(openai_api_key);

        let tutor_model =
            std::env::var("TUTOR_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let quiz_model =
            std::env::var("QUIZ_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
        let diagram_model =
            std::env::var("DIAGRAM_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());

        let allowed_origin = std::env::var("ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            llm_api_key,
            llm_api_base,
            tutor_model,
            quiz_model,
            diagram_model,
            allowed_origin,
        })
    }
}
