//! Error Types for Crypto Assistant

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Price oracle returned HTTP {0}")]
    OracleStatus(u16),

    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("Language model error: {0}")]
    Provider(#[from] bot_core::BotError),

    #[error("Malformed classification ({source}): {raw}")]
    MalformedClassification {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AssistantError {
    /// Check if a later attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::OracleStatus(status) => *status >= 500,
            Self::Provider(e) => e.is_retryable(),
            _ => false,
        }
    }
}
