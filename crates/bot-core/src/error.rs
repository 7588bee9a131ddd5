//! Error Types

use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Bot error types
#[derive(Error, Debug)]
pub enum BotError {
    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider answered but the payload was unusable
    #[error("Empty completion from {0}")]
    EmptyCompletion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl BotError {
    /// Check if error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_) | Self::RateLimited(_)
        )
    }

    /// Map an HTTP status from a provider API onto an error variant
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::RateLimited(body),
            500..=599 => Self::ProviderUnavailable(format!("HTTP {status}: {body}")),
            _ => Self::Provider(format!("HTTP {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(BotError::from_status(401, "nope"), BotError::Auth(_)));
        assert!(matches!(BotError::from_status(429, "slow down"), BotError::RateLimited(_)));
        assert!(BotError::from_status(503, "down").is_retryable());
        assert!(!BotError::from_status(400, "bad").is_retryable());
    }
}
