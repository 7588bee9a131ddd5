//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for all LLM backends (OpenAI, Ollama, etc.)
//! so the classifier works with any of them without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bot_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = OpenAiProvider::from_config(OpenAiConfig::new(api_key))?;
//! let completion = provider.complete(&messages, &GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4", "llama3.2")
    pub model: String,

    /// Sampling temperature; `None` leaves the backend default
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate; `None` leaves the backend default
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4".into(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    #[serde(other)]
    Other,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The classifier works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name, used in logs
    fn name(&self) -> &str;

    /// Check if the provider is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(Completion {
                content: last,
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            })
        }
    }

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.model, "gpt-4");
        assert!(opts.temperature.is_none());
        assert!(opts.max_tokens.is_none());
    }

    #[test]
    fn test_unknown_finish_reason() {
        let reason: FinishReason = serde_json::from_str(r#""tool_calls""#).unwrap();
        assert_eq!(reason, FinishReason::Other);
    }

    #[tokio::test]
    async fn test_provider_through_trait_object() {
        let provider: Box<dyn LlmProvider> = Box::new(EchoProvider);
        let messages = vec![Message::system("rules"), Message::new(Role::User, "ping")];
        let completion = provider
            .complete(&messages, &GenerationOptions::with_model("echo-1"))
            .await
            .unwrap();
        assert_eq!(completion.content, "ping");
        assert_eq!(completion.model, "echo-1");
    }
}
