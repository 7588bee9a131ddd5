//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference.

use async_trait::async_trait;
use bot_core::{
    error::{BotError, Result},
    message::{Message, Role},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider},
};
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, ChatMessageResponse, MessageRole, request::ChatMessageRequest},
};

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
        }
    }
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
}

impl OllamaProvider {
    /// Create from configuration
    pub fn from_config(config: &OllamaConfig) -> Self {
        Self {
            client: Ollama::new(config.host.clone(), config.port),
        }
    }

    /// Convert bot messages to Ollama format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => MessageRole::System,
                    Role::User => MessageRole::User,
                    Role::Assistant => MessageRole::Assistant,
                };
                ChatMessage::new(role, m.content.clone())
            })
            .collect()
    }

    fn convert_completion(response: ChatMessageResponse, model: &str) -> Completion {
        Completion {
            content: response.message.content,
            model: model.to_string(),
            usage: None,
            finish_reason: Some(FinishReason::Stop),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(models) => {
                for model in models {
                    tracing::debug!(model = %model.name, "ollama model available");
                }
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ollama health check failed");
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request =
            ChatMessageRequest::new(options.model.clone(), Self::convert_messages(messages));

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| BotError::Provider(e.to_string()))?;

        if response.message.content.trim().is_empty() {
            return Err(BotError::EmptyCompletion("ollama".into()));
        }

        Ok(Self::convert_completion(response, &options.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.host, "http://localhost");
        assert_eq!(config.port, 11434);
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            Message::system("Return JSON only."),
            Message::user("@alice: price of btc?"),
            Message::assistant("Let me check."),
        ];

        let converted = OllamaProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[1].content, "@alice: price of btc?");
    }
}
