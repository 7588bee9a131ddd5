//! OpenAI LLM Provider
//!
//! Implementation of `LlmProvider` for OpenAI-compatible chat-completion APIs.

use std::time::Duration;

use async_trait::async_trait;
use bot_core::{
    error::{BotError, Result},
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use serde::{Deserialize, Serialize};

const CHAT_ENDPOINT: &str = "/v1/chat/completions";
const MODELS_ENDPOINT: &str = "/v1/models";

/// Public OpenAI API base
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// Bearer API key
    pub api_key: String,

    /// API base URL, without the `/v1/...` path
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI LLM provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BotError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Convert bot messages to the wire format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
        messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect()
    }

    fn convert_completion(response: ChatResponse, requested_model: &str) -> Result<Completion> {
        let ChatResponse { model, choices, usage } = response;
        let choice = choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::EmptyCompletion("openai: no choices".into()))?;
        let content = choice
            .message
            .content
            .ok_or_else(|| BotError::EmptyCompletion("openai: null content".into()))?;

        Ok(Completion {
            content,
            model: model.unwrap_or_else(|| requested_model.to_string()),
            usage: usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.config.url(MODELS_ENDPOINT))
            .bearer_auth(&self.config.api_key)
            .send()
            .await;

        match response {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!(error = %e, "OpenAI health check failed");
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatRequest {
            model: &options.model,
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(self.config.url(CHAT_ENDPOINT))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::from_status(status.as_u16(), body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| BotError::Provider(format!("invalid completion body: {e}")))?;

        let completion = Self::convert_completion(body, &options.model)?;
        if let Some(usage) = &completion.usage {
            tracing::debug!(
                model = %completion.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "openai completion"
            );
        }
        Ok(completion)
    }
}
