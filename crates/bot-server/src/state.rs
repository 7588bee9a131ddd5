//! Application State

use std::sync::Arc;

use anyhow::Context as _;
use bot_core::{ContextStore, GenerationOptions, LlmProvider, MemoryContextStore};
use bot_runtime::{OllamaConfig, OllamaProvider, OpenAiConfig, OpenAiProvider};
use crypto_assistant::{
    AproOracleClient, IntentClassifier, PriceFetcher, PriceOracle, ReplyComposer,
};

use crate::config::{BotConfig, LlmBackend};
use crate::dispatcher::MessageDispatcher;

/// Shared components, built once at startup
#[derive(Clone)]
pub struct AppState {
    /// LLM backend (OpenAI or Ollama)
    pub provider: Arc<dyn LlmProvider>,

    /// Per-user conversation history
    pub contexts: Arc<dyn ContextStore>,

    pub classifier: Arc<IntentClassifier>,

    pub composer: ReplyComposer,
}

impl AppState {
    pub fn from_config(config: &BotConfig) -> anyhow::Result<Self> {
        let (provider, options) = match &config.backend {
            LlmBackend::OpenAi {
                api_key,
                base_url,
                model,
            } => {
                let mut openai = OpenAiConfig::new(api_key.clone());
                openai.base_url.clone_from(base_url);
                let provider: Arc<dyn LlmProvider> = Arc::new(
                    OpenAiProvider::from_config(openai).context("failed to build OpenAI client")?,
                );
                (provider, GenerationOptions::with_model(model.clone()))
            }
            LlmBackend::Ollama { host, port, model } => {
                let provider: Arc<dyn LlmProvider> =
                    Arc::new(OllamaProvider::from_config(&OllamaConfig {
                        host: host.clone(),
                        port: *port,
                    }));
                (provider, GenerationOptions::with_model(model.clone()))
            }
        };

        let oracle = AproOracleClient::new(config.oracle_url.clone())
            .context("failed to build price oracle client")?;

        Ok(Self::with_parts(
            provider,
            Arc::new(oracle),
            options,
            config.context_capacity,
        ))
    }

    pub fn with_parts(
        provider: Arc<dyn LlmProvider>,
        oracle: Arc<dyn PriceOracle>,
        options: GenerationOptions,
        context_capacity: usize,
    ) -> Self {
        let contexts: Arc<dyn ContextStore> =
            Arc::new(MemoryContextStore::with_capacity(context_capacity));
        let classifier = Arc::new(IntentClassifier::new(
            provider.clone(),
            contexts.clone(),
            options,
        ));

        Self {
            provider,
            contexts,
            classifier,
            composer: ReplyComposer::new(PriceFetcher::new(oracle)),
        }
    }

    /// Log whether the LLM backend answers; never fatal
    pub async fn check_provider(&self) {
        match self.provider.health_check().await {
            Ok(true) => {
                tracing::info!(provider = self.provider.name(), "✓ LLM backend reachable");
            }
            Ok(false) => {
                tracing::warn!(provider = self.provider.name(), "⚠ LLM backend not ready");
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "⚠ LLM backend unreachable"
                );
            }
        }
    }

    pub fn dispatcher(&self, bot_username: &str) -> MessageDispatcher {
        MessageDispatcher::new(
            self.classifier.clone(),
            self.composer.clone(),
            self.contexts.clone(),
            bot_username,
        )
    }
}
