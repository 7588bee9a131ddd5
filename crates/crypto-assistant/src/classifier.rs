//! Intent Classifier
//!
//! Sends the user's conversation history to the language model and parses
//! the single JSON object it must answer with.

use std::sync::Arc;

use bot_core::{ContextStore, GenerationOptions, LlmProvider, Message, UserId};

use crate::CLASSIFIER_PROMPT;
use crate::error::{AssistantError, Result};
use crate::model::ClassificationResult;

/// Longest raw completion echoed into a parse error
const RAW_PREVIEW_CHARS: usize = 200;

pub struct IntentClassifier {
    provider: Arc<dyn LlmProvider>,
    contexts: Arc<dyn ContextStore>,
    options: GenerationOptions,
}

impl IntentClassifier {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        contexts: Arc<dyn ContextStore>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            provider,
            contexts,
            options,
        }
    }

    /// Record the user's line in their context, then classify the whole history.
    ///
    /// Errors distinguish a failed backend call from a malformed answer; a
    /// legitimate `none` intent is an `Ok`.
    pub async fn try_classify(
        &self,
        user_input: &str,
        username: &str,
        user: UserId,
    ) -> Result<ClassificationResult> {
        self.contexts
            .append(user, Message::user(format!("@{username}: {user_input}")));

        let history = self.contexts.get(user);
        let mut prompt = Vec::with_capacity(history.len() + 1);
        prompt.push(Message::system(CLASSIFIER_PROMPT));
        prompt.extend(history);

        let completion = self.provider.complete(&prompt, &self.options).await?;

        let result: ClassificationResult = serde_json::from_str(completion.content.trim())
            .map_err(|source| AssistantError::MalformedClassification {
                source,
                raw: completion.content.chars().take(RAW_PREVIEW_CHARS).collect(),
            })?;

        tracing::debug!(
            %user,
            provider = self.provider.name(),
            intent = %result.intent,
            coin = ?result.coin,
            sensitive = result.sensitive,
            "classified message"
        );
        Ok(result)
    }

    /// Infallible variant: any failure is logged and becomes
    /// [`ClassificationResult::fallback`]
    pub async fn classify(
        &self,
        user_input: &str,
        username: &str,
        user: UserId,
    ) -> ClassificationResult {
        self.try_classify(user_input, username, user)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(%user, error = %e, "classification failed");
                ClassificationResult::fallback()
            })
    }
}
