//! Message Dispatcher
//!
//! Transport-agnostic handling of one inbound message: mention check,
//! classification, context bookkeeping and reply composition.

use std::sync::Arc;

use bot_core::{ContextStore, Role, UserId};
use crypto_assistant::{
    BuyMethod, Intent, IntentClassifier, Language, ReplyComposer, ReplyRequest,
};

/// Who sent a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    /// Handle, or display name when the sender has none
    pub username: String,
    /// Client language code, e.g. `en` or `zh-hans`
    pub locale: Option<String>,
}

/// A text message as seen by the dispatcher
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub text: String,
    pub sender: Sender,
    /// Text of every `mention` entity, e.g. `@price_bot`
    pub mentions: Vec<String>,
}

pub struct MessageDispatcher {
    classifier: Arc<IntentClassifier>,
    composer: ReplyComposer,
    contexts: Arc<dyn ContextStore>,
    bot_username: String,
}

impl MessageDispatcher {
    pub fn new(
        classifier: Arc<IntentClassifier>,
        composer: ReplyComposer,
        contexts: Arc<dyn ContextStore>,
        bot_username: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            composer,
            contexts,
            bot_username: bot_username.into().to_lowercase(),
        }
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    /// True when a mention entity names this bot (case-insensitive)
    pub fn is_mentioned(&self, message: &InboundMessage) -> bool {
        !self.bot_username.is_empty()
            && message
                .mentions
                .iter()
                .any(|m| m.to_lowercase().contains(&self.bot_username))
    }

    /// Reply for a chat message, or `None` when the bot was not addressed
    pub async fn handle(&self, message: &InboundMessage) -> Option<String> {
        if !self.is_mentioned(message) {
            tracing::trace!(user_id = %message.sender.id, "ignoring message without mention");
            return None;
        }
        Some(self.respond(message).await)
    }

    /// Classify and compose unconditionally. Never fails.
    pub async fn respond(&self, message: &InboundMessage) -> String {
        let sender = &message.sender;
        let result = self
            .classifier
            .classify(&message.text, &sender.username, sender.id)
            .await;

        let language = result.language_or(Language::from_locale(sender.locale.as_deref()));
        let coin = result.coin_symbol();

        self.contexts.push(sender.id, Role::Assistant, &result.reply);

        tracing::info!(
            user_id = %sender.id,
            intent = %result.intent,
            coin = coin.as_deref().unwrap_or(""),
            sensitive = result.sensitive,
            "handling message"
        );

        let (intent, buy_method) = match result.intent {
            Intent::PriceQuery | Intent::BuyIntent => (result.intent, result.buy_method),
            Intent::None if result.sensitive => (Intent::BuyIntent, BuyMethod::Both),
            Intent::None => return result.reply,
        };

        self.composer
            .compose(&ReplyRequest {
                intent,
                coin: coin.as_deref(),
                buy_method,
                base_reply: &result.reply,
                language,
                include_footer: result.intent == Intent::BuyIntent || result.sensitive,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bot_core::{
        BotError, Completion, GenerationOptions, LlmProvider, MemoryContextStore, Message,
    };
    use crypto_assistant::composer::{ASSISTANT_URL, footer};
    use crypto_assistant::{PriceFetcher, StaticOracle};

    use super::*;

    struct ScriptedProvider {
        replies: Mutex<VecDeque<bot_core::Result<String>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<bot_core::Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> bot_core::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> bot_core::Result<Completion> {
            let next = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(BotError::ProviderUnavailable("script exhausted".into())));
            next.map(|content| Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }
    }

    fn dispatcher(replies: &[&str]) -> (MessageDispatcher, Arc<MemoryContextStore>) {
        let provider = Arc::new(ScriptedProvider::new(
            replies.iter().map(|r| Ok((*r).to_string())).collect(),
        ));
        let contexts = Arc::new(MemoryContextStore::new());
        let classifier = Arc::new(IntentClassifier::new(
            provider,
            contexts.clone(),
            GenerationOptions::default(),
        ));
        let composer = ReplyComposer::new(PriceFetcher::new(Arc::new(StaticOracle::new())));
        (
            MessageDispatcher::new(classifier, composer, contexts.clone(), "Price_Bot"),
            contexts,
        )
    }

    fn message(text: &str, mentions: &[&str], locale: Option<&str>) -> InboundMessage {
        InboundMessage {
            text: text.into(),
            sender: Sender {
                id: UserId(42),
                username: "alice".into(),
                locale: locale.map(Into::into),
            },
            mentions: mentions.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_ignores_unmentioned() {
        let (dispatcher, contexts) = dispatcher(&[r#"{"intent":"none","reply":"hi"}"#]);

        assert!(dispatcher.handle(&message("btc?", &[], None)).await.is_none());
        assert!(
            dispatcher
                .handle(&message("@other_bot btc?", &["@other_bot"], None))
                .await
                .is_none()
        );
        assert!(contexts.get(UserId(42)).is_empty());
    }

    #[tokio::test]
    async fn test_mention_is_case_insensitive() {
        let (dispatcher, _) = dispatcher(&[]);
        assert!(dispatcher.is_mentioned(&message("", &["@PRICE_BOT"], None)));
        assert!(dispatcher.is_mentioned(&message("", &["@price_bot"], None)));
    }

    #[tokio::test]
    async fn test_price_query() {
        let (dispatcher, contexts) = dispatcher(&[
            r#"{"intent":"price_query","coin":"BTC","sensitive":false,"is_chinese":false,"reply":"Here you go"}"#,
        ]);

        let reply = dispatcher
            .handle(&message("@price_bot btc price?", &["@price_bot"], None))
            .await
            .unwrap();

        assert!(reply.starts_with("Here you go\n\n📊 The median price of BTC is $67012.50 USD."));
        assert!(!reply.contains(ASSISTANT_URL));

        let history = contexts.get(UserId(42));
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "@alice: @price_bot btc price?");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content, "Here you go");
    }

    #[tokio::test]
    async fn test_buy_intent_includes_footer() {
        let (dispatcher, _) = dispatcher(&[
            r#"{"intent":"buy_intent","coin":"eth","buy_method":"fiat","sensitive":false,"is_chinese":false,"reply":"Sure"}"#,
        ]);

        let reply = dispatcher.respond(&message("buy eth", &[], None)).await;
        assert!(reply.contains("[Binance](https://www.binance.com/en/crypto/buy/USD/ETH)"));
        assert!(reply.ends_with(&footer(Language::English)));
    }

    #[tokio::test]
    async fn test_sensitive_none_becomes_buy_both() {
        let (dispatcher, _) = dispatcher(&[
            r#"{"intent":"none","coin":"btc","sensitive":true,"is_chinese":false,"reply":"Never share your seed phrase."}"#,
        ]);

        let reply = dispatcher.respond(&message("my seed is ...", &[], None)).await;
        assert!(reply.starts_with("Never share your seed phrase.\n\nHere are some ways to buy:"));
        for venue in ["[Binance]", "[PancakeSwap]", "[MoonPay]", "[1inch]"] {
            assert!(reply.contains(venue));
        }
        assert!(reply.ends_with(ASSISTANT_URL));
    }

    #[tokio::test]
    async fn test_plain_reply_passes_through() {
        let (dispatcher, _) = dispatcher(&[r#"{"intent":"none","coin":null,"reply":"Hello!"}"#]);
        assert_eq!(dispatcher.respond(&message("hi", &[], None)).await, "Hello!");
    }

    #[tokio::test]
    async fn test_language_falls_back_to_locale() {
        let (dispatcher, _) = dispatcher(&[
            r#"{"intent":"buy_intent","coin":"btc","buy_method":"web3","reply":"好的"}"#,
        ]);

        let reply = dispatcher.respond(&message("买 btc", &[], Some("zh-hans"))).await;
        assert!(reply.contains("以下是可用的购买方式："));
        assert!(reply.ends_with(&footer(Language::Chinese)));
    }

    #[tokio::test]
    async fn test_backend_failure_yields_empty_reply() {
        let (dispatcher, contexts) = dispatcher(&[]);

        let reply = dispatcher
            .handle(&message("@price_bot hi", &["@price_bot"], Some("zh")))
            .await;
        assert_eq!(reply.as_deref(), Some(""));
        assert_eq!(contexts.get(UserId(42)).len(), 2);
    }
}
