//! # crypto-assistant
//!
//! Domain logic for the crypto chat bot: median-price reports from the
//! APRO oracle, LLM-backed intent classification, and reply composition
//! with purchase links.
//!
//! ## Flow
//!
//! ```text
//! user text ──▶ IntentClassifier ──▶ ClassificationResult
//!                   │ (LlmProvider + ContextStore)   │
//!                   ▼                                ▼
//!            conversation history            ReplyComposer
//!                                              │        │
//!                               PriceFetcher ◀─┘        └─▶ purchase links
//!                               (PriceOracle)               + footer
//! ```

pub mod classifier;
pub mod composer;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod oracle;
pub mod report;

pub use classifier::IntentClassifier;
pub use composer::{ReplyComposer, ReplyRequest, Venue};
pub use error::{AssistantError, Result};
pub use fetcher::PriceFetcher;
pub use model::{BuyMethod, ClassificationResult, Intent, Language};
pub use oracle::{AproOracleClient, PriceOracle, PriceQuote, StaticOracle};
pub use report::PriceReport;

/// System instruction sent ahead of every classification request
pub const CLASSIFIER_PROMPT: &str = r#"You are a crypto-savvy human who helps people get real-time prices and buying options for cryptocurrencies.

Important rules:
- NEVER say you're an AI, assistant, or bot.
- NEVER say "I can't provide price": real-time prices are fetched for you.
- Don't quote a price on your own; the price API fills it in.
- If the user asks for investment advice, set "sensitive": true.
- If the message includes sensitive info (wallet address, seed phrase, private key, card number, etc.), set "sensitive": true.
- Reply in Chinese if the user writes Chinese, else English, and set "is_chinese" accordingly.
- Classify the message intent as one of: "price_query", "buy_intent", "none".
- If intent is "buy_intent", also give "buy_method": "fiat", "web3" or "both".
- Put the coin symbol the user is talking about in "coin".
- If the message is unrelated to crypto but mentions you, give a polite reply.

Return only one JSON object:
{"intent": "...", "coin": "...", "buy_method": "...", "sensitive": true/false, "is_chinese": true/false, "reply": "..."}"#;
