//! # bot-runtime
//!
//! Runtime LLM providers for the crypto chat bot.
//!
//! ## Providers
//!
//! - **OpenAI** (always available): chat-completions over HTTPS
//! - **Ollama** (`ollama` feature, default): local inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bot_runtime::{OpenAiConfig, OpenAiProvider};
//!
//! let provider = OpenAiProvider::from_config(OpenAiConfig::new(api_key))?;
//! let classifier = IntentClassifier::new(Arc::new(provider), contexts, options);
//! ```

pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};
pub use openai::{DEFAULT_BASE_URL, OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use bot_core::{BotError, Completion, GenerationOptions, LlmProvider, Message, Result, Role};
