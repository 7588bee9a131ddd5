//! # bot-core
//!
//! Core chat-bot logic with a provider-agnostic LLM abstraction and a
//! per-user conversation context store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Chat bot                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Classifier │  │   Context   │  │   LlmProvider       │  │
//! │  │  (domain)   │──│    Store    │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between OpenAI, Ollama, or any
//! other backend without changing bot logic. The `ContextStore` trait is
//! injected wherever history is read or written, so the storage strategy
//! (single map, sharded, persistent) stays replaceable.

pub mod context;
pub mod error;
pub mod message;
pub mod provider;

pub use context::{ContextStore, DEFAULT_CONTEXT_CAPACITY, MemoryContextStore, UserId};
pub use error::{BotError, Result};
pub use message::{Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
