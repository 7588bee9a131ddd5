//! Bot configuration, read from the environment (after `.env` is loaded).

use std::path::PathBuf;

use bot_core::DEFAULT_CONTEXT_CAPACITY;
use bot_runtime::{DEFAULT_BASE_URL, OllamaConfig};
use crypto_assistant::oracle::DEFAULT_ORACLE_URL;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("unknown LLM_PROVIDER {0:?} (expected \"openai\" or \"ollama\")")]
    UnknownProvider(String),
}

/// Which language-model backend classifies messages
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAi {
        api_key: String,
        base_url: String,
        model: String,
    },
    Ollama {
        host: String,
        port: u16,
        model: String,
    },
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    /// Only required when running the Telegram transport
    pub telegram_token: Option<String>,
    pub backend: LlmBackend,
    pub oracle_url: String,
    pub context_capacity: usize,
    pub log_file: Option<PathBuf>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = get("LLM_PROVIDER").unwrap_or_else(|| "openai".into());
        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAi {
                api_key: get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
                model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4".into()),
            },
            "ollama" => {
                let defaults = OllamaConfig::default();
                LlmBackend::Ollama {
                    host: get("OLLAMA_HOST").unwrap_or(defaults.host),
                    port: parse_or(get("OLLAMA_PORT"), "OLLAMA_PORT", defaults.port)?,
                    model: get("OLLAMA_MODEL").unwrap_or_else(|| "llama3.2".into()),
                }
            }
            _ => return Err(ConfigError::UnknownProvider(provider)),
        };

        let context_capacity = parse_or(
            get("CONTEXT_CAPACITY"),
            "CONTEXT_CAPACITY",
            DEFAULT_CONTEXT_CAPACITY,
        )?;
        if context_capacity == 0 {
            return Err(ConfigError::Invalid {
                name: "CONTEXT_CAPACITY",
                value: "0".into(),
            });
        }

        Ok(Self {
            telegram_token: get("TELEGRAM_BOT_TOKEN"),
            backend,
            oracle_url: get("PRICE_ORACLE_URL").unwrap_or_else(|| DEFAULT_ORACLE_URL.into()),
            context_capacity,
            log_file: get("BOT_LOG_FILE").map(PathBuf::from),
        })
    }

    pub fn telegram_token(&self) -> Result<&str, ConfigError> {
        self.telegram_token
            .as_deref()
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    value.map_or(Ok(default), |v| {
        v.parse().map_err(|_| ConfigError::Invalid { name, value: v })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        BotConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_openai_defaults() {
        let config = config(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

        assert_eq!(
            config.backend,
            LlmBackend::OpenAi {
                api_key: "sk-test".into(),
                base_url: "https://api.openai.com".into(),
                model: "gpt-4".into(),
            }
        );
        assert_eq!(config.oracle_url, DEFAULT_ORACLE_URL);
        assert_eq!(config.context_capacity, 50);
        assert!(config.log_file.is_none());
        assert!(matches!(config.telegram_token(), Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))));
    }

    #[test]
    fn test_missing_openai_key() {
        let err = config(&[("OPENAI_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn test_ollama_backend() {
        let config = config(&[
            ("LLM_PROVIDER", "Ollama"),
            ("OLLAMA_PORT", "11500"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("CONTEXT_CAPACITY", "20"),
        ])
        .unwrap();

        assert_eq!(
            config.backend,
            LlmBackend::Ollama {
                host: "http://localhost".into(),
                port: 11500,
                model: "llama3.2".into(),
            }
        );
        assert_eq!(config.telegram_token().unwrap(), "123:abc");
        assert_eq!(config.context_capacity, 20);
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("OPENAI_API_KEY", "k"), ("CONTEXT_CAPACITY", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "CONTEXT_CAPACITY", .. }));

        let err = config(&[("OPENAI_API_KEY", "k"), ("CONTEXT_CAPACITY", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = config(&[("LLM_PROVIDER", "bard")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider(_)));
    }
}
