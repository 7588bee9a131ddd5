//! Domain Models
//!
//! Classification output produced by the language model and the small
//! enums the reply composer branches on.

use serde::{Deserialize, Deserializer, Serialize};

/// What the user wants from the bot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Asking for the current price of a coin
    PriceQuery,
    /// Asking where or how to buy a coin
    BuyIntent,
    /// Anything else
    #[default]
    #[serde(other)]
    None,
}

impl Intent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceQuery => "price_query",
            Self::BuyIntent => "buy_intent",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred purchase channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyMethod {
    /// Card or bank transfer
    Fiat,
    /// On-chain swap from a wallet
    Web3,
    /// Unrecognized values also land here
    #[default]
    #[serde(other)]
    Both,
}

/// Reply language
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl Language {
    pub const fn from_is_chinese(is_chinese: bool) -> Self {
        if is_chinese { Self::Chinese } else { Self::English }
    }

    /// Language implied by a client locale such as `zh-hans` or `en`
    pub fn from_locale(locale: Option<&str>) -> Self {
        Self::from_is_chinese(locale.is_some_and(|l| l.to_ascii_lowercase().starts_with("zh")))
    }

    pub const fn is_chinese(self) -> bool {
        matches!(self, Self::Chinese)
    }
}

/// Structured classification returned by the language model.
///
/// Every field tolerates being absent or `null`; only `is_chinese` keeps the
/// distinction so callers can fall back to the sender's locale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub intent: Intent,

    #[serde(default)]
    pub coin: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub buy_method: BuyMethod,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sensitive: bool,

    #[serde(default)]
    pub is_chinese: Option<bool>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub reply: String,
}

impl ClassificationResult {
    /// Result used whenever the backend fails or answers with garbage
    pub fn fallback() -> Self {
        Self {
            coin: Some(String::new()),
            is_chinese: Some(false),
            ..Default::default()
        }
    }

    /// Lowercased coin symbol, `None` when absent or blank
    pub fn coin_symbol(&self) -> Option<String> {
        self.coin
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }

    /// Reply language, using `fallback` when the model did not say
    pub fn language_or(&self, fallback: Language) -> Language {
        self.is_chinese.map_or(fallback, Language::from_is_chinese)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
