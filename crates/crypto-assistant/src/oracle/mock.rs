//! Static Price Oracle
//!
//! For testing and offline demos. Returns fixed quotes with a fixed
//! timestamp so rendered reports are reproducible.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{PriceOracle, PriceQuote, SourcePrice};
use crate::error::{AssistantError, Result};

/// 2024-06-01 12:00:00 UTC
const QUOTE_TIMESTAMP_MS: i64 = 1_717_243_200_000;

/// Oracle with static prices
pub struct StaticOracle {
    /// Simulate an unreachable oracle
    offline: bool,
}

impl Default for StaticOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticOracle {
    pub const fn new() -> Self {
        Self { offline: false }
    }

    /// Oracle that fails every request, like a network outage
    pub const fn offline() -> Self {
        Self { offline: true }
    }

    /// (symbol, median, [(provider, price)])
    fn table(coin: &str) -> Option<(&'static str, Decimal, Vec<(&'static str, Decimal)>)> {
        match coin {
            "btc" | "bitcoin" => Some((
                "BTC",
                dec!(67012.50),
                vec![
                    ("Binance", dec!(67010.12)),
                    ("Coinbase", dec!(67012.50)),
                    ("OKX", dec!(67015.03)),
                ],
            )),
            "eth" | "ethereum" => Some((
                "ETH",
                dec!(3780.4),
                vec![
                    ("Binance", dec!(3780.1)),
                    ("Coinbase", dec!(3780.4)),
                    ("Kraken", dec!(3781.9)),
                ],
            )),
            "bnb" => Some(("BNB", dec!(601.25), vec![("Binance", dec!(601.25))])),
            "sol" | "solana" => Some((
                "SOL",
                dec!(165.875),
                vec![("Binance", dec!(165.87)), ("Bybit", dec!(165.88))],
            )),
            "doge" => Some(("DOGE", dec!(0.1612), vec![("Binance", dec!(0.1612))])),
            _ => None,
        }
    }
}

#[async_trait]
impl PriceOracle for StaticOracle {
    async fn median_price(&self, coin: &str) -> Result<PriceQuote> {
        if self.offline {
            return Err(AssistantError::PriceUnavailable(format!("{coin} (oracle offline)")));
        }

        let (symbol, price, sources) = Self::table(&coin.to_lowercase())
            .ok_or_else(|| AssistantError::PriceUnavailable(coin.to_string()))?;

        Ok(PriceQuote {
            symbol: symbol.into(),
            price,
            sources: sources
                .into_iter()
                .map(|(provider, price)| SourcePrice {
                    provider: provider.into(),
                    price,
                })
                .collect(),
            timestamp: DateTime::<Utc>::from_timestamp_millis(QUOTE_TIMESTAMP_MS),
        })
    }

    fn name(&self) -> &str {
        "StaticOracle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_quote() {
        let oracle = StaticOracle::new();

        let btc = oracle.median_price("BTC").await.unwrap();
        assert_eq!(btc.symbol, "BTC");
        assert!(btc.price > Decimal::ZERO);
        assert_eq!(btc.sources.len(), 3);
        assert!(btc.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_unknown_and_offline() {
        assert!(StaticOracle::new().median_price("notreal").await.is_err());
        assert!(StaticOracle::offline().median_price("btc").await.is_err());
    }
}
