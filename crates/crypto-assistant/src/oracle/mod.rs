//! Price Oracle Integration
//!
//! Abstractions and implementations for median-price oracles.

mod apro;
mod mock;

pub use apro::{AproOracleClient, DEFAULT_ORACLE_URL, ORACLE_TIMEOUT};
pub use mock::StaticOracle;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One constituent price behind a median
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePrice {
    pub provider: String,
    pub price: Decimal,
}

/// Median USD price for one coin, with the sources it was computed from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Display symbol as reported by the oracle
    pub symbol: String,

    /// Median price in USD
    pub price: Decimal,

    /// Constituent prices, in oracle order
    pub sources: Vec<SourcePrice>,

    /// When the oracle computed the median
    pub timestamp: Option<DateTime<Utc>>,
}

/// Price oracle client trait (Strategy pattern)
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Get the median USD price for a coin (symbol or name, lowercase)
    async fn median_price(&self, coin: &str) -> Result<PriceQuote>;

    /// Oracle name
    fn name(&self) -> &str;
}
