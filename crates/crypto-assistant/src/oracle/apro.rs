//! APRO AI Oracle client
//!
//! `GET {base}?name={coin}&quotation=usd&type=median` returning
//! `{"data": {"symbol", "price", "prices": [{"provider_name", "price"}], "timestamp"}}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, header::ACCEPT};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{PriceOracle, PriceQuote, SourcePrice};
use crate::error::{AssistantError, Result};

pub const DEFAULT_ORACLE_URL: &str = "https://api-ai-oracle.apro.com/v1/ticker/currency/price";

/// Applies to the whole request, connect included
pub const ORACLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<TickerData>,
}

#[derive(Deserialize)]
struct TickerData {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    prices: Option<Vec<ProviderPrice>>,
    #[serde(default)]
    timestamp: Option<i64>,
}

#[derive(Deserialize)]
struct ProviderPrice {
    #[serde(default)]
    provider_name: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
}

/// HTTP client for the APRO median-price endpoint
pub struct AproOracleClient {
    client: reqwest::Client,
    base_url: String,
}

impl AproOracleClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(ORACLE_TIMEOUT)
            .build()
            .map_err(|e| AssistantError::Config(format!("failed to build oracle client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn into_quote(coin: &str, data: TickerData) -> Result<PriceQuote> {
        let price = data
            .price
            .ok_or_else(|| AssistantError::PriceUnavailable(coin.to_string()))?;

        let sources = data
            .prices
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| {
                p.price.map(|price| SourcePrice {
                    provider: p.provider_name.unwrap_or_else(|| "Unknown".into()),
                    price,
                })
            })
            .collect();

        Ok(PriceQuote {
            symbol: data.symbol.unwrap_or_else(|| coin.to_uppercase()),
            price,
            sources,
            timestamp: data
                .timestamp
                .filter(|ms| *ms > 0)
                .and_then(DateTime::<Utc>::from_timestamp_millis),
        })
    }
}

#[async_trait]
impl PriceOracle for AproOracleClient {
    async fn median_price(&self, coin: &str) -> Result<PriceQuote> {
        let name = coin.to_lowercase();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("name", name.as_str()), ("quotation", "usd"), ("type", "median")])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AssistantError::OracleStatus(status.as_u16()));
        }

        let envelope: Envelope = response.json().await?;
        let data = envelope
            .data
            .ok_or_else(|| AssistantError::PriceUnavailable(name.clone()))?;
        tracing::debug!(
            coin = %name,
            symbol = ?data.symbol,
            sources = data.prices.as_ref().map_or(0, Vec::len),
            "oracle ticker"
        );

        Self::into_quote(&name, data)
    }

    fn name(&self) -> &str {
        "APRO AI Oracle"
    }
}
