//! Price Fetcher
//!
//! Looks up one coin on the oracle and renders the report. Failures are
//! logged and collapse to an empty string; callers treat that as "no price".

use std::sync::Arc;

use crate::model::Language;
use crate::oracle::PriceOracle;
use crate::report::PriceReport;

#[derive(Clone)]
pub struct PriceFetcher {
    oracle: Arc<dyn PriceOracle>,
}

impl PriceFetcher {
    pub fn new(oracle: Arc<dyn PriceOracle>) -> Self {
        Self { oracle }
    }

    /// Rendered price report for `coin`, or `""` when no price is available
    pub async fn fetch_price(&self, coin: &str, language: Language) -> String {
        let coin = coin.trim().to_lowercase();

        match self.oracle.median_price(&coin).await {
            Ok(quote) => {
                tracing::info!(
                    coin = %coin,
                    symbol = %quote.symbol,
                    price = %quote.price,
                    sources = quote.sources.len(),
                    "fetched median price"
                );
                PriceReport::new(&quote, language).to_string()
            }
            Err(e) => {
                tracing::error!(
                    coin = %coin,
                    oracle = self.oracle.name(),
                    error = %e,
                    "error fetching price"
                );
                String::new()
            }
        }
    }
}
