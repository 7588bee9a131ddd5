//! Price Report rendering
//!
//! Turns a [`PriceQuote`] into the multi-line text block shown to users.

use std::fmt;

use chrono_tz::America::Los_Angeles;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::Language;
use crate::oracle::PriceQuote;

/// Width the provider column is padded to
const PROVIDER_COLUMN: usize = 18;

/// Localized view of a quote; render with `to_string()`
pub struct PriceReport<'a> {
    quote: &'a PriceQuote,
    language: Language,
}

impl<'a> PriceReport<'a> {
    pub const fn new(quote: &'a PriceQuote, language: Language) -> Self {
        Self { quote, language }
    }
}

/// Two decimal places, half away from zero
fn usd(price: Decimal) -> String {
    format!(
        "{:.2}",
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

impl fmt::Display for PriceReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = self.quote;
        let chinese = self.language.is_chinese();

        if chinese {
            writeln!(f, "{} 的中位价格是 ${} 美元。", quote.symbol, usd(quote.price))?;
            writeln!(f, "以下是详细的价格来源：")?;
        } else {
            writeln!(f, "The median price of {} is ${} USD.", quote.symbol, usd(quote.price))?;
            writeln!(f, "The following are the detailed price sources:")?;
        }

        for source in &quote.sources {
            writeln!(
                f,
                "{:<width$} ${}",
                source.provider,
                usd(source.price),
                width = PROVIDER_COLUMN
            )?;
        }

        if let Some(timestamp) = quote.timestamp {
            let local = timestamp.with_timezone(&Los_Angeles);
            let label = if chinese { "获取价格时间" } else { "Get the price at" };
            writeln!(
                f,
                "{label}：{} ({})",
                local.format("%Y-%m-%d %H:%M:%S"),
                local.format("%Z")
            )?;
        }

        writeln!(f)?;
        if chinese {
            f.write_str("数据由 APRO AI Oracle 提供，并通过 ATTPs 数据验证。")
        } else {
            f.write_str("This data is provided by APRO AI Oracle and verified by ATTPs data.")
        }
    }
}
