//! Reply Composer
//!
//! Builds the outgoing text from a classification: price block for price
//! queries, purchase links for buy intent, and the assistant footer.

use crate::fetcher::PriceFetcher;
use crate::model::{BuyMethod, Intent, Language};

/// Companion service advertised in the footer
pub const ASSISTANT_URL: &str = "https://cryptogpt-test.apro.com/";

/// Where a coin can be bought
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Venue {
    Binance,
    PancakeSwap,
    MoonPay,
    OneInch,
}

impl Venue {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::PancakeSwap => "PancakeSwap",
            Self::MoonPay => "MoonPay",
            Self::OneInch => "1inch",
        }
    }

    const fn icon(self) -> &'static str {
        match self {
            Self::Binance => "🟢",
            Self::PancakeSwap => "🌀",
            Self::MoonPay => "💳",
            Self::OneInch => "🔗",
        }
    }

    const fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Binance, Language::English) => "Buy with fiat on Binance",
            (Self::Binance, Language::Chinese) => "使用法币在 Binance 购买",
            (Self::PancakeSwap, Language::English) => "Swap on PancakeSwap via Web3",
            (Self::PancakeSwap, Language::Chinese) => "使用 Web3 钱包在 PancakeSwap 兑换",
            (Self::MoonPay, Language::English) => "Buy with fiat on MoonPay",
            (Self::MoonPay, Language::Chinese) => "使用法币在 MoonPay 购买",
            (Self::OneInch, Language::English) => "Swap on 1inch via Web3",
            (Self::OneInch, Language::Chinese) => "使用 Web3 钱包在 1inch 兑换",
        }
    }

    /// Purchase URL; MoonPay takes the lowercase symbol, the rest uppercase
    pub fn url(self, coin: &str) -> String {
        let upper = coin.to_uppercase();
        match self {
            Self::Binance => format!("https://www.binance.com/en/crypto/buy/USD/{upper}"),
            Self::PancakeSwap => format!(
                "https://pancakeswap.finance/swap?inputCurrency=0xdAC17F...&outputCurrency={upper}"
            ),
            Self::MoonPay => format!("https://www.moonpay.com/buy/{}", coin.to_lowercase()),
            Self::OneInch => format!("https://app.1inch.io/#/56/advanced/swap/USDT/{upper}"),
        }
    }

    /// One markdown link line
    pub fn line(self, coin: &str, language: Language) -> String {
        format!(
            "{} {}: [{}]({})",
            self.icon(),
            self.label(language),
            self.name(),
            self.url(coin)
        )
    }
}

impl BuyMethod {
    /// Venues offered for this method, in display order
    pub const fn venues(self) -> &'static [Venue] {
        match self {
            Self::Fiat => &[Venue::Binance, Venue::MoonPay],
            Self::Web3 => &[Venue::PancakeSwap, Venue::OneInch],
            Self::Both => &[Venue::Binance, Venue::PancakeSwap, Venue::MoonPay, Venue::OneInch],
        }
    }
}

/// Header plus one link line per venue, without leading blank line
pub fn purchase_options(coin: &str, method: BuyMethod, language: Language) -> String {
    let mut text = String::from(match language {
        Language::English => "Here are some ways to buy:",
        Language::Chinese => "以下是可用的购买方式：",
    });
    for venue in method.venues() {
        text.push('\n');
        text.push_str(&venue.line(coin, language));
    }
    text
}

/// Promotional postscript pointing to the personal assistant
pub fn footer(language: Language) -> String {
    match language {
        Language::English => format!(
            "For more guidance or private questions, please use CryptoGPT personal assistant: {ASSISTANT_URL}"
        ),
        Language::Chinese => format!(
            "如需更多操作指导，或提问涉及隐私信息，推荐使用 CryptoGPT 私人助理进行一对一解答: {ASSISTANT_URL}"
        ),
    }
}

/// Everything the composer needs for one reply
#[derive(Clone, Copy, Debug)]
pub struct ReplyRequest<'a> {
    pub intent: Intent,
    /// Coin symbol; `None` or blank disables the intent's block
    pub coin: Option<&'a str>,
    pub buy_method: BuyMethod,
    pub base_reply: &'a str,
    pub language: Language,
    pub include_footer: bool,
}

#[derive(Clone)]
pub struct ReplyComposer {
    fetcher: PriceFetcher,
}

impl ReplyComposer {
    pub const fn new(fetcher: PriceFetcher) -> Self {
        Self { fetcher }
    }

    /// Final reply text. Never fails; a missing price simply omits the block.
    pub async fn compose(&self, request: &ReplyRequest<'_>) -> String {
        let mut reply = request.base_reply.to_string();
        let coin = request.coin.map(str::trim).filter(|c| !c.is_empty());

        match (request.intent, coin) {
            (Intent::PriceQuery, Some(coin)) => {
                let report = self.fetcher.fetch_price(coin, request.language).await;
                if report.is_empty() {
                    tracing::warn!(coin, "no price available, sending reply without price block");
                } else {
                    reply.push_str("\n\n📊 ");
                    reply.push_str(&report);
                }
            }
            (Intent::BuyIntent, Some(coin)) => {
                reply.push_str("\n\n");
                reply.push_str(&purchase_options(coin, request.buy_method, request.language));
            }
            _ => {}
        }

        if request.include_footer {
            reply.push_str("\n\n");
            reply.push_str(&footer(request.language));
        }

        reply
    }
}
