//! CoinGecko simple price provider for crypto prices.
//!
//! Used as the crypto fallback. The public `/api/v3/simple/price` endpoint is
//! keyed by CoinGecko coin ids rather than ticker symbols, so base symbols go
//! through a fixed mapping table. Symbols outside the table are unsupported.
//!
//! API documentation: https://docs.coingecko.com/reference/simple-price

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::ProviderError;
use crate::models::UnitPrice;
use crate::provider::http;
use crate::provider::price::price_from_f64;
use crate::provider::QuoteProvider;

const BASE_URL: &str = "https://api.coingecko.com";
const PROVIDER_ID: &str = "COINGECKO";

/// Ticker symbol -> CoinGecko coin id
const COIN_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("USDT", "tether"),
    ("USDC", "usd-coin"),
    ("BNB", "binancecoin"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("TRX", "tron"),
    ("DOT", "polkadot"),
    ("LTC", "litecoin"),
    ("LINK", "chainlink"),
    ("AVAX", "avalanche-2"),
    ("MATIC", "matic-network"),
    ("ATOM", "cosmos"),
    ("XLM", "stellar"),
    ("BCH", "bitcoin-cash"),
    ("ETC", "ethereum-classic"),
    ("TON", "the-open-network"),
];

/// Currencies accepted by the `vs_currencies` parameter
const VS_CURRENCIES: &[&str] = &[
    "usd", "eur", "jpy", "gbp", "twd", "cny", "hkd", "krw", "sgd", "aud", "cad", "chf", "inr",
    "btc", "eth",
];

/// Response from /api/v3/simple/price: coin id -> vs currency -> price
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Fallback crypto price provider.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Point the provider at another host (used by tests).
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn coin_id(symbol: &str) -> Option<&'static str> {
        COIN_IDS
            .iter()
            .find(|(ticker, _)| *ticker == symbol)
            .map(|(_, id)| *id)
    }

    fn vs_currency(symbol: &str) -> Option<&'static str> {
        let lower = symbol.to_ascii_lowercase();
        VS_CURRENCIES.iter().copied().find(|vs| *vs == lower)
    }

    fn parse_simple_price(
        body: &str,
        coin_id: &str,
        vs_currency: &str,
        base: &str,
        quote: &str,
    ) -> Result<UnitPrice, ProviderError> {
        let response: SimplePriceResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::Parse(format!("Invalid simple price response: {}", e)))?;

        let prices = response
            .get(coin_id)
            .ok_or_else(|| ProviderError::Parse(format!("Missing coin '{}'", coin_id)))?;

        let price = prices
            .get(vs_currency)
            .ok_or_else(|| ProviderError::unsupported(base, quote))?;

        price_from_f64(*price)
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch(&self, base: &str, quote: &str) -> Result<UnitPrice, ProviderError> {
        let coin_id = Self::coin_id(base).ok_or_else(|| ProviderError::unsupported(base, quote))?;
        let vs_currency =
            Self::vs_currency(quote).ok_or_else(|| ProviderError::unsupported(base, quote))?;

        let url = format!("{}/api/v3/simple/price", self.base_url);
        let query = [("ids", coin_id), ("vs_currencies", vs_currency)];
        let body = http::get(&self.client, PROVIDER_ID, &url, &query)
            .await?
            .into_success_body()?;

        Self::parse_simple_price(&body, coin_id, vs_currency, base, quote)
    }
}
