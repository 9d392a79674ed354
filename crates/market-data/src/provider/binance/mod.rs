//! Binance spot ticker provider for crypto prices.
//!
//! Uses the public `/api/v3/ticker/price` endpoint, which needs no API key.
//! Binance has no USD books; USD requests are priced against USDT.
//!
//! API documentation: https://developers.binance.com/docs/binance-spot-api-docs/rest-api

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::UnitPrice;
use crate::provider::http;
use crate::provider::price::price_from_str;
use crate::provider::QuoteProvider;

const BASE_URL: &str = "https://api.binance.com";
const PROVIDER_ID: &str = "BINANCE";

/// Quote assets with liquid Binance spot books
const QUOTE_ASSETS: &[&str] = &[
    "USDT", "USDC", "FDUSD", "BTC", "ETH", "BNB", "EUR", "TRY", "BRL", "JPY",
];

/// Binance error code for an unknown trading symbol
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Response from /api/v3/ticker/price
#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    #[allow(dead_code)]
    symbol: String,
    /// Last price as a decimal string
    price: String,
}

/// Error body returned with 4xx statuses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: i64,
    #[allow(dead_code)]
    msg: String,
}

/// Primary crypto price provider.
pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

impl BinanceProvider {
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

    /// Map a pair to a Binance trading symbol (e.g. BTC/USD -> BTCUSDT).
    fn market_symbol(base: &str, quote: &str) -> Result<String, ProviderError> {
        let quote_asset = match quote {
            "USD" => "USDT",
            q if QUOTE_ASSETS.contains(&q) => q,
            _ => return Err(ProviderError::unsupported(base, quote)),
        };

        if base == quote_asset {
            return Err(ProviderError::unsupported(base, quote));
        }

        Ok(format!("{}{}", base, quote_asset))
    }

    fn parse_ticker(body: &str) -> Result<UnitPrice, ProviderError> {
        let ticker: TickerPriceResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::Parse(format!("Invalid ticker response: {}", e)))?;
        price_from_str(&ticker.price)
    }

    fn is_invalid_symbol(body: &str) -> bool {
        serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.code == INVALID_SYMBOL_CODE)
            .unwrap_or(false)
    }
}

#[async_trait]
impl QuoteProvider for BinanceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch(&self, base: &str, quote: &str) -> Result<UnitPrice, ProviderError> {
        let symbol = Self::market_symbol(base, quote)?;

        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let query = [("symbol", symbol.as_str())];
        let reply = http::get(&self.client, PROVIDER_ID, &url, &query).await?;

        if reply.status == 400 && Self::is_invalid_symbol(&reply.body) {
            return Err(ProviderError::unsupported(base, quote));
        }

        let body = reply.into_success_body()?;
        Self::parse_ticker(&body)
    }
}
