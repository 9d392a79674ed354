//! ExchangeRate-API open access provider for fiat exchange rates.
//!
//! Uses the unauthenticated `open.er-api.com` endpoint, which returns every
//! rate for a base currency in one call and refreshes roughly once a day.
//!
//! API documentation: https://www.exchangerate-api.com/docs/free

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::UnitPrice;
use crate::provider::http;
use crate::provider::price::price_from_f64;
use crate::provider::QuoteProvider;

const BASE_URL: &str = "https://open.er-api.com";
const PROVIDER_ID: &str = "EXCHANGE_RATE_API";

/// Error type reported for currency codes the API does not know
const UNSUPPORTED_CODE: &str = "unsupported-code";

/// Response from /v6/latest/{base}
#[derive(Debug, Deserialize)]
struct LatestResponse {
    /// "success" or "error"
    result: String,
    /// Present when result is "error"
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    /// 1 base = rate quote
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Fiat exchange rate provider.
pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateApiProvider {
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

    fn is_currency_code(symbol: &str) -> bool {
        symbol.len() == 3 && symbol.chars().all(|c| c.is_ascii_uppercase())
    }

    fn parse_latest(body: &str, base: &str, quote: &str) -> Result<UnitPrice, ProviderError> {
        let response: LatestResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::Parse(format!("Invalid latest response: {}", e)))?;

        if response.result != "success" {
            return match response.error_type.as_deref() {
                Some(UNSUPPORTED_CODE) => Err(ProviderError::unsupported(base, quote)),
                Some(other) => Err(ProviderError::Parse(format!(
                    "Provider reported error: {}",
                    other
                ))),
                None => Err(ProviderError::Parse(format!(
                    "Unexpected result: {}",
                    response.result
                ))),
            };
        }

        let rate = response
            .rates
            .get(quote)
            .ok_or_else(|| ProviderError::unsupported(base, quote))?;

        price_from_f64(*rate)
    }
}

#[async_trait]
impl QuoteProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch(&self, base: &str, quote: &str) -> Result<UnitPrice, ProviderError> {
        if !Self::is_currency_code(base) || !Self::is_currency_code(quote) {
            return Err(ProviderError::unsupported(base, quote));
        }

        let url = format!("{}/v6/latest/{}", self.base_url, base);
        let body = http::get(&self.client, PROVIDER_ID, &url, &[])
            .await?
            .into_success_body()?;

        Self::parse_latest(&body, base, quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const USD_BODY: &str = r#"{
        "result": "success",
        "provider": "https://www.exchangerate-api.com",
        "base_code": "USD",
        "time_last_update_unix": 1714521601,
        "rates": { "USD": 1, "TWD": 31.5, "JPY": 151.92 }
    }"#;

    #[test]
    fn test_parse_latest() {
        let price = ExchangeRateApiProvider::parse_latest(USD_BODY, "USD", "TWD").unwrap();
        assert_eq!(price, dec!(31.5));
    }

    #[test]
    fn test_missing_rate_is_unsupported_pair() {
        let err = ExchangeRateApiProvider::parse_latest(USD_BODY, "USD", "XXX").unwrap_err();
        assert_eq!(err, ProviderError::unsupported("USD", "XXX"));
    }

    #[test]
    fn test_unsupported_code_error() {
        let body = r#"{"result":"error","error-type":"unsupported-code"}"#;
        let err = ExchangeRateApiProvider::parse_latest(body, "ABC", "USD").unwrap_err();
        assert_eq!(err, ProviderError::unsupported("ABC", "USD"));
    }

    #[test]
    fn test_other_provider_error_is_parse() {
        let body = r#"{"result":"error","error-type":"malformed-request"}"#;
        let err = ExchangeRateApiProvider::parse_latest(body, "USD", "TWD").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_garbage_is_parse() {
        let err = ExchangeRateApiProvider::parse_latest("<html>", "USD", "TWD").unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[test]
    fn test_provider_id() {
        let provider = ExchangeRateApiProvider::new(Client::new());
        assert_eq!(provider.id(), "EXCHANGE_RATE_API");
    }

    #[tokio::test]
    async fn test_non_currency_symbol_is_rejected_without_request() {
        // Unroutable base URL: a request would fail with a transport error.
        let provider = ExchangeRateApiProvider::with_base_url(Client::new(), "http://127.0.0.1:9");
        let err = provider.fetch("BTC1", "USD").await.unwrap_err();
        assert_eq!(err, ProviderError::unsupported("BTC1", "USD"));
    }

    #[tokio::test]
    async fn test_fetch_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v6/latest/USD")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(USD_BODY)
            .create_async()
            .await;

        let provider = ExchangeRateApiProvider::with_base_url(Client::new(), server.url());
        let price = provider.fetch("USD", "JPY").await.unwrap();

        assert_eq!(price, dec!(151.92));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_http() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v6/latest/USD")
            .with_status(503)
            .create_async()
            .await;

        let provider = ExchangeRateApiProvider::with_base_url(Client::new(), server.url());
        let err = provider.fetch("USD", "TWD").await.unwrap_err();

        assert_eq!(err, ProviderError::Http { status: 503 });
    }
}
