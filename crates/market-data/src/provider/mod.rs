//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Concrete provider clients (ExchangeRate-API, Binance, CoinGecko)
//! - The closed `Provider` set and the per-kind `ProviderSet` ordering
//!
//! # Provider Order
//!
//! | Kind | Order |
//! |------|-------|
//! | Fiat | `EXCHANGE_RATE_API` |
//! | Crypto | `BINANCE`, then `COINGECKO` |
//!
//! The order is fixed. It never depends on past success rates.

mod http;
mod price;
mod traits;

pub mod binance;
pub mod coingecko;
pub mod exchange_rate_api;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::ProviderError;
use crate::models::{MarketKind, UnitPrice};

pub use binance::BinanceProvider;
pub use coingecko::CoinGeckoProvider;
pub use exchange_rate_api::ExchangeRateApiProvider;
pub use http::build_client;
pub use traits::QuoteProvider;

/// The fixed set of providers this crate ships.
pub enum Provider {
    ExchangeRateApi(ExchangeRateApiProvider),
    Binance(BinanceProvider),
    CoinGecko(CoinGeckoProvider),
}

#[async_trait]
impl QuoteProvider for Provider {
    fn id(&self) -> &'static str {
        match self {
            Self::ExchangeRateApi(p) => p.id(),
            Self::Binance(p) => p.id(),
            Self::CoinGecko(p) => p.id(),
        }
    }

    async fn fetch(&self, base: &str, quote: &str) -> Result<UnitPrice, ProviderError> {
        match self {
            Self::ExchangeRateApi(p) => p.fetch(base, quote).await,
            Self::Binance(p) => p.fetch(base, quote).await,
            Self::CoinGecko(p) => p.fetch(base, quote).await,
        }
    }
}

impl From<ExchangeRateApiProvider> for Provider {
    fn from(provider: ExchangeRateApiProvider) -> Self {
        Self::ExchangeRateApi(provider)
    }
}

impl From<BinanceProvider> for Provider {
    fn from(provider: BinanceProvider) -> Self {
        Self::Binance(provider)
    }
}

impl From<CoinGeckoProvider> for Provider {
    fn from(provider: CoinGeckoProvider) -> Self {
        Self::CoinGecko(provider)
    }
}

/// Providers by role.
pub struct ProviderSet<P = Provider> {
    pub fiat: P,
    pub crypto_primary: P,
    pub crypto_fallback: P,
}

impl ProviderSet<Provider> {
    /// The public, unauthenticated endpoints, sharing one HTTP client.
    pub fn public(client: Client) -> Self {
        Self {
            fiat: ExchangeRateApiProvider::new(client.clone()).into(),
            crypto_primary: BinanceProvider::new(client.clone()).into(),
            crypto_fallback: CoinGeckoProvider::new(client).into(),
        }
    }
}

impl<P> ProviderSet<P> {
    /// Providers to try for `kind`, in order.
    pub fn for_kind(&self, kind: MarketKind) -> Vec<&P> {
        match kind {
            MarketKind::Fiat => vec![&self.fiat],
            MarketKind::Crypto => vec![&self.crypto_primary, &self.crypto_fallback],
        }
    }
}
