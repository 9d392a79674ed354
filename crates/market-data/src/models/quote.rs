use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::market::MarketKind;
use super::request::QuoteRequest;
use super::types::{ProviderId, UnitPrice};

/// How a quote result was obtained
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Fetched from a provider during this request.
    Live,
    /// Served from a cache record younger than the market TTL; no fetch attempted.
    CacheFresh,
    /// Every provider failed; the last cached record was served regardless of age.
    CacheStaleFallback,
}

/// Result of a quote request
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuoteResult {
    pub kind: MarketKind,
    pub base: String,
    pub quote: String,
    pub amount: Decimal,
    pub unit_price: UnitPrice,
    /// `amount * unit_price`
    pub converted: Decimal,
    /// Provider that produced the unit price, even when served from cache
    pub provider: ProviderId,
    /// When the unit price was fetched from the provider
    pub fetched_at: DateTime<Utc>,
    pub freshness: Freshness,
}

impl QuoteResult {
    /// Build the result for `request` from a unit price and its origin.
    ///
    /// Requests are capped at [`MAX_AMOUNT`](super::MAX_AMOUNT) and prices at
    /// [`MAX_UNIT_PRICE`](super::MAX_UNIT_PRICE), so the product fits. The
    /// multiplication saturates instead of panicking for out-of-range prices.
    pub fn new(
        request: &QuoteRequest,
        unit_price: UnitPrice,
        provider: ProviderId,
        fetched_at: DateTime<Utc>,
        freshness: Freshness,
    ) -> Self {
        Self {
            kind: request.kind(),
            base: request.base().to_string(),
            quote: request.quote().to_string(),
            amount: request.amount(),
            unit_price,
            converted: request.amount().saturating_mul(unit_price),
            provider,
            fetched_at,
            freshness,
        }
    }
}
