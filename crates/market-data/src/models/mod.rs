//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `types` - Type aliases for common identifiers (ProviderId, UnitPrice)
//! - `market` - Market kind (fiat or crypto) and its cache TTL
//! - `request` - Validated quote requests (QuoteRequest)
//! - `quote` - Quote results and their freshness state (QuoteResult, Freshness)

mod market;
mod quote;
mod request;
mod types;

pub use market::MarketKind;
pub use quote::{Freshness, QuoteResult};
pub use request::QuoteRequest;
pub use types::{ProviderId, UnitPrice, MAX_AMOUNT, MAX_UNIT_PRICE};
