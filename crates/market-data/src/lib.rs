//! Alfred Market Data Crate
//!
//! This crate resolves fiat exchange rates and crypto spot prices for the
//! Alfred workflow tooling, with a file cache that keeps answers available
//! when upstream providers are down.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Two market kinds: fiat (24 h cache TTL) and crypto (5 min cache TTL)
//! - Three public providers: ExchangeRate-API, Binance, CoinGecko
//! - Ordered crypto fallback (Binance, then CoinGecko)
//! - Bounded retry with exponential backoff for transient failures
//! - Stale-cache recovery when every provider fails
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  QuoteRequest    |  (validated input)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  MarketService   | <-> |   CacheStore     |  (fresh / stale records)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |   RetryPolicy    |  (per provider, injectable sleeper)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Provider      |  (ExchangeRate-API, Binance, CoinGecko)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   QuoteResult    |  (live / cache_fresh / cache_stale_fallback)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`QuoteRequest`] - Validated request (kind, base, quote, amount)
//! - [`QuoteResult`] - Unit price, converted amount, provider and [`Freshness`]
//! - [`CacheStore`] - Atomic file-per-pair cache
//! - [`MarketService`] - Request orchestration
//! - [`AttemptTrace`] - Ordered provider outcomes attached to terminal errors

pub mod cache;
pub mod clock;
pub mod config;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export all public types from models
pub use models::{Freshness, MarketKind, ProviderId, QuoteRequest, QuoteResult, UnitPrice};

// Re-export error types
pub use errors::{MarketDataError, ProviderError, RetryClass, ValidationError};

// Re-export cache and configuration types
pub use cache::{CacheRecord, CacheStore};
pub use clock::{Clock, FixedClock, Sleeper, SystemClock, TokioSleeper};
pub use config::MarketConfig;

// Re-export provider types
pub use provider::{
    BinanceProvider, CoinGeckoProvider, ExchangeRateApiProvider, Provider, ProviderSet,
    QuoteProvider,
};

// Re-export registry types
pub use registry::{
    AttemptOutcome, AttemptTrace, MarketService, ProviderAttempt, RetryConfig, RetryPolicy,
};
