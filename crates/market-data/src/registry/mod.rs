//! Provider orchestration module.
//!
//! This module provides orchestration for quote providers, including:
//! - The market service (cache short-circuit, ordered fallback, stale recovery)
//! - Bounded retry with backoff per provider
//! - Attempt tracing for diagnostics and terminal errors

mod attempt;
mod market_service;
mod retry_policy;

pub use attempt::{AttemptOutcome, AttemptTrace, ProviderAttempt};
pub use market_service::MarketService;
pub use retry_policy::{Backoff, RetryConfig, RetryOutcome, RetryPolicy};
