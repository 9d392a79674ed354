//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`ValidationError`]: Rejected user input, raised before any cache or network access
//! - [`ProviderError`]: A single failed provider call, kept inside the attempt trace
//! - [`MarketDataError`]: The terminal error returned by the market service
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

use crate::models::MarketKind;
use crate::registry::AttemptTrace;

/// Errors raised while validating a quote request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A symbol was empty after trimming.
    #[error("Symbol must not be empty")]
    EmptySymbol,

    /// A symbol contained characters other than ASCII letters and digits,
    /// or had an unsupported length.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A fiat symbol was not a three-letter currency code.
    #[error("Invalid fiat currency code: {0}")]
    InvalidFiatCode(String),

    /// Base and quote resolve to the same symbol.
    #[error("Base and quote must differ: {0}")]
    SamePair(String),

    /// The amount could not be parsed as a finite decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The amount was zero or negative.
    #[error("Amount must be greater than zero: {0}")]
    NonPositiveAmount(String),

    /// The amount exceeded [`MAX_AMOUNT`](crate::models::MAX_AMOUNT).
    #[error("Amount too large: {0}")]
    AmountTooLarge(String),
}

/// Failure of a single provider call.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines whether the
/// retry policy should call the same provider again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network-level failure: connection refused, DNS, timeout, truncated body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Http {
        /// The HTTP status code
        status: u16,
    },

    /// The response did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// The pair cannot be mapped to this provider's representation.
    #[error("Unsupported pair: {base}/{quote}")]
    UnsupportedPair {
        /// Base symbol as requested
        base: String,
        /// Quote symbol as requested
        quote: String,
    },
}

impl ProviderError {
    /// Shorthand for an [`UnsupportedPair`](Self::UnsupportedPair) error.
    pub fn unsupported(base: &str, quote: &str) -> Self {
        Self::UnsupportedPair {
            base: base.to_string(),
            quote: quote.to_string(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::WithBackoff`]: transport failures, HTTP 429 and 5xx
    /// - [`RetryClass::Never`]: everything else
    ///
    /// # Examples
    ///
    /// ```
    /// use alfred_market_data::errors::{ProviderError, RetryClass};
    ///
    /// let error = ProviderError::Http { status: 429 };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = ProviderError::Parse("missing field".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Transport(_) => RetryClass::WithBackoff,
            Self::Http { status } if *status == 429 || (500..600).contains(status) => {
                RetryClass::WithBackoff
            }
            Self::Http { .. } | Self::Parse(_) | Self::UnsupportedPair { .. } => RetryClass::Never,
        }
    }

    /// Stable, machine-readable label for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Http { .. } => "http",
            Self::Parse(_) => "parse",
            Self::UnsupportedPair { .. } => "unsupported_pair",
        }
    }
}

/// Errors returned by the market service.
///
/// Provider failures never surface one by one; they are collected in the
/// attempt trace carried by [`MarketDataError::NoUsableResult`].
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Every provider failed and no cache record exists for the pair.
    #[error("No usable result for {kind} {base}/{quote}: {}", .trace.summary())]
    NoUsableResult {
        /// Market kind of the request
        kind: MarketKind,
        /// Base symbol of the request
        base: String,
        /// Quote symbol of the request
        quote: String,
        /// Every provider consulted, in order
        trace: AttemptTrace,
    },
}
