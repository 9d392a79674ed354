//! Quote provider trait definition.
//!
//! This module defines the `QuoteProvider` trait that every provider client
//! and the closed [`Provider`](super::Provider) set implement.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::UnitPrice;

/// Trait for quote providers.
///
/// A provider maps a normalized `(base, quote)` pair to its own
/// representation, calls its endpoint once, and returns the unit price or a
/// typed failure. Retrying and fallback are handled by the caller.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use alfred_market_data::provider::QuoteProvider;
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl QuoteProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch(&self, _base: &str, _quote: &str) -> Result<UnitPrice, ProviderError> {
///         Ok(dec!(1))
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "BINANCE", "COINGECKO", etc.
    /// Used for logging, attempt traces and cached provider identity.
    fn id(&self) -> &'static str;

    /// Fetch the price of one `base` expressed in `quote`.
    ///
    /// # Arguments
    ///
    /// * `base` - Upper-case base symbol (e.g., "BTC", "USD")
    /// * `quote` - Upper-case quote symbol (e.g., "USD", "TWD")
    ///
    /// # Returns
    ///
    /// The unit price on success. A pair this provider cannot express is
    /// [`ProviderError::UnsupportedPair`], never a substituted pair.
    async fn fetch(&self, base: &str, quote: &str) -> Result<UnitPrice, ProviderError>;
}
