//! Sanity checks applied to every unit price a provider returns.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::ProviderError;
use crate::models::{UnitPrice, MAX_UNIT_PRICE};

/// Reject prices no real market would quote.
pub(crate) fn check_unit_price(price: Decimal) -> Result<UnitPrice, ProviderError> {
    if price <= Decimal::ZERO {
        return Err(ProviderError::Parse(format!("Non-positive price: {}", price)));
    }
    if price > Decimal::from(MAX_UNIT_PRICE) {
        return Err(ProviderError::Parse(format!("Implausible price: {}", price)));
    }
    Ok(price.normalize())
}

/// Convert a JSON float into a checked unit price.
pub(crate) fn price_from_f64(value: f64) -> Result<UnitPrice, ProviderError> {
    if !value.is_finite() {
        return Err(ProviderError::Parse(format!("Non-finite price: {}", value)));
    }
    let price = Decimal::try_from(value)
        .map_err(|_| ProviderError::Parse(format!("Price out of range: {}", value)))?;
    check_unit_price(price)
}

/// Parse a decimal string into a checked unit price.
pub(crate) fn price_from_str(value: &str) -> Result<UnitPrice, ProviderError> {
    let price = Decimal::from_str(value.trim())
        .map_err(|_| ProviderError::Parse(format!("Invalid price: {:?}", value)))?;
    check_unit_price(price)
}
