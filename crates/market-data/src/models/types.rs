use std::borrow::Cow;

use rust_decimal::Decimal;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Price of one unit of the base symbol, expressed in the quote symbol
pub type UnitPrice = Decimal;

/// Largest unit price accepted from a provider or a cache record
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;

/// Largest amount a request may convert.
///
/// `MAX_AMOUNT * MAX_UNIT_PRICE` is 1e27, well inside `Decimal`'s range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;
