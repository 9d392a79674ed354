use std::str::FromStr;

use rust_decimal::Decimal;

use super::market::MarketKind;
use super::types::MAX_AMOUNT;
use crate::errors::ValidationError;

const MIN_SYMBOL_LEN: usize = 2;
const MAX_SYMBOL_LEN: usize = 10;
const FIAT_CODE_LEN: usize = 3;

/// A validated quote request.
///
/// Can only be built through [`QuoteRequest::new`] or [`QuoteRequest::parse`],
/// so every instance that reaches the market service has normalized symbols
/// and an amount in `(0, MAX_AMOUNT]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRequest {
    kind: MarketKind,
    base: String,
    quote: String,
    amount: Decimal,
}

impl QuoteRequest {
    /// Validate and normalize a request.
    ///
    /// Symbols are trimmed and upper-cased. Fiat symbols must be three-letter
    /// currency codes; crypto symbols may be 2 to 10 letters or digits.
    pub fn new(
        kind: MarketKind,
        base: &str,
        quote: &str,
        amount: Decimal,
    ) -> Result<Self, ValidationError> {
        let base = normalize_symbol(kind, base)?;
        let quote = normalize_symbol(kind, quote)?;

        if base == quote {
            return Err(ValidationError::SamePair(base));
        }

        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount.to_string()));
        }

        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(ValidationError::AmountTooLarge(amount.to_string()));
        }

        Ok(Self {
            kind,
            base,
            quote,
            amount,
        })
    }

    /// Validate a request whose amount is still raw user text.
    pub fn parse(
        kind: MarketKind,
        base: &str,
        quote: &str,
        amount: &str,
    ) -> Result<Self, ValidationError> {
        let amount = parse_amount(amount)?;
        Self::new(kind, base, quote, amount)
    }

    pub fn kind(&self) -> MarketKind {
        self.kind
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

fn normalize_symbol(kind: MarketKind, raw: &str) -> Result<String, ValidationError> {
    let symbol = raw.trim().to_ascii_uppercase();

    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }

    if symbol.len() < MIN_SYMBOL_LEN
        || symbol.len() > MAX_SYMBOL_LEN
        || !symbol.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ValidationError::InvalidSymbol(raw.trim().to_string()));
    }

    if kind == MarketKind::Fiat
        && (symbol.len() != FIAT_CODE_LEN || !symbol.chars().all(|c| c.is_ascii_alphabetic()))
    {
        return Err(ValidationError::InvalidFiatCode(symbol));
    }

    Ok(symbol)
}

/// Parse a user-supplied amount.
///
/// Accepts plain (`12.5`) and scientific (`1.25e1`) notation. Anything that is
/// not a finite decimal, including `NaN` and `inf`, is rejected.
fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidAmount(raw.to_string()));
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbols_are_normalized() {
        let request = QuoteRequest::new(MarketKind::Fiat, " usd ", "twd", dec!(100)).unwrap();
        assert_eq!(request.base(), "USD");
        assert_eq!(request.quote(), "TWD");
        assert_eq!(request.amount(), dec!(100));
        assert_eq!(request.kind(), MarketKind::Fiat);
    }

    #[test]
    fn test_crypto_symbols_allow_digits() {
        let request = QuoteRequest::new(MarketKind::Crypto, "1inch", "usdt", dec!(3)).unwrap();
        assert_eq!(request.base(), "1INCH");
        assert_eq!(request.quote(), "USDT");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let err = QuoteRequest::new(MarketKind::Crypto, "  ", "USD", dec!(1)).unwrap_err();
        assert_eq!(err, ValidationError::EmptySymbol);
    }

    #[test]
    fn test_invalid_symbol_rejected() {
        for symbol in ["B", "BTC-USD", "ABCDEFGHIJK", "ÉTH"] {
            let err = QuoteRequest::new(MarketKind::Crypto, symbol, "USD", dec!(1)).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidSymbol(_)),
                "{symbol}: {err:?}"
            );
        }
    }

    #[test]
    fn test_fiat_requires_three_letter_codes() {
        let err = QuoteRequest::new(MarketKind::Fiat, "USDT", "TWD", dec!(1)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidFiatCode("USDT".to_string()));

        let err = QuoteRequest::new(MarketKind::Fiat, "US1", "TWD", dec!(1)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidFiatCode("US1".to_string()));
    }

    #[test]
    fn test_same_pair_rejected() {
        let err = QuoteRequest::new(MarketKind::Fiat, "usd", "USD", dec!(1)).unwrap_err();
        assert_eq!(err, ValidationError::SamePair("USD".to_string()));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let err = QuoteRequest::new(MarketKind::Crypto, "BTC", "USD", dec!(0)).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveAmount(_)));

        let err = QuoteRequest::new(MarketKind::Crypto, "BTC", "USD", dec!(-2.5)).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveAmount(_)));
    }

    #[test]
    fn test_parse_amount_forms() {
        let request = QuoteRequest::parse(MarketKind::Crypto, "BTC", "USD", "0.5").unwrap();
        assert_eq!(request.amount(), dec!(0.5));

        let request = QuoteRequest::parse(MarketKind::Crypto, "BTC", "USD", "1.25e1").unwrap();
        assert_eq!(request.amount(), dec!(12.5));
    }

    #[test]
    fn test_parse_amount_rejects_non_finite_and_garbage() {
        for raw in ["NaN", "inf", "-inf", "abc", "", "1.2.3"] {
            let err = QuoteRequest::parse(MarketKind::Fiat, "USD", "TWD", raw).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidAmount(_)),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn test_amount_upper_bound() {
        let max = Decimal::from(MAX_AMOUNT);
        let request = QuoteRequest::new(MarketKind::Crypto, "BTC", "USD", max).unwrap();
        assert_eq!(request.amount(), max);

        let err = QuoteRequest::parse(
            MarketKind::Crypto,
            "BTC",
            "USD",
            "79228162514264337593543950335",
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::AmountTooLarge(_)));

        let err = QuoteRequest::parse(MarketKind::Fiat, "USD", "TWD", "1e16").unwrap_err();
        assert!(matches!(err, ValidationError::AmountTooLarge(_)));
    }

    #[test]
    fn test_parse_amount_zero_is_non_positive() {
        let err = QuoteRequest::parse(MarketKind::Fiat, "USD", "TWD", "0").unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveAmount(_)));
    }
}
