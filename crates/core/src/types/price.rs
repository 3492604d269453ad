//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// The catalog API reports bare numbers; the currency is attached when the
/// value enters the domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pounds, not piastres).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the catalog's default currency.
    #[must_use]
    pub fn catalog(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// A zero amount in the catalog's default currency.
    #[must_use]
    pub fn zero() -> Self {
        Self::catalog(Decimal::ZERO)
    }
}

/// Formats as `"<amount> <code>"`, e.g. `"149 EGP"`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.amount.normalize(),
            self.currency_code.code()
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EGP,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EGP => "EGP",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_amount() {
        let price = Price::catalog(Decimal::new(149, 0));
        assert_eq!(price.to_string(), "149 EGP");
    }

    #[test]
    fn test_display_strips_trailing_zeros() {
        let price = Price::catalog(Decimal::new(14950, 2));
        assert_eq!(price.to_string(), "149.5 EGP");
    }

    #[test]
    fn test_zero() {
        assert_eq!(Price::zero().to_string(), "0 EGP");
    }

    #[test]
    fn test_explicit_currency() {
        let price = Price::new(Decimal::new(5, 0), CurrencyCode::USD);
        assert_eq!(price.to_string(), "5 USD");
    }
}
