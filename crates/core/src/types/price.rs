//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are held in the currency's standard unit (e.g., naira, not kobo).
/// Hosted payment widgets take the smallest unit, so [`Price::minor_units`]
/// does the one conversion at the gateway boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
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

    /// Amount in the smallest currency unit: `round(amount * 100)`.
    ///
    /// Saturates at `i64` bounds, which no real cart total approaches.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        let minor = (self.amount * Decimal::from(100)).round();
        minor.to_i64().unwrap_or(i64::MAX)
    }
}

/// ISO 4217 currency codes accepted by the payment gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    NGN,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// The ISO code as a string, as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NGN" => Ok(Self::NGN),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency code: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_minor_units_whole() {
        let price = Price::new(Decimal::from(100), CurrencyCode::NGN);
        assert_eq!(price.minor_units(), 10_000);
    }

    #[test]
    fn test_minor_units_rounds() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.minor_units(), 1999);

        // Decimal::round is half-to-even: 1000.5 -> 1000
        let price = Price::new(Decimal::new(10_005, 3), CurrencyCode::USD);
        assert_eq!(price.minor_units(), 1000);
    }

    #[test]
    fn test_currency_round_trip() {
        let code: CurrencyCode = "ngn".parse().expect("parse");
        assert_eq!(code, CurrencyCode::NGN);
        assert_eq!(code.as_str(), "NGN");
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
