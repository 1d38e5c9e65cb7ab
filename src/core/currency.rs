use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies
///
/// All supported currencies use two decimal places; the scale is kept on the
/// enum so adding a zero-decimal currency later does not touch call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Polish Zloty
    PLN,
    /// Euro
    EUR,
    /// US Dollar
    USD,
}

impl Currency {
    /// Returns the decimal scale for this currency
    pub fn scale(&self) -> u32 {
        match self {
            Currency::PLN | Currency::EUR | Currency::USD => 2,
        }
    }

    /// Validates that a decimal value is a usable charge amount.
    ///
    /// Extra precision beyond the currency scale is allowed here; the wire
    /// formatter rounds it deterministically, and rejecting it at intake
    /// would turn `19.995` into an error instead of `"20.00"`.
    pub fn validate_amount(&self, amount: Decimal) -> Result<(), String> {
        if amount <= Decimal::ZERO {
            return Err(format!("{} amount must be positive", self));
        }

        Ok(())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::PLN => write!(f, "PLN"),
            Currency::EUR => write!(f, "EUR"),
            Currency::USD => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PLN" => Ok(Currency::PLN),
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            other => Err(format!("Unsupported currency: {}", other)),
        }
    }
}

/// Formats an amount for the provider wire format: exactly two decimals,
/// `'.'` separator, half-up rounding.
///
/// The formatted string participates in the outbound signature, so rounding
/// must be deterministic: `19.995` formats to `"20.00"`, never `"19.99"`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
