//! Cleared currencies.
//!
//! # Examples
//!
//! ```
//! use margin_core::types::currency::Currency;
//!
//! let eur: Currency = "eur".parse().unwrap();
//! assert_eq!(eur, Currency::EUR);
//! assert_eq!(eur.code(), "EUR");
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::CurrencyError;

/// ISO 4217 codes of the currencies accepted for clearing.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Currency {
    /// Australian Dollar
    AUD,
    /// Canadian Dollar
    CAD,
    /// Swiss Franc
    CHF,
    /// Danish Krone
    DKK,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// New Zealand Dollar
    NZD,
    /// Swedish Krona
    SEK,
    /// Singapore Dollar
    SGD,
    /// United States Dollar
    USD,
}

impl Currency {
    /// All cleared currencies in code order.
    pub const ALL: [Currency; 11] = [
        Currency::AUD,
        Currency::CAD,
        Currency::CHF,
        Currency::DKK,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::NZD,
        Currency::SEK,
        Currency::SGD,
        Currency::USD,
    ];

    /// Returns the ISO 4217 currency code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::DKK => "DKK",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::NZD => "NZD",
            Currency::SEK => "SEK",
            Currency::SGD => "SGD",
            Currency::USD => "USD",
        }
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Parses a currency code (case-insensitive).
    fn from_str(s: &str) -> Result<Self, CurrencyError> {
        let upper = s.trim().to_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == upper)
            .ok_or_else(|| CurrencyError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
