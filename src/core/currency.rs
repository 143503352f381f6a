use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code.
///
/// Known codes resolve to a display symbol and a default number of minor
/// units. Unknown codes are still accepted and display as the code itself
/// with two minor units.
///
/// # Examples
///
/// ```
/// use currency_input::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// assert_eq!(usd.symbol(), "$");
/// assert_eq!(usd.minor_units(), 2);
/// assert_eq!(CurrencyCode::new("JPY").minor_units(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

/// Display data for a known currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub minor_units: u32,
}

const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", symbol: "$", minor_units: 2 },
    CurrencyInfo { code: "EUR", symbol: "€", minor_units: 2 },
    CurrencyInfo { code: "GBP", symbol: "£", minor_units: 2 },
    CurrencyInfo { code: "JPY", symbol: "¥", minor_units: 0 },
    CurrencyInfo { code: "CHF", symbol: "CHF", minor_units: 2 },
    CurrencyInfo { code: "BRL", symbol: "R$", minor_units: 2 },
    CurrencyInfo { code: "INR", symbol: "₹", minor_units: 2 },
    CurrencyInfo { code: "CNY", symbol: "CN¥", minor_units: 2 },
    CurrencyInfo { code: "CAD", symbol: "CA$", minor_units: 2 },
    CurrencyInfo { code: "AUD", symbol: "A$", minor_units: 2 },
    CurrencyInfo { code: "KRW", symbol: "₩", minor_units: 0 },
    CurrencyInfo { code: "KWD", symbol: "KWD", minor_units: 3 },
    CurrencyInfo { code: "BHD", symbol: "BHD", minor_units: 3 },
    CurrencyInfo { code: "ZAR", symbol: "R", minor_units: 2 },
    CurrencyInfo { code: "RUB", symbol: "RUB", minor_units: 2 },
];

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Look up display data for this code (case-insensitive).
    pub fn info(&self) -> Option<&'static CurrencyInfo> {
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(&self.0))
    }

    /// The display symbol, falling back to the code itself.
    pub fn symbol(&self) -> &str {
        match self.info() {
            Some(info) => info.symbol,
            None => &self.0,
        }
    }

    /// Default number of fraction digits for amounts in this currency.
    pub fn minor_units(&self) -> u32 {
        self.info().map(|info| info.minor_units).unwrap_or(2)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
