use crate::core::locale;
use crate::core::options::{CurrencyInputOptions, CurrencyOption, Precision};
use serde::{Deserialize, Serialize};

/// Resolved currency rendering rules for one configuration.
///
/// A `FormatSpec` is derived once from [`CurrencyInputOptions`] and never
/// mutated; a configuration change produces a new spec. The decimal symbol
/// and the thousands separator always differ.
///
/// # Examples
///
/// ```
/// use currency_input::core::format_spec::FormatSpec;
/// use currency_input::core::options::CurrencyInputOptions;
///
/// let spec = FormatSpec::build(
///     &CurrencyInputOptions::default().with_locale("de-DE").with_currency("EUR"),
/// );
/// assert_eq!(spec.decimal_symbol, ",");
/// assert_eq!(spec.thousands_separator_symbol, ".");
/// assert_eq!(spec.suffix, "\u{a0}€");
/// assert_eq!(spec.decimal_limit, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    pub prefix: String,
    pub suffix: String,
    pub decimal_symbol: String,
    pub thousands_separator_symbol: String,
    pub decimal_limit: u32,
    pub allow_decimal: bool,
    pub allow_negative: bool,
    pub integer_limit: Option<usize>,
}

/// Digits an integer export is guaranteed to hold; `Decimal::MAX` has 29.
const EXPORT_DIGITS: u32 = 28;

/// Which decorations a single render hides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderFlags {
    pub hide_fraction: bool,
    pub hide_currency_symbol: bool,
    pub hide_thousands_separator: bool,
}

impl FormatSpec {
    /// Derive the format for a configuration.
    ///
    /// Separators come from the locale unless the currency overrides the
    /// decimal symbol. Range validity is the caller's concern.
    pub fn build(options: &CurrencyInputOptions) -> Self {
        let locale = locale::lookup(options.locale.as_deref());

        let (prefix, suffix, decimal_override, minor_units) = match &options.currency {
            Some(CurrencyOption::Code(code)) => {
                let (prefix, suffix) = locale.affixes(code.symbol());
                (prefix, suffix, None, code.minor_units())
            }
            Some(CurrencyOption::Custom(custom)) => (
                custom.prefix.clone(),
                custom.suffix.clone(),
                custom.decimal_symbol.clone(),
                2,
            ),
            None => (String::new(), String::new(), None, 2),
        };

        let decimal_symbol = decimal_override
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or_else(|| locale.decimal_symbol.to_string());
        let thousands_separator_symbol = if decimal_symbol == locale.thousands_separator_symbol {
            // The locale's decimal symbol is free once the override claims its separator.
            locale.decimal_symbol.to_string()
        } else {
            locale.thousands_separator_symbol.to_string()
        };

        let decimal_limit = match options.precision {
            Precision::Auto => minor_units,
            Precision::Fixed(digits) => digits,
        };

        // Integer export scales by 10^decimal_limit, so the integer part
        // gives up that many digits.
        let integer_limit = if options.export_value_as_integer {
            let cap = EXPORT_DIGITS.saturating_sub(decimal_limit).max(1) as usize;
            Some(options.integer_limit.map_or(cap, |limit| limit.min(cap)))
        } else {
            options.integer_limit
        };

        Self {
            prefix,
            suffix,
            decimal_symbol,
            thousands_separator_symbol,
            decimal_limit,
            allow_decimal: decimal_limit > 0,
            allow_negative: options.allow_negative,
            integer_limit,
        }
    }

    /// A copy with decorations blanked according to `flags`.
    ///
    /// Only the currency symbol and thousands separator are affected; fraction
    /// hiding is a rendering concern, not a mask concern.
    pub fn masked(&self, flags: RenderFlags) -> Self {
        let mut spec = self.clone();
        if flags.hide_currency_symbol {
            spec.prefix.clear();
            spec.suffix.clear();
        }
        if flags.hide_thousands_separator {
            spec.thousands_separator_symbol.clear();
        }
        spec
    }
}
