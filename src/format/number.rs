//! Conversion between display strings and numeric values.
//!
//! [`parse`] is the left inverse of [`format_value`]: for any value with at
//! most `decimal_limit` fraction digits, `parse(&format_value(v, spec), spec)`
//! yields `v` again.

use crate::core::format_spec::FormatSpec;
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a display string back to its numeric value.
///
/// Currency affixes and thousands separators are stripped, the decimal
/// symbol becomes a decimal point and surrounding whitespace is ignored.
/// Returns `None` when no digits remain or the rest is not a number.
///
/// # Examples
///
/// ```
/// use currency_input::core::format_spec::FormatSpec;
/// use currency_input::core::options::CurrencyInputOptions;
/// use currency_input::format::number::parse;
/// use rust_decimal_macros::dec;
///
/// let spec = FormatSpec::build(&CurrencyInputOptions::default().with_currency("USD"));
/// assert_eq!(parse("$1,234.50", &spec), Some(dec!(1234.5)));
/// assert_eq!(parse("-$7", &spec), Some(dec!(-7)));
/// assert_eq!(parse("$", &spec), None);
/// ```
pub fn parse(display: &str, spec: &FormatSpec) -> Option<Decimal> {
    let mut text = display.trim().to_string();
    for affix in [spec.prefix.trim(), spec.suffix.trim()] {
        if !affix.is_empty() {
            text = text.replace(affix, "");
        }
    }
    if !spec.thousands_separator_symbol.is_empty() {
        text = text.replace(&spec.thousands_separator_symbol, "");
    }
    let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once(spec.decimal_symbol.as_str()) {
        Some((integer, fraction)) => (integer, fraction),
        None => (unsigned, ""),
    };
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction) {
        return None;
    }

    let canonical = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if integer.is_empty() { "0" } else { integer },
        if fraction.is_empty() { "0" } else { fraction },
    );
    match Decimal::from_str(&canonical) {
        Ok(value) if value.is_zero() => Some(Decimal::ZERO),
        Ok(value) => Some(value),
        Err(e) => {
            debug!("'{}' is not representable: {}", display, e);
            None
        }
    }
}

/// Render a value as a grouped decimal without currency affixes.
///
/// At least `min_fraction_digits` and at most
/// `max(decimal_limit, min_fraction_digits)` fraction digits are shown;
/// surplus digits are rounded half away from zero.
pub fn render_decimal(value: Decimal, spec: &FormatSpec, min_fraction_digits: u32) -> String {
    let max_fraction_digits = spec.decimal_limit.max(min_fraction_digits);
    let rounded =
        value.round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero);

    let mut body = rounded.abs().normalize();
    if body.scale() < min_fraction_digits {
        body.rescale(min_fraction_digits);
    }
    let body = body.to_string();
    let (integer, fraction) = match body.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (body.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(integer, &spec.thousands_separator_symbol));
    if let Some(fraction) = fraction {
        out.push_str(&spec.decimal_symbol);
        out.push_str(fraction);
    }
    out
}

/// Render the full display string for a value: sign, prefix, grouped
/// digits with `decimal_limit` fraction digits, suffix.
pub fn format_value(value: Decimal, spec: &FormatSpec) -> String {
    let body = render_decimal(value, spec, spec.decimal_limit);
    match body.strip_prefix('-') {
        Some(unsigned) => format!("-{}{}{}", spec.prefix, unsigned, spec.suffix),
        None => format!("{}{}{}", spec.prefix, body, spec.suffix),
    }
}

/// Insert `separator` between every group of three integer digits.
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::CurrencyInputOptions;
    use rust_decimal_macros::dec;

    fn usd() -> FormatSpec {
        FormatSpec::build(&CurrencyInputOptions::default().with_currency("USD"))
    }

    fn eur_de() -> FormatSpec {
        FormatSpec::build(
            &CurrencyInputOptions::default()
                .with_locale("de-DE")
                .with_currency("EUR"),
        )
    }

    #[test]
    fn test_parse_basic() {
        let spec = usd();
        assert_eq!(parse("$1,234.56", &spec), Some(dec!(1234.56)));
        assert_eq!(parse("1234", &spec), Some(dec!(1234)));
        assert_eq!(parse("$0.5", &spec), Some(dec!(0.5)));
        assert_eq!(parse("$.5", &spec), Some(dec!(0.5)));
        assert_eq!(parse("$12.", &spec), Some(dec!(12)));
    }

    #[test]
    fn test_parse_without_digits() {
        let spec = usd();
        assert_eq!(parse("", &spec), None);
        assert_eq!(parse("$", &spec), None);
        assert_eq!(parse("-", &spec), None);
        assert_eq!(parse(".", &spec), None);
        assert_eq!(parse("abc", &spec), None);
    }

    #[test]
    fn test_parse_negative() {
        let spec = usd();
        assert_eq!(parse("-$1,000.25", &spec), Some(dec!(-1000.25)));
        assert_eq!(parse("-0", &spec), Some(Decimal::ZERO));
    }

    #[test]
    fn test_parse_tolerates_trailing_space() {
        let spec = usd();
        assert_eq!(parse("1234.5 ", &spec), Some(dec!(1234.5)));
        assert_eq!(parse(" $12 ", &spec), Some(dec!(12)));
    }

    #[test]
    fn test_parse_locale_separators() {
        let spec = eur_de();
        assert_eq!(parse("1.234,56\u{a0}€", &spec), Some(dec!(1234.56)));
        assert_eq!(parse("1234,5", &spec), Some(dec!(1234.5)));
        assert_eq!(parse("1,2,3", &spec), None);
    }

    #[test]
    fn test_parse_overflow_is_none() {
        let spec = usd();
        assert_eq!(parse("123456789012345678901234567890123", &spec), None);
    }

    #[test]
    fn test_render_decimal() {
        let spec = usd();
        assert_eq!(render_decimal(dec!(1234.5), &spec, 2), "1,234.50");
        assert_eq!(render_decimal(dec!(1234.5), &spec, 0), "1,234.5");
        assert_eq!(render_decimal(dec!(1234.00), &spec, 0), "1,234");
        assert_eq!(render_decimal(dec!(0.005), &spec, 2), "0.01");
        assert_eq!(render_decimal(dec!(-0.001), &spec, 2), "0.00");
        assert_eq!(render_decimal(dec!(-1234567.891), &spec, 2), "-1,234,567.89");
    }

    #[test]
    fn test_render_without_decimal() {
        let spec = FormatSpec::build(&CurrencyInputOptions::default().with_currency("JPY"));
        assert_eq!(render_decimal(dec!(42.7), &spec, 0), "43");
        assert_eq!(render_decimal(dec!(1000), &spec, 0), "1,000");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(dec!(1234.5), &usd()), "$1,234.50");
        assert_eq!(format_value(dec!(-3), &usd()), "-$3.00");
        assert_eq!(format_value(dec!(1234.5), &eur_de()), "1.234,50\u{a0}€");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", ","), "1");
        assert_eq!(group_thousands("123", ","), "123");
        assert_eq!(group_thousands("1234", ","), "1,234");
        assert_eq!(group_thousands("1234567", "."), "1.234.567");
        assert_eq!(group_thousands("1234567", ""), "1234567");
    }
}
