use crate::core::format_spec::FormatSpec;
use crate::format::number::group_thousands;
use serde::{Deserialize, Serialize};

/// One position of a mask, consumed by a [`Conformer`](crate::mask::conformer::Conformer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskToken {
    /// Accepts one ASCII digit.
    Digit,
    /// Accepts a minus sign.
    Minus,
    /// A fixed character emitted as-is.
    Literal(char),
}

impl MaskToken {
    /// Whether this position is filled from user input.
    pub fn is_slot(&self) -> bool {
        !matches!(self, MaskToken::Literal(_))
    }

    pub fn accepts(&self, c: char) -> bool {
        match self {
            MaskToken::Digit => c.is_ascii_digit(),
            MaskToken::Minus => c == '-',
            MaskToken::Literal(literal) => *literal == c,
        }
    }
}

/// Builds positional masks for a currency format.
///
/// The mask depends on the raw value: thousands separators are placed from
/// the integer-part length of the input, and fraction slots only appear once
/// the decimal symbol has been typed.
///
/// # Examples
///
/// ```
/// use currency_input::core::format_spec::FormatSpec;
/// use currency_input::core::options::CurrencyInputOptions;
/// use currency_input::mask::currency_mask::{CurrencyMask, MaskToken::*};
///
/// let spec = FormatSpec::build(&CurrencyInputOptions::default().with_currency("USD"));
/// let mask = CurrencyMask::new(&spec).tokens_for("1234");
/// assert_eq!(mask, vec![Literal('$'), Digit, Literal(','), Digit, Digit, Digit]);
/// ```
#[derive(Debug, Clone)]
pub struct CurrencyMask<'a> {
    spec: &'a FormatSpec,
}

impl<'a> CurrencyMask<'a> {
    pub fn new(spec: &'a FormatSpec) -> Self {
        Self { spec }
    }

    fn has_decimal_slot(&self) -> bool {
        self.spec.allow_decimal && self.spec.decimal_limit > 0
    }

    /// Mask for a raw input value.
    pub fn tokens_for(&self, raw: &str) -> Vec<MaskToken> {
        let spec = self.spec;
        let prefix = literals(&spec.prefix);
        let suffix = literals(&spec.suffix);

        let first_prefix_char = spec.prefix.chars().next();
        if raw.is_empty() || (raw.chars().count() == 1 && raw.chars().next() == first_prefix_char) {
            return [prefix, vec![MaskToken::Digit], suffix].concat();
        }
        if raw == spec.decimal_symbol && self.has_decimal_slot() {
            let mut mask = prefix;
            mask.push(MaskToken::Literal('0'));
            mask.extend(literals(&spec.decimal_symbol));
            mask.push(MaskToken::Digit);
            mask.extend(suffix);
            return mask;
        }

        let (negative, mut value) = match raw.strip_prefix('-') {
            Some(rest) if spec.allow_negative => (true, rest),
            _ => (false, raw),
        };
        if !spec.suffix.is_empty() {
            value = value.strip_suffix(spec.suffix.as_str()).unwrap_or(value);
        }
        value = value.strip_prefix(spec.prefix.as_str()).unwrap_or(value);

        let decimal_at = if self.has_decimal_slot() {
            value.rfind(spec.decimal_symbol.as_str())
        } else {
            None
        };
        let (integer, fraction) = match decimal_at {
            Some(at) => (&value[..at], Some(&value[at + spec.decimal_symbol.len()..])),
            None => (value, None),
        };

        let mut digits = significant_integer_digits(integer);
        if let Some(limit) = spec.integer_limit {
            digits.truncate(limit.max(1));
        }

        let mut mask = prefix;
        let grouped = group_thousands(&digits, &spec.thousands_separator_symbol);
        mask.extend(grouped.chars().map(|c| {
            if c.is_ascii_digit() {
                MaskToken::Digit
            } else {
                MaskToken::Literal(c)
            }
        }));

        if let Some(fraction) = fraction {
            mask.extend(literals(&spec.decimal_symbol));
            let fraction_digits = fraction.chars().filter(char::is_ascii_digit).count();
            let slots = fraction_digits.min(spec.decimal_limit as usize);
            mask.extend(std::iter::repeat(MaskToken::Digit).take(slots));
        }

        if negative {
            if mask.len() == spec.prefix.chars().count() {
                mask.push(MaskToken::Digit);
            }
            mask.insert(0, MaskToken::Minus);
        }
        mask.extend(suffix);
        mask
    }

    /// Normalize the integer part of `raw` before conforming: redundant
    /// leading zeros are dropped, as are digits beyond `integer_limit`.
    ///
    /// `caret` is a character offset and is shifted left for every dropped
    /// character in front of it.
    pub fn normalize(&self, raw: &str, caret: usize) -> (String, usize) {
        let integer_end = if self.has_decimal_slot() {
            raw.rfind(self.spec.decimal_symbol.as_str()).unwrap_or(raw.len())
        } else {
            raw.len()
        };
        let limit = self.spec.integer_limit.map(|limit| limit.max(1));
        let mut remaining = raw[..integer_end].chars().filter(char::is_ascii_digit).count();

        let mut out = String::with_capacity(raw.len());
        let mut new_caret = caret;
        let mut kept = 0;
        for (i, (byte, c)) in raw.char_indices().enumerate() {
            if byte < integer_end && c.is_ascii_digit() {
                remaining -= 1;
                let redundant_zero = kept == 0 && c == '0' && remaining > 0;
                let over_limit = limit.map_or(false, |limit| kept >= limit);
                if redundant_zero || over_limit {
                    if i < caret {
                        new_caret -= 1;
                    }
                    continue;
                }
                kept += 1;
            }
            out.push(c);
        }
        (out, new_caret)
    }
}

fn literals(text: &str) -> Vec<MaskToken> {
    text.chars().map(MaskToken::Literal).collect()
}

/// Integer digits with redundant leading zeros removed (`007` -> `7`, `000` -> `0`).
pub fn significant_integer_digits(integer: &str) -> String {
    let digits: String = integer.chars().filter(char::is_ascii_digit).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
