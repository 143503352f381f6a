//! Built-in locale data for number and currency rendering.

use log::debug;

/// Where a currency symbol sits relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    /// `$1,234.56`
    Prefix,
    /// `€ 1.234,56`
    PrefixSpaced,
    /// `1.234,56 €`
    SuffixSpaced,
}

/// Separators and currency layout for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleData {
    pub tag: &'static str,
    pub decimal_symbol: &'static str,
    pub thousands_separator_symbol: &'static str,
    pub placement: SymbolPlacement,
}

/// Space used between an amount and a spaced currency symbol.
pub const SYMBOL_SPACE: &str = "\u{a0}";

pub const DEFAULT_LOCALE: LocaleData = LocaleData {
    tag: "en-US",
    decimal_symbol: ".",
    thousands_separator_symbol: ",",
    placement: SymbolPlacement::Prefix,
};

const LOCALES: &[LocaleData] = &[
    DEFAULT_LOCALE,
    LocaleData { tag: "en-GB", decimal_symbol: ".", thousands_separator_symbol: ",", placement: SymbolPlacement::Prefix },
    LocaleData { tag: "en-IN", decimal_symbol: ".", thousands_separator_symbol: ",", placement: SymbolPlacement::Prefix },
    LocaleData { tag: "en", decimal_symbol: ".", thousands_separator_symbol: ",", placement: SymbolPlacement::Prefix },
    LocaleData { tag: "de-DE", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "de-CH", decimal_symbol: ".", thousands_separator_symbol: "\u{2019}", placement: SymbolPlacement::PrefixSpaced },
    LocaleData { tag: "de", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "fr-FR", decimal_symbol: ",", thousands_separator_symbol: "\u{202f}", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "fr", decimal_symbol: ",", thousands_separator_symbol: "\u{202f}", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "es-ES", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "es", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "it-IT", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "it", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::SuffixSpaced },
    LocaleData { tag: "nl-NL", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::PrefixSpaced },
    LocaleData { tag: "nl", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::PrefixSpaced },
    LocaleData { tag: "pt-BR", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::PrefixSpaced },
    LocaleData { tag: "pt", decimal_symbol: ",", thousands_separator_symbol: ".", placement: SymbolPlacement::PrefixSpaced },
    LocaleData { tag: "ja-JP", decimal_symbol: ".", thousands_separator_symbol: ",", placement: SymbolPlacement::Prefix },
    LocaleData { tag: "ja", decimal_symbol: ".", thousands_separator_symbol: ",", placement: SymbolPlacement::Prefix },
    LocaleData { tag: "zh-CN", decimal_symbol: ".", thousands_separator_symbol: ",", placement: SymbolPlacement::Prefix },
    LocaleData { tag: "zh", decimal_symbol: ".", thousands_separator_symbol: ",", placement: SymbolPlacement::Prefix },
];

/// Resolve locale data for a BCP 47 tag.
///
/// Tries the exact tag, then the language subtag, then falls back to
/// `en-US`. Matching is case-insensitive and accepts `_` as separator.
pub fn lookup(tag: Option<&str>) -> LocaleData {
    let Some(tag) = tag else {
        return DEFAULT_LOCALE;
    };
    let normalized = tag.replace('_', "-");
    if let Some(found) = find(&normalized) {
        return found;
    }
    let language = normalized.split('-').next().unwrap_or_default();
    if let Some(found) = find(language) {
        return found;
    }
    debug!("no locale data for '{}', falling back to {}", tag, DEFAULT_LOCALE.tag);
    DEFAULT_LOCALE
}

fn find(tag: &str) -> Option<LocaleData> {
    LOCALES
        .iter()
        .find(|l| l.tag.eq_ignore_ascii_case(tag))
        .copied()
}

impl LocaleData {
    /// Split a currency symbol into `(prefix, suffix)` for this locale.
    pub fn affixes(&self, symbol: &str) -> (String, String) {
        match self.placement {
            SymbolPlacement::Prefix => (symbol.to_string(), String::new()),
            SymbolPlacement::PrefixSpaced => (format!("{symbol}{SYMBOL_SPACE}"), String::new()),
            SymbolPlacement::SuffixSpaced => (String::new(), format!("{SYMBOL_SPACE}{symbol}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale() {
        assert_eq!(lookup(None), DEFAULT_LOCALE);
    }

    #[test]
    fn test_exact_lookup() {
        let de = lookup(Some("de-DE"));
        assert_eq!(de.decimal_symbol, ",");
        assert_eq!(de.thousands_separator_symbol, ".");
        assert_eq!(de.placement, SymbolPlacement::SuffixSpaced);
    }

    #[test]
    fn test_language_fallback() {
        let at = lookup(Some("de_AT"));
        assert_eq!(at.tag, "de");
        let unknown = lookup(Some("xx-YY"));
        assert_eq!(unknown.tag, "en-US");
    }

    #[test]
    fn test_affixes() {
        let (prefix, suffix) = lookup(Some("en-US")).affixes("$");
        assert_eq!((prefix.as_str(), suffix.as_str()), ("$", ""));
        let (prefix, suffix) = lookup(Some("de-DE")).affixes("€");
        assert_eq!(prefix, "");
        assert_eq!(suffix, "\u{a0}€");
    }
}
