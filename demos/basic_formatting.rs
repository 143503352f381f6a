//! Rendering and parsing values across locales.
//!
//! Shows how the same amount is displayed for several locale/currency
//! pairs and how display strings parse back to numbers.

use currency_input::core::format_spec::FormatSpec;
use currency_input::core::options::{CurrencyInputOptions, Precision};
use currency_input::format::number::{format_value, parse};
use rust_decimal_macros::dec;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  currency-input: Basic Formatting Example  ║");
    println!("╚════════════════════════════════════════════╝\n");

    // --- Scenario 1: One amount, many locales ---
    println!("━━━ Scenario 1: Locales ━━━\n");

    let amount = dec!(-1234567.891);
    let pairs = [
        ("en-US", "USD"),
        ("en-GB", "GBP"),
        ("de-DE", "EUR"),
        ("fr-FR", "EUR"),
        ("de-CH", "CHF"),
        ("pt-BR", "BRL"),
        ("ja-JP", "JPY"),
        ("en-US", "KWD"),
    ];
    for (locale, currency) in pairs {
        let options = CurrencyInputOptions::default()
            .with_locale(locale)
            .with_currency(currency);
        let spec = FormatSpec::build(&options);
        println!("  {:<6} {:<4} {}", locale, currency, format_value(amount, &spec));
    }

    // --- Scenario 2: Parsing user text ---
    println!("\n━━━ Scenario 2: Parsing ━━━\n");

    let spec = FormatSpec::build(&CurrencyInputOptions::default().with_locale("de-DE"));
    for text in ["1.234,5 €", "-0,99", "€", "12,,3"] {
        match parse(text, &spec) {
            Some(value) => println!("  {:<12} → {}", format!("{:?}", text), value),
            None => println!("  {:<12} → (not a number)", format!("{:?}", text)),
        }
    }

    // --- Scenario 3: Fixed precision ---
    println!("\n━━━ Scenario 3: Precision ━━━\n");

    for digits in 0..=4 {
        let options = CurrencyInputOptions {
            precision: Precision::Fixed(digits),
            ..CurrencyInputOptions::default().with_currency("USD")
        };
        let spec = FormatSpec::build(&options);
        println!("  {} digits: {}", digits, format_value(dec!(3.14159), &spec));
    }
}
