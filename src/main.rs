//! currency-input CLI
//!
//! Format, parse and simulate typing into a currency field from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Render a value
//! currency-input format --value 1234.5 --currency USD --locale en-US
//!
//! # Render the focused (distraction-free) view
//! currency-input format --value 1234.5 --focused
//!
//! # Parse a display string
//! currency-input parse --text "1.234,50 €" --locale de-DE
//!
//! # Replay keystrokes and show every intermediate state
//! currency-input type --keys "{focus}1234.5{blur}" --format json
//! ```

use currency_input::core::format_spec::FormatSpec;
use currency_input::core::options::CurrencyInputOptions;
use currency_input::format::number::{format_value, parse};
use currency_input::simulation::typing::{parse_keys, Key, TypingSession};
use log::debug;
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"currency-input: currency formatting for text input fields

USAGE:
    currency-input <COMMAND> [OPTIONS]

COMMANDS:
    format      Render a numeric value as the field would display it
    parse       Parse a display string back to a number
    type        Replay a key script against an attached field
    help        Show this message

OPTIONS (all commands):
    --options <JSON|FILE>   Options object, inline or from a file
    --locale <TAG>          Locale tag, e.g. de-DE
    --currency <CODE>       ISO currency code, e.g. USD
    --format <FORMAT>       Output format: text (default) or json

OPTIONS (format):
    --value <NUMBER>        Value to render
    --focused               Show the view while the field has focus

OPTIONS (parse):
    --text <TEXT>           Display string to parse

OPTIONS (type):
    --keys <SCRIPT>         Characters to type; {{bs}} {{del}} {{left}} {{right}}
                            {{home}} {{end}} {{all}} {{focus}} {{blur}} name keys

EXAMPLES:
    currency-input format --value 1234.5 --currency USD
    currency-input parse --text "1.234,50 €" --locale de-DE --format json
    currency-input type --keys "{{focus}}1234.5{{blur}}" --options '{{"currency":"GBP"}}'"#
    );
}

/// Flags shared by every command.
struct CommonArgs {
    options: CurrencyInputOptions,
    format: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatOutput {
    value: String,
    display: String,
    number_value: Option<Decimal>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseOutput {
    text: String,
    number_value: Option<Decimal>,
    format: FormatSpec,
}

fn required(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn load_options(source: &str) -> CurrencyInputOptions {
    let json = if source.trim_start().starts_with('{') {
        source.to_string()
    } else {
        fs::read_to_string(source).unwrap_or_else(|e| {
            eprintln!("Error reading file '{}': {}", source, e);
            process::exit(1);
        })
    };
    CurrencyInputOptions::from_json(&json).unwrap_or_else(|e| {
        eprintln!("Invalid options: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{ "currency": "USD", "locale": "en-US", "valueRange": {{ "min": "0" }} }}"#
        );
        process::exit(1);
    })
}

/// Split `args` into the shared flags and the command-specific rest.
fn parse_common(args: &[String]) -> (CommonArgs, Vec<String>) {
    let mut options = CurrencyInputOptions::default();
    let mut locale = None;
    let mut currency = None;
    let mut format = "text".to_string();
    let mut rest = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--options" => {
                i += 1;
                options = load_options(&required(args, i, "--options", "a JSON object or file"));
            }
            "--locale" => {
                i += 1;
                locale = Some(required(args, i, "--locale", "a locale tag"));
            }
            "--currency" => {
                i += 1;
                currency = Some(required(args, i, "--currency", "a currency code"));
            }
            "--format" => {
                i += 1;
                format = required(args, i, "--format", "'text' or 'json'");
            }
            _ => rest.push(args[i].clone()),
        }
        i += 1;
    }

    if let Some(locale) = locale {
        options = options.with_locale(locale);
    }
    if let Some(currency) = currency {
        options = options.with_currency(currency);
    }
    if let Err(e) = options.validate() {
        eprintln!("Invalid options: {}", e);
        process::exit(1);
    }
    debug!("options: {:?}", options);
    (CommonArgs { options, format }, rest)
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn start_session(options: CurrencyInputOptions) -> TypingSession {
    TypingSession::new(options).unwrap_or_else(|e| {
        eprintln!("Error attaching field: {}", e);
        process::exit(1);
    })
}

fn cmd_format(args: &[String]) {
    let (common, rest) = parse_common(args);
    let mut value = None;
    let mut focused = false;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--value" => {
                i += 1;
                let raw = required(&rest, i, "--value", "a number");
                value = Some(raw.parse::<Decimal>().unwrap_or_else(|e| {
                    eprintln!("Invalid value '{}': {}", raw, e);
                    process::exit(1);
                }));
            }
            "--focused" => focused = true,
            _ => {
                eprintln!("Unknown option: {}", rest[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let value = value.unwrap_or_else(|| {
        eprintln!("Error: --value <NUMBER> is required");
        process::exit(1);
    });

    let mut session = start_session(common.options);
    session.set_number_value(Some(value));
    if focused {
        session.press(Key::Focus);
    }

    if common.format == "json" {
        print_json(&FormatOutput {
            value: value.to_string(),
            display: session.value().to_string(),
            number_value: session.number_value(),
        });
    } else {
        println!("{}", session.value());
    }
}

fn cmd_parse(args: &[String]) {
    let (common, rest) = parse_common(args);
    let mut text = None;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--text" => {
                i += 1;
                text = Some(required(&rest, i, "--text", "a display string"));
            }
            _ => {
                eprintln!("Unknown option: {}", rest[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let text = text.unwrap_or_else(|| {
        eprintln!("Error: --text <TEXT> is required");
        process::exit(1);
    });

    let spec = FormatSpec::build(&common.options);
    let number_value = parse(&text, &spec);

    if common.format == "json" {
        print_json(&ParseOutput {
            text,
            number_value,
            format: spec,
        });
    } else {
        match number_value {
            Some(value) => {
                println!("Value:      {}", value);
                println!("Canonical:  {}", format_value(value, &spec));
            }
            None => println!("null"),
        }
    }
}

fn cmd_type(args: &[String]) {
    let (common, rest) = parse_common(args);
    let mut script = None;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--keys" => {
                i += 1;
                script = Some(required(&rest, i, "--keys", "a key script"));
            }
            _ => {
                eprintln!("Unknown option: {}", rest[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let script = script.unwrap_or_else(|| {
        eprintln!("Error: --keys <SCRIPT> is required");
        process::exit(1);
    });
    let keys = parse_keys(&script).unwrap_or_else(|| {
        eprintln!("Invalid key script: {}", script);
        process::exit(1);
    });

    let mut session = start_session(common.options);
    session.press_all(&keys);

    if common.format == "json" {
        print_json(&session.history());
    } else {
        for snapshot in session.history() {
            let value = snapshot
                .number_value
                .map_or_else(|| "-".to_string(), |v| v.to_string());
            println!(
                "{:<12} {:<20} caret {:<3} value {}",
                snapshot.key,
                format!("{:?}", snapshot.value),
                snapshot.caret,
                value
            );
        }
        println!("\nFinal: {} ({} events)", session.value(), session.field().events().len());
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "format" => cmd_format(rest),
        "parse" => cmd_parse(rest),
        "type" => cmd_type(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
