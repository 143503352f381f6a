use crate::core::currency::CurrencyCode;
use crate::core::error::{AttachError, OptionsError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How the currency symbol is chosen.
///
/// Deserializes from either an ISO code string (`"USD"`) or an object with
/// explicit affixes (`{ "prefix": "$", "suffix": "" }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrencyOption {
    Code(CurrencyCode),
    Custom(CustomCurrency),
}

/// Explicit currency affixes, bypassing locale placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomCurrency {
    pub prefix: String,
    pub suffix: String,
    /// Overrides the locale's decimal symbol when set.
    pub decimal_symbol: Option<String>,
}

/// Which decorations are hidden while the field has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistractionFreeRules {
    pub hide_negligible_fraction_digits: bool,
    pub hide_currency_symbol: bool,
    pub hide_thousands_separator_symbol: bool,
}

impl DistractionFreeRules {
    pub const ALL: Self = Self {
        hide_negligible_fraction_digits: true,
        hide_currency_symbol: true,
        hide_thousands_separator_symbol: true,
    };
}

/// Distraction-free mode: a plain toggle or per-decoration rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistractionFree {
    Toggle(bool),
    Rules(DistractionFreeRules),
}

impl DistractionFree {
    /// Whether focus triggers a distraction-free re-render at all.
    ///
    /// A rules object enables the mode even when every rule is off.
    pub fn is_enabled(&self) -> bool {
        match self {
            DistractionFree::Toggle(enabled) => *enabled,
            DistractionFree::Rules(_) => true,
        }
    }

    pub fn rules(&self) -> DistractionFreeRules {
        match self {
            DistractionFree::Toggle(true) => DistractionFreeRules::ALL,
            DistractionFree::Toggle(false) => DistractionFreeRules::default(),
            DistractionFree::Rules(rules) => *rules,
        }
    }
}

impl Default for DistractionFree {
    fn default() -> Self {
        DistractionFree::Toggle(true)
    }
}

/// Number of fraction digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Use the currency's minor units.
    #[default]
    Auto,
    Fixed(u32),
}

/// Inclusive bounds on the numeric value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl ValueRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<(), AttachError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(AttachError::Configuration { min, max }),
            _ => Ok(()),
        }
    }

    pub fn clamp(&self, value: Decimal) -> Decimal {
        let mut value = value;
        if let Some(min) = self.min {
            value = value.max(min);
        }
        if let Some(max) = self.max {
            value = value.min(max);
        }
        value
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// User-facing configuration for one attached field.
///
/// Missing keys take their defaults, so a partial JSON object is a valid
/// configuration.
///
/// # Examples
///
/// ```
/// use currency_input::core::options::CurrencyInputOptions;
///
/// let options = CurrencyInputOptions::from_json(
///     r#"{ "currency": "USD", "locale": "en-US", "valueRange": { "min": 0 } }"#,
/// ).unwrap();
/// assert_eq!(options.locale.as_deref(), Some("en-US"));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrencyInputOptions {
    pub currency: Option<CurrencyOption>,
    pub locale: Option<String>,
    pub distraction_free: DistractionFree,
    pub value_range: ValueRange,
    pub precision: Precision,
    pub auto_decimal_mode: bool,
    pub export_value_as_integer: bool,
    pub validate_on_input: bool,
    pub allow_negative: bool,
    pub integer_limit: Option<usize>,
}

impl Default for CurrencyInputOptions {
    fn default() -> Self {
        Self {
            currency: Some(CurrencyOption::Code(CurrencyCode::new("EUR"))),
            locale: None,
            distraction_free: DistractionFree::default(),
            value_range: ValueRange::default(),
            precision: Precision::Auto,
            auto_decimal_mode: false,
            export_value_as_integer: false,
            validate_on_input: false,
            allow_negative: true,
            integer_limit: None,
        }
    }
}

impl CurrencyInputOptions {
    /// Parse options from JSON, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Self::default().merge_json(json)
    }

    /// Overlay a (possibly partial) JSON object on these options.
    pub fn merge_json(&self, json: &str) -> Result<Self, OptionsError> {
        let overrides: Value = serde_json::from_str(json)?;
        let Value::Object(overrides) = overrides else {
            return Err(OptionsError::NotAnObject);
        };
        let mut merged = serde_json::to_value(self)?;
        if let Value::Object(base) = &mut merged {
            base.extend(overrides);
        }
        let options: Self = serde_json::from_value(merged)?;
        options.validate()?;
        Ok(options)
    }

    /// Check construction-time invariants.
    pub fn validate(&self) -> Result<(), AttachError> {
        self.value_range.validate()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(CurrencyOption::Code(CurrencyCode::new(code)));
        self
    }

    pub fn with_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.value_range = ValueRange::new(min, max);
        self
    }
}
