use crate::controller::field::{FieldEvent, TextField};
use crate::core::error::AttachError;
use crate::core::format_spec::{FormatSpec, RenderFlags};
use crate::core::options::CurrencyInputOptions;
use crate::format::number::{parse, render_decimal};
use crate::mask::conformer::{Conformed, Conformer, PipeContext};
use crate::mask::currency_mask::CurrencyMask;
use log::{trace, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Input to a live format pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Text as typed, conformed as-is.
    Text(String),
    /// A value to render; clamped to the configured range first.
    Number(Decimal),
}

impl From<Option<Decimal>> for RawValue {
    fn from(value: Option<Decimal>) -> Self {
        match value {
            Some(value) => RawValue::Number(value),
            None => RawValue::Text(String::new()),
        }
    }
}

/// Per-field state owned by the controller.
///
/// Created on attach and replaced wholesale on reconfigure. The stored
/// numeric value is always the parse of the last displayed string.
#[derive(Debug, Clone)]
pub struct FieldBinding<C> {
    options: CurrencyInputOptions,
    format: FormatSpec,
    focused: bool,
    number_value: Option<Decimal>,
    conformer: C,
}

impl<C: Conformer + Default> FieldBinding<C> {
    /// Validate `options` and derive the format. Fails before any state exists.
    pub fn new(options: CurrencyInputOptions) -> Result<Self, AttachError> {
        options.validate()?;
        let format = FormatSpec::build(&options);
        Ok(Self {
            options,
            format,
            focused: false,
            number_value: None,
            conformer: C::default(),
        })
    }
}

impl<C: Conformer> FieldBinding<C> {
    pub fn options(&self) -> &CurrencyInputOptions {
        &self.options
    }

    pub fn format_spec(&self) -> &FormatSpec {
        &self.format
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// The value as last parsed from the display.
    pub fn value(&self) -> Option<Decimal> {
        self.number_value
    }

    /// The value as seen by the host, in integer units when configured.
    ///
    /// Integer export caps the integer digits the mask accepts (see
    /// [`FormatSpec::build`]), so scaling a displayed value cannot overflow.
    pub fn exported_value(&self) -> Option<Decimal> {
        let value = self.number_value?;
        if !self.options.export_value_as_integer {
            return Some(value);
        }
        let exported = scale_factor(self.format.decimal_limit).and_then(|f| value.checked_mul(f));
        if exported.is_none() {
            warn!("value {} cannot be exported as integer units", value);
        }
        exported.map(|v| v.round())
    }

    /// Convert a host-supplied value into the engine's units.
    pub fn imported_value(&self, value: Decimal) -> Decimal {
        if !self.options.export_value_as_integer {
            return value;
        }
        match scale_factor(self.format.decimal_limit) {
            Some(factor) => value / factor,
            None => value,
        }
    }

    pub fn parse_display(&self, display: &str) -> Option<Decimal> {
        parse(display, &self.format)
    }

    /// Decorations hidden by the next render.
    pub fn render_flags(&self) -> RenderFlags {
        if !self.focused {
            return RenderFlags::default();
        }
        let rules = self.options.distraction_free.rules();
        RenderFlags {
            hide_fraction: rules.hide_negligible_fraction_digits && !self.options.auto_decimal_mode,
            hide_currency_symbol: rules.hide_currency_symbol,
            hide_thousands_separator: rules.hide_thousands_separator_symbol,
        }
    }

    /// Live format pass: render, mask, validate, store, notify.
    pub fn format<F: TextField>(&mut self, field: &mut F, raw: RawValue) {
        let flags = self.render_flags();
        let (candidate, caret) = self.candidate(field, raw, flags);

        let view = self.format.masked(flags);
        let mask = CurrencyMask::new(&view);
        let (candidate, caret) = mask.normalize(&candidate, caret);
        let tokens = mask.tokens_for(&candidate);

        let format = &self.format;
        let range = self.options.value_range;
        let validate = self.options.validate_on_input;
        let updated = self.conformer.update(
            &candidate,
            caret,
            &tokens,
            &|conformed: &str, context: &PipeContext<'_>| {
                let out_of_range = parse(conformed, format).map_or(false, |v| !range.contains(v));
                if validate && out_of_range {
                    trace!("rejected {:?}: outside {:?}", conformed, range);
                    context.previous_conformed.to_string()
                } else {
                    conformed.to_string()
                }
            },
        );

        // A memo hit on a normalized candidate still has to replace what was typed.
        let shown = match updated {
            Some(conformed) => Some(conformed),
            None if field.value() != self.conformer.previous_conformed() => Some(Conformed {
                value: self.conformer.previous_conformed().to_string(),
                caret,
            }),
            None => None,
        };
        if let Some(conformed) = shown {
            field.set_value(&conformed.value);
            if self.focused {
                let caret = conformed.caret.min(conformed.value.chars().count());
                field.set_selection_range(caret, caret);
            }
        }

        self.number_value = parse(field.value(), &self.format);
        trace!("field {} shows {:?} = {:?}", field.id(), field.value(), self.number_value);
        field.dispatch(FieldEvent::FormatComplete {
            number_value: self.exported_value(),
        });
    }

    /// Fixed-fraction pass: full precision, integer rounding when decimals
    /// are off, then an input notification.
    pub fn apply_fixed_fraction<F: TextField>(&mut self, field: &mut F, value: Option<Decimal>) {
        let value = value.map(|v| {
            if self.format.allow_decimal {
                v
            } else {
                round_half_up(v)
            }
        });
        self.format(field, RawValue::from(value));
        field.dispatch(FieldEvent::Input);
    }

    fn candidate<F: TextField>(&self, field: &F, raw: RawValue, flags: RenderFlags) -> (String, usize) {
        match raw {
            RawValue::Number(value) => {
                let value = self.options.value_range.clamp(value);
                let min_fraction_digits = if flags.hide_fraction {
                    0
                } else {
                    self.format.decimal_limit
                };
                let mut text = render_decimal(value, &self.format, min_fraction_digits);
                if self.options.distraction_free.is_enabled() {
                    // Differs from the last conformed value, so the conformer re-runs.
                    text.push(' ');
                }
                let caret = text.chars().count();
                (text, caret)
            }
            RawValue::Text(text) => {
                if let Some(value) = self.auto_decimal_value(&text) {
                    let text = render_decimal(value, &self.format, self.format.decimal_limit);
                    let caret = text.chars().count();
                    return (text, caret);
                }
                let caret = field.selection_start().min(text.chars().count());
                (text, caret)
            }
        }
    }

    /// In auto decimal mode, read every typed digit as minor units.
    fn auto_decimal_value(&self, text: &str) -> Option<Decimal> {
        if !self.options.auto_decimal_mode || self.format.decimal_limit == 0 {
            return None;
        }
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        let mut value = Decimal::from_str(&digits).ok()?;
        value.set_scale(self.format.decimal_limit).ok()?;
        if self.format.allow_negative && text.trim_start().starts_with('-') {
            value.set_sign_negative(true);
        }
        Some(value)
    }
}

/// `10^digits`, or `None` past `Decimal`'s range.
fn scale_factor(digits: u32) -> Option<Decimal> {
    (0..digits).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(Decimal::TEN))
}

/// Round half toward positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
fn round_half_up(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(0, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{DistractionFree, DistractionFreeRules, ValueRange};
    use crate::mask::conformer::TextMaskConformer;
    use crate::simulation::memory_field::MemoryField;
    use rust_decimal_macros::dec;

    fn binding(options: CurrencyInputOptions) -> FieldBinding<TextMaskConformer> {
        FieldBinding::new(options).unwrap()
    }

    fn usd() -> CurrencyInputOptions {
        CurrencyInputOptions::default().with_currency("USD")
    }

    fn input(b: &mut FieldBinding<TextMaskConformer>, field: &mut MemoryField) {
        let raw = field.value().to_string();
        b.format(field, RawValue::Text(raw));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let options = usd().with_range(Some(dec!(10)), Some(dec!(5)));
        let result = FieldBinding::<TextMaskConformer>::new(options);
        assert!(matches!(result, Err(AttachError::Configuration { .. })));
    }

    #[test]
    fn test_number_pass_renders_full_precision() {
        let mut b = binding(usd());
        let mut field = MemoryField::new();
        b.format(&mut field, RawValue::Number(dec!(1234.5)));
        assert_eq!(field.value(), "$1,234.50");
        assert_eq!(b.value(), Some(dec!(1234.5)));
        assert_eq!(
            field.events().last(),
            Some(&FieldEvent::FormatComplete { number_value: Some(dec!(1234.5)) })
        );
    }

    #[test]
    fn test_number_pass_clamps() {
        let mut b = binding(usd().with_range(Some(dec!(0)), Some(dec!(100))));
        let mut field = MemoryField::new();
        b.format(&mut field, RawValue::Number(dec!(150)));
        assert_eq!(b.value(), Some(dec!(100)));
        b.format(&mut field, RawValue::Number(dec!(-10)));
        assert_eq!(b.value(), Some(dec!(0)));
        assert_eq!(field.value(), "$0.00");
    }

    #[test]
    fn test_focused_flags() {
        let mut b = binding(usd());
        assert_eq!(b.render_flags(), RenderFlags::default());
        b.set_focused(true);
        let flags = b.render_flags();
        assert!(flags.hide_fraction && flags.hide_currency_symbol && flags.hide_thousands_separator);

        let mut b = binding(CurrencyInputOptions {
            distraction_free: DistractionFree::Rules(DistractionFreeRules {
                hide_currency_symbol: true,
                ..Default::default()
            }),
            ..usd()
        });
        b.set_focused(true);
        assert_eq!(
            b.render_flags(),
            RenderFlags {
                hide_fraction: false,
                hide_currency_symbol: true,
                hide_thousands_separator: false,
            }
        );
    }

    #[test]
    fn test_focused_number_pass_hides_decorations() {
        let mut b = binding(usd());
        b.set_focused(true);
        let mut field = MemoryField::new();
        b.format(&mut field, RawValue::Number(dec!(1234.5)));
        assert_eq!(field.value(), "1234.5");
        assert_eq!(b.value(), Some(dec!(1234.5)));
    }

    #[test]
    fn test_fixed_fraction_rounds_without_decimals() {
        let mut b = binding(usd().with_currency("JPY"));
        let mut field = MemoryField::new();
        b.apply_fixed_fraction(&mut field, Some(dec!(42.7)));
        assert_eq!(field.value(), "¥43");
        assert_eq!(b.value(), Some(dec!(43)));
        assert_eq!(field.events().last(), Some(&FieldEvent::Input));
    }

    #[test]
    fn test_fixed_fraction_without_value_clears() {
        let mut b = binding(usd());
        let mut field = MemoryField::with_value("$12.00");
        input(&mut b, &mut field);
        b.apply_fixed_fraction(&mut field, None);
        assert_eq!(field.value(), "");
        assert_eq!(b.value(), None);
    }

    #[test]
    fn test_validate_on_input_falls_back() {
        let mut b = binding(CurrencyInputOptions {
            validate_on_input: true,
            value_range: ValueRange::new(None, Some(dec!(100))),
            ..usd()
        });
        let mut field = MemoryField::new();
        field.type_text("15");
        input(&mut b, &mut field);
        assert_eq!(field.value(), "$15");
        field.type_text("0");
        input(&mut b, &mut field);
        assert_eq!(field.value(), "$15");
        assert_eq!(b.value(), Some(dec!(15)));
    }

    #[test]
    fn test_auto_decimal_mode() {
        let mut b = binding(CurrencyInputOptions {
            auto_decimal_mode: true,
            ..usd()
        });
        let mut field = MemoryField::new();
        for key in ["1", "2", "3"] {
            field.type_text(key);
            input(&mut b, &mut field);
        }
        assert_eq!(field.value(), "$1.23");
        assert_eq!(b.value(), Some(dec!(1.23)));
    }

    #[test]
    fn test_export_as_integer() {
        let b = {
            let mut b = binding(CurrencyInputOptions {
                export_value_as_integer: true,
                ..usd()
            });
            let mut field = MemoryField::new();
            let imported = b.imported_value(dec!(12345));
            b.format(&mut field, RawValue::Number(imported));
            assert_eq!(field.value(), "$123.45");
            b
        };
        assert_eq!(b.value(), Some(dec!(123.45)));
        assert_eq!(b.exported_value(), Some(dec!(12345)));
    }

    #[test]
    fn test_integer_export_never_overflows() {
        let mut b = binding(CurrencyInputOptions {
            export_value_as_integer: true,
            ..usd()
        });
        let mut field = MemoryField::new();
        field.type_text(&"9".repeat(30));
        input(&mut b, &mut field);
        let digits = field.value().chars().filter(char::is_ascii_digit).count();
        assert_eq!(digits, 26);
        assert!(b.value().is_some());
        assert_eq!(b.exported_value(), b.value().map(|v| v * dec!(100)));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(dec!(42.7)), dec!(43));
        assert_eq!(round_half_up(dec!(2.5)), dec!(3));
        assert_eq!(round_half_up(dec!(-2.5)), dec!(-2));
        assert_eq!(round_half_up(dec!(-2.6)), dec!(-3));
        assert_eq!(round_half_up(Decimal::MAX), Decimal::MAX);
        assert_eq!(round_half_up(Decimal::MIN), Decimal::MIN);
    }

    #[test]
    fn test_fixed_fraction_at_decimal_max() {
        let mut b = binding(usd().with_currency("JPY"));
        let mut field = MemoryField::new();
        b.apply_fixed_fraction(&mut field, Some(Decimal::MAX));
        assert_eq!(field.value(), "¥79,228,162,514,264,337,593,543,950,335");
        assert_eq!(b.value(), Some(Decimal::MAX));
    }

    #[test]
    fn test_normalized_memo_hit_rewrites_field() {
        let mut b = binding(CurrencyInputOptions {
            integer_limit: Some(3),
            distraction_free: DistractionFree::Toggle(false),
            ..usd()
        });
        b.set_focused(true);
        let mut field = MemoryField::new();
        field.type_text("123");
        input(&mut b, &mut field);
        assert_eq!(field.value(), "$123");

        field.type_text("4");
        input(&mut b, &mut field);
        assert_eq!(field.value(), "$123");
        assert_eq!(field.selection_start(), 4);
        assert_eq!(b.value(), Some(dec!(123)));
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(scale_factor(0), Some(Decimal::ONE));
        assert_eq!(scale_factor(3), Some(dec!(1000)));
        assert_eq!(scale_factor(40), None);
    }
}
