use crate::controller::binding::{FieldBinding, RawValue};
use crate::controller::caret::semantic_caret;
use crate::controller::field::{FieldContainer, FieldId, TextField};
use crate::core::error::{AttachError, OptionsError};
use crate::core::options::CurrencyInputOptions;
use crate::mask::conformer::{Conformer, TextMaskConformer};
use log::{debug, trace, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A focus re-render waiting for the current event turn to finish.
///
/// Returned by [`CurrencyInput::on_focus`]; the host runs it with
/// [`CurrencyInput::run_deferred`] once its own focus handling is done. A
/// task whose field lost focus in the meantime does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredRender {
    field: FieldId,
}

impl DeferredRender {
    pub fn field(&self) -> FieldId {
        self.field
    }
}

/// The formatting controller.
///
/// Owns one [`FieldBinding`] per attached field, keyed by [`FieldId`], and
/// turns host events into render passes:
///
/// ```text
/// unattached -> attached(unfocused) <-> attached(focused) -> detached
/// ```
///
/// # Examples
///
/// ```
/// use currency_input::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut engine: CurrencyInput = CurrencyInput::new();
/// let mut field = MemoryField::new();
/// let options = CurrencyInputOptions::default().with_currency("USD");
/// let id = engine.attach(&mut field, options).unwrap();
///
/// field.type_text("1234.5");
/// engine.on_input(&mut field);
/// assert_eq!(field.value(), "$1,234.5");
///
/// engine.on_blur(&mut field);
/// assert_eq!(field.value(), "$1,234.50");
/// assert_eq!(engine.number_value(id), Some(dec!(1234.5)));
/// ```
#[derive(Debug)]
pub struct CurrencyInput<C: Conformer = TextMaskConformer> {
    defaults: CurrencyInputOptions,
    bindings: HashMap<FieldId, FieldBinding<C>>,
}

impl<C: Conformer + Default> Default for CurrencyInput<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Conformer + Default> CurrencyInput<C> {
    pub fn new() -> Self {
        Self::with_defaults(CurrencyInputOptions::default())
    }

    /// A controller whose option overlays start from `defaults`.
    pub fn with_defaults(defaults: CurrencyInputOptions) -> Self {
        Self {
            defaults,
            bindings: HashMap::new(),
        }
    }

    /// Overlay a (possibly partial) JSON options object on this
    /// controller's defaults.
    pub fn options_from_json(&self, json: &str) -> Result<CurrencyInputOptions, OptionsError> {
        self.defaults.merge_json(json)
    }

    /// Bind the engine to the text input in `container`.
    ///
    /// Fails with [`AttachError::MissingField`] when there is no text input
    /// and [`AttachError::Configuration`] when `min > max`; in both cases no
    /// state is installed. A field that already holds text is normalized
    /// with a fixed-fraction pass before this returns.
    pub fn attach<H: FieldContainer>(
        &mut self,
        container: &mut H,
        options: CurrencyInputOptions,
    ) -> Result<FieldId, AttachError> {
        let field = container.text_input().ok_or(AttachError::MissingField)?;
        let mut binding = FieldBinding::<C>::new(options)?;
        let id = field.id();

        if !field.value().is_empty() {
            let value = binding.parse_display(field.value());
            binding.apply_fixed_fraction(field, value);
        }
        debug!("attached field {} with {:?}", id, binding.format_spec());
        self.bindings.insert(id, binding);
        Ok(id)
    }

    /// Apply new options to an attached field.
    ///
    /// Identical options are a no-op. Otherwise the binding is rebuilt and
    /// the previous numeric value is re-rendered under the new format. An
    /// unattached field is attached from scratch.
    pub fn reconfigure<H: FieldContainer>(
        &mut self,
        container: &mut H,
        options: CurrencyInputOptions,
    ) -> Result<FieldId, AttachError> {
        let field = container.text_input().ok_or(AttachError::MissingField)?;
        let id = field.id();
        let Some(previous) = self.bindings.get(&id) else {
            return self.attach(container, options);
        };
        if previous.options() == &options {
            trace!("options for field {} unchanged", id);
            return Ok(id);
        }

        let value = previous.value();
        let focused = previous.is_focused();
        let mut binding = FieldBinding::<C>::new(options)?;
        binding.set_focused(focused);
        binding.apply_fixed_fraction(field, value);
        debug!("reconfigured field {} with {:?}", id, binding.format_spec());
        self.bindings.insert(id, binding);
        Ok(id)
    }

    /// Release a field's state. Returns whether it was attached.
    pub fn detach(&mut self, id: FieldId) -> bool {
        let removed = self.bindings.remove(&id).is_some();
        if removed {
            debug!("detached field {}", id);
        }
        removed
    }
}

impl<C: Conformer> CurrencyInput<C> {
    pub fn is_attached(&self, id: FieldId) -> bool {
        self.bindings.contains_key(&id)
    }

    pub fn binding(&self, id: FieldId) -> Option<&FieldBinding<C>> {
        self.bindings.get(&id)
    }

    /// The field's value as exported to the host.
    pub fn number_value(&self, id: FieldId) -> Option<Decimal> {
        self.bindings.get(&id)?.exported_value()
    }

    fn binding_mut(&mut self, id: FieldId) -> Option<&mut FieldBinding<C>> {
        let binding = self.bindings.get_mut(&id);
        if binding.is_none() {
            warn!("event for unattached field {}", id);
        }
        binding
    }

    /// A keystroke changed the field's text.
    pub fn on_input<F: TextField>(&mut self, field: &mut F) {
        let Some(binding) = self.binding_mut(field.id()) else {
            return;
        };
        let raw = field.value().to_string();
        binding.format(field, RawValue::Text(raw));
    }

    /// The host pushes a value programmatically.
    ///
    /// Ignored while the field has focus so typing is never overwritten.
    pub fn on_format<F: TextField>(&mut self, field: &mut F, value: Option<Decimal>) {
        let Some(binding) = self.binding_mut(field.id()) else {
            return;
        };
        if binding.is_focused() {
            trace!("field {} focused, ignoring pushed value {:?}", field.id(), value);
            return;
        }
        let value = value.map(|v| binding.imported_value(v));
        binding.format(field, RawValue::from(value));
    }

    /// The field gained focus.
    ///
    /// Returns the distraction-free re-render to run after the current
    /// event turn, if the mode is enabled.
    pub fn on_focus<F: TextField>(&mut self, field: &mut F) -> Option<DeferredRender> {
        let id = field.id();
        let binding = self.binding_mut(id)?;
        binding.set_focused(true);
        binding
            .options()
            .distraction_free
            .is_enabled()
            .then_some(DeferredRender { field: id })
    }

    /// Run a focus re-render scheduled by [`on_focus`](Self::on_focus).
    ///
    /// The caret keeps its position relative to the digits while the
    /// currency symbol and separators disappear.
    pub fn run_deferred<F: TextField>(&mut self, task: DeferredRender, field: &mut F) {
        if task.field != field.id() {
            warn!("deferred render for {} run against field {}", task.field, field.id());
            return;
        }
        let Some(binding) = self.bindings.get_mut(&task.field) else {
            trace!("field {} detached before deferred render", task.field);
            return;
        };
        if !binding.is_focused() {
            trace!("field {} blurred before deferred render", task.field);
            return;
        }

        let rules = binding.options().distraction_free.rules();
        let caret = semantic_caret(
            field.value(),
            field.selection_start(),
            binding.format_spec(),
            rules,
        );
        let value = binding.parse_display(field.value());
        binding.format(field, RawValue::from(value));

        let caret = caret.min(field.value().chars().count());
        trace!("restoring caret of field {} at {}", task.field, caret);
        field.set_selection_range(caret, caret);
    }

    /// The field lost focus: normalize to full precision.
    pub fn on_blur<F: TextField>(&mut self, field: &mut F) {
        let Some(binding) = self.binding_mut(field.id()) else {
            return;
        };
        binding.set_focused(false);
        let value = binding.parse_display(field.value());
        binding.apply_fixed_fraction(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::field::FieldEvent;
    use crate::core::options::{DistractionFree, DistractionFreeRules};
    use crate::simulation::memory_field::{MemoryContainer, MemoryField};
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyInputOptions {
        CurrencyInputOptions::default().with_currency("USD")
    }

    fn engine() -> CurrencyInput {
        CurrencyInput::new()
    }

    #[test]
    fn test_attach_missing_field() {
        let mut engine = engine();
        let mut container = MemoryContainer::empty();
        assert_eq!(
            engine.attach(&mut container, usd()),
            Err(AttachError::MissingField)
        );
    }

    #[test]
    fn test_attach_invalid_range_installs_nothing() {
        let mut engine = engine();
        let mut field = MemoryField::with_value("5");
        let id = field.id();
        let result = engine.attach(&mut field, usd().with_range(Some(dec!(10)), Some(dec!(5))));
        assert!(matches!(result, Err(AttachError::Configuration { .. })));
        assert!(!engine.is_attached(id));
        assert_eq!(field.value(), "5");
        assert!(field.events().is_empty());
    }

    #[test]
    fn test_attach_formats_existing_value() {
        let mut engine = engine();
        let mut field = MemoryField::with_value("1234.5");
        let id = engine.attach(&mut field, usd()).unwrap();
        assert_eq!(field.value(), "$1,234.50");
        assert_eq!(engine.number_value(id), Some(dec!(1234.5)));
        assert_eq!(field.events().last(), Some(&FieldEvent::Input));
    }

    #[test]
    fn test_attach_through_container() {
        let mut engine = engine();
        let mut container = MemoryContainer::with_field(MemoryField::new());
        let id = engine.attach(&mut container, usd()).unwrap();
        assert!(engine.is_attached(id));
        assert_eq!(container.field().map(|f| f.id()), Some(id));
    }

    #[test]
    fn test_format_ignored_while_focused() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        engine.attach(&mut field, usd()).unwrap();
        engine.on_format(&mut field, Some(dec!(10)));
        assert_eq!(field.value(), "$10.00");

        engine.on_focus(&mut field);
        engine.on_format(&mut field, Some(dec!(99)));
        assert_eq!(field.value(), "$10.00");
    }

    #[test]
    fn test_format_null_clears() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        let id = engine.attach(&mut field, usd()).unwrap();
        engine.on_format(&mut field, Some(dec!(10)));
        engine.on_format(&mut field, None);
        assert_eq!(field.value(), "");
        assert_eq!(engine.number_value(id), None);
    }

    #[test]
    fn test_focus_without_distraction_free_schedules_nothing() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        let options = CurrencyInputOptions {
            distraction_free: DistractionFree::Toggle(false),
            ..usd()
        };
        engine.attach(&mut field, options).unwrap();
        assert_eq!(engine.on_focus(&mut field), None);
    }

    #[test]
    fn test_deferred_render_restores_semantic_caret() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        let options = CurrencyInputOptions {
            distraction_free: DistractionFree::Rules(DistractionFreeRules {
                hide_currency_symbol: true,
                hide_thousands_separator_symbol: true,
                hide_negligible_fraction_digits: false,
            }),
            ..usd()
        };
        engine.attach(&mut field, options).unwrap();
        engine.on_format(&mut field, Some(dec!(1234)));
        assert_eq!(field.value(), "$1,234.00");

        field.set_selection_range(3, 3);
        let task = engine.on_focus(&mut field).unwrap();
        engine.run_deferred(task, &mut field);
        assert_eq!(field.value(), "1234.00");
        assert_eq!(field.selection_start(), 1);
    }

    #[test]
    fn test_stale_deferred_render_is_noop() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        engine.attach(&mut field, usd()).unwrap();
        engine.on_format(&mut field, Some(dec!(1234)));
        let task = engine.on_focus(&mut field).unwrap();
        engine.on_blur(&mut field);
        let before = field.value().to_string();
        engine.run_deferred(task, &mut field);
        assert_eq!(field.value(), before);
        assert_eq!(field.value(), "$1,234.00");
    }

    #[test]
    fn test_reconfigure_preserves_value() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        let id = engine.attach(&mut field, usd()).unwrap();
        engine.on_format(&mut field, Some(dec!(1234.56)));

        let german = CurrencyInputOptions::default()
            .with_locale("de-DE")
            .with_currency("EUR");
        engine.reconfigure(&mut field, german).unwrap();
        assert_eq!(field.value(), "1.234,56\u{a0}€");
        assert_eq!(engine.number_value(id), Some(dec!(1234.56)));
    }

    #[test]
    fn test_reconfigure_same_options_is_noop() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        engine.attach(&mut field, usd()).unwrap();
        engine.on_format(&mut field, Some(dec!(5)));
        let events = field.events().len();
        engine.reconfigure(&mut field, usd()).unwrap();
        assert_eq!(field.events().len(), events);
    }

    #[test]
    fn test_detach() {
        let mut engine = engine();
        let mut field = MemoryField::new();
        let id = engine.attach(&mut field, usd()).unwrap();
        assert!(engine.detach(id));
        assert!(!engine.detach(id));

        field.type_text("12");
        engine.on_input(&mut field);
        assert_eq!(field.value(), "12");
    }

    #[test]
    fn test_options_from_json_uses_defaults() {
        let engine: CurrencyInput = CurrencyInput::with_defaults(usd().with_locale("en-GB"));
        let options = engine.options_from_json(r#"{ "validateOnInput": true }"#).unwrap();
        assert_eq!(options.locale.as_deref(), Some("en-GB"));
        assert!(options.validate_on_input);
    }
}
