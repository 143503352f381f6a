use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a host text field.
///
/// The controller keys field binding state by this identity, so it must be
/// stable for the lifetime of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Uuid);

impl FieldId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Events the engine dispatches back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldEvent {
    /// The field's effective value may have changed (drives two-way binding).
    Input,
    /// A render pass finished. Sent after every pass, changed or not.
    #[serde(rename_all = "camelCase")]
    FormatComplete { number_value: Option<Decimal> },
}

/// The minimal text-field capability the engine drives.
///
/// Offsets are character offsets into [`value`](TextField::value).
pub trait TextField {
    fn id(&self) -> FieldId;

    fn value(&self) -> &str;

    fn set_value(&mut self, value: &str);

    fn selection_start(&self) -> usize;

    fn set_selection_range(&mut self, start: usize, end: usize);

    /// Deliver an event to the host's listeners.
    fn dispatch(&mut self, event: FieldEvent);
}

/// Something the engine can be attached to: a text field itself, or a
/// container holding one.
pub trait FieldContainer {
    type Field: TextField;

    /// The text-input-capable element to bind, if any.
    fn text_input(&mut self) -> Option<&mut Self::Field>;
}
