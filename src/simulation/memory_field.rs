//! In-memory host text field.
//!
//! Stands in for a browser input when driving the controller from tests,
//! benchmarks and the CLI. Edits behave like a single-line text box: typing
//! replaces the selection and leaves the caret after the inserted text.

use crate::controller::field::{FieldContainer, FieldEvent, FieldId, TextField};

#[derive(Debug, Clone, Default)]
pub struct MemoryField {
    id: FieldId,
    value: String,
    selection: (usize, usize),
    events: Vec<FieldEvent>,
}

impl MemoryField {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field pre-filled with `value`, caret at the end.
    pub fn with_value(value: &str) -> Self {
        let end = value.chars().count();
        Self {
            value: value.to_string(),
            selection: (end, end),
            ..Self::default()
        }
    }

    /// Events dispatched so far, oldest first.
    pub fn events(&self) -> &[FieldEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Insert `text` at the caret, replacing the selection.
    pub fn type_text(&mut self, text: &str) {
        let (start, end) = self.selection;
        let (from, to) = (self.byte_offset(start), self.byte_offset(end));
        self.value.replace_range(from..to, text);
        let caret = start + text.chars().count();
        self.selection = (caret, caret);
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        let (start, end) = self.selection;
        let start = if start == end { start.saturating_sub(1) } else { start };
        let (from, to) = (self.byte_offset(start), self.byte_offset(end));
        self.value.replace_range(from..to, "");
        self.selection = (start, start);
    }

    /// Delete the selection, or the character after the caret.
    pub fn delete_forward(&mut self) {
        let (start, end) = self.selection;
        let end = if start == end { (end + 1).min(self.len()) } else { end };
        let (from, to) = (self.byte_offset(start), self.byte_offset(end));
        self.value.replace_range(from..to, "");
        self.selection = (start, start);
    }

    pub fn select_all(&mut self) {
        self.selection = (0, self.len());
    }
}

impl TextField for MemoryField {
    fn id(&self) -> FieldId {
        self.id
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        let end = self.len();
        self.selection = (end, end);
    }

    fn selection_start(&self) -> usize {
        self.selection.0
    }

    fn set_selection_range(&mut self, start: usize, end: usize) {
        let len = self.len();
        let start = start.min(len);
        self.selection = (start, end.clamp(start, len));
    }

    fn dispatch(&mut self, event: FieldEvent) {
        self.events.push(event);
    }
}

impl FieldContainer for MemoryField {
    type Field = Self;

    fn text_input(&mut self) -> Option<&mut Self> {
        Some(self)
    }
}

/// A container element that may or may not hold a text input.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    field: Option<MemoryField>,
}

impl MemoryContainer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_field(field: MemoryField) -> Self {
        Self { field: Some(field) }
    }

    pub fn field(&self) -> Option<&MemoryField> {
        self.field.as_ref()
    }
}

impl FieldContainer for MemoryContainer {
    type Field = MemoryField;

    fn text_input(&mut self) -> Option<&mut MemoryField> {
        self.field.as_mut()
    }
}
