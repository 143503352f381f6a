//! Scripted and random typing sessions.
//!
//! A [`TypingSession`] plays the host's part: it applies keystrokes to a
//! [`MemoryField`], forwards the resulting events to the controller and runs
//! deferred focus renders at the end of each turn.

use crate::controller::engine::CurrencyInput;
use crate::controller::field::{FieldId, TextField};
use crate::core::error::AttachError;
use crate::core::options::CurrencyInputOptions;
use crate::simulation::memory_field::MemoryField;
use log::trace;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

/// One host-level action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    SelectAll,
    Focus,
    Blur,
}

impl Key {
    /// Whether the key edits the text and therefore fires an input event.
    pub fn is_edit(&self) -> bool {
        matches!(self, Key::Char(_) | Key::Backspace | Key::Delete)
    }
}

/// Parse a key script: plain characters type themselves, `{name}` names a
/// special key (`bs`, `del`, `left`, `right`, `home`, `end`, `all`,
/// `focus`, `blur`). Returns `None` on an unknown or unterminated name.
///
/// ```
/// use currency_input::simulation::typing::{parse_keys, Key};
///
/// let keys = parse_keys("{focus}12{bs}").unwrap();
/// assert_eq!(keys, vec![Key::Focus, Key::Char('1'), Key::Char('2'), Key::Backspace]);
/// ```
pub fn parse_keys(script: &str) -> Option<Vec<Key>> {
    let mut keys = Vec::new();
    let mut chars = script.chars();
    while let Some(c) = chars.next() {
        if c != '{' {
            keys.push(Key::Char(c));
            continue;
        }
        let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
        let key = match name.as_str() {
            "bs" => Key::Backspace,
            "del" => Key::Delete,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "all" => Key::SelectAll,
            "focus" => Key::Focus,
            "blur" => Key::Blur,
            _ => return None,
        };
        keys.push(key);
    }
    Some(keys)
}

/// Display state after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub key: String,
    pub value: String,
    pub caret: usize,
    pub number_value: Option<Decimal>,
}

/// A controller bound to a single in-memory field.
#[derive(Debug)]
pub struct TypingSession {
    engine: CurrencyInput,
    field: MemoryField,
    id: FieldId,
    history: Vec<Snapshot>,
}

impl TypingSession {
    /// Attach a fresh engine to an empty field.
    pub fn new(options: CurrencyInputOptions) -> Result<Self, AttachError> {
        Self::with_field(options, MemoryField::new())
    }

    /// Attach a fresh engine to `field`, normalizing any text it holds.
    pub fn with_field(
        options: CurrencyInputOptions,
        mut field: MemoryField,
    ) -> Result<Self, AttachError> {
        let mut engine = CurrencyInput::new();
        let id = engine.attach(&mut field, options)?;
        Ok(Self {
            engine,
            field,
            id,
            history: Vec::new(),
        })
    }

    pub fn field(&self) -> &MemoryField {
        &self.field
    }

    pub fn engine(&self) -> &CurrencyInput {
        &self.engine
    }

    pub fn value(&self) -> &str {
        self.field.value()
    }

    pub fn caret(&self) -> usize {
        self.field.selection_start()
    }

    pub fn number_value(&self) -> Option<Decimal> {
        self.engine.number_value(self.id)
    }

    /// Snapshots recorded by [`press`](Self::press), oldest first.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Push a value from the host side.
    pub fn set_number_value(&mut self, value: Option<Decimal>) {
        self.engine.on_format(&mut self.field, value);
    }

    pub fn press(&mut self, key: Key) {
        let field = &mut self.field;
        match key {
            Key::Char(c) => field.type_text(c.encode_utf8(&mut [0; 4])),
            Key::Backspace => field.backspace(),
            Key::Delete => field.delete_forward(),
            Key::Left => {
                let caret = field.selection_start().saturating_sub(1);
                field.set_selection_range(caret, caret);
            }
            Key::Right => {
                let caret = field.selection_start() + 1;
                field.set_selection_range(caret, caret);
            }
            Key::Home => field.set_selection_range(0, 0),
            Key::End => {
                let end = field.value().chars().count();
                field.set_selection_range(end, end);
            }
            Key::SelectAll => field.select_all(),
            Key::Focus => {
                if let Some(task) = self.engine.on_focus(field) {
                    self.engine.run_deferred(task, field);
                }
            }
            Key::Blur => self.engine.on_blur(field),
        }
        if key.is_edit() {
            self.engine.on_input(&mut self.field);
        }

        let snapshot = Snapshot {
            key: format!("{:?}", key),
            value: self.field.value().to_string(),
            caret: self.field.selection_start(),
            number_value: self.number_value(),
        };
        trace!("{:?}", snapshot);
        self.history.push(snapshot);
    }

    pub fn press_all(&mut self, keys: &[Key]) {
        for &key in keys {
            self.press(key);
        }
    }

    /// Focus, type `text` character by character.
    pub fn type_str(&mut self, text: &str) {
        self.press(Key::Focus);
        for c in text.chars() {
            self.press(Key::Char(c));
        }
    }
}

/// Shape of a generated keystroke sequence.
#[derive(Debug, Clone)]
pub struct KeystrokeConfig {
    pub count: usize,
    /// Characters drawn for typing.
    pub alphabet: Vec<char>,
    /// Share of keys that are deletions or caret moves rather than typing.
    pub edit_ratio: f64,
}

impl Default for KeystrokeConfig {
    fn default() -> Self {
        Self {
            count: 50,
            alphabet: "0123456789.,-".chars().collect(),
            edit_ratio: 0.2,
        }
    }
}

/// Generate a random keystroke sequence that starts by focusing the field
/// and ends by blurring it.
pub fn random_keystrokes(config: &KeystrokeConfig) -> Vec<Key> {
    let mut rng = rand::thread_rng();
    let mut keys = Vec::with_capacity(config.count + 2);
    keys.push(Key::Focus);

    const EDITS: [Key; 5] = [Key::Backspace, Key::Delete, Key::Left, Key::Right, Key::End];
    for _ in 0..config.count {
        if config.alphabet.is_empty() || rng.gen_bool(config.edit_ratio.clamp(0.0, 1.0)) {
            keys.push(EDITS[rng.gen_range(0..EDITS.len())]);
        } else {
            keys.push(Key::Char(config.alphabet[rng.gen_range(0..config.alphabet.len())]));
        }
    }

    keys.push(Key::Blur);
    keys
}
