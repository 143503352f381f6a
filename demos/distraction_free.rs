//! Focus, typing and blur on an in-memory field.
//!
//! Walks a field through a typical edit: the value is pushed from the host,
//! the user focuses the field (decorations disappear, caret kept), types,
//! and blurs (full formatting comes back).

use currency_input::prelude::*;
use currency_input::simulation::typing::{parse_keys, TypingSession};
use rust_decimal_macros::dec;

fn show(step: &str, field: &MemoryField) {
    let caret = field.selection_start();
    let (before, after): (String, String) = (
        field.value().chars().take(caret).collect(),
        field.value().chars().skip(caret).collect(),
    );
    println!("  {:<28} {}|{}", step, before, after);
}

fn main() {
    env_logger::init();

    println!("╔═══════════════════════════════════════════╗");
    println!("║  currency-input: Distraction-Free Example ║");
    println!("╚═══════════════════════════════════════════╝\n");

    // --- Scenario 1: Driving the controller directly ---
    println!("━━━ Scenario 1: Focus and blur ━━━\n");

    let mut engine: CurrencyInput = CurrencyInput::new();
    let mut field = MemoryField::new();
    let options = CurrencyInputOptions::default().with_currency("USD");
    let id = match engine.attach(&mut field, options) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("attach failed: {}", e);
            return;
        }
    };

    engine.on_format(&mut field, Some(dec!(1234567.5)));
    show("host pushes 1234567.5", &field);

    field.set_selection_range(4, 4);
    show("caret placed", &field);

    if let Some(task) = engine.on_focus(&mut field) {
        engine.run_deferred(task, &mut field);
    }
    show("focused", &field);

    field.type_text("9");
    engine.on_input(&mut field);
    show("typed 9", &field);

    engine.on_blur(&mut field);
    show("blurred", &field);
    println!("\n  Number value: {:?}", engine.number_value(id));
    println!("  Events:       {}", field.events().len());

    // --- Scenario 2: Replaying a key script ---
    println!("\n━━━ Scenario 2: Key script ━━━\n");

    let options = CurrencyInputOptions::default().with_locale("de-DE");
    let keys = parse_keys("{focus}-1234,567{bs}{blur}").unwrap_or_default();
    match TypingSession::new(options) {
        Ok(mut session) => {
            session.press_all(&keys);
            for snapshot in session.history() {
                println!("  {:<12} {:?}", snapshot.key, snapshot.value);
            }
        }
        Err(e) => eprintln!("attach failed: {}", e),
    }
}
