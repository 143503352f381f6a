//! Semantic caret preservation across a distraction-free re-render.

use crate::core::format_spec::FormatSpec;
use crate::core::options::DistractionFreeRules;

/// Map a caret offset in `display` to the equivalent offset once the
/// decorations named by `rules` are hidden.
///
/// Digit positions are invariant under hiding, so only the prefix and the
/// separators in front of the caret shift it. The result is never negative.
///
/// # Examples
///
/// ```
/// use currency_input::controller::caret::semantic_caret;
/// use currency_input::core::format_spec::FormatSpec;
/// use currency_input::core::options::{CurrencyInputOptions, DistractionFreeRules};
///
/// let spec = FormatSpec::build(&CurrencyInputOptions::default().with_currency("USD"));
/// // "$1,2|34.00" -> "12|34.00"
/// assert_eq!(semantic_caret("$1,234.00", 4, &spec, DistractionFreeRules::ALL), 2);
/// ```
pub fn semantic_caret(
    display: &str,
    caret: usize,
    spec: &FormatSpec,
    rules: DistractionFreeRules,
) -> usize {
    let mut position = caret as isize;
    if rules.hide_currency_symbol {
        position -= spec.prefix.chars().count() as isize;
    }
    if rules.hide_thousands_separator_symbol && !spec.thousands_separator_symbol.is_empty() {
        let before: String = display.chars().take(caret).collect();
        position -= before.matches(spec.thousands_separator_symbol.as_str()).count() as isize;
    }
    position.max(0) as usize
}
