//! The seam to the masked-text conformer.
//!
//! The formatting controller only builds masks and supplies a validation
//! pipe; fitting a raw string to a mask is delegated to a [`Conformer`].
//! [`TextMaskConformer`] is the bundled guide-less implementation.

use crate::mask::currency_mask::MaskToken;
use log::trace;

/// What a pipe sees besides the freshly conformed candidate.
#[derive(Debug, Clone, Copy)]
pub struct PipeContext<'a> {
    pub previous_conformed: &'a str,
}

/// Validation callback: returns the value to display for a conformed candidate.
pub type Pipe<'p> = &'p dyn Fn(&str, &PipeContext<'_>) -> String;

/// Result of an update that changed the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conformed {
    pub value: String,
    /// Character offset of the caret in `value`.
    pub caret: usize,
}

/// Fits raw text to a positional mask, remembering the last conformed value.
pub trait Conformer {
    /// Conform `raw` to `mask` and run the result through `pipe`.
    ///
    /// `caret` is the character offset of the caret in `raw`. Returns `None`
    /// when `raw` equals the previously conformed value and nothing changes.
    fn update(
        &mut self,
        raw: &str,
        caret: usize,
        mask: &[MaskToken],
        pipe: Pipe<'_>,
    ) -> Option<Conformed>;

    /// The value produced by the last update.
    fn previous_conformed(&self) -> &str;
}

/// Guide-less conformer in the manner of text-mask.
///
/// Literal tokens are always emitted and consume a matching raw character;
/// slot tokens take the next matching raw character, skipping the rest.
/// Conforming stops at the first slot the raw text cannot fill. On deletion
/// the output is trimmed back to its last filled slot.
///
/// # Examples
///
/// ```
/// use currency_input::mask::conformer::{Conformer, PipeContext, TextMaskConformer};
/// use currency_input::mask::currency_mask::MaskToken::*;
///
/// fn accept(conformed: &str, _: &PipeContext<'_>) -> String {
///     conformed.to_string()
/// }
///
/// let mut conformer = TextMaskConformer::default();
/// let mask = [Literal('$'), Digit, Literal(','), Digit, Digit, Digit];
/// let out = conformer.update("1234", 4, &mask, &accept).unwrap();
/// assert_eq!(out.value, "$1,234");
/// assert_eq!(out.caret, 6);
/// assert!(conformer.update("$1,234", 6, &mask, &accept).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextMaskConformer {
    previous: String,
}

impl TextMaskConformer {
    /// Fit `raw` to `mask` without touching conformer state.
    pub fn conform(raw: &str, caret: usize, mask: &[MaskToken], is_addition: bool) -> Conformed {
        let raw: Vec<char> = raw.chars().collect();
        let mut out = String::new();
        let mut out_len = 0;
        let mut next = 0;
        let mut consumed_any = false;
        let mut last_slot_end = None;
        let mut new_caret = 0;

        for token in mask {
            match token {
                MaskToken::Literal(c) => {
                    out.push(*c);
                    out_len += 1;
                    if raw.get(next) == Some(c) {
                        if next < caret {
                            new_caret = out_len;
                        }
                        next += 1;
                        consumed_any = true;
                    }
                }
                slot => {
                    let Some(offset) = raw[next.min(raw.len())..].iter().position(|&c| slot.accepts(c))
                    else {
                        break;
                    };
                    let index = next + offset;
                    out.push(raw[index]);
                    out_len += 1;
                    next = index + 1;
                    consumed_any = true;
                    last_slot_end = Some(out_len);
                    if index < caret {
                        new_caret = out_len;
                    }
                }
            }
        }

        if !consumed_any {
            return Conformed { value: String::new(), caret: 0 };
        }
        if !is_addition {
            let keep = last_slot_end.unwrap_or(0);
            out = out.chars().take(keep).collect();
            out_len = keep;
        }
        Conformed { value: out, caret: new_caret.min(out_len) }
    }
}

impl Conformer for TextMaskConformer {
    fn update(
        &mut self,
        raw: &str,
        caret: usize,
        mask: &[MaskToken],
        pipe: Pipe<'_>,
    ) -> Option<Conformed> {
        if raw == self.previous {
            return None;
        }
        let raw_len = raw.chars().count();
        let is_addition = raw_len >= self.previous.chars().count();
        let conformed = Self::conform(raw, caret, mask, is_addition);

        let context = PipeContext {
            previous_conformed: &self.previous,
        };
        let piped = pipe(&conformed.value, &context);
        let caret = if piped == conformed.value {
            conformed.caret
        } else {
            let piped_len = piped.chars().count();
            caret.saturating_sub(raw_len.saturating_sub(piped_len)).min(piped_len)
        };
        trace!("conformed {:?} -> {:?} (caret {})", raw, piped, caret);

        self.previous = piped.clone();
        Some(Conformed { value: piped, caret })
    }

    fn previous_conformed(&self) -> &str {
        &self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::currency_mask::MaskToken::*;

    fn accept(conformed: &str, _: &PipeContext<'_>) -> String {
        conformed.to_string()
    }

    #[test]
    fn test_literal_inserted_before_first_digit() {
        let out = TextMaskConformer::conform("1", 1, &[Literal('$'), Digit], true);
        assert_eq!(out, Conformed { value: "$1".into(), caret: 2 });
    }

    #[test]
    fn test_skips_non_matching_characters() {
        let mask = [Literal('$'), Digit, Digit, Literal(','), Digit, Digit, Digit];
        let out = TextMaskConformer::conform("$1,2345", 7, &mask, true);
        assert_eq!(out.value, "$12,345");
        assert_eq!(out.caret, 7);
    }

    #[test]
    fn test_caret_follows_inserted_digit() {
        let mask = [Literal('$'), Digit, Digit, Literal(','), Digit, Digit, Digit];
        let out = TextMaskConformer::conform("$19,234", 3, &mask, true);
        assert_eq!(out.value, "$19,234");
        assert_eq!(out.caret, 3);
    }

    #[test]
    fn test_nothing_consumed_is_empty() {
        let out = TextMaskConformer::conform("", 0, &[Literal('$'), Digit], true);
        assert_eq!(out.value, "");
    }

    #[test]
    fn test_trailing_literals_kept_on_addition() {
        let mask = [Literal('$'), Literal('0'), Literal('.'), Digit];
        let out = TextMaskConformer::conform(".", 1, &mask, true);
        assert_eq!(out.value, "$0.");
        assert_eq!(out.caret, 3);
    }

    #[test]
    fn test_trailing_literals_trimmed_on_deletion() {
        let out = TextMaskConformer::conform("1.", 2, &[Digit, Literal('.')], false);
        assert_eq!(out.value, "1");
        let out = TextMaskConformer::conform("$", 1, &[Literal('$'), Digit], false);
        assert_eq!(out.value, "");
    }

    #[test]
    fn test_suffix_appended_when_filled() {
        let mask = [Digit, Literal(' '), Literal('€')];
        let out = TextMaskConformer::conform("5", 1, &mask, true);
        assert_eq!(out.value, "5 €");
        assert_eq!(out.caret, 1);
    }

    #[test]
    fn test_update_memoizes_previous() {
        let mut conformer = TextMaskConformer::default();
        let mask = [Literal('$'), Digit, Digit];
        assert!(conformer.update("12", 2, &mask, &accept).is_some());
        assert_eq!(conformer.previous_conformed(), "$12");
        assert!(conformer.update("$12", 3, &mask, &accept).is_none());
        assert!(conformer.update("$12 ", 4, &mask, &accept).is_some());
    }

    #[test]
    fn test_pipe_rejection_restores_previous() {
        fn reject_long(conformed: &str, ctx: &PipeContext<'_>) -> String {
            if conformed.len() > 4 {
                ctx.previous_conformed.to_string()
            } else {
                conformed.to_string()
            }
        }

        let mut conformer = TextMaskConformer::default();
        let mask3 = [Literal('$'), Digit, Digit, Digit];
        let out = conformer.update("100", 3, &mask3, &reject_long).unwrap();
        assert_eq!(out.value, "$100");

        let mask4 = [Literal('$'), Digit, Literal(','), Digit, Digit, Digit];
        let out = conformer.update("$1000", 5, &mask4, &reject_long).unwrap();
        assert_eq!(out.value, "$100");
        assert_eq!(out.caret, 4);
    }
}
