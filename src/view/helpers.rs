//! Text fitting helpers shared by the widgets.

use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Fit `text` into `max_width` terminal columns, ending with "…" when cut.
pub fn truncate(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.width() <= max_width {
        return Cow::Borrowed(text);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_borrowed_unchanged() {
        assert!(matches!(truncate("Dune", 12), Cow::Borrowed("Dune")));
    }

    #[test]
    fn long_text_ends_with_ellipsis_at_exact_width() {
        let cut = truncate("Band of Brothers", 12);
        assert_eq!(cut, "Band of Bro…");
        assert_eq!(cut.width(), 12);
    }

    #[test]
    fn wide_characters_are_not_split() {
        // Each CJK character is two columns wide
        let cut = truncate("史記史記", 6);
        assert_eq!(cut, "史記…");
        assert!(cut.width() <= 6);
    }

    #[test]
    fn zero_width_budget() {
        assert_eq!(truncate("anything", 0), "");
        assert_eq!(truncate("anything", 1), "…");
    }
}
