//! Unicode statistics and change counting.
//!
//! All lengths are in characters (code points), not bytes, so the numbers
//! match what a user sees in an editor.

use serde::{Deserialize, Serialize};

use super::{is_invisible, is_replaceable};

/// Character-level breakdown of a text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnicodeInfo {
    pub total_chars: usize,
    pub ascii_chars: usize,
    pub unicode_chars: usize,
    /// Characters that the normalization table would replace.
    pub problematic_chars: usize,
    /// Characters that would be deleted as invisible.
    pub invisible_chars: usize,
}

/// Count characters by class.
pub fn analyze(text: &str) -> UnicodeInfo {
    let mut info = UnicodeInfo::default();

    for c in text.chars() {
        info.total_chars += 1;
        if c.is_ascii() {
            info.ascii_chars += 1;
        }
        if is_replaceable(c) {
            info.problematic_chars += 1;
        } else if is_invisible(c) {
            info.invisible_chars += 1;
        }
    }

    info.unicode_chars = info.total_chars - info.ascii_chars;
    info
}

/// Number of characters that differ between `original` and `cleaned`.
///
/// Index-aligned mismatches over the shared prefix length, plus the
/// absolute difference in length. A deletion early in the text therefore
/// shifts every later character and counts them all.
pub fn count_changes(original: &str, cleaned: &str) -> usize {
    let mismatches = original
        .chars()
        .zip(cleaned.chars())
        .filter(|(a, b)| a != b)
        .count();

    let original_len = original.chars().count();
    let cleaned_len = cleaned.chars().count();

    mismatches + original_len.abs_diff(cleaned_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_all_zero() {
        assert_eq!(analyze(""), UnicodeInfo::default());
    }

    #[test]
    fn classifies_characters() {
        let info = analyze("a\u{2019}b\u{200B}\u{e9}\u{2026}");
        assert_eq!(info.total_chars, 6);
        assert_eq!(info.ascii_chars, 2);
        assert_eq!(info.unicode_chars, 4);
        assert_eq!(info.problematic_chars, 2);
        assert_eq!(info.invisible_chars, 1);
    }

    #[test]
    fn identical_texts_have_no_changes() {
        assert_eq!(count_changes("same", "same"), 0);
        assert_eq!(count_changes("", ""), 0);
    }

    #[test]
    fn substitution_counts_once() {
        assert_eq!(count_changes("it\u{2019}s", "it's"), 1);
    }

    #[test]
    fn length_difference_is_added() {
        // "ab" vs "a": no mismatch on the shared prefix, one char shorter.
        assert_eq!(count_changes("ab", "a"), 1);
        // ellipsis: '\u{2026}' vs '.' mismatch, then two extra chars
        assert_eq!(count_changes("x\u{2026}", "x..."), 3);
    }

    #[test]
    fn deletion_shifts_later_characters() {
        // "a\u{200B}bc" -> "abc": positions 1 and 2 mismatch, length differs by one
        assert_eq!(count_changes("a\u{200B}bc", "abc"), 3);
    }
}
