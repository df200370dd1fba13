/// End-to-end behavior of the text normalizer through the public API.
use unicodefix::error::CleanError;
use unicodefix::normalizer::{
    self, INVISIBLE_CHARS, NORMALIZATION_TABLE, Platform, analyze, clean, clean_value,
    count_changes,
};

// ===========================================================================
// 1. Literal scenarios
// ===========================================================================

#[test]
fn smart_quotes_dashes_and_ellipsis() {
    let input = "It\u{2019}s \u{2014} great\u{2026}";
    assert_eq!(clean(input, Platform::Posix), "It's - great...");
}

#[test]
fn double_quotes_become_ascii() {
    let input = "\u{201C}Hello\u{201D}";
    assert_eq!(clean(input, Platform::Posix), "\"Hello\"");
}

#[test]
fn invisible_characters_are_removed() {
    let input = "zero\u{200B}width\u{FEFF}text\u{00AD}";
    assert_eq!(clean(input, Platform::Posix), "zerowidthtext");
}

#[test]
fn crlf_and_trailing_whitespace_on_posix() {
    let input = "line one   \r\nline two\t\r\nlast";
    assert_eq!(clean(input, Platform::Posix), "line one\nline two\nlast");
}

#[test]
fn windows_target_re_expands_line_endings() {
    let input = "a  \nb\rc";
    assert_eq!(clean(input, Platform::Windows), "a\r\nb\r\nc");
}

#[test]
fn empty_input_stays_empty() {
    assert_eq!(clean("", Platform::Posix), "");
    assert_eq!(clean("", Platform::Windows), "");
}

#[test]
fn unterminated_last_line_keeps_trailing_whitespace() {
    assert_eq!(clean("done   ", Platform::Posix), "done   ");
    assert_eq!(clean("a \nb \t", Platform::Posix), "a\nb \t");
}

#[test]
fn non_breaking_space_then_trailing_run() {
    // The NBSP becomes a space first, so it joins the trailing run.
    assert_eq!(clean("x\u{00A0}\n", Platform::Posix), "x\n");
}

#[test]
fn strict_entry_point_rejects_non_text() {
    for value in [
        serde_json::json!(42),
        serde_json::json!(null),
        serde_json::json!(["a"]),
        serde_json::json!({ "text": "a" }),
    ] {
        let err = clean_value(&value, Platform::Posix).unwrap_err();
        assert!(matches!(err, CleanError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "Input must be a string");
    }
}

#[test]
fn strict_entry_point_accepts_text() {
    let value = serde_json::json!("\u{2018}ok\u{2019}");
    assert_eq!(clean_value(&value, Platform::Posix).unwrap(), "'ok'");
}

// ===========================================================================
// 2. Properties
// ===========================================================================

const SAMPLES: &[&str] = &[
    "",
    "plain ascii\n",
    "It\u{2019}s \u{2014} great\u{2026}",
    "a\u{200B}\u{200C}\u{200D}b\r\n\r\nc  \t\r\n",
    "tabs\t\t\nand  \r spaces \u{00A0}\u{00A0}\n",
    "\u{FEFF}bom first line\u{2013}dash",
    "caf\u{e9} \u{4e16}\u{754c} \u{1F600}\n",
];

#[test]
fn clean_is_idempotent() {
    for platform in [Platform::Posix, Platform::Windows] {
        for sample in SAMPLES {
            let once = clean(sample, platform);
            assert_eq!(clean(&once, platform), once, "{sample:?} on {platform}");
        }
    }
}

#[test]
fn output_contains_no_targeted_code_points() {
    for sample in SAMPLES {
        let out = clean(sample, Platform::Posix);
        for (source, _) in NORMALIZATION_TABLE {
            assert!(!out.contains(*source), "{source:?} survived in {out:?}");
        }
        for invisible in INVISIBLE_CHARS {
            assert!(!out.contains(*invisible), "{invisible:?} survived in {out:?}");
        }
        assert!(!out.contains('\r'));
        assert!(!out.contains(" \n") && !out.contains("\t\n"));
    }
}

#[test]
fn untargeted_unicode_passes_through() {
    let input = "caf\u{e9} \u{4e16}\u{754c} \u{1F600}";
    assert_eq!(clean(input, Platform::Posix), input);
}

#[test]
fn windows_output_has_only_crlf_line_endings() {
    for sample in SAMPLES {
        let out = clean(sample, Platform::Windows);
        let bytes = out.as_bytes();
        let bare_lf = out
            .match_indices('\n')
            .any(|(i, _)| i == 0 || bytes[i - 1] != b'\r');
        assert!(!bare_lf, "bare LF in {out:?}");
    }
}

#[test]
fn line_ending_matches_platform() {
    assert_eq!(Platform::Posix.line_ending(), "\n");
    assert_eq!(Platform::Windows.line_ending(), "\r\n");
    if cfg!(windows) {
        assert_eq!(Platform::host(), Platform::Windows);
    } else {
        assert_eq!(Platform::host(), Platform::Posix);
    }
}

// ===========================================================================
// 3. Statistics
// ===========================================================================

#[test]
fn analyze_counts_categories() {
    let info = analyze("a\u{2019}b\u{200B}\u{e9}");
    assert_eq!(info.total_chars, 5);
    assert_eq!(info.ascii_chars, 2);
    assert_eq!(info.unicode_chars, 3);
    assert_eq!(info.problematic_chars, 1);
    assert_eq!(info.invisible_chars, 1);
}

#[test]
fn count_changes_reflects_clean() {
    let original = "It\u{2019}s";
    let cleaned = clean(original, Platform::Posix);
    assert_eq!(count_changes(original, &cleaned), 1);
    assert_eq!(count_changes("same", "same"), 0);
}

#[test]
fn decode_recovers_invalid_utf8() {
    let decoded = normalizer::decode_text(vec![b'o', b'k', 0xFF, b'!']);
    assert_eq!(decoded.text, "ok\u{FFFD}!");
    assert!(matches!(
        decoded.recovered,
        Some(CleanError::DecodeFailure { valid_up_to: 2 })
    ));
}
