//! Text normalizer: replace typographic Unicode with ASCII-safe equivalents.
//!
//! [`clean`] is the single transform every caller goes through. It runs, in
//! strict order:
//!
//! 1. **Substitution**: each entry of [`NORMALIZATION_TABLE`] is replaced
//!    literally across the whole text.
//! 2. **Deletion**: every code point in [`INVISIBLE_CHARS`] is removed.
//! 3. **Line endings**: `\r\n` then lone `\r` become `\n`.
//! 4. **Trailing whitespace**: a run of spaces/tabs directly before a `\n`
//!    is removed. The final line has no `\n` after it, so its trailing
//!    whitespace survives.
//! 5. **Re-expansion**: `\n` becomes `\r\n` when the target [`Platform`] is
//!    Windows.
//!
//! The transform is pure and reentrant: all lookup data is immutable and
//! the platform is an explicit argument.

pub mod decode;
pub mod info;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CleanError;

pub use decode::{Decoded, decode_text};
pub use info::{UnicodeInfo, analyze, count_changes};

// ---------------------------------------------------------------------------
// Lookup data
// ---------------------------------------------------------------------------

/// Typographic code points and their ASCII replacements.
///
/// Sources are pairwise distinct single code points, so the order of
/// application does not affect the result.
pub const NORMALIZATION_TABLE: &[(char, &str)] = &[
    ('\u{2018}', "'"),   // left single quote
    ('\u{2019}', "'"),   // right single quote
    ('\u{201C}', "\""),  // left double quote
    ('\u{201D}', "\""),  // right double quote
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "-"),   // em dash
    ('\u{2026}', "..."), // ellipsis
    ('\u{00A0}', " "),   // non-breaking space
];

/// Zero-width and invisible code points that are deleted outright.
pub const INVISIBLE_CHARS: &[char] = &[
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{FEFF}', // byte-order mark / zero-width no-break space
    '\u{00AD}', // soft hyphen
];

/// Character class built from [`INVISIBLE_CHARS`], one code point per match.
static INVISIBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let class: String = INVISIBLE_CHARS.iter().collect();
    Regex::new(&format!("[{class}]")).expect("invisible-character regex must compile")
});

/// A run of spaces/tabs immediately followed by a line feed.
static TRAILING_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("trailing-whitespace regex must compile"));

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Line-ending convention the cleaned text is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// `\n` line endings.
    Posix,
    /// `\r\n` line endings.
    Windows,
}

impl Platform {
    /// The convention of the platform this binary was built for.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn line_ending(self) -> &'static str {
        match self {
            Self::Posix => "\n",
            Self::Windows => "\r\n",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Normalize problematic Unicode in `text` for the given platform.
///
/// Total over all input; the empty string comes back unchanged.
///
/// ```
/// use unicodefix::normalizer::{Platform, clean};
///
/// assert_eq!(clean("\"Hello\" \u{2014} World", Platform::Posix), "\"Hello\" - World");
/// ```
pub fn clean(text: &str, platform: Platform) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Stage 1: literal substitution
    let mut out = text.to_string();
    for &(from, to) in NORMALIZATION_TABLE {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }

    // Stage 2: invisible-character deletion
    let out = INVISIBLE_RE.replace_all(&out, "");

    // Stage 3: collapse every line ending to \n
    let out = out.replace("\r\n", "\n").replace('\r', "\n");

    // Stage 4: strip trailing spaces/tabs before each \n
    let out = TRAILING_WS_RE.replace_all(&out, "\n");

    // Stage 5: host convention
    match platform {
        Platform::Posix => out.into_owned(),
        Platform::Windows => out.replace('\n', "\r\n"),
    }
}

/// Strict entry point for dynamically typed input.
///
/// Only a JSON string is text; any other value is rejected with
/// [`CleanError::InvalidArgument`] before the transform runs.
pub fn clean_value(value: &serde_json::Value, platform: Platform) -> Result<String, CleanError> {
    match value {
        serde_json::Value::String(text) => Ok(clean(text, platform)),
        _ => Err(CleanError::InvalidArgument(
            "Input must be a string".to_string(),
        )),
    }
}

/// Returns `true` if `c` is rewritten or removed by [`clean`] stages 1–2.
pub fn is_targeted(c: char) -> bool {
    is_replaceable(c) || is_invisible(c)
}

pub(crate) fn is_replaceable(c: char) -> bool {
    NORMALIZATION_TABLE.iter().any(|&(from, _)| from == c)
}

pub(crate) fn is_invisible(c: char) -> bool {
    INVISIBLE_CHARS.contains(&c)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
