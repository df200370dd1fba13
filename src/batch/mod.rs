//! Line-mode invocation: stdin filter and multi-file batch cleaning.
//!
//! With no inputs the whole of stdin is cleaned and written to stdout
//! verbatim. With inputs, each file is cleaned into a sibling copy named
//! `<input minus extension><suffix>`. A failure on one input never stops
//! the rest of the batch; each input yields exactly one [`FileOutcome`].

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::analytics::logger::{self, Source};
use crate::error::CleanError;
use crate::normalizer::{self, Platform};
use crate::safety;

/// Default suffix appended to cleaned copies.
pub const DEFAULT_SUFFIX: &str = ".clean.txt";

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub platform: Platform,
    pub suffix: String,
    /// Append a record per input to the clean log.
    pub log: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            platform: Platform::host(),
            suffix: DEFAULT_SUFFIX.to_string(),
            log: false,
        }
    }
}

/// Result of processing a single input.
#[derive(Debug)]
pub enum FileOutcome {
    Cleaned { input: String, output: String },
    Duplicate { input: String },
    Rejected { input: String, reason: CleanError },
    Failed { input: String, reason: CleanError },
}

impl FileOutcome {
    pub fn input(&self) -> &str {
        match self {
            Self::Cleaned { input, .. }
            | Self::Duplicate { input }
            | Self::Rejected { input, .. }
            | Self::Failed { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Cleaned { .. })
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleaned { input, output } => write!(f, "Cleaned: {input} -> {output}"),
            Self::Duplicate { input } => write!(f, "Skipping duplicate: {input}"),
            Self::Rejected { input, .. } => write!(f, "Unsafe file path rejected: {input}"),
            Self::Failed { input, reason } => write!(f, "Failed to process {input}: {reason}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter mode
// ---------------------------------------------------------------------------

/// Read all of `reader`, clean it, and write the result to `writer`.
///
/// Invalid UTF-8 is replaced rather than rejected. Nothing besides the
/// cleaned text is written.
pub fn filter<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    options: &BatchOptions,
) -> Result<()> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .context("failed reading input from stdin")?;

    let decoded = normalizer::decode_text(raw);
    if let Some(recovered) = &decoded.recovered {
        eprintln!("warning: stdin: {recovered}");
    }

    let cleaned = normalizer::clean(&decoded.text, options.platform);
    if options.log {
        logger::log_clean(Source::Stdin, None, &decoded.text, &cleaned);
    }

    writer
        .write_all(cleaned.as_bytes())
        .context("failed writing cleaned output to stdout")?;
    writer.flush().context("failed flushing stdout")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Batch mode
// ---------------------------------------------------------------------------

/// Clean every input in order, relative to `cwd`.
///
/// Empty arguments are skipped without an outcome. Repeats of an input
/// already seen in this call are reported as duplicates before any path
/// check runs.
pub fn clean_files<S: AsRef<str>>(
    inputs: &[S],
    options: &BatchOptions,
    cwd: &Path,
) -> Vec<FileOutcome> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut outcomes = Vec::with_capacity(inputs.len());

    for input in inputs {
        let input = input.as_ref();
        if input.is_empty() {
            continue;
        }

        if !seen.insert(input) {
            outcomes.push(FileOutcome::Duplicate {
                input: input.to_string(),
            });
            continue;
        }

        if let Err(reason) = safety::check_path(input, cwd) {
            outcomes.push(FileOutcome::Rejected {
                input: input.to_string(),
                reason,
            });
            continue;
        }

        let outcome = match clean_file(input, options, cwd) {
            Ok(output) => FileOutcome::Cleaned {
                input: input.to_string(),
                output,
            },
            Err(reason) => {
                if options.log {
                    logger::log_failure(Source::File, Some(input), &reason.to_string());
                }
                FileOutcome::Failed {
                    input: input.to_string(),
                    reason,
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

/// Clean one file into its sibling copy and return the output reference.
fn clean_file(input: &str, options: &BatchOptions, cwd: &Path) -> Result<String, CleanError> {
    let raw = fs::read(cwd.join(input))?;
    let decoded = normalizer::decode_text(raw);
    if let Some(recovered) = &decoded.recovered {
        eprintln!("warning: {input}: {recovered}");
    }

    let cleaned = normalizer::clean(&decoded.text, options.platform);

    let output = output_path(input, &options.suffix);
    fs::write(cwd.join(&output), cleaned.as_bytes())?;

    if options.log {
        logger::log_clean(Source::File, Some(input), &decoded.text, &cleaned);
    }

    Ok(output)
}

/// Output reference for `input`: the input minus its final extension, plus
/// `suffix`. Inputs without an extension (including dotfiles such as
/// `.bashrc`) keep their full name.
pub fn output_path(input: &str, suffix: &str) -> String {
    let base = Path::new(input)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| input.strip_suffix(&format!(".{ext}")))
        .unwrap_or(input);
    format!("{base}{suffix}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn posix_options() -> BatchOptions {
        BatchOptions {
            platform: Platform::Posix,
            ..BatchOptions::default()
        }
    }

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(output_path("notes.txt", ".clean.txt"), "notes.clean.txt");
        assert_eq!(output_path("dir/readme.md", ".clean.txt"), "dir/readme.clean.txt");
        assert_eq!(output_path("archive.tar.gz", ".clean.txt"), "archive.tar.clean.txt");
    }

    #[test]
    fn output_path_keeps_names_without_extension() {
        assert_eq!(output_path("README", ".clean.txt"), "README.clean.txt");
        assert_eq!(output_path(".bashrc", ".clean.txt"), ".bashrc.clean.txt");
    }

    #[test]
    fn filter_writes_only_cleaned_text() {
        let input = "It\u{2019}s \u{2014} fine \nok".as_bytes();
        let mut out = Vec::new();
        filter(input, &mut out, &posix_options()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "It's - fine\nok");
    }

    #[test]
    fn filter_replaces_invalid_utf8() {
        let input: &[u8] = &[b'a', 0xfe, b'b'];
        let mut out = Vec::new();
        filter(input, &mut out, &posix_options()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn outcome_messages_match_expected_format() {
        let cleaned = FileOutcome::Cleaned {
            input: "a.txt".into(),
            output: "a.clean.txt".into(),
        };
        assert_eq!(cleaned.to_string(), "Cleaned: a.txt -> a.clean.txt");

        let dup = FileOutcome::Duplicate {
            input: "a.txt".into(),
        };
        assert_eq!(dup.to_string(), "Skipping duplicate: a.txt");

        let rejected = FileOutcome::Rejected {
            input: "../a.txt".into(),
            reason: CleanError::UnsafePath {
                path: "../a.txt".into(),
                check: "no-traversal",
            },
        };
        assert_eq!(rejected.to_string(), "Unsafe file path rejected: ../a.txt");
    }

    #[test]
    fn duplicates_and_empty_arguments() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x\u{2026}").unwrap();

        let outcomes = clean_files(&["a.txt", "", "a.txt"], &posix_options(), dir.path());
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_success());
        assert!(matches!(outcomes[1], FileOutcome::Duplicate { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("a.clean.txt")).unwrap(),
            "x..."
        );
    }
}
