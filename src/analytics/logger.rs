use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::normalizer::count_changes;

// ---------------------------------------------------------------------------
// Clean log entry (JSONL)
// ---------------------------------------------------------------------------

/// Where a cleaned text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Stdin,
    File,
    Text,
    Upload,
}

/// A single entry in the structured log (`~/.unicodefix/clean-log.jsonl`).
///
/// One line per clean operation, whether it came from the CLI or the web
/// handler. Sizes are in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanLogEntry {
    pub timestamp: String,
    pub source: Source,
    /// File name or upload name, when there is one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub input: Option<String>,
    pub original_chars: usize,
    pub cleaned_chars: usize,
    pub changes: usize,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CleanLogEntry {
    pub fn success(source: Source, input: Option<&str>, original: &str, cleaned: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            source,
            input: input.map(str::to_string),
            original_chars: original.chars().count(),
            cleaned_chars: cleaned.chars().count(),
            changes: count_changes(original, cleaned),
            success: true,
            error: None,
        }
    }

    pub fn failure(source: Source, input: Option<&str>, error: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            source,
            input: input.map(str::to_string),
            original_chars: 0,
            cleaned_chars: 0,
            changes: 0,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Record a successful clean. Best-effort: I/O failures are ignored.
pub fn log_clean(source: Source, input: Option<&str>, original: &str, cleaned: &str) {
    let entry = CleanLogEntry::success(source, input, original, cleaned);
    if let Some(path) = clean_log_path() {
        let _ = append_entry(&path, &entry);
    }
}

/// Record a failed clean. Best-effort: I/O failures are ignored.
pub fn log_failure(source: Source, input: Option<&str>, error: &str) {
    let entry = CleanLogEntry::failure(source, input, error);
    if let Some(path) = clean_log_path() {
        let _ = append_entry(&path, &entry);
    }
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Append one JSON line to the log at `path`, creating parent directories.
pub fn append_entry(path: &Path, entry: &CleanLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Read every entry from the log at `path`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_entries(path: &Path) -> Vec<CleanLogEntry> {
    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<CleanLogEntry>(&line).ok())
        .collect()
}

/// Return the path to the clean log file.
pub fn clean_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".unicodefix").join("clean-log.jsonl"))
}
