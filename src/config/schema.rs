/// Configuration schema and defaults for unicodefix.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[general]`, `[batch]`, `[web]`, and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_SUFFIX;
use crate::normalizer::Platform;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level unicodefix configuration.
///
/// Maps directly to `~/.unicodefix/config.toml` and `.unicodefix.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnicodeFixConfig {
    pub general: GeneralConfig,
    pub batch: BatchConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

/// Line-ending setting as written in config files and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformSetting {
    /// Follow the platform the binary runs on.
    #[default]
    Auto,
    Posix,
    Windows,
}

impl PlatformSetting {
    pub fn resolve(self) -> Platform {
        match self {
            Self::Auto => Platform::host(),
            Self::Posix => Platform::Posix,
            Self::Windows => Platform::Windows,
        }
    }
}

impl std::fmt::Display for PlatformSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Line endings of cleaned output: `auto`, `posix`, or `windows`.
    pub platform: PlatformSetting,
}

// ---------------------------------------------------------------------------
// [batch]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Appended to the input name (minus extension) to form the output name.
    pub suffix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// File extensions accepted by the upload endpoint.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".text", ".log", ".csv", ".json", ".xml", ".html", ".css", ".js", ".py",
    ".php", ".java", ".cpp", ".c", ".h",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Address the server binds to.
    pub addr: String,
    /// Open the page in the default browser on start.
    pub open_browser: bool,
    /// Largest request body accepted, in bytes.
    pub max_upload_bytes: usize,
    /// Case-insensitive filename suffixes accepted for uploads.
    pub allowed_extensions: Vec<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
            open_browser: true,
            max_upload_bytes: 10 * 1024 * 1024,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append a record of every clean to `~/.unicodefix/clean-log.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl UnicodeFixConfig {
    /// The annotated config written by `unicodefix config init`.
    pub fn default_toml() -> String {
        let defaults = Self::default();
        let extensions = defaults
            .web
            .allowed_extensions
            .iter()
            .map(|ext| format!("\"{ext}\""))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"# unicodefix configuration
#
# Layers, lowest to highest precedence:
#   built-in defaults -> ~/.unicodefix/config.toml -> ./.unicodefix.toml -> UNICODEFIX_* env vars

[general]
# Line endings of cleaned output: "auto", "posix" (\n) or "windows" (\r\n)
platform = "{platform}"

[batch]
# Output file = input minus extension + suffix
suffix = "{suffix}"

[web]
addr = "{addr}"
open_browser = {open_browser}
max_upload_bytes = {max_upload_bytes}
allowed_extensions = [{extensions}]

[logging]
# Append one JSON line per clean to ~/.unicodefix/clean-log.jsonl
enabled = {logging}
"#,
            platform = defaults.general.platform,
            suffix = defaults.batch.suffix,
            addr = defaults.web.addr,
            open_browser = defaults.web.open_browser,
            max_upload_bytes = defaults.web.max_upload_bytes,
            logging = defaults.logging.enabled,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let parsed: UnicodeFixConfig = toml::from_str(&UnicodeFixConfig::default_toml()).unwrap();
        assert_eq!(parsed, UnicodeFixConfig::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: UnicodeFixConfig = toml::from_str(
            r#"
[general]
platform = "windows"
"#,
        )
        .unwrap();
        assert_eq!(parsed.general.platform, PlatformSetting::Windows);
        assert_eq!(parsed.batch.suffix, ".clean.txt");
        assert!(parsed.logging.enabled);
    }

    #[test]
    fn platform_setting_resolves() {
        assert_eq!(PlatformSetting::Posix.resolve(), Platform::Posix);
        assert_eq!(PlatformSetting::Windows.resolve(), Platform::Windows);
        assert_eq!(PlatformSetting::Auto.resolve(), Platform::host());
    }

    #[test]
    fn default_extensions_include_text_and_source_files() {
        let web = WebConfig::default();
        assert!(web.allowed_extensions.iter().any(|e| e == ".txt"));
        assert!(web.allowed_extensions.iter().any(|e| e == ".h"));
        assert_eq!(web.allowed_extensions.len(), 16);
    }
}
