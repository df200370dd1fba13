/// Configuration system for unicodefix.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: [`schema::UnicodeFixConfig::default()`]
/// 2. **User global config**: `~/.unicodefix/config.toml`
/// 3. **Project local config**: `.unicodefix.toml` in the current directory
/// 4. **Environment variables**: `UNICODEFIX_*` overrides (highest precedence)
///
/// File layers are merged key by key: a project file that only sets
/// `web.addr` keeps everything else from the global file.
///
/// # Usage
///
/// ```rust,ignore
/// use unicodefix::config;
///
/// let cfg = config::load();
/// let platform = cfg.general.platform.resolve();
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::{PlatformSetting, UnicodeFixConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars.
pub fn load() -> UnicodeFixConfig {
    let mut config = load_files(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge the given TOML files, in order, on top of the defaults.
///
/// Missing or malformed files are skipped, as is a merged result that no
/// longer matches the schema.
fn load_files(paths: &[Option<PathBuf>]) -> UnicodeFixConfig {
    let Ok(mut merged) = toml::Value::try_from(UnicodeFixConfig::default()) else {
        return UnicodeFixConfig::default();
    };

    for path in paths.iter().flatten() {
        if let Some(layer) = load_toml_value(path) {
            let candidate = {
                let mut next = merged.clone();
                merge_values(&mut next, layer);
                next
            };
            if candidate.clone().try_into::<UnicodeFixConfig>().is_ok() {
                merged = candidate;
            }
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as an untyped value. `None` if absent or malformed.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively overlay `overlay` onto `base`. Tables merge per key; any
/// other value replaces what was there.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.unicodefix/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".unicodefix").join("config.toml"))
}

/// Path to the project local config: `.unicodefix.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".unicodefix.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `UNICODEFIX_PLATFORM`: `auto`, `posix`, or `windows`
/// - `UNICODEFIX_SUFFIX`: output suffix for batch mode
/// - `UNICODEFIX_WEB_ADDR`: server bind address
/// - `UNICODEFIX_OPEN_BROWSER`: open the page on `serve` (`1`/`true`/`yes`/`on`)
/// - `UNICODEFIX_MAX_UPLOAD_BYTES`: request body limit
/// - `UNICODEFIX_LOG`: clean log enabled
fn apply_env_overrides<F>(config: &mut UnicodeFixConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = var("UNICODEFIX_PLATFORM")
        && let Some(platform) = parse_platform(&val)
    {
        config.general.platform = platform;
    }
    if let Some(val) = var("UNICODEFIX_SUFFIX")
        && !val.is_empty()
    {
        config.batch.suffix = val;
    }
    if let Some(val) = var("UNICODEFIX_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Some(val) = var("UNICODEFIX_OPEN_BROWSER") {
        config.web.open_browser = is_truthy(&val);
    }
    if let Some(val) = var("UNICODEFIX_MAX_UPLOAD_BYTES")
        && let Ok(bytes) = val.parse::<usize>()
    {
        config.web.max_upload_bytes = bytes;
    }
    if let Some(val) = var("UNICODEFIX_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a platform string.
pub fn parse_platform(val: &str) -> Option<PlatformSetting> {
    match val.to_ascii_lowercase().as_str() {
        "auto" | "host" => Some(PlatformSetting::Auto),
        "posix" | "unix" | "lf" => Some(PlatformSetting::Posix),
        "windows" | "win" | "crlf" => Some(PlatformSetting::Windows),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.unicodefix/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.unicodefix/ directory")?;
    }

    fs::write(&path, UnicodeFixConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single dotted key (e.g. `web.addr`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)?;
    Ok(path)
}

/// Set a dotted key in the config file at `path`, starting from the
/// defaults when the file does not exist yet. The result must still
/// deserialize into the schema.
fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(UnicodeFixConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    root.clone()
        .try_into::<UnicodeFixConfig>()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("empty config key segment in '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table for '{key}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Array(_)) => toml::Value::Array(
            raw_value
                .split(',')
                .map(|s| toml::Value::String(s.trim().to_string()))
                .filter(|v| v.as_str().is_some_and(|s| !s.is_empty()))
                .collect(),
        ),
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
