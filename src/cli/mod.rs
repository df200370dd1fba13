//! CLI command implementations for unicodefix.
//!
//! Provides subcommand handlers for:
//! - `unicodefix [FILES]...`: clean files into `.clean.txt` copies, or filter stdin
//! - `unicodefix info [FILES]...`: count problematic and invisible characters
//! - `unicodefix serve`: start the web interface
//! - `unicodefix history`: recent entries from the clean log
//! - `unicodefix config show|init|set|reset`: configuration management

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::analytics::logger::{self, CleanLogEntry};
use crate::batch::{self, BatchOptions, FileOutcome};
use crate::config::{self, UnicodeFixConfig};
use crate::normalizer::{self, UnicodeInfo};
use crate::web;

/// Output format for reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub platform: Option<String>,
    pub suffix: Option<String>,
}

impl Overrides {
    /// Apply the overrides to `config`. Unknown platform names are an error.
    pub fn apply(&self, config: &mut UnicodeFixConfig) -> Result<()> {
        if let Some(raw) = &self.platform {
            config.general.platform = config::parse_platform(raw).with_context(|| {
                format!("unknown platform '{raw}' (expected auto, posix, or windows)")
            })?;
        }
        if let Some(suffix) = &self.suffix {
            config.batch.suffix = suffix.clone();
        }
        Ok(())
    }
}

fn batch_options(config: &UnicodeFixConfig) -> BatchOptions {
    BatchOptions {
        platform: config.general.platform.resolve(),
        suffix: config.batch.suffix.clone(),
        log: config.logging.enabled,
    }
}

// ---------------------------------------------------------------------------
// unicodefix [FILES]...
// ---------------------------------------------------------------------------

/// Clean the given files, or act as a stdin → stdout filter when there are none.
pub fn run_clean(files: &[String], config: &UnicodeFixConfig) -> Result<()> {
    let options = batch_options(config);

    if files.is_empty() {
        return batch::filter(io::stdin().lock(), io::stdout().lock(), &options);
    }

    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    for outcome in batch::clean_files(files, &options, &cwd) {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Cleaned { .. } => println!("{} {}", "[✓]".green().bold(), outcome),
        FileOutcome::Duplicate { .. } => println!("{} {}", "[!]".yellow().bold(), outcome),
        FileOutcome::Rejected { reason, .. } => {
            println!("{} {}", "[✗]".red().bold(), outcome);
            eprintln!("    {}", reason.to_string().dimmed());
        }
        FileOutcome::Failed { .. } => println!("{} {}", "[✗]".red().bold(), outcome),
    }
}

// ---------------------------------------------------------------------------
// unicodefix info
// ---------------------------------------------------------------------------

/// Report character statistics for files, or for stdin when there are none.
pub fn run_info(files: &[String], format: OutputFormat) -> Result<()> {
    let mut reports: Vec<(String, UnicodeInfo)> = Vec::new();

    if files.is_empty() {
        let mut raw = Vec::new();
        io::stdin()
            .read_to_end(&mut raw)
            .context("failed reading input from stdin")?;
        let decoded = normalizer::decode_text(raw);
        reports.push(("<stdin>".to_string(), normalizer::analyze(&decoded.text)));
    } else {
        for file in files {
            let raw = std::fs::read(file).with_context(|| format!("failed to read {file}"))?;
            let decoded = normalizer::decode_text(raw);
            reports.push((file.clone(), normalizer::analyze(&decoded.text)));
        }
    }

    match format {
        OutputFormat::Json => print_info_json(&reports)?,
        OutputFormat::Csv => print_info_csv(&reports),
        OutputFormat::Table => print_info_table(&reports),
    }

    Ok(())
}

fn print_info_table(reports: &[(String, UnicodeInfo)]) {
    println!("{}", "Unicode Character Report".bold().cyan());
    println!("{}", "=".repeat(72));
    println!(
        "  {:<24} {:>9} {:>9} {:>9} {:>10} {:>9}",
        "Input", "Total", "ASCII", "Unicode", "Problem", "Invisible"
    );
    println!("  {}", "-".repeat(70));

    for (name, info) in reports {
        let line = format!(
            "  {:<24} {:>9} {:>9} {:>9} {:>10} {:>9}",
            truncate(name, 24),
            format_number(info.total_chars),
            format_number(info.ascii_chars),
            format_number(info.unicode_chars),
            format_number(info.problematic_chars),
            format_number(info.invisible_chars),
        );
        if info.problematic_chars + info.invisible_chars > 0 {
            println!("{}", line.yellow());
        } else {
            println!("{line}");
        }
    }
}

fn print_info_json(reports: &[(String, UnicodeInfo)]) -> Result<()> {
    let value = serde_json::json!(reports
        .iter()
        .map(|(name, info)| serde_json::json!({ "input": name, "info": info }))
        .collect::<Vec<_>>());
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_info_csv(reports: &[(String, UnicodeInfo)]) {
    println!("input,total_chars,ascii_chars,unicode_chars,problematic_chars,invisible_chars");
    for (name, info) in reports {
        println!(
            "{},{},{},{},{},{}",
            name,
            info.total_chars,
            info.ascii_chars,
            info.unicode_chars,
            info.problematic_chars,
            info.invisible_chars,
        );
    }
}

// ---------------------------------------------------------------------------
// unicodefix serve
// ---------------------------------------------------------------------------

/// Start the web interface. Blocks until the process is stopped.
pub fn run_serve(addr: Option<String>, no_browser: bool, mut config: UnicodeFixConfig) -> Result<()> {
    if let Some(addr) = addr {
        config.web.addr = addr;
    }
    if no_browser {
        config.web.open_browser = false;
    }
    web::serve(&config)
}

// ---------------------------------------------------------------------------
// unicodefix history
// ---------------------------------------------------------------------------

/// Show the most recent entries of the clean log.
pub fn run_history(limit: usize, format: OutputFormat) -> Result<()> {
    let path: PathBuf = logger::clean_log_path().context("could not determine home directory")?;
    let entries = logger::read_entries(&path);

    if entries.is_empty() {
        println!("{}", "No clean operations logged yet.".yellow());
        return Ok(());
    }

    let start = entries.len().saturating_sub(limit);
    let recent = &entries[start..];

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(recent)?),
        OutputFormat::Csv => print_history_csv(recent),
        OutputFormat::Table => print_history_table(recent, entries.len()),
    }

    Ok(())
}

fn print_history_table(entries: &[CleanLogEntry], total: usize) {
    println!(
        "{}",
        format!("Clean History (last {} of {})", entries.len(), total)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(72));
    println!(
        "  {:<20} {:<7} {:<22} {:>8} {:>8}",
        "Time", "Source", "Input", "Chars", "Changes"
    );
    println!("  {}", "-".repeat(70));

    for entry in entries {
        let time = entry.timestamp.get(..19).unwrap_or(&entry.timestamp);
        let source = source_name(entry);
        let input = entry.input.as_deref().unwrap_or("-");
        let line = format!(
            "  {:<20} {:<7} {:<22} {:>8} {:>8}",
            time,
            source,
            truncate(input, 22),
            format_number(entry.original_chars),
            format_number(entry.changes),
        );
        if entry.success {
            println!("{line}");
        } else {
            println!(
                "{} {}",
                line.red(),
                entry.error.as_deref().unwrap_or("").dimmed()
            );
        }
    }
}

/// Lowercase source name as it appears in the log file.
fn source_name(entry: &CleanLogEntry) -> String {
    serde_json::to_value(entry.source)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn print_history_csv(entries: &[CleanLogEntry]) {
    println!("timestamp,source,input,original_chars,cleaned_chars,changes,success");
    for entry in entries {
        println!(
            "{},{},{},{},{},{},{}",
            entry.timestamp,
            source_name(entry),
            entry.input.as_deref().unwrap_or(""),
            entry.original_chars,
            entry.cleaned_chars,
            entry.changes,
            entry.success,
        );
    }
}

// ---------------------------------------------------------------------------
// unicodefix config
// ---------------------------------------------------------------------------

/// Print the effective configuration and where it came from.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective UnicodeFix Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.unicodefix/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.unicodefix/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".unicodefix.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".unicodefix.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "UNICODEFIX_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.unicodefix/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    let path = config::set_config_value(key, value)?;
    println!(
        "{} Set {} = {} in {}",
        "✓".green().bold(),
        key.bold(),
        value,
        path.display()
    );
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformSetting;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("caf\u{e9}s", 4), "caf…");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str_opt(Some("xml")), OutputFormat::Table);
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = UnicodeFixConfig::default();
        let overrides = Overrides {
            platform: Some("windows".to_string()),
            suffix: Some(".fixed.txt".to_string()),
        };
        overrides.apply(&mut config).unwrap();
        assert_eq!(config.general.platform, PlatformSetting::Windows);
        assert_eq!(config.batch.suffix, ".fixed.txt");
    }

    #[test]
    fn overrides_reject_unknown_platform() {
        let mut config = UnicodeFixConfig::default();
        let overrides = Overrides {
            platform: Some("beos".to_string()),
            suffix: None,
        };
        assert!(overrides.apply(&mut config).is_err());
    }

    #[test]
    fn batch_options_follow_config() {
        let mut config = UnicodeFixConfig::default();
        config.general.platform = PlatformSetting::Posix;
        config.logging.enabled = false;
        let options = batch_options(&config);
        assert_eq!(options.platform, normalizer::Platform::Posix);
        assert_eq!(options.suffix, ".clean.txt");
        assert!(!options.log);
    }
}
