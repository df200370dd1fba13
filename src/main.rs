use anyhow::Result;
use clap::{Parser, Subcommand};

use unicodefix::{cli, config};

#[derive(Debug, Parser)]
#[command(name = "unicodefix")]
#[command(about = "Normalize typographic Unicode to plain ASCII and strip invisible characters")]
#[command(args_conflicts_with_subcommands = true)]
struct App {
    /// Files to clean. Each FILE is written to FILE-minus-extension + suffix.
    /// Reads stdin and writes stdout when none are given.
    files: Vec<String>,

    /// Suffix for cleaned copies (default: .clean.txt)
    #[arg(long)]
    suffix: Option<String>,

    /// Line endings for output: auto, posix, or windows
    #[arg(long)]
    platform: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the web interface
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8000
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window on start
        #[arg(long)]
        no_browser: bool,
    },
    /// Report ASCII, Unicode, problematic, and invisible character counts
    Info {
        /// Files to inspect (stdin when none are given)
        files: Vec<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show recent entries from the clean log
    History {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective merged configuration
    Show,
    /// Write a default config to ~/.unicodefix/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `web.addr 127.0.0.1:9000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let mut cfg = config::load();

    let overrides = cli::Overrides {
        platform: app.platform,
        suffix: app.suffix,
    };
    overrides.apply(&mut cfg)?;

    match app.command {
        None => cli::run_clean(&app.files, &cfg),
        Some(Commands::Serve { addr, no_browser }) => cli::run_serve(addr, no_browser, cfg),
        Some(Commands::Info { files, format }) => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_info(&files, fmt)
        }
        Some(Commands::History { limit, format }) => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(limit, fmt)
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
