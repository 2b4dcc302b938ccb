//! CLI command implementations for the pela console.
//!
//! Provides subcommand handlers for:
//! - `pela shell`: interactive console over one session
//! - `pela history`: audit history table
//! - `pela dashboard`: aggregate statistics charts
//! - `pela settings [--webhook URL]`: show or store the webhook URL
//! - `pela profiles` / `pela schedules`: saved profiles and active jobs
//! - `pela activity --days N`: local log of backend calls
//! - `pela config show|init|set|reset`: configuration management
pub mod render;
pub mod shell;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::activity::ActivityLog;
use crate::config::{self, PelaConfig};
use crate::console::Console;
use crate::console::history::HistoryTable;
use crate::console::schedule::JobList;
use crate::console::settings::SettingsOutcome;
use crate::gateway::{Gateway, HttpTransport, RequestError};
use crate::session::{Session, Surface};
use crate::ui::terminal::TerminalFrontend;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// The console used by every command: HTTP transport and terminal dialogs,
/// both configured from the resolved config.
pub type TerminalConsole = Console<HttpTransport, TerminalFrontend>;

pub fn build_console(config: &PelaConfig) -> TerminalConsole {
    let gateway = Gateway::new(HttpTransport::from_config(&config.backend))
        .with_activity_log(ActivityLog::from_config(&config.logging));
    let session = Session::new().with_search_dirs(
        &config.forms.direct_search_path,
        &config.forms.tunnel_search_path,
    );
    Console::new(gateway, TerminalFrontend::new(), session)
}

fn request_failure(e: &RequestError) -> anyhow::Error {
    match e {
        RequestError::Server(message) => anyhow::anyhow!("backend error: {message}"),
        RequestError::Transport(detail) => anyhow::anyhow!("backend unreachable: {detail}"),
    }
}

// ---------------------------------------------------------------------------
// pela history
// ---------------------------------------------------------------------------

/// Show the analysis audit history.
pub fn run_history(format: OutputFormat) -> Result<()> {
    let mut console = build_console(&config::load());
    console.refresh_history();

    match (format, console.history.table()) {
        (OutputFormat::Json, HistoryTable::Rows(rows)) => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        (OutputFormat::Json, HistoryTable::Empty) => println!("[]"),
        (OutputFormat::Json, HistoryTable::Failed) => {
            bail!("{}", crate::console::history::HISTORY_FAILED)
        }
        (_, table) => render::print_history(table),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// pela dashboard
// ---------------------------------------------------------------------------

/// Fetch aggregate statistics and draw the three charts.
pub fn run_dashboard() -> Result<()> {
    let mut console = build_console(&config::load());
    println!("{}", "Dashboard".bold().cyan());
    println!("{}", "=".repeat(60));
    console.switch_to(Surface::Dashboard);

    if let Some(error) = console.dashboard.error() {
        bail!("{error}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// pela settings
// ---------------------------------------------------------------------------

/// Show the stored webhook URL, or replace it when `webhook` is given.
pub fn run_settings(webhook: Option<&str>) -> Result<()> {
    let mut console = build_console(&config::load());

    let Some(url) = webhook else {
        console.load_settings().map_err(|e| request_failure(&e))?;
        let shown = if console.settings.webhook_url.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            console.settings.webhook_url.clone()
        };
        println!("  {} {}", "Webhook URL:".bold(), shown);
        return Ok(());
    };

    console.settings.webhook_url = url.to_string();
    match console.save_settings() {
        SettingsOutcome::Saved(_) => {
            println!("{} Webhook URL saved", "✓".green().bold());
            Ok(())
        }
        SettingsOutcome::Rejected(e) => bail!("{e}"),
        SettingsOutcome::Failed(e) => Err(request_failure(&e)),
        SettingsOutcome::Ignored => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// pela profiles / pela schedules
// ---------------------------------------------------------------------------

/// List saved connection profiles.
pub fn run_profiles(format: OutputFormat) -> Result<()> {
    let mut console = build_console(&config::load());
    console.refresh_profiles().map_err(|e| request_failure(&e))?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(console.profiles.profiles())?
            );
        }
        OutputFormat::Table => render::print_profiles(&console.profiles),
    }
    Ok(())
}

/// List active scheduled jobs.
pub fn run_schedules(format: OutputFormat) -> Result<()> {
    let mut console = build_console(&config::load());
    console.refresh_schedules();

    match (format, console.schedules.jobs()) {
        (_, JobList::Failed(message)) => bail!("{message}"),
        (OutputFormat::Json, JobList::Jobs(jobs)) => {
            println!("{}", serde_json::to_string_pretty(jobs)?);
        }
        (OutputFormat::Json, _) => println!("[]"),
        (OutputFormat::Table, jobs) => render::print_jobs(jobs),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// pela activity
// ---------------------------------------------------------------------------

/// Show the local log of backend calls.
pub fn run_activity(days: Option<u32>, format: OutputFormat) -> Result<()> {
    let config = config::load();
    let log = ActivityLog::from_config(&config.logging);
    let entries = log.read_since_days(days);

    if entries.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Table => println!(
                "{}",
                "No activity recorded yet. Backend calls are logged as they happen.".yellow()
            ),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Table => render::print_activity_table(&entries),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// pela config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective pela Configuration".bold().cyan());
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
    print_source(global_exists, "~/.pela/config.toml");
    print_source(project_exists, ".pela.toml");
    println!("  {} {}", "·".dimmed(), "PELA_* environment variables".dimmed());

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.pela/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point pela at your backend.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
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
// Tests
// ---------------------------------------------------------------------------
