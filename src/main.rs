use anyhow::Result;
use clap::{Parser, Subcommand};

use pela::cli;

#[derive(Debug, Parser)]
#[command(name = "pela")]
#[command(about = "Terminal console for the remote log-analysis backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive console: connection forms, file discovery, analysis runs
    Shell,
    /// Show the analysis audit history
    History {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Draw the statistics dashboard
    Dashboard,
    /// Show the notification webhook, or store a new one
    Settings {
        /// Webhook URL to store
        #[arg(long)]
        webhook: Option<String>,
    },
    /// List saved connection profiles
    Profiles {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List active scheduled jobs
    Schedules {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the local log of backend calls
    Activity {
        /// Only include the last N days
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration (show, init, set, reset)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Create a default config file at ~/.pela/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a configuration value (e.g. backend.url http://10.0.0.2:5000)
    Set {
        /// Dotted key path
        key: String,
        /// Value to assign
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Shell => cli::shell::run_shell(),
        Commands::History { format } => {
            cli::run_history(cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Dashboard => cli::run_dashboard(),
        Commands::Settings { webhook } => cli::run_settings(webhook.as_deref()),
        Commands::Profiles { format } => {
            cli::run_profiles(cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Schedules { format } => {
            cli::run_schedules(cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Activity { days, format } => {
            cli::run_activity(days, cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
