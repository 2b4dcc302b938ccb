//! Text rendering of console state for the terminal.
//!
//! Every function here prints; none of them touch the backend.

use colored::Colorize;

use crate::activity::{ActivityEntry, Outcome};
use crate::console::analysis::StatusBanner;
use crate::console::history::HistoryTable;
use crate::console::profiles::ProfileController;
use crate::console::schedule::{JobList, NO_SCHEDULES};
use crate::gateway::HistoryRecord;
use crate::session::form::FileSelect;
use crate::session::{ConnectionMode, Session, Surface};

// ---------------------------------------------------------------------------
// Status banner
// ---------------------------------------------------------------------------

pub fn print_banner(banner: &StatusBanner) {
    match banner {
        StatusBanner::Hidden => {}
        StatusBanner::Success {
            message,
            report_url,
        } => {
            println!("{} {}", "✓".green().bold(), message);
            println!("  {} {}", "View Report:".bold(), report_url.underline());
        }
        StatusBanner::Error { message } => {
            println!("{} {}", "✗".red().bold(), message.red());
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

pub fn print_history(table: &HistoryTable) {
    println!("{}", "Analysis History".bold().cyan());
    println!("{}", "=".repeat(78));

    let rows = match table {
        HistoryTable::Rows(rows) => rows,
        other => {
            if let Some(text) = other.placeholder() {
                println!("  {}", text.dimmed());
            }
            return;
        }
    };

    println!(
        "  {:<20} {:<16} {:<12} {:<7} Report",
        "Time", "Server", "User", "Mode"
    );
    println!("  {}", "-".repeat(76));
    for (i, record) in rows.iter().enumerate() {
        let line = history_line(record);
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn history_line(record: &HistoryRecord) -> String {
    format!(
        "  {:<20} {:<16} {:<12} {:<7} {}",
        truncate(&record.timestamp, 20),
        truncate(&record.server_ip, 16),
        truncate(&record.username, 12),
        record.connection_mode.to_uppercase(),
        record.report_url,
    )
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

pub fn print_jobs(jobs: &JobList) {
    println!("{}", "Scheduled Jobs".bold().cyan());
    match jobs {
        JobList::NotLoaded => println!("  {}", "not loaded".dimmed()),
        JobList::Empty => println!("  {}", NO_SCHEDULES.dimmed()),
        JobList::Failed(message) => println!("  {}", message.red()),
        JobList::Jobs(jobs) => {
            for job in jobs {
                println!(
                    "  {:<10} {:<40} {} {}",
                    job.id.bold(),
                    truncate(&job.target, 40),
                    "next:".dimmed(),
                    job.next_run,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

pub fn print_profiles(profiles: &ProfileController) {
    println!("{}", "Saved Profiles".bold().cyan());
    if profiles.profiles().is_empty() {
        println!("  {}", "none".dimmed());
        return;
    }
    let selected = profiles.selected().map(|p| p.id.as_str());
    for profile in profiles.profiles() {
        let marker = if selected == Some(profile.id.as_str()) {
            "›".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "{} {:<24} {:<7} {}",
            marker,
            truncate(&profile.profile_name, 24),
            profile.connection_mode.to_string().to_uppercase(),
            profile.server_ip,
        );
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

pub fn print_files(select: &FileSelect) {
    if !select.is_visible() {
        println!("  {}", "no files listed yet".dimmed());
        return;
    }
    let chosen = select.selected();
    for (i, option) in select.options().iter().enumerate() {
        if i == 0 {
            let marker = if chosen.is_none() { "›" } else { " " };
            println!("{} {}", marker.green().bold(), option.dimmed());
            continue;
        }
        let marker = if chosen == Some(*option) { "›" } else { " " };
        println!("{} {:>3}. {}", marker.green().bold(), i, option);
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub fn print_session(session: &Session) {
    let tabs: Vec<String> = Surface::ALL
        .iter()
        .map(|s| {
            let name = s.to_string();
            if *s == session.highlighted() {
                format!("[{name}]").bold().green().to_string()
            } else {
                name.dimmed().to_string()
            }
        })
        .collect();
    println!("{}", tabs.join("  "));

    let Some(mode) = session.mode() else {
        println!("  {}", "dashboard view".dimmed());
        return;
    };

    match mode {
        ConnectionMode::Direct => {
            let form = &session.direct;
            print_field("ip", &form.server_ip);
            print_field("user", &form.username);
            print_field("password", &mask(&form.password));
            print_field("search", &form.search_dir);
        }
        ConnectionMode::Tunnel => {
            let form = &session.tunnel;
            print_field("jump", &form.jump_host);
            print_field("ip", &form.server_ip);
            print_field("user", &form.username);
            print_field("env", &form.env_name);
            print_field("password", &mask(&form.password));
            print_field("search", &form.search_dir);
        }
    }

    let form = session.form(mode);
    if let Some(file) = form.selected_file() {
        print_field("file", file);
    }
    println!(
        "  {} {}",
        "action:".dimmed(),
        session.primary_action().label()
    );
}

fn print_field(name: &str, value: &str) {
    let shown = if value.is_empty() {
        "(empty)".dimmed().to_string()
    } else {
        value.to_string()
    };
    println!("  {:<10} {}", format!("{name}:").bold(), shown);
}

fn mask(password: &str) -> String {
    "*".repeat(password.chars().count())
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

pub fn print_activity_table(entries: &[ActivityEntry]) {
    println!("{}", "Backend Activity".bold().cyan());
    println!("{}", "=".repeat(70));
    println!(
        "  {:<20} {:<7} {:<18} {:<16} {:>8}",
        "Time", "Method", "Endpoint", "Outcome", "Latency"
    );
    println!("  {}", "-".repeat(68));
    for entry in entries {
        println!(
            "  {:<20} {:<7} {:<18} {:<16} {:>6}ms",
            truncate(&entry.timestamp, 20),
            entry.method,
            truncate(&entry.endpoint, 18),
            colorize_outcome(entry.outcome),
            entry.latency_ms,
        );
    }
}

fn colorize_outcome(outcome: Outcome) -> colored::ColoredString {
    let text = format!("{:<16}", outcome.to_string());
    match outcome {
        Outcome::Ok => text.green(),
        Outcome::ServerError => text.yellow(),
        Outcome::TransportError => text.red(),
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
