//! Interactive shell: one console session driven by typed commands.
//!
//! Each line is one user interaction. Arguments are whitespace separated;
//! double quotes keep spaces inside a single argument.

use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use anyhow::Result;
use colored::Colorize;
use regex::Regex;

use super::{TerminalConsole, build_console, render};
use crate::config;
use crate::console::analysis::AnalysisOutcome;
use crate::console::discovery::DiscoveryOutcome;
use crate::session::Surface;

/// A double-quoted argument or a run of non-space characters.
static TOKEN_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).ok());

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Which file to pick from the discovered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChoice {
    /// 1-based position in the list.
    Nth(usize),
    Name(String),
    /// Back to the placeholder.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Mode(Surface),
    Set { field: String, value: String },
    Files,
    Select(FileChoice),
    Run,
    History,
    Dashboard,
    Profiles,
    ProfileSave,
    ProfileLoad(String),
    ProfileDelete(Option<String>),
    Schedules,
    Schedule { hour: String, minute: String },
    Unschedule(String),
    Webhook(Option<String>),
    Show,
    Help,
    Quit,
}

/// Split a line into arguments, honoring double quotes.
pub fn tokenize(line: &str) -> Vec<String> {
    let Some(re) = TOKEN_RE.as_ref() else {
        return line.split_whitespace().map(str::to_string).collect();
    };
    re.captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse one tokenized line. Errors carry a usage hint.
pub fn parse(args: &[String]) -> Result<ShellCommand, String> {
    let words: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        ["mode", surface] => ShellCommand::Mode(surface.parse()?),
        ["set", field, value] => ShellCommand::Set {
            field: field.to_string(),
            value: value.to_string(),
        },
        ["set", field] => ShellCommand::Set {
            field: field.to_string(),
            value: String::new(),
        },
        ["files"] => ShellCommand::Files,
        ["select", "none"] => ShellCommand::Select(FileChoice::Clear),
        ["select", choice] => match choice.parse::<usize>() {
            Ok(n) => ShellCommand::Select(FileChoice::Nth(n)),
            Err(_) => ShellCommand::Select(FileChoice::Name(choice.to_string())),
        },
        ["run"] => ShellCommand::Run,
        ["history"] => ShellCommand::History,
        ["dashboard"] => ShellCommand::Dashboard,
        ["profiles"] => ShellCommand::Profiles,
        ["profile", "save"] => ShellCommand::ProfileSave,
        ["profile", "load", name] => ShellCommand::ProfileLoad(name.to_string()),
        ["profile", "delete"] => ShellCommand::ProfileDelete(None),
        ["profile", "delete", name] => ShellCommand::ProfileDelete(Some(name.to_string())),
        ["schedules"] => ShellCommand::Schedules,
        ["schedule", hour, minute] => ShellCommand::Schedule {
            hour: hour.to_string(),
            minute: minute.to_string(),
        },
        ["unschedule", id] => ShellCommand::Unschedule(id.to_string()),
        ["webhook"] => ShellCommand::Webhook(None),
        ["webhook", url] => ShellCommand::Webhook(Some(url.to_string())),
        ["show"] => ShellCommand::Show,
        ["help"] | ["?"] => ShellCommand::Help,
        ["quit"] | ["exit"] => ShellCommand::Quit,
        [name, ..] => return Err(format!("unknown or malformed command '{name}' (try 'help')")),
        [] => return Err("empty command".to_string()),
    };
    Ok(command)
}

// ---------------------------------------------------------------------------
// REPL
// ---------------------------------------------------------------------------

/// Run the interactive shell until `quit` or end of input.
pub fn run_shell() -> Result<()> {
    let config = config::load();
    let mut console = build_console(&config);

    println!("{}", "pela console".bold().cyan());
    println!(
        "  {} {}",
        "backend:".dimmed(),
        console.gateway().transport().base_url()
    );
    console.start();
    render::print_history(console.history.table());
    println!();
    render::print_jobs(console.schedules.jobs());
    println!();
    println!("{}", "Type 'help' for commands.".dimmed());

    let stdin = io::stdin();
    loop {
        print!("{} ", format!("pela[{}]>", console.session.surface()).bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let args = tokenize(&line);
        if args.is_empty() {
            continue;
        }
        match parse(&args) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(&mut console, command),
            Err(e) => println!("{} {}", "✗".red().bold(), e),
        }
    }
    Ok(())
}

/// Apply one command to the console and print what changed.
pub fn execute(console: &mut TerminalConsole, command: ShellCommand) {
    match command {
        ShellCommand::Mode(surface) => {
            console.switch_to(surface);
            if surface == Surface::Dashboard
                && let Some(error) = console.dashboard.error()
            {
                println!("{} {}", "✗".red().bold(), error);
            }
        }
        ShellCommand::Set { field, value } => {
            if let Err(e) = console.session.set_field(&field, &value) {
                println!("{} {}", "✗".red().bold(), e);
            }
        }
        ShellCommand::Files => {
            let outcome = console.discover();
            if let (DiscoveryOutcome::Listed(n), Some(mode)) = (outcome, console.session.mode())
                && n > 0
            {
                render::print_files(console.session.form(mode).log_select());
            }
        }
        ShellCommand::Select(choice) => select_file(console, choice),
        ShellCommand::Run => {
            let outcome = console.run_analysis();
            render::print_banner(console.analysis.banner());
            if matches!(outcome, AnalysisOutcome::Completed(_)) {
                println!();
                render::print_history(console.history.table());
            }
        }
        ShellCommand::History => {
            console.refresh_history();
            render::print_history(console.history.table());
        }
        ShellCommand::Dashboard => execute(console, ShellCommand::Mode(Surface::Dashboard)),
        ShellCommand::Profiles => {
            if let Err(e) = console.refresh_profiles() {
                println!("{} {}", "✗".red().bold(), e);
            }
            render::print_profiles(&console.profiles);
        }
        ShellCommand::ProfileSave => {
            console.save_profile();
        }
        ShellCommand::ProfileLoad(name) => {
            if console.load_profile(&name) {
                render::print_session(&console.session);
            } else {
                println!("{} no saved profile named '{}'", "✗".red().bold(), name);
            }
        }
        ShellCommand::ProfileDelete(name) => {
            if let Some(name) = name
                && !console.profiles.select(&name)
            {
                println!("{} no saved profile named '{}'", "✗".red().bold(), name);
                return;
            }
            console.delete_profile();
        }
        ShellCommand::Schedules => {
            console.refresh_schedules();
            render::print_jobs(console.schedules.jobs());
        }
        ShellCommand::Schedule { hour, minute } => {
            console.schedule(&hour, &minute);
            render::print_jobs(console.schedules.jobs());
        }
        ShellCommand::Unschedule(id) => {
            console.delete_schedule(&id);
            render::print_jobs(console.schedules.jobs());
        }
        ShellCommand::Webhook(None) => {
            let url = &console.settings.webhook_url;
            if url.is_empty() {
                println!("  {} {}", "Webhook URL:".bold(), "(not set)".dimmed());
            } else {
                println!("  {} {}", "Webhook URL:".bold(), url);
            }
        }
        ShellCommand::Webhook(Some(url)) => {
            console.settings.webhook_url = url;
            console.save_settings();
        }
        ShellCommand::Show => {
            render::print_session(&console.session);
            if let Some(mode) = console.session.mode() {
                render::print_files(console.session.form(mode).log_select());
            }
            render::print_banner(console.analysis.banner());
        }
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => {}
    }
}

fn select_file(console: &mut TerminalConsole, choice: FileChoice) {
    let Some(mode) = console.session.mode() else {
        println!("{} switch to direct or tunnel mode first", "✗".red().bold());
        return;
    };
    let select = console.session.file_select_mut(mode);
    let found = match choice {
        FileChoice::Nth(n) => select.select_nth(n),
        FileChoice::Name(name) => select.select(&name),
        FileChoice::Clear => {
            select.clear_selection();
            true
        }
    };
    if !found {
        println!("{} no such file in the list (run 'files')", "✗".red().bold());
    }
}

fn print_help() {
    let rows = [
        ("mode direct|tunnel|dashboard", "switch the active section"),
        ("set <field> <value>", "ip, user, password, search; tunnel: jump, env"),
        ("files", "list log files on the target host"),
        ("select <n|name|none>", "choose a discovered log file"),
        ("run", "start analysis"),
        ("history", "reload the audit history"),
        ("dashboard", "show statistics charts"),
        ("profiles", "list saved profiles"),
        ("profile save", "save the active form as a profile"),
        ("profile load <name>", "fill the form from a profile"),
        ("profile delete [name]", "delete the selected profile"),
        ("schedules", "list scheduled jobs"),
        ("schedule <hour> <minute>", "run the active form daily"),
        ("unschedule <id>", "stop a scheduled job"),
        ("webhook [url]", "show or save the notification webhook"),
        ("show", "print the session state"),
        ("quit", "leave the shell"),
    ];
    println!("{}", "Commands".bold().cyan());
    for (usage, what) in rows {
        println!("  {:<30} {}", usage.bold(), what.dimmed());
    }
}
