//! Activity log: one JSONL line per backend call.
//!
//! Log file: `~/.pela/activity.jsonl`
//!
//! Records which endpoint was called, how the call ended and how long it
//! took. Request bodies are never written, so credentials stay out of the
//! file. Writing is best-effort; failures are silently ignored and never
//! affect the action that triggered the call.

use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// How a backend call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    ServerError,
    TransportError,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::ServerError => write!(f, "server_error"),
            Self::TransportError => write!(f, "transport_error"),
        }
    }
}

/// A single entry in `~/.pela/activity.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub method: String,
    pub endpoint: String,
    pub outcome: Outcome,
    pub latency_ms: u64,
    /// Server-supplied or transport error message, for failed calls.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Where (and whether) activity is recorded.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    path: Option<PathBuf>,
}

impl ActivityLog {
    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// A log appending to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The default log location, unless logging is switched off.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: activity_log_path(),
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Append one entry for a finished call.
    pub fn record(
        &self,
        method: &str,
        endpoint: &str,
        outcome: Outcome,
        latency: Duration,
        message: Option<&str>,
    ) {
        let entry = ActivityEntry {
            timestamp: Utc::now().to_rfc3339(),
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            outcome,
            latency_ms: latency.as_millis() as u64,
            message: message.map(str::to_string),
        };
        let _ = self.append(&entry);
    }

    /// Read all entries. Malformed lines are skipped; a missing file reads
    /// as empty.
    pub fn read_all(&self) -> Vec<ActivityEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<ActivityEntry>(&line).ok())
            .collect()
    }

    /// Read entries from the last N days, or all of them if `days` is `None`.
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<ActivityEntry> {
        let entries = self.read_all();

        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();
        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }

    fn append(&self, entry: &ActivityEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

/// Path to the default activity log file.
pub fn activity_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pela").join("activity.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
