use serde::{Deserialize, Deserializer, Serialize};

use crate::session::ConnectionMode;

/// Backend endpoint paths.
pub mod endpoints {
    pub const LIST_FILES: &str = "/list-files";
    pub const RUN_ANALYSIS: &str = "/run-analysis";
    pub const HISTORY: &str = "/history";
    pub const PROFILES: &str = "/profiles";
    pub const SCHEDULE: &str = "/schedule";
    pub const SETTINGS: &str = "/settings";
    pub const DASHBOARD_STATS: &str = "/dashboard-stats";
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// `POST /list-files` success body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    pub files: Vec<String>,
}

/// `POST /run-analysis` success body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub report_url: String,
}

/// One audit-log row from `GET /history`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub server_ip: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub connection_mode: String,
    #[serde(default)]
    pub report_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryBody {
    #[serde(default)]
    pub data: Vec<HistoryRecord>,
}

/// A saved, password-free connection profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub profile_name: String,
    pub connection_mode: ConnectionMode,
    #[serde(default)]
    pub server_ip: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub jump_host: Option<String>,
    #[serde(default)]
    pub env_name: Option<String>,
    #[serde(default)]
    pub log_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfilesBody {
    #[serde(default)]
    pub data: Vec<Profile>,
}

/// An active recurring job from `GET /schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScheduledJob {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub next_run: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchedulesBody {
    #[serde(default)]
    pub jobs: Vec<ScheduledJob>,
}

/// Process-wide backend settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Body of mutating calls that only report a message.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Aggregates from `GET /dashboard-stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub daily_activity: Vec<DailyCount>,
    #[serde(default)]
    pub top_servers: Vec<ServerCount>,
    #[serde(default)]
    pub conn_modes: Vec<ModeCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerCount {
    pub server_ip: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModeCount {
    pub connection_mode: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /settings`.
#[derive(Debug, Serialize)]
pub(crate) struct SettingsUpdate<'a> {
    pub webhook_url: &'a str,
}

/// Identifiers come back as integers from SQLite-backed tables and as
/// strings from the scheduler; both are kept as text.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
