/// Request payload builder.
///
/// Turns the active form into a validated, typed request for one target
/// operation. A builder either returns a complete request or a
/// [`ValidationError`]; callers send nothing in the error case.
///
/// # Simulation bypass
///
/// A direct-mode server address equal to [`SIMULATION_SERVER_TOKEN`] (any
/// case) together with a username yields [`ConnectionConfig::Simulated`].
/// Analysis and schedule requests built from it need neither a password nor
/// a selected file, and their log path is forced to [`SIMULATION_LOG_PATH`].
/// File discovery never takes the bypass.
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::session::form::present;
use crate::session::{ActiveForm, ConnectionMode};

/// Server address that selects the simulation bypass.
pub const SIMULATION_SERVER_TOKEN: &str = "TEST";

/// Log path sent for every simulated run.
pub const SIMULATION_LOG_PATH: &str = "/var/log/postgresql/simulation.log";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A required input is missing or malformed. Raised before any request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please list files and select a log file first.")]
    NoLogFileSelected,
    #[error("Please fill all required connection fields (missing: {}).", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Please set hour and minute.")]
    MissingScheduleTime,
    #[error("Hour must be between 0 and 23 and minute between 0 and 59.")]
    InvalidScheduleTime,
    #[error("Please enter a profile name.")]
    MissingProfileName,
    #[error("Please enter a Webhook URL.")]
    MissingWebhookUrl,
    #[error("Switch to direct or tunnel mode first.")]
    NoConnectionMode,
}

// ---------------------------------------------------------------------------
// Connection config
// ---------------------------------------------------------------------------

/// The connection half of a request, tagged by the mode it was built in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionConfig {
    Direct {
        server_ip: String,
        username: String,
        password: String,
    },
    Tunnel {
        jump_host: String,
        server_ip: String,
        username: String,
        env_name: String,
        password: String,
    },
    /// The simulation bypass. Travels as a direct connection to the token host.
    Simulated {
        username: String,
        password: Option<String>,
    },
}

impl ConnectionConfig {
    pub fn mode(&self) -> ConnectionMode {
        match self {
            Self::Direct { .. } | Self::Simulated { .. } => ConnectionMode::Direct,
            Self::Tunnel { .. } => ConnectionMode::Tunnel,
        }
    }

    pub fn server_ip(&self) -> &str {
        match self {
            Self::Direct { server_ip, .. } | Self::Tunnel { server_ip, .. } => server_ip,
            Self::Simulated { .. } => SIMULATION_SERVER_TOKEN,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated { .. })
    }

    fn wire(&self) -> WireConnection<'_> {
        match self {
            Self::Direct {
                server_ip,
                username,
                password,
            } => WireConnection {
                connection_mode: ConnectionMode::Direct,
                server_ip,
                username,
                password: Some(password),
                jump_host: None,
                env_name: None,
            },
            Self::Tunnel {
                jump_host,
                server_ip,
                username,
                env_name,
                password,
            } => WireConnection {
                connection_mode: ConnectionMode::Tunnel,
                server_ip,
                username,
                password: Some(password),
                jump_host: Some(jump_host),
                env_name: Some(env_name),
            },
            Self::Simulated { username, password } => WireConnection {
                connection_mode: ConnectionMode::Direct,
                server_ip: SIMULATION_SERVER_TOKEN,
                username,
                password: password.as_deref(),
                jump_host: None,
                env_name: None,
            },
        }
    }
}

/// Flat JSON shape of a connection, as the backend reads it.
#[derive(Serialize)]
struct WireConnection<'a> {
    connection_mode: ConnectionMode,
    server_ip: &'a str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jump_host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    env_name: Option<&'a str>,
}

impl Serialize for ConnectionConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.wire().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /list-files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListFilesRequest {
    #[serde(flatten)]
    pub connection: ConnectionConfig,
    pub search_path: String,
}

/// Body of `POST /run-analysis`. Built fresh for each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub connection: ConnectionConfig,
    pub log_path: String,
}

/// Body of `POST /schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRequest {
    #[serde(flatten)]
    pub connection: ConnectionConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
    pub hour: u8,
    pub minute: u8,
}

/// Body of `POST /profiles`. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDraft {
    pub profile_name: String,
    pub connection_mode: ConnectionMode,
    pub server_ip: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// The operation a payload is built for. Each has its own required set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListFiles,
    RunAnalysis,
    Schedule,
}

/// Build the discovery request. Requires the full connection set of the
/// mode plus a search directory; the simulation bypass does not apply.
pub fn build_list_files(form: ActiveForm<'_>) -> Result<ListFilesRequest, ValidationError> {
    let connection = connection_for(form, Operation::ListFiles)?;
    let search_path = form
        .search_dir()
        .ok_or(ValidationError::MissingFields(vec!["search directory"]))?;

    Ok(ListFilesRequest {
        connection,
        search_path: search_path.to_string(),
    })
}

/// Build the run-analysis request.
///
/// Only a discovered, selected file is a valid log path; the search
/// directory is never sent. A missing selection is reported ahead of
/// missing connection fields.
pub fn build_analysis(form: ActiveForm<'_>) -> Result<AnalysisRequest, ValidationError> {
    if let Some(connection) = simulated(form) {
        return Ok(AnalysisRequest {
            connection,
            log_path: SIMULATION_LOG_PATH.to_string(),
        });
    }

    let log_path = form
        .selected_file()
        .ok_or(ValidationError::NoLogFileSelected)?;
    let connection = connection_for(form, Operation::RunAnalysis)?;

    Ok(AnalysisRequest {
        connection,
        log_path: log_path.to_string(),
    })
}

/// Build a schedule request from the active form and a time of day.
pub fn build_schedule(
    form: ActiveForm<'_>,
    hour: &str,
    minute: &str,
) -> Result<ScheduleRequest, ValidationError> {
    let (hour, minute) = parse_time_of_day(hour, minute)?;

    if let Some(connection) = simulated(form) {
        return Ok(ScheduleRequest {
            connection,
            log_path: Some(SIMULATION_LOG_PATH.to_string()),
            hour,
            minute,
        });
    }

    let connection = connection_for(form, Operation::Schedule)?;
    Ok(ScheduleRequest {
        connection,
        log_path: form.resolved_log_path().map(str::to_string),
        hour,
        minute,
    })
}

/// A profile needs at least a server address.
pub fn profile_server<'a>(form: ActiveForm<'a>) -> Result<&'a str, ValidationError> {
    form.server_ip()
        .ok_or(ValidationError::MissingFields(vec!["server IP"]))
}

/// Build a profile snapshot of the active form's non-secret fields.
///
/// The search directory is what gets stored as the profile's path.
pub fn build_profile(form: ActiveForm<'_>, name: &str) -> Result<ProfileDraft, ValidationError> {
    let profile_name = present(name).ok_or(ValidationError::MissingProfileName)?;
    let server_ip = profile_server(form)?;

    let (jump_host, env_name) = match form {
        ActiveForm::Direct(_) => (None, None),
        ActiveForm::Tunnel(tunnel) => (
            present(&tunnel.jump_host).map(str::to_string),
            present(&tunnel.env_name).map(str::to_string),
        ),
    };

    Ok(ProfileDraft {
        profile_name: profile_name.to_string(),
        connection_mode: mode_of(form),
        server_ip: server_ip.to_string(),
        username: form.username().unwrap_or_default().to_string(),
        jump_host,
        env_name,
        log_path: form.search_dir().map(str::to_string),
    })
}

/// Validate a webhook URL for the settings endpoint.
pub fn build_webhook_url(raw: &str) -> Result<String, ValidationError> {
    present(raw)
        .map(str::to_string)
        .ok_or(ValidationError::MissingWebhookUrl)
}

/// Parse and range-check an hour/minute pair.
pub fn parse_time_of_day(hour: &str, minute: &str) -> Result<(u8, u8), ValidationError> {
    let (Some(hour), Some(minute)) = (present(hour), present(minute)) else {
        return Err(ValidationError::MissingScheduleTime);
    };

    let hour: u8 = hour
        .parse()
        .map_err(|_| ValidationError::InvalidScheduleTime)?;
    let minute: u8 = minute
        .parse()
        .map_err(|_| ValidationError::InvalidScheduleTime)?;

    if hour > 23 || minute > 59 {
        return Err(ValidationError::InvalidScheduleTime);
    }
    Ok((hour, minute))
}

// -- Internal --

fn mode_of(form: ActiveForm<'_>) -> ConnectionMode {
    match form {
        ActiveForm::Direct(_) => ConnectionMode::Direct,
        ActiveForm::Tunnel(_) => ConnectionMode::Tunnel,
    }
}

/// The simulated connection, if the direct form requests the bypass.
fn simulated(form: ActiveForm<'_>) -> Option<ConnectionConfig> {
    let ActiveForm::Direct(direct) = form else {
        return None;
    };
    let server_ip = present(&direct.server_ip)?;
    if !server_ip.eq_ignore_ascii_case(SIMULATION_SERVER_TOKEN) {
        return None;
    }
    let username = present(&direct.username)?;

    Some(ConnectionConfig::Simulated {
        username: username.to_string(),
        password: present(&direct.password).map(str::to_string),
    })
}

/// Check the required set for `operation` and build the connection.
fn connection_for(
    form: ActiveForm<'_>,
    operation: Operation,
) -> Result<ConnectionConfig, ValidationError> {
    let missing = missing_fields(form, operation);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let owned = |value: Option<&str>| value.unwrap_or_default().to_string();

    Ok(match form {
        ActiveForm::Direct(_) => ConnectionConfig::Direct {
            server_ip: owned(form.server_ip()),
            username: owned(form.username()),
            password: owned(form.password()),
        },
        ActiveForm::Tunnel(tunnel) => ConnectionConfig::Tunnel {
            jump_host: owned(present(&tunnel.jump_host)),
            server_ip: owned(form.server_ip()),
            username: owned(form.username()),
            env_name: owned(present(&tunnel.env_name)),
            password: owned(form.password()),
        },
    })
}

/// Names of the required connection fields that are blank.
fn missing_fields(form: ActiveForm<'_>, operation: Operation) -> Vec<&'static str> {
    let mut required: Vec<(&'static str, Option<&str>)> = Vec::new();

    if let ActiveForm::Tunnel(tunnel) = form
        && operation != Operation::Schedule
    {
        required.push(("jump host", present(&tunnel.jump_host)));
    }
    required.push(("server IP", form.server_ip()));
    if operation != Operation::Schedule {
        required.push(("username", form.username()));
    }
    if let ActiveForm::Tunnel(tunnel) = form
        && operation != Operation::Schedule
    {
        required.push(("environment", present(&tunnel.env_name)));
    }
    required.push(("password", form.password()));

    required
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
