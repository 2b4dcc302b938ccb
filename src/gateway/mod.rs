/// Request gateway for the seven backend endpoints.
///
/// Every call goes through [`Gateway::call`]: one outbound request via the
/// [`Transport`], one JSON body parsed, and the `success` discriminator
/// checked. There is no retry. A failure is either
/// [`RequestError::Server`] (the backend answered `success: false`) or
/// [`RequestError::Transport`] (no usable answer at all).
///
/// Callers that disable a control around a call do so with
/// [`Control::busy`](crate::ui::Control::busy), which restores it on every
/// exit path.
pub mod http;
pub mod protocol;

use std::fmt;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::activity::{ActivityLog, Outcome};
use crate::payload::{AnalysisRequest, ListFilesRequest, ProfileDraft, ScheduleRequest};

pub use http::HttpTransport;
pub use protocol::{
    AnalysisReport, DailyCount, DashboardStats, HistoryRecord, ModeCount, Profile, ScheduledJob,
    ServerCount, Settings,
};

use protocol::{
    HistoryBody, MessageBody, ProfilesBody, SchedulesBody, SettingsUpdate, endpoints,
};

/// Message used when the backend reports failure without saying why.
pub const GENERIC_FAILURE: &str = "Request failed.";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to get any response body from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// How a gateway call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The backend answered with `success: false`.
    #[error("{0}")]
    Server(String),
    /// Network failure, or a body that could not be understood.
    #[error("network error: {0}")]
    Transport(String),
}

impl RequestError {
    fn outcome(&self) -> Outcome {
        match self {
            Self::Server(_) => Outcome::ServerError,
            Self::Transport(_) => Outcome::TransportError,
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::Server(message) | Self::Transport(message) => message,
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One outbound request, independent of the HTTP client in use.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: Method::Get,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: &'static str, body: Value) -> Self {
        Self {
            method: Method::Post,
            path,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: &'static str, id: &str) -> Self {
        Self {
            method: Method::Delete,
            path,
            query: vec![("id", id.to_string())],
            body: None,
        }
    }
}

/// Sends a request and returns the raw response body.
///
/// Implementations return the body for any status that carries one, so a
/// server-supplied error message is not lost behind an HTTP status.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<String, TransportError>;
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Typed access to the backend over some [`Transport`].
#[derive(Debug)]
pub struct Gateway<T> {
    transport: T,
    activity: ActivityLog,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            activity: ActivityLog::disabled(),
        }
    }

    pub fn with_activity_log(mut self, activity: ActivityLog) -> Self {
        self.activity = activity;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `POST /list-files`: candidate log files in the search directory.
    pub fn list_files(&self, request: &ListFilesRequest) -> Result<Vec<String>, RequestError> {
        let body = to_body(request)?;
        let listing: protocol::FileListing =
            self.call(HttpRequest::post(endpoints::LIST_FILES, body))?;
        Ok(listing.files)
    }

    /// `POST /run-analysis`: pull the log and produce a report.
    pub fn run_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisReport, RequestError> {
        let body = to_body(request)?;
        self.call(HttpRequest::post(endpoints::RUN_ANALYSIS, body))
    }

    /// `GET /history`: past runs, in backend order.
    pub fn history(&self) -> Result<Vec<HistoryRecord>, RequestError> {
        let body: HistoryBody = self.call(HttpRequest::get(endpoints::HISTORY))?;
        Ok(body.data)
    }

    /// `GET /profiles`.
    pub fn profiles(&self) -> Result<Vec<Profile>, RequestError> {
        let body: ProfilesBody = self.call(HttpRequest::get(endpoints::PROFILES))?;
        Ok(body.data)
    }

    /// `POST /profiles`: create or replace a profile by name.
    pub fn save_profile(&self, draft: &ProfileDraft) -> Result<String, RequestError> {
        let body = to_body(draft)?;
        self.message_call(HttpRequest::post(endpoints::PROFILES, body))
    }

    /// `DELETE /profiles?id=...`.
    pub fn delete_profile(&self, id: &str) -> Result<String, RequestError> {
        self.message_call(HttpRequest::delete(endpoints::PROFILES, id))
    }

    /// `GET /schedule`: active recurring jobs.
    pub fn schedules(&self) -> Result<Vec<ScheduledJob>, RequestError> {
        let body: SchedulesBody = self.call(HttpRequest::get(endpoints::SCHEDULE))?;
        Ok(body.jobs)
    }

    /// `POST /schedule`.
    pub fn create_schedule(&self, request: &ScheduleRequest) -> Result<String, RequestError> {
        let body = to_body(request)?;
        self.message_call(HttpRequest::post(endpoints::SCHEDULE, body))
    }

    /// `DELETE /schedule?id=...`.
    pub fn delete_schedule(&self, id: &str) -> Result<String, RequestError> {
        self.message_call(HttpRequest::delete(endpoints::SCHEDULE, id))
    }

    /// `GET /settings`.
    pub fn settings(&self) -> Result<Settings, RequestError> {
        self.call(HttpRequest::get(endpoints::SETTINGS))
    }

    /// `POST /settings`: overwrite the webhook URL.
    pub fn save_settings(&self, webhook_url: &str) -> Result<String, RequestError> {
        let body = to_body(&SettingsUpdate { webhook_url })?;
        self.message_call(HttpRequest::post(endpoints::SETTINGS, body))
    }

    /// `GET /dashboard-stats`.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, RequestError> {
        self.call(HttpRequest::get(endpoints::DASHBOARD_STATS))
    }

    // -- Internal --

    /// Issue one request, decode it, and record the outcome.
    fn call<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, RequestError> {
        let start = Instant::now();
        let result = self
            .transport
            .send(&request)
            .map_err(|e| RequestError::Transport(e.0))
            .and_then(|body| decode(&body));

        let (outcome, message) = match &result {
            Ok(_) => (Outcome::Ok, None),
            Err(e) => (e.outcome(), Some(e.detail())),
        };
        self.activity.record(
            &request.method.to_string(),
            request.path,
            outcome,
            start.elapsed(),
            message,
        );

        result
    }

    fn message_call(&self, request: HttpRequest) -> Result<String, RequestError> {
        let body: MessageBody = self.call(request)?;
        Ok(body.message.unwrap_or_default())
    }
}

fn to_body<S: serde::Serialize>(payload: &S) -> Result<Value, RequestError> {
    serde_json::to_value(payload)
        .map_err(|e| RequestError::Transport(format!("failed to encode request: {e}")))
}

/// Parse a response body and apply the `success` discriminator.
///
/// A body without a `success` key counts as successful.
pub fn decode<R: DeserializeOwned>(body: &str) -> Result<R, RequestError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| RequestError::Transport(format!("malformed response: {e}")))?;

    match value.get("success") {
        None | Some(Value::Bool(true)) => {}
        Some(Value::Bool(false)) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(GENERIC_FAILURE);
            return Err(RequestError::Server(message.to_string()));
        }
        Some(other) => {
            return Err(RequestError::Transport(format!(
                "malformed response: success is {other}"
            )));
        }
    }

    serde_json::from_value(value)
        .map_err(|e| RequestError::Transport(format!("unexpected response shape: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
