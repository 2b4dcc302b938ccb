/// HTTP transport for the backend, using the synchronous `ureq` client.
///
/// One instance per console session. Requests block until the backend
/// answers or the transport timeout elapses; the orchestrator itself
/// defines no timeouts.
use std::time::Duration;

use crate::config::schema::BackendConfig;

use super::{HttpRequest, Method, Transport, TransportError};

/// `ureq`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport from the resolved backend config.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let url = format!("{}{}", self.base_url, path);
        // "localhost" may resolve to ::1 first while the backend binds IPv4 only.
        url.replace("://localhost", "://127.0.0.1")
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<String, TransportError> {
        let url = self.url(request.path);
        let mut call = match request.method {
            Method::Get => ureq::get(&url),
            Method::Post => ureq::post(&url),
            Method::Delete => ureq::delete(&url),
        }
        .timeout(self.timeout);

        for (key, value) in &request.query {
            call = call.query(key, value);
        }

        let result = match &request.body {
            Some(body) => call.send_json(body),
            None => call.call(),
        };

        match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| TransportError(format!("failed to read response body: {e}"))),
            // Error statuses still carry the backend's JSON; let the gateway judge it.
            Err(ureq::Error::Status(code, response)) => response
                .into_string()
                .map_err(|e| TransportError(format!("HTTP {code}: {e}"))),
            Err(ureq::Error::Transport(e)) => Err(TransportError(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
