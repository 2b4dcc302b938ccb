/// Configuration schema and defaults for the pela console.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[backend]`, `[logging]` and `[forms]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

use crate::session::form::{DEFAULT_DIRECT_SEARCH_PATH, DEFAULT_TUNNEL_SEARCH_PATH};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level pela configuration.
///
/// Maps directly to the `~/.pela/config.toml` and `.pela.toml` file schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PelaConfig {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    pub forms: FormsConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the analysis backend lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the seven endpoints are resolved against.
    pub url: String,
    /// Transport timeout per request (milliseconds).
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 120_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Activity log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append one line per backend call to `~/.pela/activity.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// [forms]
// ---------------------------------------------------------------------------

/// Initial values of the connection forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    pub direct_search_path: String,
    pub tunnel_search_path: String,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            direct_search_path: DEFAULT_DIRECT_SEARCH_PATH.to_string(),
            tunnel_search_path: DEFAULT_TUNNEL_SEARCH_PATH.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl PelaConfig {
    /// The annotated TOML written by `pela config init`.
    pub fn default_toml() -> String {
        let defaults = Self::default();
        format!(
            r#"# pela configuration
#
# Layering: built-in defaults -> ~/.pela/config.toml -> ./.pela.toml -> PELA_* env vars

[backend]
# Base URL of the analysis backend (env: PELA_BACKEND_URL)
url = "{url}"
# Per-request transport timeout in milliseconds (env: PELA_TIMEOUT_MS)
timeout_ms = {timeout}

[logging]
# Record every backend call in ~/.pela/activity.jsonl (env: PELA_LOGGING)
enabled = {logging}

[forms]
# Initial search directories for file discovery
direct_search_path = "{direct}"
tunnel_search_path = "{tunnel}"
"#,
            url = defaults.backend.url,
            timeout = defaults.backend.timeout_ms,
            logging = defaults.logging.enabled,
            direct = defaults.forms.direct_search_path,
            tunnel = defaults.forms.tunnel_search_path,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
