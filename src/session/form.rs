//! Per-mode connection forms and the discovered-file selection list.
//!
//! Field values are stored exactly as typed. Consumers read them through
//! the trimming accessors; an empty trimmed value counts as absent.

/// Placeholder option shown at the top of the file selection list.
pub const FILE_PLACEHOLDER: &str = "-- Select a Log File --";

/// Search directory applied when a direct-mode profile carries no path.
pub const DEFAULT_DIRECT_SEARCH_PATH: &str = "/var/log/postgresql/";

/// Search directory applied when a tunnel-mode profile carries no path.
pub const DEFAULT_TUNNEL_SEARCH_PATH: &str = "/tmp/";

/// Trim a raw input value, mapping blank input to `None`.
pub fn present(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// ---------------------------------------------------------------------------
// File selection
// ---------------------------------------------------------------------------

/// The selectable list of discovered log files.
///
/// Index 0 is always the placeholder; it is not stored in `files`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelect {
    files: Vec<String>,
    selected: Option<usize>,
    visible: bool,
}

impl FileSelect {
    /// Reset to the placeholder and add one option per non-blank entry,
    /// trimmed. Returns the number of options added.
    ///
    /// The list becomes visible only when at least one option was added.
    pub fn replace<I, S>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.files = entries
            .into_iter()
            .filter_map(|entry| present(entry.as_ref()).map(str::to_string))
            .collect();
        self.selected = None;
        if !self.files.is_empty() {
            self.visible = true;
        }
        self.files.len()
    }

    /// Option labels as displayed, placeholder first.
    pub fn options(&self) -> Vec<&str> {
        std::iter::once(FILE_PLACEHOLDER)
            .chain(self.files.iter().map(String::as_str))
            .collect()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Select a file by its exact name. Returns `false` if it is not listed.
    pub fn select(&mut self, name: &str) -> bool {
        match self.files.iter().position(|f| f == name.trim()) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Select by 1-based position among the discovered files.
    pub fn select_nth(&mut self, position: usize) -> bool {
        if position == 0 || position > self.files.len() {
            return false;
        }
        self.selected = Some(position - 1);
        true
    }

    /// Return to the placeholder option.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The currently selected file, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.files.get(index))
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Inputs of the direct (single-hop) SSH section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectForm {
    pub server_ip: String,
    pub username: String,
    pub password: String,
    pub search_dir: String,
    pub log_select: FileSelect,
}

/// Inputs of the jump-host tunnel section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunnelForm {
    pub jump_host: String,
    pub server_ip: String,
    pub username: String,
    pub env_name: String,
    pub password: String,
    pub search_dir: String,
    pub log_select: FileSelect,
}

/// A borrowed view of whichever form belongs to the active mode.
#[derive(Debug, Clone, Copy)]
pub enum ActiveForm<'a> {
    Direct(&'a DirectForm),
    Tunnel(&'a TunnelForm),
}

impl<'a> ActiveForm<'a> {
    pub fn server_ip(&self) -> Option<&'a str> {
        match *self {
            Self::Direct(form) => present(&form.server_ip),
            Self::Tunnel(form) => present(&form.server_ip),
        }
    }

    pub fn username(&self) -> Option<&'a str> {
        match *self {
            Self::Direct(form) => present(&form.username),
            Self::Tunnel(form) => present(&form.username),
        }
    }

    pub fn password(&self) -> Option<&'a str> {
        match *self {
            Self::Direct(form) => present(&form.password),
            Self::Tunnel(form) => present(&form.password),
        }
    }

    pub fn search_dir(&self) -> Option<&'a str> {
        match *self {
            Self::Direct(form) => present(&form.search_dir),
            Self::Tunnel(form) => present(&form.search_dir),
        }
    }

    pub fn log_select(&self) -> &'a FileSelect {
        match *self {
            Self::Direct(form) => &form.log_select,
            Self::Tunnel(form) => &form.log_select,
        }
    }

    pub fn selected_file(&self) -> Option<&'a str> {
        self.log_select().selected()
    }

    /// Schedule log path: a selected file wins over the search directory.
    pub fn resolved_log_path(&self) -> Option<&'a str> {
        self.selected_file().or_else(|| self.search_dir())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
