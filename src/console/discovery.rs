/// File discovery: list candidate log files on the remote host and fill the
/// active mode's file selection.
use crate::gateway::{Gateway, RequestError, Transport};
use crate::payload::{self, ValidationError};
use crate::session::{ConnectionMode, Session};
use crate::ui::{Control, Frontend};

pub const LIST_FILES_LABEL: &str = "List Files";
pub const SCANNING_LABEL: &str = "Scanning...";

/// How a discovery attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The control was busy or hidden; nothing happened.
    Ignored,
    Rejected(ValidationError),
    /// The list was replaced with this many files (zero is a valid result).
    Listed(usize),
    Failed(RequestError),
}

/// Owns the per-mode "List Files" controls.
#[derive(Debug, Clone)]
pub struct FileDiscoveryController {
    direct_button: Control,
    tunnel_button: Control,
}

impl Default for FileDiscoveryController {
    fn default() -> Self {
        Self {
            direct_button: Control::new(LIST_FILES_LABEL),
            tunnel_button: Control::new(LIST_FILES_LABEL),
        }
    }
}

impl FileDiscoveryController {
    pub fn button(&self, mode: ConnectionMode) -> &Control {
        match mode {
            ConnectionMode::Direct => &self.direct_button,
            ConnectionMode::Tunnel => &self.tunnel_button,
        }
    }

    fn button_mut(&mut self, mode: ConnectionMode) -> &mut Control {
        match mode {
            ConnectionMode::Direct => &mut self.direct_button,
            ConnectionMode::Tunnel => &mut self.tunnel_button,
        }
    }

    /// List files for `mode` and replace its selection list with the result.
    pub fn discover<T: Transport, F: Frontend>(
        &mut self,
        mode: ConnectionMode,
        session: &mut Session,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> DiscoveryOutcome {
        if !self.button(mode).accepts_activation() {
            return DiscoveryOutcome::Ignored;
        }

        let request = match payload::build_list_files(session.form(mode)) {
            Ok(request) => request,
            Err(e) => {
                frontend.alert(&format!("Connection Error: {e}"));
                return DiscoveryOutcome::Rejected(e);
            }
        };

        let result = {
            let _busy = self.button_mut(mode).busy(SCANNING_LABEL);
            gateway.list_files(&request)
        };

        match result {
            Ok(files) => {
                let added = session.file_select_mut(mode).replace(&files);
                if added == 0 {
                    frontend.alert("No files found in the specified directory.");
                }
                DiscoveryOutcome::Listed(added)
            }
            Err(e) => {
                match &e {
                    RequestError::Server(message) => {
                        frontend.alert(&format!("Error Listing Files: {message}"));
                    }
                    RequestError::Transport(_) => {
                        frontend.alert("Network Error while listing files.");
                    }
                }
                DiscoveryOutcome::Failed(e)
            }
        }
    }
}
