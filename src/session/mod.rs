/// Connection state store.
///
/// Holds the active [`Surface`] (one of the two connection modes, or the
/// presentational dashboard), the typed form of each connection mode, and
/// the section/selector/primary-action state that a surface switch updates.
///
/// Field access is resolved by matching on the mode, never by building
/// field identifiers from a mode prefix: see [`Session::active_form`].
pub mod form;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ui::Control;

pub use form::{ActiveForm, DirectForm, FileSelect, TunnelForm};

/// Default label of the primary action control.
pub const PRIMARY_ACTION_LABEL: &str = "Start Analysis";

// ---------------------------------------------------------------------------
// Modes and surfaces
// ---------------------------------------------------------------------------

/// A connection strategy understood by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    /// Single-hop SSH credentials.
    #[default]
    Direct,
    /// Relay through a jump host.
    Tunnel,
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Tunnel => write!(f, "tunnel"),
        }
    }
}

/// A top-level section of the console. Only two of them are connection modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Surface {
    #[default]
    Direct,
    Tunnel,
    Dashboard,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Direct, Surface::Tunnel, Surface::Dashboard];

    /// The connection mode this surface stands for, if any.
    pub fn connection_mode(self) -> Option<ConnectionMode> {
        match self {
            Self::Direct => Some(ConnectionMode::Direct),
            Self::Tunnel => Some(ConnectionMode::Tunnel),
            Self::Dashboard => None,
        }
    }
}

impl From<ConnectionMode> for Surface {
    fn from(mode: ConnectionMode) -> Self {
        match mode {
            ConnectionMode::Direct => Self::Direct,
            ConnectionMode::Tunnel => Self::Tunnel,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Tunnel => write!(f, "tunnel"),
            Self::Dashboard => write!(f, "dashboard"),
        }
    }
}

impl FromStr for Surface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "tunnel" => Ok(Self::Tunnel),
            "dashboard" => Ok(Self::Dashboard),
            other => Err(format!("unknown mode '{other}' (expected direct, tunnel or dashboard)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What a surface switch asks the caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchEffect {
    /// The dashboard became active and its statistics must be fetched.
    pub refresh_dashboard: bool,
}

/// The single owner of connection state for one console session.
#[derive(Debug, Clone)]
pub struct Session {
    surface: Surface,
    /// Section visibility, indexed like [`Surface::ALL`].
    sections: [bool; 3],
    highlighted: Surface,
    primary_action: Control,
    pub direct: DirectForm,
    pub tunnel: TunnelForm,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session with the direct section active.
    pub fn new() -> Self {
        let mut session = Self {
            surface: Surface::Direct,
            sections: [false; 3],
            highlighted: Surface::Direct,
            primary_action: Control::new(PRIMARY_ACTION_LABEL),
            direct: DirectForm::default(),
            tunnel: TunnelForm::default(),
        };
        session.switch_to(Surface::Direct);
        session
    }

    /// Prefill the search directory of both forms.
    pub fn with_search_dirs(mut self, direct: &str, tunnel: &str) -> Self {
        self.direct.search_dir = direct.to_string();
        self.tunnel.search_dir = tunnel.to_string();
        self
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Active connection mode, or `None` while the dashboard is shown.
    pub fn mode(&self) -> Option<ConnectionMode> {
        self.surface.connection_mode()
    }

    /// Switch to `target`, re-running every activation step even when it is
    /// already active.
    pub fn switch_to(&mut self, target: Surface) -> SwitchEffect {
        self.surface = target;

        self.sections = [false; 3];
        self.sections[section_index(target)] = true;
        self.highlighted = target;

        if target == Surface::Dashboard {
            self.primary_action.set_visible(false);
            SwitchEffect {
                refresh_dashboard: true,
            }
        } else {
            self.primary_action.set_label(PRIMARY_ACTION_LABEL);
            self.primary_action.set_visible(true);
            SwitchEffect {
                refresh_dashboard: false,
            }
        }
    }

    /// Whether the section for `surface` is currently shown.
    pub fn is_section_active(&self, surface: Surface) -> bool {
        self.sections[section_index(surface)]
    }

    /// The surface whose selector is highlighted.
    pub fn highlighted(&self) -> Surface {
        self.highlighted
    }

    pub fn primary_action(&self) -> &Control {
        &self.primary_action
    }

    pub fn primary_action_mut(&mut self) -> &mut Control {
        &mut self.primary_action
    }

    /// The form of the active connection mode.
    pub fn active_form(&self) -> Option<ActiveForm<'_>> {
        self.mode().map(|mode| self.form(mode))
    }

    pub fn form(&self, mode: ConnectionMode) -> ActiveForm<'_> {
        match mode {
            ConnectionMode::Direct => ActiveForm::Direct(&self.direct),
            ConnectionMode::Tunnel => ActiveForm::Tunnel(&self.tunnel),
        }
    }

    pub fn file_select_mut(&mut self, mode: ConnectionMode) -> &mut FileSelect {
        match mode {
            ConnectionMode::Direct => &mut self.direct.log_select,
            ConnectionMode::Tunnel => &mut self.tunnel.log_select,
        }
    }

    /// Set a form field of the active mode by its short name.
    ///
    /// Accepted names: `ip`, `user`, `password`, `search`, and for tunnel mode
    /// also `jump` and `env`.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        let Some(mode) = self.mode() else {
            return Err("switch to direct or tunnel mode before editing fields".to_string());
        };
        let value = value.to_string();
        match (mode, field) {
            (ConnectionMode::Direct, "ip") => self.direct.server_ip = value,
            (ConnectionMode::Direct, "user") => self.direct.username = value,
            (ConnectionMode::Direct, "password") => self.direct.password = value,
            (ConnectionMode::Direct, "search") => self.direct.search_dir = value,
            (ConnectionMode::Tunnel, "jump") => self.tunnel.jump_host = value,
            (ConnectionMode::Tunnel, "ip") => self.tunnel.server_ip = value,
            (ConnectionMode::Tunnel, "user") => self.tunnel.username = value,
            (ConnectionMode::Tunnel, "env") => self.tunnel.env_name = value,
            (ConnectionMode::Tunnel, "password") => self.tunnel.password = value,
            (ConnectionMode::Tunnel, "search") => self.tunnel.search_dir = value,
            (mode, other) => return Err(format!("no field '{other}' in {mode} mode")),
        }
        Ok(())
    }
}

fn section_index(surface: Surface) -> usize {
    match surface {
        Surface::Direct => 0,
        Surface::Tunnel => 1,
        Surface::Dashboard => 2,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_in_direct_mode() {
        let session = Session::new();
        assert_eq!(session.mode(), Some(ConnectionMode::Direct));
        assert!(session.is_section_active(Surface::Direct));
        assert!(!session.is_section_active(Surface::Tunnel));
        assert_eq!(session.highlighted(), Surface::Direct);
        assert!(session.primary_action().accepts_activation());
    }

    #[test]
    fn switching_activates_exactly_one_section() {
        let mut session = Session::new();
        session.switch_to(Surface::Tunnel);
        let active: Vec<Surface> = Surface::ALL
            .into_iter()
            .filter(|s| session.is_section_active(*s))
            .collect();
        assert_eq!(active, vec![Surface::Tunnel]);
        assert_eq!(session.highlighted(), Surface::Tunnel);
    }

    #[test]
    fn switching_twice_is_idempotent() {
        let mut session = Session::new();
        session.switch_to(Surface::Tunnel);
        let first = (session.surface(), session.highlighted(), session.sections);
        session.switch_to(Surface::Tunnel);
        let second = (session.surface(), session.highlighted(), session.sections);
        assert_eq!(first, second);
    }

    #[test]
    fn dashboard_hides_primary_action_and_requests_refresh() {
        let mut session = Session::new();
        let effect = session.switch_to(Surface::Dashboard);
        assert!(effect.refresh_dashboard);
        assert_eq!(session.mode(), None);
        assert!(!session.primary_action().is_visible());

        let effect = session.switch_to(Surface::Direct);
        assert!(!effect.refresh_dashboard);
        assert!(session.primary_action().is_visible());
        assert_eq!(session.primary_action().label(), PRIMARY_ACTION_LABEL);
    }

    #[test]
    fn set_field_targets_active_form() {
        let mut session = Session::new();
        session.set_field("ip", "10.0.0.5").unwrap();
        session.switch_to(Surface::Tunnel);
        session.set_field("jump", "bastion").unwrap();
        assert_eq!(session.direct.server_ip, "10.0.0.5");
        assert_eq!(session.tunnel.jump_host, "bastion");
        assert!(session.tunnel.server_ip.is_empty());
    }

    #[test]
    fn set_field_rejects_foreign_fields() {
        let mut session = Session::new();
        assert!(session.set_field("jump", "bastion").is_err());
        session.switch_to(Surface::Dashboard);
        assert!(session.set_field("ip", "10.0.0.5").is_err());
    }

    #[test]
    fn surface_parses_case_insensitively() {
        assert_eq!("Tunnel".parse::<Surface>(), Ok(Surface::Tunnel));
        assert_eq!(" dashboard ".parse::<Surface>(), Ok(Surface::Dashboard));
        assert!("ssh".parse::<Surface>().is_err());
    }

    #[test]
    fn connection_mode_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectionMode::Tunnel).unwrap();
        assert_eq!(json, "\"tunnel\"");
    }
}
