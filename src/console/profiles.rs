/// Saved connection profiles.
///
/// The option list holds each profile's full record, so loading a profile
/// into the forms needs no second fetch. The list is a snapshot: it is
/// re-fetched after every save or delete.
use crate::gateway::{Gateway, Profile, RequestError, Transport};
use crate::payload::{self, ValidationError};
use crate::session::form::{DEFAULT_DIRECT_SEARCH_PATH, DEFAULT_TUNNEL_SEARCH_PATH};
use crate::session::{ConnectionMode, Session};
use crate::ui::{Control, Frontend};

pub const PROFILE_PLACEHOLDER: &str = "-- Select Saved Profile --";
pub const SAVE_PROFILE_LABEL: &str = "Save Profile";
pub const SAVING_LABEL: &str = "Saving...";

/// How a profile action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// The user dismissed a prompt or confirmation; nothing was sent.
    Cancelled,
    Rejected(ValidationError),
    /// The backend accepted the change; carries its message.
    Done(String),
    Failed(RequestError),
}

#[derive(Debug, Clone)]
pub struct ProfileController {
    options: Vec<Profile>,
    selected: Option<usize>,
    save_button: Control,
}

impl Default for ProfileController {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            selected: None,
            save_button: Control::new(SAVE_PROFILE_LABEL),
        }
    }
}

impl ProfileController {
    pub fn save_button(&self) -> &Control {
        &self.save_button
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.options
    }

    /// Option labels as displayed, placeholder first.
    pub fn option_labels(&self) -> Vec<&str> {
        std::iter::once(PROFILE_PLACEHOLDER)
            .chain(self.options.iter().map(|p| p.profile_name.as_str()))
            .collect()
    }

    pub fn selected(&self) -> Option<&Profile> {
        self.selected.and_then(|index| self.options.get(index))
    }

    /// Select a profile by name. Returns `false` if no such profile is listed.
    pub fn select(&mut self, name: &str) -> bool {
        match self
            .options
            .iter()
            .position(|p| p.profile_name == name.trim())
        {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Fetch the saved profiles and replace the option list.
    ///
    /// On failure the previous list is kept.
    pub fn list<T: Transport>(&mut self, gateway: &Gateway<T>) -> Result<usize, RequestError> {
        let profiles = gateway.profiles()?;
        let previous = self.selected().map(|p| p.id.clone());
        self.options = profiles;
        self.selected = previous.and_then(|id| self.options.iter().position(|p| p.id == id));
        Ok(self.options.len())
    }

    /// Check the form, ask for a name and save the form's non-secret fields
    /// under it.
    pub fn create<T: Transport, F: Frontend>(
        &mut self,
        session: &Session,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> ProfileOutcome {
        if !self.save_button.accepts_activation() {
            return ProfileOutcome::Cancelled;
        }
        let Some(form) = session.active_form() else {
            let e = ValidationError::NoConnectionMode;
            frontend.alert(&e.to_string());
            return ProfileOutcome::Rejected(e);
        };

        if let Err(e) = payload::profile_server(form) {
            frontend.alert(&e.to_string());
            return ProfileOutcome::Rejected(e);
        }

        let name = match frontend.prompt("Enter a name for this profile:") {
            Some(name) if !name.trim().is_empty() => name,
            _ => return ProfileOutcome::Cancelled,
        };

        let draft = match payload::build_profile(form, &name) {
            Ok(draft) => draft,
            Err(e) => {
                frontend.alert(&e.to_string());
                return ProfileOutcome::Rejected(e);
            }
        };

        let result = {
            let _busy = self.save_button.busy(SAVING_LABEL);
            gateway.save_profile(&draft)
        };
        let outcome = report(result, frontend);
        let _ = self.list(gateway);
        outcome
    }

    /// Switch to the profile's mode and fill its form.
    ///
    /// A profile without a path gets the mode's default search directory.
    /// Returns the mode that was activated so the caller can run the
    /// surface-switch side effects.
    pub fn load(profile: &Profile, session: &mut Session) -> ConnectionMode {
        let mode = profile.connection_mode;
        session.switch_to(mode.into());

        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let path = profile.log_path.clone().filter(|p| !p.trim().is_empty());

        match mode {
            ConnectionMode::Direct => {
                let form = &mut session.direct;
                form.server_ip = profile.server_ip.clone();
                form.username = text(&profile.username);
                form.search_dir =
                    path.unwrap_or_else(|| DEFAULT_DIRECT_SEARCH_PATH.to_string());
            }
            ConnectionMode::Tunnel => {
                let form = &mut session.tunnel;
                form.jump_host = text(&profile.jump_host);
                form.server_ip = profile.server_ip.clone();
                form.username = text(&profile.username);
                form.env_name = text(&profile.env_name);
                form.search_dir =
                    path.unwrap_or_else(|| DEFAULT_TUNNEL_SEARCH_PATH.to_string());
            }
        }
        mode
    }

    /// Delete the selected profile after confirmation, then refresh the list.
    pub fn delete<T: Transport, F: Frontend>(
        &mut self,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> ProfileOutcome {
        let Some(profile) = self.selected().cloned() else {
            frontend.alert("Please select a profile to delete.");
            return ProfileOutcome::Cancelled;
        };

        let question = format!(
            "Are you sure you want to delete \"{}\"?",
            profile.profile_name
        );
        if !frontend.confirm(&question) {
            return ProfileOutcome::Cancelled;
        }

        let outcome = report(gateway.delete_profile(&profile.id), frontend);
        if matches!(outcome, ProfileOutcome::Done(_)) {
            self.selected = None;
        }
        let _ = self.list(gateway);
        outcome
    }
}

/// Show the result of a mutating call to the user.
fn report<F: Frontend>(result: Result<String, RequestError>, frontend: &mut F) -> ProfileOutcome {
    match result {
        Ok(message) => {
            if !message.is_empty() {
                frontend.alert(&message);
            }
            ProfileOutcome::Done(message)
        }
        Err(e) => {
            match &e {
                RequestError::Server(message) => frontend.alert(message),
                RequestError::Transport(_) => frontend.alert("Network Error."),
            }
            ProfileOutcome::Failed(e)
        }
    }
}
