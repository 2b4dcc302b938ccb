/// Webhook settings: a single process-wide URL stored by the backend.
use crate::gateway::{Gateway, RequestError, Transport};
use crate::payload::{self, ValidationError};
use crate::ui::{Control, Frontend};

pub const SAVE_SETTINGS_LABEL: &str = "Save Settings";
pub const SAVING_LABEL: &str = "Saving...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    Ignored,
    Rejected(ValidationError),
    Saved(String),
    Failed(RequestError),
}

#[derive(Debug, Clone)]
pub struct SettingsController {
    /// Contents of the webhook URL field.
    pub webhook_url: String,
    save_button: Control,
}

impl Default for SettingsController {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            save_button: Control::new(SAVE_SETTINGS_LABEL),
        }
    }
}

impl SettingsController {
    pub fn save_button(&self) -> &Control {
        &self.save_button
    }

    /// Fill the webhook field if the backend has a value. Failures leave
    /// the field untouched.
    pub fn load<T: Transport>(&mut self, gateway: &Gateway<T>) -> Result<(), RequestError> {
        let settings = gateway.settings()?;
        if let Some(url) = settings.webhook_url.filter(|u| !u.trim().is_empty()) {
            self.webhook_url = url;
        }
        Ok(())
    }

    /// Overwrite the stored webhook URL with the field's value.
    pub fn save<T: Transport, F: Frontend>(
        &mut self,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> SettingsOutcome {
        if !self.save_button.accepts_activation() {
            return SettingsOutcome::Ignored;
        }

        let url = match payload::build_webhook_url(&self.webhook_url) {
            Ok(url) => url,
            Err(e) => {
                frontend.alert(&e.to_string());
                return SettingsOutcome::Rejected(e);
            }
        };

        let result = {
            let _busy = self.save_button.busy(SAVING_LABEL);
            gateway.save_settings(&url)
        };

        match result {
            Ok(message) => {
                if !message.is_empty() {
                    frontend.alert(&message);
                }
                SettingsOutcome::Saved(message)
            }
            Err(e) => {
                match &e {
                    RequestError::Server(message) => frontend.alert(message),
                    RequestError::Transport(_) => frontend.alert("Network Error."),
                }
                SettingsOutcome::Failed(e)
            }
        }
    }
}
