/// Run-analysis lifecycle over the primary action control.
///
/// ```text
/// idle ──submit──▶ submitting ──▶ success | error ──▶ idle
/// ```
///
/// Validation failures never leave `idle`. Leaving `submitting` always
/// restores the primary control, whatever the call returned.
use crate::gateway::{AnalysisReport, Gateway, RequestError, Transport};
use crate::payload::{self, ValidationError};
use crate::session::Session;
use crate::ui::Frontend;

pub const ANALYZING_LABEL: &str = "Analyzing...";

/// Inline banner under the primary action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusBanner {
    #[default]
    Hidden,
    Success {
        message: String,
        report_url: String,
    },
    Error {
        message: String,
    },
}

/// Where the run-analysis state machine currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Submitting,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Ignored,
    Rejected(ValidationError),
    Completed(AnalysisReport),
    Failed(RequestError),
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisController {
    state: AnalysisState,
    banner: StatusBanner,
}

impl AnalysisController {
    pub fn state(&self) -> AnalysisState {
        self.state
    }

    pub fn banner(&self) -> &StatusBanner {
        &self.banner
    }

    /// Build the request from the active form and submit it.
    pub fn submit<T: Transport, F: Frontend>(
        &mut self,
        session: &mut Session,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> AnalysisOutcome {
        if self.state == AnalysisState::Submitting
            || !session.primary_action().accepts_activation()
        {
            return AnalysisOutcome::Ignored;
        }

        let built = session
            .active_form()
            .ok_or(ValidationError::NoConnectionMode)
            .and_then(payload::build_analysis);
        let request = match built {
            Ok(request) => request,
            Err(e) => {
                frontend.alert(&e.to_string());
                return AnalysisOutcome::Rejected(e);
            }
        };

        self.state = AnalysisState::Submitting;
        self.banner = StatusBanner::Hidden;
        let result = {
            let _busy = session.primary_action_mut().busy(ANALYZING_LABEL);
            gateway.run_analysis(&request)
        };
        self.state = AnalysisState::Idle;

        match result {
            Ok(report) => {
                self.banner = StatusBanner::Success {
                    message: report.message.clone(),
                    report_url: report.report_url.clone(),
                };
                AnalysisOutcome::Completed(report)
            }
            Err(e) => {
                let message = match &e {
                    RequestError::Server(message) => message.clone(),
                    RequestError::Transport(_) => "Network Error.".to_string(),
                };
                self.banner = StatusBanner::Error { message };
                AnalysisOutcome::Failed(e)
            }
        }
    }
}
