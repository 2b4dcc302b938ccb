/// Recurring analysis jobs. The backend owns recurrence; this controller only
/// lists, creates and removes jobs.
use crate::gateway::{Gateway, RequestError, ScheduledJob, Transport};
use crate::payload::{self, ValidationError};
use crate::session::Session;
use crate::ui::{Control, Frontend};

pub const SCHEDULE_LABEL: &str = "Schedule";
pub const SCHEDULING_LABEL: &str = "Scheduling...";
pub const NO_SCHEDULES: &str = "No active schedules.";

/// What the job list currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JobList {
    #[default]
    NotLoaded,
    Jobs(Vec<ScheduledJob>),
    /// The "no active schedules" row.
    Empty,
    Failed(String),
}

/// How a schedule action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Cancelled,
    Rejected(ValidationError),
    Done(String),
    Failed(RequestError),
}

#[derive(Debug, Clone)]
pub struct ScheduleController {
    jobs: JobList,
    submit_button: Control,
}

impl Default for ScheduleController {
    fn default() -> Self {
        Self {
            jobs: JobList::NotLoaded,
            submit_button: Control::new(SCHEDULE_LABEL),
        }
    }
}

impl ScheduleController {
    pub fn jobs(&self) -> &JobList {
        &self.jobs
    }

    pub fn submit_button(&self) -> &Control {
        &self.submit_button
    }

    /// Fetch the active jobs and re-render the list.
    pub fn list<T: Transport>(&mut self, gateway: &Gateway<T>) {
        self.jobs = match gateway.schedules() {
            Ok(jobs) if jobs.is_empty() => JobList::Empty,
            Ok(jobs) => JobList::Jobs(jobs),
            Err(RequestError::Server(message)) => JobList::Failed(message),
            Err(RequestError::Transport(_)) => {
                JobList::Failed("Failed to load schedules.".to_string())
            }
        };
    }

    /// Schedule the active form's connection at `hour:minute` every day.
    pub fn create<T: Transport, F: Frontend>(
        &mut self,
        hour: &str,
        minute: &str,
        session: &Session,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> ScheduleOutcome {
        if !self.submit_button.accepts_activation() {
            return ScheduleOutcome::Cancelled;
        }

        let built = session
            .active_form()
            .ok_or(ValidationError::NoConnectionMode)
            .and_then(|form| payload::build_schedule(form, hour, minute));
        let request = match built {
            Ok(request) => request,
            Err(e) => {
                frontend.alert(&e.to_string());
                return ScheduleOutcome::Rejected(e);
            }
        };

        let result = {
            let _busy = self.submit_button.busy(SCHEDULING_LABEL);
            gateway.create_schedule(&request)
        };
        let outcome = report(result, frontend);
        self.list(gateway);
        outcome
    }

    /// Remove a job after confirmation, then refresh the list.
    pub fn delete<T: Transport, F: Frontend>(
        &mut self,
        id: &str,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> ScheduleOutcome {
        if !frontend.confirm("Stop this scheduled task?") {
            return ScheduleOutcome::Cancelled;
        }

        let outcome = report(gateway.delete_schedule(id), frontend);
        self.list(gateway);
        outcome
    }
}

fn report<F: Frontend>(result: Result<String, RequestError>, frontend: &mut F) -> ScheduleOutcome {
    match result {
        Ok(message) => {
            if !message.is_empty() {
                frontend.alert(&message);
            }
            ScheduleOutcome::Done(message)
        }
        Err(e) => {
            match &e {
                RequestError::Server(message) => frontend.alert(message),
                RequestError::Transport(_) => frontend.alert("Network Error."),
            }
            ScheduleOutcome::Failed(e)
        }
    }
}
