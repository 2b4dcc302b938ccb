/// The workflow orchestrator.
///
/// [`Console`] owns the session state, the gateway, the frontend and one
/// instance of every controller. Each public method is one user
/// interaction; it runs the owning controller and then applies the
/// cross-view refreshes:
///
/// - switching to the dashboard fetches and renders statistics;
/// - a successful analysis refreshes history, and the dashboard too when it
///   is the active surface.
///
/// Controllers never share mutable state with each other, so the order in
/// which independent views are refreshed carries no meaning.
pub mod analysis;
pub mod dashboard;
pub mod discovery;
pub mod history;
pub mod profiles;
pub mod schedule;
pub mod settings;

use crate::gateway::{Gateway, RequestError, Transport};
use crate::session::{Session, Surface};
use crate::ui::Frontend;

use analysis::{AnalysisController, AnalysisOutcome};
use dashboard::DashboardView;
use discovery::{DiscoveryOutcome, FileDiscoveryController};
use history::HistoryView;
use profiles::{ProfileController, ProfileOutcome};
use schedule::{ScheduleController, ScheduleOutcome};
use settings::{SettingsController, SettingsOutcome};

pub struct Console<T, F> {
    gateway: Gateway<T>,
    frontend: F,
    pub session: Session,
    pub discovery: FileDiscoveryController,
    pub analysis: AnalysisController,
    pub profiles: ProfileController,
    pub schedules: ScheduleController,
    pub history: HistoryView,
    pub dashboard: DashboardView,
    pub settings: SettingsController,
}

impl<T: Transport, F: Frontend> Console<T, F> {
    pub fn new(gateway: Gateway<T>, frontend: F, session: Session) -> Self {
        Self {
            gateway,
            frontend,
            session,
            discovery: FileDiscoveryController::default(),
            analysis: AnalysisController::default(),
            profiles: ProfileController::default(),
            schedules: ScheduleController::default(),
            history: HistoryView::default(),
            dashboard: DashboardView::default(),
            settings: SettingsController::default(),
        }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// Page-load sequence: settings, schedules, history, profiles.
    pub fn start(&mut self) {
        let _ = self.settings.load(&self.gateway);
        self.schedules.list(&self.gateway);
        self.history.load(&self.gateway);
        let _ = self.profiles.list(&self.gateway);
    }

    // -- Session --

    /// Activate a surface and run its side effects.
    pub fn switch_to(&mut self, surface: Surface) {
        let effect = self.session.switch_to(surface);
        if effect.refresh_dashboard {
            let _ = self.dashboard.refresh(&self.gateway, &mut self.frontend);
        }
    }

    // -- Discovery and analysis --

    /// List log files for the active mode.
    pub fn discover(&mut self) -> DiscoveryOutcome {
        let Some(mode) = self.session.mode() else {
            return DiscoveryOutcome::Ignored;
        };
        self.discovery
            .discover(mode, &mut self.session, &self.gateway, &mut self.frontend)
    }

    /// Submit the primary action.
    ///
    /// A completed run reloads history, and the dashboard as well when it is
    /// the active surface. With blocking calls and the action hidden on the
    /// dashboard, that second refresh does not fire from either frontend here.
    pub fn run_analysis(&mut self) -> AnalysisOutcome {
        let outcome = self
            .analysis
            .submit(&mut self.session, &self.gateway, &mut self.frontend);

        if matches!(outcome, AnalysisOutcome::Completed(_)) {
            self.history.load(&self.gateway);
            if self.session.surface() == Surface::Dashboard {
                let _ = self.dashboard.refresh(&self.gateway, &mut self.frontend);
            }
        }
        outcome
    }

    pub fn refresh_history(&mut self) {
        self.history.load(&self.gateway);
    }

    pub fn refresh_dashboard(&mut self) -> Result<(), RequestError> {
        self.dashboard.refresh(&self.gateway, &mut self.frontend)
    }

    // -- Profiles --

    pub fn refresh_profiles(&mut self) -> Result<usize, RequestError> {
        self.profiles.list(&self.gateway)
    }

    pub fn save_profile(&mut self) -> ProfileOutcome {
        self.profiles
            .create(&self.session, &self.gateway, &mut self.frontend)
    }

    /// Select the named profile and load it into its mode's form.
    ///
    /// Returns `false` if no such profile is listed.
    pub fn load_profile(&mut self, name: &str) -> bool {
        if !self.profiles.select(name) {
            return false;
        }
        let Some(profile) = self.profiles.selected().cloned() else {
            return false;
        };
        let mode = ProfileController::load(&profile, &mut self.session);
        self.switch_to(mode.into());
        true
    }

    /// Delete the selected profile (after confirmation).
    pub fn delete_profile(&mut self) -> ProfileOutcome {
        self.profiles.delete(&self.gateway, &mut self.frontend)
    }

    // -- Schedules --

    pub fn refresh_schedules(&mut self) {
        self.schedules.list(&self.gateway);
    }

    pub fn schedule(&mut self, hour: &str, minute: &str) -> ScheduleOutcome {
        self.schedules.create(
            hour,
            minute,
            &self.session,
            &self.gateway,
            &mut self.frontend,
        )
    }

    pub fn delete_schedule(&mut self, id: &str) -> ScheduleOutcome {
        self.schedules
            .delete(id, &self.gateway, &mut self.frontend)
    }

    // -- Settings --

    pub fn load_settings(&mut self) -> Result<(), RequestError> {
        self.settings.load(&self.gateway)
    }

    pub fn save_settings(&mut self) -> SettingsOutcome {
        self.settings.save(&self.gateway, &mut self.frontend)
    }
}
