/// Presentation seams for the console.
///
/// The console never talks to a terminal (or a browser) directly. Blocking
/// dialogs and chart rendering go through the [`Frontend`] trait, and every
/// clickable element that triggers a backend call is modelled as a
/// [`Control`] whose busy state is scoped by a [`BusyGuard`].
pub mod terminal;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// A clickable control: its label, whether it accepts activation, and
/// whether it is shown at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    label: String,
    enabled: bool,
    visible: bool,
}

impl Control {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            visible: true,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// A control accepts activation only when it is both shown and enabled.
    pub fn accepts_activation(&self) -> bool {
        self.enabled && self.visible
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Disable the control and swap its label for `busy_label` until the
    /// returned guard is dropped.
    ///
    /// The guard restores the label and enabled state captured here on every
    /// exit path, including early returns and unwinding.
    pub fn busy(&mut self, busy_label: &str) -> BusyGuard<'_> {
        let saved_label = std::mem::replace(&mut self.label, busy_label.to_string());
        let saved_enabled = self.enabled;
        self.enabled = false;
        BusyGuard {
            control: self,
            saved_label: Some(saved_label),
            saved_enabled,
        }
    }
}

/// Scope guard returned by [`Control::busy`].
#[derive(Debug)]
pub struct BusyGuard<'a> {
    control: &'a mut Control,
    saved_label: Option<String>,
    saved_enabled: bool,
}

impl BusyGuard<'_> {
    /// Label currently shown on the busy control.
    pub fn label(&self) -> &str {
        self.control.label()
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if let Some(label) = self.saved_label.take() {
            self.control.label = label;
        }
        self.control.enabled = self.saved_enabled;
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// The three chart slots on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    DailyActivity,
    TopServers,
    ConnectionModes,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 3] = [
        ChartSlot::DailyActivity,
        ChartSlot::TopServers,
        ChartSlot::ConnectionModes,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::DailyActivity => 0,
            Self::TopServers => 1,
            Self::ConnectionModes => 2,
        }
    }
}

/// How a chart presents its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Time series.
    Line,
    /// Category breakdown, ranked.
    Bar,
    /// Category breakdown, proportional.
    Doughnut,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Opaque handle to a rendered chart instance, issued by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

// ---------------------------------------------------------------------------
// Frontend
// ---------------------------------------------------------------------------

/// Blocking dialogs and chart rendering.
///
/// Implemented by [`terminal::TerminalFrontend`] for the interactive shell
/// and by recording doubles in tests.
pub trait Frontend {
    /// Show a message and wait for acknowledgement.
    fn alert(&mut self, message: &str);

    /// Ask a yes/no question. Anything other than an explicit yes is `false`.
    fn confirm(&mut self, question: &str) -> bool;

    /// Ask for a line of text. `None` means the user cancelled.
    fn prompt(&mut self, question: &str) -> Option<String>;

    /// Render a chart into `slot` and return a handle to the new instance.
    fn create_chart(&mut self, slot: ChartSlot, spec: &ChartSpec) -> ChartHandle;

    /// Dispose of a chart instance previously returned by `create_chart`.
    fn destroy_chart(&mut self, handle: ChartHandle);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_guard_disables_and_relabels() {
        let mut control = Control::new("Start Analysis");
        {
            let guard = control.busy("Analyzing...");
            assert_eq!(guard.label(), "Analyzing...");
        }
        assert_eq!(control.label(), "Start Analysis");
        assert!(control.is_enabled());
    }

    #[test]
    fn busy_guard_restores_on_early_return() {
        fn fails(control: &mut Control) -> Result<(), String> {
            let _busy = control.busy("Scanning...");
            Err("boom".to_string())
        }

        let mut control = Control::new("List Files");
        assert!(fails(&mut control).is_err());
        assert_eq!(control.label(), "List Files");
        assert!(control.accepts_activation());
    }

    #[test]
    fn busy_guard_keeps_prior_disabled_state() {
        let mut control = Control::new("Save");
        control.enabled = false;
        drop(control.busy("Saving..."));
        assert!(!control.is_enabled());
        assert_eq!(control.label(), "Save");
    }

    #[test]
    fn hidden_control_rejects_activation() {
        let mut control = Control::new("Start Analysis");
        control.set_visible(false);
        assert!(control.is_enabled());
        assert!(!control.accepts_activation());
    }

    #[test]
    fn chart_slot_indices_are_distinct() {
        let indices: Vec<usize> = ChartSlot::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
