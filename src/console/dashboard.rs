/// Dashboard: three charts over the backend's aggregate statistics.
///
/// The view owns one handle per chart slot. Each render disposes of the
/// slot's previous instance before creating its replacement, so at most
/// three chart instances are alive at any time.
use crate::gateway::{DashboardStats, Gateway, RequestError, Transport};
use crate::ui::{ChartHandle, ChartKind, ChartSlot, ChartSpec, Frontend};

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    handles: [Option<ChartHandle>; 3],
    stats: Option<DashboardStats>,
    error: Option<String>,
}

impl DashboardView {
    /// Statistics behind the charts currently shown.
    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    /// Message of the last failed refresh, cleared by a successful one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle(&self, slot: ChartSlot) -> Option<ChartHandle> {
        self.handles[slot.index()]
    }

    /// Fetch the statistics and re-render all three charts.
    ///
    /// On failure the previous charts stay in place.
    pub fn refresh<T: Transport, F: Frontend>(
        &mut self,
        gateway: &Gateway<T>,
        frontend: &mut F,
    ) -> Result<(), RequestError> {
        match gateway.dashboard_stats() {
            Ok(stats) => {
                self.render(&stats, frontend);
                self.stats = Some(stats);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(match &e {
                    RequestError::Server(message) => message.clone(),
                    RequestError::Transport(_) => "Failed to load dashboard statistics.".to_string(),
                });
                Err(e)
            }
        }
    }

    fn render<F: Frontend>(&mut self, stats: &DashboardStats, frontend: &mut F) {
        for slot in ChartSlot::ALL {
            let spec = chart_spec(slot, stats);
            let handle = &mut self.handles[slot.index()];
            if let Some(previous) = handle.take() {
                frontend.destroy_chart(previous);
            }
            *handle = Some(frontend.create_chart(slot, &spec));
        }
    }
}

/// Map the statistics onto the chart drawn in `slot`.
pub fn chart_spec(slot: ChartSlot, stats: &DashboardStats) -> ChartSpec {
    match slot {
        ChartSlot::DailyActivity => ChartSpec {
            kind: ChartKind::Line,
            title: "Daily Activity".to_string(),
            labels: stats.daily_activity.iter().map(|d| d.date.clone()).collect(),
            values: stats.daily_activity.iter().map(|d| d.count).collect(),
        },
        ChartSlot::TopServers => ChartSpec {
            kind: ChartKind::Bar,
            title: "Top Servers".to_string(),
            labels: stats.top_servers.iter().map(|s| s.server_ip.clone()).collect(),
            values: stats.top_servers.iter().map(|s| s.count).collect(),
        },
        ChartSlot::ConnectionModes => ChartSpec {
            kind: ChartKind::Doughnut,
            title: "Connection Modes".to_string(),
            labels: stats
                .conn_modes
                .iter()
                .map(|m| m.connection_mode.clone())
                .collect(),
            values: stats.conn_modes.iter().map(|m| m.count).collect(),
        },
    }
}
