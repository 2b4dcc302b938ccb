/// Console workflow tests.
///
/// Drives [`Console`] through a scripted transport and a recording frontend,
/// covering the cross-view refreshes, control restoration and the
/// confirmation guards on destructive actions.
mod common;

use common::{FakeTransport, RecordingFrontend};
use pela::console::Console;
use pela::console::analysis::{AnalysisOutcome, StatusBanner};
use pela::console::discovery::{DiscoveryOutcome, LIST_FILES_LABEL};
use pela::console::history::{HISTORY_FAILED, HistoryTable};
use pela::console::profiles::ProfileOutcome;
use pela::console::schedule::{JobList, ScheduleOutcome};
use pela::console::settings::SettingsOutcome;
use pela::gateway::{Gateway, Method, RequestError};
use pela::payload::{SIMULATION_LOG_PATH, ValidationError};
use pela::session::form::{DEFAULT_TUNNEL_SEARCH_PATH, FILE_PLACEHOLDER};
use pela::session::{ConnectionMode, PRIMARY_ACTION_LABEL, Session, Surface};
use pela::ui::ChartSlot;

type TestConsole = Console<FakeTransport, RecordingFrontend>;

fn console(transport: FakeTransport, frontend: RecordingFrontend) -> TestConsole {
    Console::new(Gateway::new(transport), frontend, Session::new())
}

fn fill_direct(console: &mut TestConsole) {
    let form = &mut console.session.direct;
    form.server_ip = "10.0.0.5".to_string();
    form.username = "alice".to_string();
    form.password = "secret".to_string();
    form.search_dir = "/var/log/app/".to_string();
}

/// Fill the direct form and pick a log file as if discovery had listed it.
fn fill_direct_with_file(console: &mut TestConsole) {
    fill_direct(console);
    let select = console.session.file_select_mut(ConnectionMode::Direct);
    select.replace(["/var/log/app/app.log"]);
    assert!(select.select("/var/log/app/app.log"));
}

fn fill_tunnel(console: &mut TestConsole) {
    console.switch_to(Surface::Tunnel);
    let form = &mut console.session.tunnel;
    form.jump_host = "bastion.internal".to_string();
    form.server_ip = "10.1.0.9".to_string();
    form.username = "postgres".to_string();
    form.env_name = "staging".to_string();
    form.password = "hunter2".to_string();
    form.search_dir = "/tmp/".to_string();
}

const STATS: &str = r#"{
    "success": true,
    "daily_activity": [{"date": "2026-10-18", "count": 3}],
    "top_servers": [{"server_ip": "10.0.0.5", "count": 3}],
    "conn_modes": [{"connection_mode": "direct", "count": 3}]
}"#;

const PROFILES: &str = r#"{
    "success": true,
    "data": [
        {"id": 7, "profile_name": "staging", "connection_mode": "tunnel",
         "server_ip": "10.1.0.9", "username": "postgres",
         "jump_host": "bastion.internal", "env_name": "staging", "log_path": null}
    ]
}"#;

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn discovery_then_run_shows_report_in_history() {
    let transport = FakeTransport::new()
        .reply("POST /list-files", r#"{"success": true, "files": ["app.log", "app.1.log"]}"#)
        .reply(
            "POST /run-analysis",
            r#"{"success": true, "message": "Parsed 1200 lines", "report_url": "/reports/42.html"}"#,
        )
        .reply(
            "GET /history",
            r#"{"success": true, "data": [{"timestamp": "2026-10-18 09:00:00",
                "server_ip": "10.0.0.5", "username": "alice",
                "connection_mode": "direct", "report_url": "/reports/42.html"}]}"#,
        );
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct(&mut console);

    assert_eq!(console.discover(), DiscoveryOutcome::Listed(2));
    let select = console.session.file_select_mut(ConnectionMode::Direct);
    assert_eq!(select.options(), vec![FILE_PLACEHOLDER, "app.log", "app.1.log"]);
    assert!(select.select("app.log"));

    let outcome = console.run_analysis();
    assert!(matches!(outcome, AnalysisOutcome::Completed(_)));
    assert_eq!(
        console.analysis.banner(),
        &StatusBanner::Success {
            message: "Parsed 1200 lines".to_string(),
            report_url: "/reports/42.html".to_string(),
        }
    );

    let HistoryTable::Rows(rows) = console.history.table() else {
        panic!("expected history rows, got {:?}", console.history.table());
    };
    assert!(
        rows.iter()
            .any(|r| r.server_ip == "10.0.0.5" && r.report_url == "/reports/42.html")
    );

    let sent = console.gateway().transport().sent_to("POST /run-analysis");
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["log_path"], "app.log");
    assert_eq!(body["connection_mode"], "direct");
}

// ---------------------------------------------------------------------------
// Run analysis
// ---------------------------------------------------------------------------

#[test]
fn primary_action_is_restored_after_success_and_server_error() {
    let transport = FakeTransport::new()
        .reply(
            "POST /run-analysis",
            r#"{"success": true, "message": "ok", "report_url": "/r/1.html"}"#,
        )
        .reply("POST /run-analysis", r#"{"success": false, "message": "pgBadger Error: boom"}"#)
        .reply("GET /history", r#"{"success": true, "data": []}"#);
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct_with_file(&mut console);

    for _ in 0..2 {
        console.run_analysis();
        let action = console.session.primary_action();
        assert_eq!(action.label(), PRIMARY_ACTION_LABEL);
        assert!(action.is_enabled());
    }
    assert_eq!(
        console.analysis.banner(),
        &StatusBanner::Error {
            message: "pgBadger Error: boom".to_string()
        }
    );
}

#[test]
fn transport_failure_shows_generic_banner() {
    let transport = FakeTransport::new().fail("POST /run-analysis");
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct_with_file(&mut console);

    let outcome = console.run_analysis();
    assert!(matches!(outcome, AnalysisOutcome::Failed(RequestError::Transport(_))));
    assert_eq!(
        console.analysis.banner(),
        &StatusBanner::Error {
            message: "Network Error.".to_string()
        }
    );
    assert!(console.session.primary_action().is_enabled());
}

#[test]
fn invalid_form_sends_nothing() {
    let mut console = console(FakeTransport::new(), RecordingFrontend::new());
    console.session.direct.search_dir = "/var/log/app/".to_string();

    assert!(matches!(console.run_analysis(), AnalysisOutcome::Rejected(_)));
    assert!(console.gateway().transport().sent().is_empty());
    assert_eq!(console.frontend().alerts.len(), 1);
}

#[test]
fn run_without_selected_file_is_rejected_even_with_search_dir() {
    let session = Session::new().with_search_dirs("/var/log/postgresql/", "/tmp/");
    let mut console = Console::new(
        Gateway::new(FakeTransport::new()),
        RecordingFrontend::new(),
        session,
    );
    let form = &mut console.session.direct;
    form.server_ip = "10.0.0.5".to_string();
    form.username = "alice".to_string();
    form.password = "secret".to_string();

    assert_eq!(
        console.run_analysis(),
        AnalysisOutcome::Rejected(ValidationError::NoLogFileSelected)
    );
    assert!(console.gateway().transport().sent().is_empty());
    assert_eq!(
        console.frontend().alerts,
        vec!["Please list files and select a log file first."]
    );
    assert!(console.session.primary_action().is_enabled());
}

#[test]
fn run_is_ignored_on_the_dashboard() {
    let transport = FakeTransport::new().reply("GET /dashboard-stats", STATS);
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct(&mut console);
    console.switch_to(Surface::Dashboard);

    assert_eq!(console.run_analysis(), AnalysisOutcome::Ignored);
    assert!(console.gateway().transport().sent_to("POST /run-analysis").is_empty());
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn empty_discovery_leaves_only_placeholder() {
    let transport = FakeTransport::new().reply("POST /list-files", r#"{"success": true, "files": []}"#);
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct(&mut console);

    assert_eq!(console.discover(), DiscoveryOutcome::Listed(0));
    assert_eq!(
        console.session.file_select_mut(ConnectionMode::Direct).options(),
        vec![FILE_PLACEHOLDER]
    );
    assert_eq!(
        console.frontend().alerts,
        vec!["No files found in the specified directory."]
    );
    assert_eq!(
        console.discovery.button(ConnectionMode::Direct).label(),
        LIST_FILES_LABEL
    );
}

#[test]
fn discovery_server_error_is_prefixed() {
    let transport = FakeTransport::new().reply(
        "POST /list-files",
        r#"{"success": false, "message": "Permission denied"}"#,
    );
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct(&mut console);

    assert!(matches!(console.discover(), DiscoveryOutcome::Failed(_)));
    assert_eq!(
        console.frontend().alerts,
        vec!["Error Listing Files: Permission denied"]
    );
    assert!(console.discovery.button(ConnectionMode::Direct).is_enabled());
}

#[test]
fn discovery_transport_failure_alerts_and_restores_button() {
    let transport = FakeTransport::new().fail("POST /list-files");
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct(&mut console);

    assert!(matches!(
        console.discover(),
        DiscoveryOutcome::Failed(RequestError::Transport(_))
    ));
    assert_eq!(
        console.frontend().alerts,
        vec!["Network Error while listing files."]
    );
    let button = console.discovery.button(ConnectionMode::Direct);
    assert!(button.is_enabled());
    assert_eq!(button.label(), LIST_FILES_LABEL);
}

#[test]
fn tunnel_discovery_sends_relay_fields_and_search_path() {
    let transport =
        FakeTransport::new().reply("POST /list-files", r#"{"success": true, "files": ["pg.log"]}"#);
    let mut console = console(transport, RecordingFrontend::new());
    fill_tunnel(&mut console);

    assert_eq!(console.discover(), DiscoveryOutcome::Listed(1));
    let sent = console.gateway().transport().sent_to("POST /list-files");
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["connection_mode"], "tunnel");
    assert_eq!(body["jump_host"], "bastion.internal");
    assert_eq!(body["env_name"], "staging");
    assert_eq!(body["search_path"], "/tmp/");
    assert_eq!(
        console.session.file_select_mut(ConnectionMode::Tunnel).options(),
        vec![FILE_PLACEHOLDER, "pg.log"]
    );
}

// ---------------------------------------------------------------------------
// Surfaces and dashboard
// ---------------------------------------------------------------------------

#[test]
fn switching_to_active_mode_is_idempotent() {
    let mut console = console(FakeTransport::new(), RecordingFrontend::new());
    console.switch_to(Surface::Tunnel);
    console.switch_to(Surface::Tunnel);

    assert_eq!(console.session.surface(), Surface::Tunnel);
    assert_eq!(console.session.highlighted(), Surface::Tunnel);
    assert!(console.session.is_section_active(Surface::Tunnel));
    assert!(!console.session.is_section_active(Surface::Direct));
    assert!(console.gateway().transport().sent().is_empty());
}

#[test]
fn dashboard_rerender_disposes_previous_charts() {
    let transport = FakeTransport::new()
        .reply("GET /dashboard-stats", STATS)
        .reply("GET /dashboard-stats", STATS);
    let mut console = console(transport, RecordingFrontend::new());

    console.switch_to(Surface::Dashboard);
    let first = console.dashboard.handle(ChartSlot::TopServers);
    console.switch_to(Surface::Dashboard);

    let frontend = console.frontend();
    assert_eq!(frontend.created.len(), 6);
    assert_eq!(frontend.destroyed.len(), 3);
    assert_eq!(frontend.live_charts(), 3);
    assert!(frontend.destroyed.contains(&first.unwrap()));
    assert_ne!(console.dashboard.handle(ChartSlot::TopServers), first);
}

#[test]
fn dashboard_failure_keeps_existing_charts() {
    let transport = FakeTransport::new()
        .reply("GET /dashboard-stats", STATS)
        .fail("GET /dashboard-stats");
    let mut console = console(transport, RecordingFrontend::new());

    console.switch_to(Surface::Dashboard);
    console.switch_to(Surface::Dashboard);

    assert_eq!(console.frontend().live_charts(), 3);
    assert!(console.dashboard.error().is_some());
    assert!(console.dashboard.stats().is_some());
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[test]
fn declined_profile_delete_sends_nothing() {
    let transport = FakeTransport::new().reply("GET /profiles", PROFILES);
    let mut console = console(transport, RecordingFrontend::new().confirming(false));
    console.refresh_profiles().unwrap();
    assert!(console.profiles.select("staging"));

    assert_eq!(console.delete_profile(), ProfileOutcome::Cancelled);
    assert!(console.gateway().transport().sent_to("DELETE /profiles").is_empty());
    assert_eq!(
        console.frontend().questions,
        vec!["Are you sure you want to delete \"staging\"?"]
    );
}

#[test]
fn profile_delete_without_selection_alerts() {
    let mut console = console(FakeTransport::new(), RecordingFrontend::new());
    assert_eq!(console.delete_profile(), ProfileOutcome::Cancelled);
    assert_eq!(console.frontend().alerts, vec!["Please select a profile to delete."]);
    assert!(console.gateway().transport().sent().is_empty());
}

#[test]
fn confirmed_profile_delete_sends_id_and_refreshes() {
    let transport = FakeTransport::new()
        .reply("GET /profiles", PROFILES)
        .reply("DELETE /profiles", r#"{"success": true, "message": "Profile deleted."}"#)
        .reply("GET /profiles", r#"{"success": true, "data": []}"#);
    let mut console = console(transport, RecordingFrontend::new().confirming(true));
    console.refresh_profiles().unwrap();
    console.profiles.select("staging");

    assert_eq!(
        console.delete_profile(),
        ProfileOutcome::Done("Profile deleted.".to_string())
    );
    let deletes = console.gateway().transport().sent_to("DELETE /profiles");
    assert_eq!(deletes[0].query, vec![("id", "7".to_string())]);
    assert!(console.profiles.profiles().is_empty());
    assert_eq!(console.frontend().alerts, vec!["Profile deleted."]);
}

#[test]
fn loading_tunnel_profile_fills_form_with_default_path() {
    let transport = FakeTransport::new().reply("GET /profiles", PROFILES);
    let mut console = console(transport, RecordingFrontend::new());
    console.refresh_profiles().unwrap();

    assert!(console.load_profile("staging"));
    assert_eq!(console.session.surface(), Surface::Tunnel);
    let form = &console.session.tunnel;
    assert_eq!(form.jump_host, "bastion.internal");
    assert_eq!(form.env_name, "staging");
    assert_eq!(form.search_dir, DEFAULT_TUNNEL_SEARCH_PATH);
    assert!(form.password.is_empty());
}

#[test]
fn profile_save_prompts_for_name_and_posts_snapshot() {
    let transport = FakeTransport::new()
        .reply("POST /profiles", r#"{"success": true, "message": "Profile saved."}"#)
        .reply("GET /profiles", PROFILES);
    let frontend = RecordingFrontend::new().answering(Some("nightly"));
    let mut console = console(transport, frontend);
    fill_direct(&mut console);

    assert_eq!(
        console.save_profile(),
        ProfileOutcome::Done("Profile saved.".to_string())
    );
    let posts = console.gateway().transport().sent_to("POST /profiles");
    let body = posts[0].body.as_ref().unwrap();
    assert_eq!(body["profile_name"], "nightly");
    assert_eq!(body["log_path"], "/var/log/app/");
    assert!(body.get("password").is_none());
    assert_eq!(console.profiles.save_button().label(), "Save Profile");
}

#[test]
fn profile_save_checks_form_before_prompting() {
    let frontend = RecordingFrontend::new().answering(Some("nightly"));
    let mut console = console(FakeTransport::new(), frontend);

    assert!(matches!(console.save_profile(), ProfileOutcome::Rejected(_)));
    assert!(console.frontend().questions.is_empty());
    assert_eq!(console.frontend().alerts.len(), 1);
    assert!(console.gateway().transport().sent().is_empty());
}

#[test]
fn cancelled_profile_prompt_sends_nothing() {
    let frontend = RecordingFrontend::new().answering(None);
    let mut console = console(FakeTransport::new(), frontend);
    fill_direct(&mut console);

    assert_eq!(console.save_profile(), ProfileOutcome::Cancelled);
    assert!(console.gateway().transport().sent().is_empty());
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[test]
fn declined_schedule_delete_sends_nothing() {
    let mut console = console(FakeTransport::new(), RecordingFrontend::new().confirming(false));
    assert_eq!(console.delete_schedule("job-1"), ScheduleOutcome::Cancelled);
    assert!(console.gateway().transport().sent().is_empty());
    assert_eq!(console.frontend().questions, vec!["Stop this scheduled task?"]);
}

#[test]
fn confirmed_schedule_delete_sends_id_and_refreshes() {
    let transport = FakeTransport::new()
        .reply("DELETE /schedule", r#"{"success": true, "message": "Schedule removed."}"#)
        .reply("GET /schedule", r#"{"jobs": []}"#);
    let mut console = console(transport, RecordingFrontend::new().confirming(true));

    assert_eq!(
        console.delete_schedule("job-1"),
        ScheduleOutcome::Done("Schedule removed.".to_string())
    );
    let routes: Vec<String> = console
        .gateway()
        .transport()
        .sent()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(routes, vec!["DELETE /schedule", "GET /schedule"]);
    let deletes = console.gateway().transport().sent_to("DELETE /schedule");
    assert_eq!(deletes[0].query, vec![("id", "job-1".to_string())]);
    assert_eq!(console.schedules.jobs(), &JobList::Empty);
    assert_eq!(console.frontend().alerts, vec!["Schedule removed."]);
}

#[test]
fn simulated_schedule_forces_sample_log_without_password() {
    let transport = FakeTransport::new()
        .reply("POST /schedule", r#"{"success": true, "message": "Scheduled."}"#)
        .reply("GET /schedule", r#"{"jobs": []}"#);
    let mut console = console(transport, RecordingFrontend::new());
    let form = &mut console.session.direct;
    form.server_ip = "test".to_string();
    form.username = "alice".to_string();
    form.search_dir = "/var/log/app/".to_string();

    assert!(matches!(console.schedule("4", "0"), ScheduleOutcome::Done(_)));
    let sent = console.gateway().transport().sent_to("POST /schedule");
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["server_ip"], "TEST");
    assert_eq!(body["log_path"], SIMULATION_LOG_PATH);
    assert!(body.get("password").is_none());
}

#[test]
fn schedule_create_refreshes_job_list() {
    let transport = FakeTransport::new()
        .reply("POST /schedule", r#"{"success": true, "message": "Scheduled daily at 02:30."}"#)
        .reply(
            "GET /schedule",
            r#"{"jobs": [{"id": "job-1", "target": "10.0.0.5", "next_run": "2026-10-19 02:30"}]}"#,
        );
    let mut console = console(transport, RecordingFrontend::new());
    fill_direct(&mut console);

    assert!(matches!(console.schedule("2", "30"), ScheduleOutcome::Done(_)));
    let JobList::Jobs(jobs) = console.schedules.jobs() else {
        panic!("expected jobs, got {:?}", console.schedules.jobs());
    };
    assert_eq!(jobs[0].id, "job-1");
    assert!(console.schedules.submit_button().is_enabled());
}

#[test]
fn schedule_without_time_is_rejected_locally() {
    let mut console = console(FakeTransport::new(), RecordingFrontend::new());
    fill_direct(&mut console);

    assert!(matches!(console.schedule("", ""), ScheduleOutcome::Rejected(_)));
    assert_eq!(console.frontend().alerts, vec!["Please set hour and minute."]);
    assert!(console.gateway().transport().sent().is_empty());
}

// ---------------------------------------------------------------------------
// History, settings, start-up
// ---------------------------------------------------------------------------

#[test]
fn history_failure_shows_error_placeholder() {
    let mut console = console(FakeTransport::new().fail("GET /history"), RecordingFrontend::new());
    console.refresh_history();
    assert_eq!(console.history.table().placeholder(), Some(HISTORY_FAILED));
}

#[test]
fn empty_webhook_is_rejected_locally() {
    let mut console = console(FakeTransport::new(), RecordingFrontend::new());
    console.settings.webhook_url = "   ".to_string();

    assert!(matches!(console.save_settings(), SettingsOutcome::Rejected(_)));
    assert_eq!(console.frontend().alerts, vec!["Please enter a Webhook URL."]);
    assert!(console.gateway().transport().sent().is_empty());
}

#[test]
fn start_preloads_settings_schedules_history_profiles() {
    let transport = FakeTransport::new()
        .reply("GET /settings", r#"{"success": true, "webhook_url": "https://hooks.example/x"}"#)
        .reply("GET /schedule", r#"{"jobs": []}"#)
        .reply("GET /history", r#"{"success": true, "data": []}"#)
        .reply("GET /profiles", PROFILES);
    let mut console = console(transport, RecordingFrontend::new());
    console.start();

    let routes: Vec<String> = console
        .gateway()
        .transport()
        .sent()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(
        routes,
        vec!["GET /settings", "GET /schedule", "GET /history", "GET /profiles"]
    );
    assert!(console.gateway().transport().sent().iter().all(|r| r.method == Method::Get));
    assert_eq!(console.settings.webhook_url, "https://hooks.example/x");
    assert_eq!(console.schedules.jobs(), &JobList::Empty);
    assert_eq!(console.history.table(), &HistoryTable::Empty);
    assert_eq!(console.profiles.profiles().len(), 1);
}
