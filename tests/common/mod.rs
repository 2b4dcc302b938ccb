//! Shared test doubles: a scripted transport and a recording frontend.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use pela::gateway::{HttpRequest, Transport, TransportError};
use pela::ui::{ChartHandle, ChartSlot, ChartSpec, Frontend};

// ---------------------------------------------------------------------------
// Scripted transport
// ---------------------------------------------------------------------------

/// Replies with queued bodies keyed by `"METHOD /path"`.
///
/// A request with nothing queued fails like an unreachable backend. Every
/// request is recorded, answered or not.
#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: RefCell<HashMap<String, VecDeque<Result<String, TransportError>>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for `route`, e.g. `"POST /run-analysis"`.
    pub fn reply(self, route: &str, body: &str) -> Self {
        self.push(route, Ok(body.to_string()));
        self
    }

    /// Queue a transport failure for `route`.
    pub fn fail(self, route: &str) -> Self {
        self.push(route, Err(TransportError("connection refused".to_string())));
        self
    }

    pub fn push(&self, route: &str, reply: Result<String, TransportError>) {
        self.replies
            .borrow_mut()
            .entry(route.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    /// Requests sent to `route`, in order.
    pub fn sent_to(&self, route: &str) -> Vec<HttpRequest> {
        self.sent
            .borrow()
            .iter()
            .filter(|r| route_of(r) == route)
            .cloned()
            .collect()
    }
}

fn route_of(request: &HttpRequest) -> String {
    format!("{} {}", request.method, request.path)
}

impl Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<String, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        let route = route_of(request);
        self.replies
            .borrow_mut()
            .get_mut(&route)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError(format!("no reply scripted for {route}"))))
    }
}

// ---------------------------------------------------------------------------
// Recording frontend
// ---------------------------------------------------------------------------

/// Records alerts and chart lifecycles; answers dialogs from a script.
#[derive(Debug, Default)]
pub struct RecordingFrontend {
    pub alerts: Vec<String>,
    pub questions: Vec<String>,
    pub confirm_answers: VecDeque<bool>,
    pub prompt_answers: VecDeque<Option<String>>,
    pub created: Vec<(ChartSlot, ChartSpec)>,
    pub destroyed: Vec<ChartHandle>,
    next_handle: u64,
}

impl RecordingFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm_answers.push_back(answer);
        self
    }

    pub fn answering(mut self, answer: Option<&str>) -> Self {
        self.prompt_answers.push_back(answer.map(str::to_string));
        self
    }

    /// Charts created and not yet destroyed.
    pub fn live_charts(&self) -> usize {
        self.created.len() - self.destroyed.len()
    }
}

impl Frontend for RecordingFrontend {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.confirm_answers.pop_front().unwrap_or(false)
    }

    fn prompt(&mut self, question: &str) -> Option<String> {
        self.questions.push(question.to_string());
        self.prompt_answers.pop_front().flatten()
    }

    fn create_chart(&mut self, slot: ChartSlot, spec: &ChartSpec) -> ChartHandle {
        self.next_handle += 1;
        self.created.push((slot, spec.clone()));
        ChartHandle(self.next_handle)
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        self.destroyed.push(handle);
    }
}
