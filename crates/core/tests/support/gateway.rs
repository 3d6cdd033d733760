//! Recording mock for the `CalendarGateway` port

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fieldplan_core::CalendarGateway;
use fieldplan_domain::{FieldPlanError, Intervention, InterventionId, Result as DomainResult};

/// One gateway call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Create(InterventionId),
    Update(String, InterventionId),
    Delete(String),
}

#[derive(Default)]
struct State {
    calls: Vec<GatewayCall>,
    next_event: u32,
    unreachable: bool,
    missing_events: Vec<String>,
}

/// Mock calendar that hands out `evt-1`, `evt-2`, ... and records every call.
///
/// `set_unreachable(true)` makes every call fail with a network error, the
/// way an offline calendar service would.
#[derive(Default, Clone)]
pub struct RecordingGateway {
    state: Arc<Mutex<State>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    /// Make the remote side forget an event, as if deleted by hand.
    pub fn forget_event(&self, external_event_id: &str) {
        self.state.lock().unwrap().missing_events.push(external_event_id.to_string());
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn create_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, GatewayCall::Create(_))).count()
    }
}

fn offline() -> FieldPlanError {
    FieldPlanError::Network("calendar service unreachable".into())
}

#[async_trait]
impl CalendarGateway for RecordingGateway {
    async fn create(&self, intervention: &Intervention) -> DomainResult<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Create(intervention.id.unwrap_or_default()));
        if state.unreachable {
            return Err(offline());
        }
        state.next_event += 1;
        Ok(format!("evt-{}", state.next_event))
    }

    async fn update(&self, external_event_id: &str, intervention: &Intervention) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(GatewayCall::Update(external_event_id.to_string(), intervention.id.unwrap_or_default()));
        if state.unreachable {
            return Err(offline());
        }
        if state.missing_events.iter().any(|e| e == external_event_id) {
            return Err(FieldPlanError::NotFound(format!("event {external_event_id}")));
        }
        Ok(())
    }

    async fn delete(&self, external_event_id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(GatewayCall::Delete(external_event_id.to_string()));
        if state.unreachable {
            return Err(offline());
        }
        Ok(())
    }
}
