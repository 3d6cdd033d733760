//! In-memory mock for the `ScheduleStore` port

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldplan_core::ScheduleStore;
use fieldplan_domain::{
    FieldPlanError, Intervention, InterventionId, Result as DomainResult, Technician,
};

#[derive(Default)]
struct State {
    interventions: BTreeMap<InterventionId, Intervention>,
    technicians: Vec<Technician>,
    next_id: InterventionId,
    fail_saves: bool,
    fail_deletes: bool,
    fail_loads: bool,
    load_delays: HashMap<NaiveDate, Duration>,
    attached: Vec<(InterventionId, String)>,
}

/// Mock store keeping records in a map.
///
/// Failures can be toggled per operation and week loads can be delayed per
/// week start to reorder concurrent loads deterministically.
#[derive(Default, Clone)]
pub struct MockScheduleStore {
    state: Arc<Mutex<State>>,
}

impl MockScheduleStore {
    pub fn new(technicians: Vec<Technician>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().technicians = technicians;
        store
    }

    /// Seed a record directly, bypassing the engine.
    pub fn with_intervention(self, mut intervention: Intervention) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = intervention.id.unwrap_or(state.next_id);
            intervention.id = Some(id);
            state.next_id = state.next_id.max(id);
            state.interventions.insert(id, intervention);
        }
        self
    }

    pub fn fail_saves(&self, fail: bool) {
        self.state.lock().unwrap().fail_saves = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    pub fn fail_loads(&self, fail: bool) {
        self.state.lock().unwrap().fail_loads = fail;
    }

    pub fn delay_week(&self, week_start: NaiveDate, delay: Duration) {
        self.state.lock().unwrap().load_delays.insert(week_start, delay);
    }

    pub fn get(&self, id: InterventionId) -> Option<Intervention> {
        self.state.lock().unwrap().interventions.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().interventions.len()
    }

    /// Every `attach_external_id` call in order.
    pub fn attached(&self) -> Vec<(InterventionId, String)> {
        self.state.lock().unwrap().attached.clone()
    }
}

#[async_trait]
impl ScheduleStore for MockScheduleStore {
    async fn find_by_week(&self, start: NaiveDate, end: NaiveDate) -> DomainResult<Vec<Intervention>> {
        let delay = self.state.lock().unwrap().load_delays.get(&start).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().unwrap();
        if state.fail_loads {
            return Err(FieldPlanError::Store("database is locked".into()));
        }
        Ok(state
            .interventions
            .values()
            .filter(|i| {
                let day = i.scheduled_start.date_naive();
                day >= start && day <= end
            })
            .cloned()
            .collect())
    }

    async fn save(&self, mut intervention: Intervention) -> DomainResult<Intervention> {
        let mut state = self.state.lock().unwrap();
        if state.fail_saves {
            return Err(FieldPlanError::Store("disk full".into()));
        }

        let id = match intervention.id {
            Some(id) => id,
            None => {
                state.next_id += 1;
                state.next_id
            }
        };
        intervention.id = Some(id);
        if intervention.external_event_id.is_none() {
            intervention.external_event_id =
                state.interventions.get(&id).and_then(|i| i.external_event_id.clone());
        }
        state.interventions.insert(id, intervention.clone());
        Ok(intervention)
    }

    async fn delete(&self, id: InterventionId) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(FieldPlanError::Store("foreign key constraint failed".into()));
        }
        Ok(state.interventions.remove(&id).is_some())
    }

    async fn find_all_technicians(&self) -> DomainResult<Vec<Technician>> {
        Ok(self.state.lock().unwrap().technicians.clone())
    }

    async fn attach_external_id(&self, id: InterventionId, external_event_id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.attached.push((id, external_event_id.to_string()));
        if let Some(intervention) = state.interventions.get_mut(&id) {
            intervention.external_event_id = Some(external_event_id.to_string());
        }
        Ok(())
    }

    async fn detach_external_id(&self, id: InterventionId) -> DomainResult<()> {
        if let Some(intervention) = self.state.lock().unwrap().interventions.get_mut(&id) {
            intervention.external_event_id = None;
        }
        Ok(())
    }
}
