//! Process-local `ScheduleStore`
//!
//! Keeps interventions in an ordered map behind a `parking_lot` mutex. Used
//! by integration tests and by embedders that persist elsewhere.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldplan_core::ScheduleStore;
use fieldplan_domain::{FieldPlanError, Intervention, InterventionId, Result, Technician};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct Tables {
    interventions: BTreeMap<InterventionId, Intervention>,
    technicians: Vec<Technician>,
    last_id: InterventionId,
}

/// In-memory schedule store with store-assigned, increasing ids
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    tables: Mutex<Tables>,
}

impl InMemoryScheduleStore {
    pub fn new(technicians: Vec<Technician>) -> Self {
        Self { tables: Mutex::new(Tables { technicians, ..Tables::default() }) }
    }

    /// Replace the technician roster.
    pub fn set_technicians(&self, technicians: Vec<Technician>) {
        self.tables.lock().technicians = technicians;
    }

    pub fn get(&self, id: InterventionId) -> Option<Intervention> {
        self.tables.lock().interventions.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tables.lock().interventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn find_by_week(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Intervention>> {
        if start > end {
            return Err(FieldPlanError::InvalidInput(format!("empty date range {start}..={end}")));
        }

        let tables = self.tables.lock();
        let mut found: Vec<_> = tables
            .interventions
            .values()
            .filter(|i| {
                let day = i.scheduled_start.date_naive();
                day >= start && day <= end
            })
            .cloned()
            .collect();
        found.sort_by_key(|i| (i.scheduled_start, i.id));
        Ok(found)
    }

    async fn save(&self, mut intervention: Intervention) -> Result<Intervention> {
        let mut tables = self.tables.lock();

        let id = match intervention.id {
            Some(id) if tables.interventions.contains_key(&id) => id,
            Some(id) => {
                return Err(FieldPlanError::NotFound(format!("intervention {id}")));
            }
            None => {
                tables.last_id += 1;
                tables.last_id
            }
        };
        intervention.id = Some(id);

        // The sync worker attaches external ids on its own; a snapshot taken
        // before that must not erase it.
        if intervention.external_event_id.is_none() {
            intervention.external_event_id =
                tables.interventions.get(&id).and_then(|stored| stored.external_event_id.clone());
        }

        tables.interventions.insert(id, intervention.clone());
        debug!(intervention_id = id, "intervention saved");
        Ok(intervention)
    }

    async fn delete(&self, id: InterventionId) -> Result<bool> {
        Ok(self.tables.lock().interventions.remove(&id).is_some())
    }

    async fn find_all_technicians(&self) -> Result<Vec<Technician>> {
        Ok(self.tables.lock().technicians.clone())
    }

    async fn attach_external_id(&self, id: InterventionId, external_event_id: &str) -> Result<()> {
        match self.tables.lock().interventions.get_mut(&id) {
            Some(stored) => {
                stored.external_event_id = Some(external_event_id.to_string());
                Ok(())
            }
            None => Err(FieldPlanError::NotFound(format!("intervention {id}"))),
        }
    }

    async fn detach_external_id(&self, id: InterventionId) -> Result<()> {
        if let Some(stored) = self.tables.lock().interventions.get_mut(&id) {
            stored.external_event_id = None;
        }
        Ok(())
    }
}
