//! Planning engine - authoritative in-memory week and scheduling rules
//!
//! The engine is a single logical owner: every mutation of the week set goes
//! through `&mut self`, so callers with several producers must serialize
//! their requests (an actor task or an external mutex).
//!
//! I/O that must not block the owner runs on background tasks and reports
//! back through single-consumer channels:
//! - week loads ([`PlanningEngine::request_week`]) carry a generation number;
//!   only the most recently requested generation is applied, older results
//!   are discarded (last request wins)
//! - sync completion reports from the [`SyncCoordinator`]
//!
//! [`PlanningEngine::next_notice`] and [`PlanningEngine::drain_notices`]
//! apply those messages on the owning task.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use fieldplan_domain::constants::MAX_INTERVENTION_HOURS;
use fieldplan_domain::{
    hours_to_duration, Config, FieldPlanError, Intervention, InterventionDetails,
    InterventionId, InterventionStatus, PlanningConfig, PlanningError, PlanningResult, Result,
    Technician, TechnicianId, TimeWindow, WeekFilter, WeekRange, WeekSet, WeekStats,
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::conflicts::ensure_free;
use super::ports::ScheduleStore;
use crate::stats::StatisticsAggregator;
use crate::sync::{CalendarGateway, SyncCoordinator, SyncOutcome, SyncReport, SyncReports};

/// Something the engine applied while pumping its inbound channels
#[derive(Debug, Clone, PartialEq)]
pub enum EngineNotice {
    /// The week set was replaced by a completed load.
    WeekReplaced { generation: u64, range: WeekRange, count: usize },
    /// A load finished after a newer one had been requested.
    StaleWeekDiscarded { generation: u64, latest: u64 },
    /// The latest load failed; the previous week set is kept.
    WeekLoadFailed { generation: u64, error: FieldPlanError },
    /// A sync job finished.
    Synced(SyncReport),
}

#[derive(Debug)]
struct WeekLoad {
    generation: u64,
    range: WeekRange,
    result: Result<Vec<Intervention>>,
}

/// Owns the displayed week and enforces the scheduling invariants.
pub struct PlanningEngine {
    store: Arc<dyn ScheduleStore>,
    sync: SyncCoordinator,
    sync_reports: SyncReports,
    week_tx: mpsc::UnboundedSender<WeekLoad>,
    week_rx: mpsc::UnboundedReceiver<WeekLoad>,
    generation: u64,
    requested_range: WeekRange,
    week: WeekSet,
    technicians: Vec<Technician>,
    aggregator: StatisticsAggregator,
    stats: WeekStats,
}

impl PlanningEngine {
    /// Create an engine around an already spawned sync coordinator.
    pub fn new(
        store: Arc<dyn ScheduleStore>,
        sync: SyncCoordinator,
        sync_reports: SyncReports,
        config: &PlanningConfig,
    ) -> Self {
        let (week_tx, week_rx) = mpsc::unbounded_channel();
        let range = WeekRange::containing(Utc::now().date_naive());
        let week = WeekSet::empty(range);
        let aggregator = StatisticsAggregator::new(config.days_per_week);
        let stats = aggregator.compute(&week, &[]);

        Self {
            store,
            sync,
            sync_reports,
            week_tx,
            week_rx,
            generation: 0,
            requested_range: range,
            week,
            technicians: Vec::new(),
            aggregator,
            stats,
        }
    }

    /// Create an engine and spawn its sync coordinator on the current runtime.
    pub fn with_gateway(
        store: Arc<dyn ScheduleStore>,
        gateway: Arc<dyn CalendarGateway>,
        config: &Config,
    ) -> Self {
        let (sync, reports) = SyncCoordinator::spawn(gateway, Arc::clone(&store), &config.sync);
        Self::new(store, sync, reports, &config.planning)
    }

    /* ---------------------------------------------------------------------- */
    /* Reads */
    /* ---------------------------------------------------------------------- */

    /// Current week set. Pure read, never blocks.
    pub fn current_week(&self) -> &WeekSet {
        &self.week
    }

    /// Interventions of the current week matching `filter`.
    pub fn filtered_week(&self, filter: &WeekFilter) -> Vec<&Intervention> {
        self.week.filtered(filter)
    }

    /// Statistics of the current week, recomputed on every change.
    pub fn statistics(&self) -> &WeekStats {
        &self.stats
    }

    /// Roster from the last [`Self::load_technicians`].
    pub fn technicians(&self) -> &[Technician] {
        &self.technicians
    }

    /// Generation of the most recently requested week load.
    pub fn latest_generation(&self) -> u64 {
        self.generation
    }

    /// The coordinator pushing changes to the calendar.
    pub fn sync(&self) -> &SyncCoordinator {
        &self.sync
    }

    /* ---------------------------------------------------------------------- */
    /* Week loading */
    /* ---------------------------------------------------------------------- */

    /// Start loading the Monday–Sunday week containing `anchor`.
    ///
    /// Returns immediately with the load's generation. The result is applied
    /// by [`Self::next_notice`] only if no newer load was requested meanwhile.
    pub fn request_week(&mut self, anchor: NaiveDate) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let range = WeekRange::containing(anchor);
        self.requested_range = range;

        let store = Arc::clone(&self.store);
        let tx = self.week_tx.clone();
        tokio::spawn(async move {
            let result = store.find_by_week(range.start, range.end).await;
            // The engine owns the receiver; a send error means it was dropped.
            let _ = tx.send(WeekLoad { generation, range, result });
        });

        debug!(generation, week_start = %range.start, "week load requested");
        generation
    }

    /// Load the week containing `anchor` and wait until it is displayed.
    pub async fn load_week(&mut self, anchor: NaiveDate) -> PlanningResult<WeekSet> {
        let generation = self.request_week(anchor);
        loop {
            match self.next_notice().await {
                Some(EngineNotice::WeekReplaced { generation: applied, .. })
                    if applied == generation =>
                {
                    return Ok(self.week.clone());
                }
                Some(EngineNotice::WeekLoadFailed { generation: failed, error })
                    if failed == generation =>
                {
                    return Err(PlanningError::LoadFailed(error));
                }
                Some(_) => continue,
                None => {
                    return Err(PlanningError::LoadFailed(FieldPlanError::Internal(
                        "engine channels closed".into(),
                    )));
                }
            }
        }
    }

    /// Load the week before the last requested one.
    pub async fn load_previous_week(&mut self) -> PlanningResult<WeekSet> {
        let anchor = self.requested_range.previous().start;
        self.load_week(anchor).await
    }

    /// Load the week after the last requested one.
    pub async fn load_next_week(&mut self) -> PlanningResult<WeekSet> {
        let anchor = self.requested_range.next().start;
        self.load_week(anchor).await
    }

    /// Load the week containing today (UTC).
    pub async fn load_current_week(&mut self) -> PlanningResult<WeekSet> {
        self.load_week(Utc::now().date_naive()).await
    }

    /// Refresh the technician roster used for assignment checks and occupancy.
    #[instrument(skip(self))]
    pub async fn load_technicians(&mut self) -> PlanningResult<&[Technician]> {
        let technicians =
            self.store.find_all_technicians().await.map_err(PlanningError::LoadFailed)?;
        info!(count = technicians.len(), "technician roster loaded");
        self.technicians = technicians;
        self.refresh_stats();
        Ok(&self.technicians)
    }

    /* ---------------------------------------------------------------------- */
    /* Message pump */
    /* ---------------------------------------------------------------------- */

    /// Wait for the next inbound message and apply it.
    ///
    /// Returns `None` only if every inbound channel is closed.
    pub async fn next_notice(&mut self) -> Option<EngineNotice> {
        tokio::select! {
            Some(load) = self.week_rx.recv() => Some(self.apply_week_load(load)),
            Some(report) = self.sync_reports.recv() => Some(self.apply_sync_report(report)),
            else => None,
        }
    }

    /// Apply every message already queued, without waiting.
    pub fn drain_notices(&mut self) -> Vec<EngineNotice> {
        let mut notices = Vec::new();
        while let Ok(load) = self.week_rx.try_recv() {
            notices.push(self.apply_week_load(load));
        }
        while let Ok(report) = self.sync_reports.try_recv() {
            notices.push(self.apply_sync_report(report));
        }
        notices
    }

    fn apply_week_load(&mut self, load: WeekLoad) -> EngineNotice {
        let WeekLoad { generation, range, result } = load;

        if generation != self.generation {
            debug!(generation, latest = self.generation, "discarding stale week load");
            return EngineNotice::StaleWeekDiscarded { generation, latest: self.generation };
        }

        match result {
            Ok(interventions) => {
                let mut week = WeekSet { range, generation, interventions };
                week.sort();
                let count = week.len();
                self.week = week;
                self.refresh_stats();
                info!(generation, week_start = %range.start, count, "week loaded");
                EngineNotice::WeekReplaced { generation, range, count }
            }
            Err(error) => {
                warn!(generation, week_start = %range.start, error = %error, "week load failed");
                EngineNotice::WeekLoadFailed { generation, error }
            }
        }
    }

    fn apply_sync_report(&mut self, report: SyncReport) -> EngineNotice {
        if let Some(position) = self.week.position(report.intervention_id) {
            let intervention = &mut self.week.interventions[position];
            match &report.outcome {
                SyncOutcome::Unlinked { .. } | SyncOutcome::Deleted { .. } => {
                    intervention.external_event_id = None;
                }
                _ => {
                    if let Some(linked) = report.linked_id() {
                        intervention.external_event_id = Some(linked.to_string());
                    }
                }
            }
        }
        EngineNotice::Synced(report)
    }

    /* ---------------------------------------------------------------------- */
    /* Mutations */
    /* ---------------------------------------------------------------------- */

    /// Book `technician_id` for a new intervention.
    ///
    /// The conflict check covers the in-memory week and, for any day around
    /// the requested slot outside it, the store. It is not transactional
    /// against other writers of the store.
    #[instrument(skip(self, details), fields(client = %details.client_name))]
    pub async fn assign(
        &mut self,
        technician_id: TechnicianId,
        start: DateTime<Utc>,
        duration_hours: f64,
        details: InterventionDetails,
    ) -> PlanningResult<Intervention> {
        validate_duration(duration_hours)?;
        self.ensure_assignable(technician_id)?;

        let candidate = Intervention::planned(technician_id, start, duration_hours, details);
        let stored = self.stored_outside_week(&candidate.window()).await?;
        ensure_free(self.week.iter().chain(&stored), &candidate, None)?;

        let saved = self.store.save(candidate).await.map_err(PlanningError::Store)?;
        info!(intervention_id = ?saved.id, technician_id, %start, duration_hours, "intervention assigned");

        self.upsert_local(saved.clone());
        self.sync.on_created(saved.clone());
        Ok(saved)
    }

    /// Move an intervention to a new slot, possibly into another week.
    #[instrument(skip(self))]
    pub async fn reschedule(
        &mut self,
        id: InterventionId,
        new_start: DateTime<Utc>,
        new_duration_hours: f64,
    ) -> PlanningResult<Intervention> {
        let current = self.find(id)?;
        if current.is_terminal() {
            return Err(PlanningError::TerminalState { id, status: current.status });
        }
        validate_duration(new_duration_hours)?;

        let mut candidate = current.clone();
        candidate.scheduled_start = new_start;
        candidate.duration_hours = new_duration_hours;
        let stored = self.stored_outside_week(&candidate.window()).await?;
        ensure_free(self.week.iter().chain(&stored), &candidate, Some(id))?;

        let saved = self.store.save(candidate).await.map_err(PlanningError::Store)?;
        info!(intervention_id = id, %new_start, new_duration_hours, "intervention rescheduled");

        self.upsert_local(saved.clone());
        self.sync.on_updated(saved.clone());
        Ok(saved)
    }

    /// Move an intervention through the status machine.
    ///
    /// `Done` stamps `actual_end_time` (never earlier than the scheduled
    /// start); every other state clears it.
    #[instrument(skip(self))]
    pub async fn change_status(
        &mut self,
        id: InterventionId,
        new_status: InterventionStatus,
    ) -> PlanningResult<Intervention> {
        let current = self.find(id)?;
        let status = current.status.transition_to(new_status)?;

        let mut candidate = current.clone();
        candidate.status = status;
        candidate.actual_end_time = (status == InterventionStatus::Done)
            .then(|| Utc::now().max(candidate.scheduled_start));

        let saved = self.store.save(candidate).await.map_err(PlanningError::Store)?;
        info!(intervention_id = id, from = %current.status, to = %status, "intervention status changed");

        self.upsert_local(saved.clone());
        self.sync.on_updated(saved.clone());
        Ok(saved)
    }

    /// Delete an intervention.
    ///
    /// The remote event delete is requested first and is best-effort; the
    /// local record goes away regardless of its outcome. A store failure
    /// leaves the week set untouched.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, id: InterventionId) -> PlanningResult<Intervention> {
        let current = self.find(id)?.clone();

        self.sync.on_deleted(current.clone());

        let existed = self.store.delete(id).await.map_err(PlanningError::Store)?;
        if !existed {
            debug!(intervention_id = id, "intervention was already absent from the store");
        }

        self.week.interventions.retain(|i| i.id != Some(id));
        self.refresh_stats();
        info!(intervention_id = id, "intervention removed");
        Ok(current)
    }

    /// Push every intervention of the current week to the calendar again.
    ///
    /// Interventions whose earlier create failed get a fresh create attempt.
    pub fn resync_week(&self) -> usize {
        let mut queued = 0;
        let mut unlinked = 0;
        for intervention in self.week.iter().filter(|i| i.id.is_some()) {
            if !intervention.is_synced() {
                unlinked += 1;
            }
            self.sync.on_updated(intervention.clone());
            queued += 1;
        }
        info!(queued, unlinked, week_start = %self.week.range.start, "week resync requested");
        queued
    }

    /// Stop the sync worker after it drained its queue.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.sync.shutdown().await
    }

    /* ---------------------------------------------------------------------- */
    /* Helpers */
    /* ---------------------------------------------------------------------- */

    fn find(&self, id: InterventionId) -> PlanningResult<&Intervention> {
        self.week.get(id).ok_or(PlanningError::NotFound(id))
    }

    /// Stored interventions that may overlap `window` but live on days the
    /// in-memory week does not cover.
    ///
    /// An intervention never exceeds [`MAX_INTERVENTION_HOURS`], so anything
    /// overlapping `window` starts between that far before it and its end.
    async fn stored_outside_week(&self, window: &TimeWindow) -> PlanningResult<Vec<Intervention>> {
        let earliest = window
            .start
            .checked_sub_signed(hours_to_duration(MAX_INTERVENTION_HOURS))
            .unwrap_or(window.start)
            .date_naive();
        let latest = window.end.date_naive();

        let mut gaps = Vec::new();
        if self.week.generation == 0 {
            // Nothing loaded yet: the placeholder week is empty, not authoritative.
            gaps.push((earliest, latest));
        } else {
            let range = self.week.range;
            if let Some(before) = range.start.pred_opt().filter(|before| earliest <= *before) {
                gaps.push((earliest, latest.min(before)));
            }
            if let Some(after) = range.end.succ_opt().filter(|after| latest >= *after) {
                gaps.push((earliest.max(after), latest));
            }
        }

        let mut stored = Vec::new();
        for (start, end) in gaps {
            let found = self.store.find_by_week(start, end).await.map_err(PlanningError::Store)?;
            debug!(%start, %end, count = found.len(), "checked stored interventions outside the week");
            stored.extend(found);
        }
        Ok(stored)
    }

    fn ensure_assignable(&self, technician_id: TechnicianId) -> PlanningResult<()> {
        let technician = self
            .technicians
            .iter()
            .find(|t| t.id == technician_id)
            .ok_or(PlanningError::UnknownTechnician(technician_id))?;
        if technician.is_assignable() {
            Ok(())
        } else {
            Err(PlanningError::TechnicianUnavailable(technician_id))
        }
    }

    /// Replace or insert a persisted intervention, dropping it from the set
    /// if it no longer belongs to the displayed week.
    fn upsert_local(&mut self, intervention: Intervention) {
        let position = intervention.id.and_then(|id| self.week.position(id));
        let in_week = self.week.range.contains(intervention.scheduled_start);

        match (position, in_week) {
            (Some(position), true) => self.week.interventions[position] = intervention,
            (Some(position), false) => {
                self.week.interventions.remove(position);
            }
            (None, true) => self.week.interventions.push(intervention),
            (None, false) => {}
        }
        self.week.sort();
        self.refresh_stats();
    }

    fn refresh_stats(&mut self) {
        self.stats = self.aggregator.compute(&self.week, &self.technicians);
    }
}

fn validate_duration(hours: f64) -> PlanningResult<()> {
    if hours.is_finite() && hours > 0.0 && hours <= MAX_INTERVENTION_HOURS {
        Ok(())
    } else {
        Err(PlanningError::InvalidDuration(hours))
    }
}
