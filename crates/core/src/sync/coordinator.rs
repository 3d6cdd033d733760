//! Sync coordinator keeping the external calendar eventually consistent
//!
//! Local mutations are turned into jobs on a single FIFO queue consumed by one
//! background worker, so jobs for the same intervention run in the order the
//! mutations happened. Notification never blocks: `on_*` only enqueue.
//!
//! The worker owns the intervention → external-id linkage. A job whose
//! snapshot carries no external id is resolved against that linkage first,
//! which is what keeps two back-to-back updates from creating two remote
//! events.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fieldplan_core::{CalendarGateway, ScheduleStore, SyncCoordinator};
//! use fieldplan_domain::SyncConfig;
//!
//! # async fn example(
//! #     gateway: Arc<dyn CalendarGateway>,
//! #     store: Arc<dyn ScheduleStore>,
//! #     intervention: fieldplan_domain::Intervention,
//! # ) {
//! let (mut coordinator, mut reports) =
//!     SyncCoordinator::spawn(gateway, store, &SyncConfig::default());
//!
//! coordinator.on_created(intervention);
//! let report = reports.recv().await;
//! coordinator.shutdown().await.ok();
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fieldplan_domain::{FieldPlanError, Intervention, InterventionId, Result, SyncConfig};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::ports::CalendarGateway;
use super::report::{SyncAction, SyncOutcome, SyncReport};
use crate::planning::ports::ScheduleStore;

/// Receiving end of the coordinator's completion signals
pub type SyncReports = mpsc::UnboundedReceiver<SyncReport>;

#[derive(Debug)]
struct SyncJob {
    action: SyncAction,
    intervention: Intervention,
}

/// Fire-and-forget front end of the sync worker.
pub struct SyncCoordinator {
    jobs: Option<mpsc::UnboundedSender<SyncJob>>,
    // Keeps the report channel open even when no worker runs.
    _reports: mpsc::UnboundedSender<SyncReport>,
    worker: Option<JoinHandle<()>>,
    enabled: bool,
    shutdown_timeout: Duration,
}

impl SyncCoordinator {
    /// Spawn the background worker on the current tokio runtime.
    ///
    /// When `config.enabled` is false no worker is started and every
    /// notification is dropped.
    pub fn spawn(
        gateway: Arc<dyn CalendarGateway>,
        store: Arc<dyn ScheduleStore>,
        config: &SyncConfig,
    ) -> (Self, SyncReports) {
        let (report_tx, report_rx) = mpsc::unbounded_channel();

        if !config.enabled {
            info!("calendar sync disabled; local changes will not be pushed");
            return (Self::idle(report_tx, config.shutdown_timeout()), report_rx);
        }

        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let worker = SyncWorker {
            gateway,
            store,
            linkage: HashMap::new(),
            operation_timeout: config.operation_timeout(),
        };
        let handle = tokio::spawn(worker.run(job_rx, report_tx.clone()));

        let coordinator = Self {
            jobs: Some(job_tx),
            _reports: report_tx,
            worker: Some(handle),
            enabled: true,
            shutdown_timeout: config.shutdown_timeout(),
        };
        (coordinator, report_rx)
    }

    /// Coordinator that never talks to a calendar.
    pub fn disabled() -> (Self, SyncReports) {
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let timeout = SyncConfig::default().shutdown_timeout();
        (Self::idle(report_tx, timeout), report_rx)
    }

    fn idle(reports: mpsc::UnboundedSender<SyncReport>, shutdown_timeout: Duration) -> Self {
        Self { jobs: None, _reports: reports, worker: None, enabled: false, shutdown_timeout }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// A new intervention was saved locally.
    pub fn on_created(&self, intervention: Intervention) {
        self.enqueue(SyncAction::Create, intervention);
    }

    /// An existing intervention changed locally (reschedule, status change).
    pub fn on_updated(&self, intervention: Intervention) {
        self.enqueue(SyncAction::Update, intervention);
    }

    /// An intervention is being removed locally.
    pub fn on_deleted(&self, intervention: Intervention) {
        self.enqueue(SyncAction::Delete, intervention);
    }

    fn enqueue(&self, action: SyncAction, intervention: Intervention) {
        let Some(id) = intervention.id else {
            warn!(%action, "ignoring sync request for an unsaved intervention");
            return;
        };

        let Some(jobs) = &self.jobs else {
            debug!(intervention_id = id, %action, "calendar sync inactive; dropping notification");
            return;
        };

        if jobs.send(SyncJob { action, intervention }).is_err() {
            warn!(intervention_id = id, %action, "sync worker has stopped; notification lost");
        }
    }

    /// Stop accepting jobs and wait for the queued ones to finish.
    ///
    /// Already-dispatched calendar writes are never abandoned; the wait is
    /// bounded by the configured shutdown timeout.
    #[instrument(skip(self))]
    pub async fn shutdown(&mut self) -> Result<()> {
        // Dropping the sender lets the worker drain the queue and exit.
        self.jobs = None;

        let Some(handle) = self.worker.take() else {
            return Ok(());
        };

        match tokio::time::timeout(self.shutdown_timeout, handle).await {
            Ok(Ok(())) => {
                info!("sync worker stopped");
                Ok(())
            }
            Ok(Err(err)) => {
                warn!(error = %err, "sync worker task panicked");
                Err(FieldPlanError::Internal(format!("sync worker panicked: {err}")))
            }
            Err(_) => {
                warn!(timeout = ?self.shutdown_timeout, "sync worker did not drain in time");
                Err(FieldPlanError::Internal(format!(
                    "sync worker did not stop within {:?}",
                    self.shutdown_timeout
                )))
            }
        }
    }
}

struct SyncWorker {
    gateway: Arc<dyn CalendarGateway>,
    store: Arc<dyn ScheduleStore>,
    linkage: HashMap<InterventionId, String>,
    operation_timeout: Duration,
}

impl SyncWorker {
    async fn run(
        mut self,
        mut jobs: mpsc::UnboundedReceiver<SyncJob>,
        reports: mpsc::UnboundedSender<SyncReport>,
    ) {
        debug!("sync worker started");
        while let Some(job) = jobs.recv().await {
            let report = self.process(job).await;
            if reports.send(report).is_err() {
                debug!("sync report receiver dropped");
            }
        }
        debug!(linked = self.linkage.len(), "sync queue closed");
    }

    async fn process(&mut self, job: SyncJob) -> SyncReport {
        let SyncJob { action, intervention } = job;
        // enqueue() rejects unsaved interventions
        let id = intervention.id.unwrap_or_default();

        let outcome = match action {
            SyncAction::Create | SyncAction::Update => {
                self.upsert(id, action, &intervention).await
            }
            SyncAction::Delete => self.remove(id, &intervention).await,
        };

        match &outcome {
            SyncOutcome::Failed { error } | SyncOutcome::Unlinked { error } => {
                warn!(
                    intervention_id = id,
                    %action,
                    error = %error,
                    error_kind = error.label(),
                    transient = error.is_transient(),
                    "calendar sync failed; local state kept"
                );
            }
            other => debug!(intervention_id = id, %action, outcome = ?other, "calendar sync done"),
        }

        SyncReport::new(id, action, outcome)
    }

    fn resolve_external_id(&self, id: InterventionId, intervention: &Intervention) -> Option<String> {
        intervention.external_event_id.clone().or_else(|| self.linkage.get(&id).cloned())
    }

    async fn upsert(
        &mut self,
        id: InterventionId,
        action: SyncAction,
        intervention: &Intervention,
    ) -> SyncOutcome {
        match self.resolve_external_id(id, intervention) {
            Some(external_event_id) if action == SyncAction::Create => {
                self.linkage.insert(id, external_event_id);
                SyncOutcome::Skipped { reason: "already linked to a calendar event".into() }
            }
            Some(external_event_id) => self.update(id, external_event_id, intervention).await,
            None => self.create(id, intervention).await,
        }
    }

    async fn create(&mut self, id: InterventionId, intervention: &Intervention) -> SyncOutcome {
        let external_event_id =
            match self.bounded("create", self.gateway.create(intervention)).await {
                Ok(external_event_id) => external_event_id,
                Err(error) => return SyncOutcome::Failed { error },
            };

        self.linkage.insert(id, external_event_id.clone());

        // The remote event exists either way; the linkage map still holds
        // the id for later jobs if persisting it failed.
        if let Err(error) =
            self.bounded("attach", self.store.attach_external_id(id, &external_event_id)).await
        {
            warn!(
                intervention_id = id,
                external_event_id = %external_event_id,
                error = %error,
                "failed to persist calendar event id"
            );
        }

        info!(intervention_id = id, external_event_id = %external_event_id, "calendar event created");
        SyncOutcome::Linked { external_event_id }
    }

    async fn update(
        &mut self,
        id: InterventionId,
        external_event_id: String,
        intervention: &Intervention,
    ) -> SyncOutcome {
        match self.bounded("update", self.gateway.update(&external_event_id, intervention)).await {
            Ok(()) => {
                self.linkage.insert(id, external_event_id.clone());
                SyncOutcome::Updated { external_event_id }
            }
            Err(error @ FieldPlanError::NotFound(_)) => {
                // Remote event vanished; forget it so the next update recreates it.
                self.linkage.remove(&id);
                if let Err(detach_error) =
                    self.bounded("detach", self.store.detach_external_id(id)).await
                {
                    warn!(intervention_id = id, error = %detach_error, "failed to clear calendar event id");
                }
                SyncOutcome::Unlinked { error }
            }
            Err(error) => SyncOutcome::Failed { error },
        }
    }

    async fn remove(&mut self, id: InterventionId, intervention: &Intervention) -> SyncOutcome {
        let resolved = self.resolve_external_id(id, intervention);
        self.linkage.remove(&id);

        let Some(external_event_id) = resolved else {
            return SyncOutcome::Skipped { reason: "no calendar event to delete".into() };
        };

        match self.bounded("delete", self.gateway.delete(&external_event_id)).await {
            Ok(()) | Err(FieldPlanError::NotFound(_)) => SyncOutcome::Deleted { external_event_id },
            Err(error) => SyncOutcome::Failed { error },
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(FieldPlanError::Network(format!(
                "calendar {operation} timed out after {:?}",
                self.operation_timeout
            ))),
        }
    }
}
