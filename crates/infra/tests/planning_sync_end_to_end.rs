//! End-to-end: planning engine → sync worker → HTTP gateway → store
//!
//! Uses the in-memory store and a WireMock calendar so the whole chain runs
//! with real adapters.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use fieldplan_core::{EngineNotice, PlanningEngine, SyncOutcome, SyncReport};
use fieldplan_domain::{Config, InterventionDetails, InterventionStatus, SyncConfig, Technician};
use fieldplan_infra::{HttpCalendarGateway, InMemoryScheduleStore};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_synced(engine: &mut PlanningEngine, count: usize) -> Vec<SyncReport> {
    let mut reports = Vec::new();
    while reports.len() < count {
        let notice = tokio::time::timeout(Duration::from_secs(5), engine.next_notice())
            .await
            .expect("timed out waiting for sync report")
            .expect("engine channels closed");
        if let EngineNotice::Synced(report) = notice {
            reports.push(report);
        }
    }
    reports
}

fn config(server: &MockServer) -> Config {
    Config {
        sync: SyncConfig {
            calendar_base_url: server.uri(),
            access_token: Some("e2e".into()),
            max_attempts: 1,
            ..SyncConfig::default()
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn assign_reschedule_complete_and_remove() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "gcal-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/calendars/primary/events/gcal-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "gcal-1" })))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/calendars/primary/events/gcal-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let store = Arc::new(InMemoryScheduleStore::new(vec![Technician::new(1, "Alice Martin")]));
    let gateway = Arc::new(HttpCalendarGateway::new(&config.sync)?);
    let mut engine = PlanningEngine::with_gateway(store.clone(), gateway, &config);

    engine.load_technicians().await?;
    engine.load_week(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()).await?;

    let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
    let saved = engine
        .assign(1, start, 2.0, InterventionDetails::new("Boulangerie Roux", "Maintenance"))
        .await?;
    let id = saved.id.unwrap();
    let reports = wait_synced(&mut engine, 1).await;
    assert_eq!(reports[0].outcome, SyncOutcome::Linked { external_event_id: "gcal-1".into() });
    assert_eq!(store.get(id).unwrap().external_event_id.as_deref(), Some("gcal-1"));

    engine.reschedule(id, start + chrono::Duration::hours(4), 2.0).await?;
    engine.change_status(id, InterventionStatus::InProgress).await?;
    engine.change_status(id, InterventionStatus::Done).await?;
    let reports = wait_synced(&mut engine, 3).await;
    assert!(reports.iter().all(|r| matches!(r.outcome, SyncOutcome::Updated { .. })));

    let stored = store.get(id).unwrap();
    assert_eq!(stored.status, InterventionStatus::Done);
    assert_eq!(stored.external_event_id.as_deref(), Some("gcal-1"));
    assert!(stored.actual_end_time.is_some());

    engine.remove(id).await?;
    let reports = wait_synced(&mut engine, 1).await;
    assert_eq!(reports[0].outcome, SyncOutcome::Deleted { external_event_id: "gcal-1".into() });
    assert!(store.is_empty());

    engine.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn calendar_outage_never_blocks_local_planning() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config(&server);
    let store = Arc::new(InMemoryScheduleStore::new(vec![Technician::new(1, "Alice Martin")]));
    let gateway = Arc::new(HttpCalendarGateway::new(&config.sync)?);
    let mut engine = PlanningEngine::with_gateway(store.clone(), gateway, &config);
    engine.load_technicians().await?;
    engine.load_week(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()).await?;

    let start = Utc.with_ymd_and_hms(2024, 3, 5, 13, 0, 0).unwrap();
    let saved = engine
        .assign(1, start, 1.0, InterventionDetails::new("Garage Central", "Inspection"))
        .await?;

    let reports = wait_synced(&mut engine, 1).await;
    assert!(reports[0].is_failure());
    assert_eq!(engine.current_week().len(), 1);
    assert!(store.get(saved.id.unwrap()).unwrap().external_event_id.is_none());
    assert_eq!(engine.statistics().total, 1);

    engine.shutdown().await?;
    Ok(())
}
