//! Calendar export against a mock Google Calendar API.

use chrono::NaiveDate;
use mockito::{Matcher, Server};
use napwise_core::integrations::{export_day, GoogleCalendarExporter, StaticToken};
use napwise_core::storage::CalendarConfig;
use napwise_core::{BlockKind, CalendarError, ClockTime, CoreError, ScheduleBlock, SpaceStore};
use serde_json::json;

fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn blocks() -> Vec<ScheduleBlock> {
    vec![
        ScheduleBlock::new(t("07:00"), t("07:30"), "Wake & Morning Routine", BlockKind::Routine, "Family"),
        ScheduleBlock::new(t("07:30"), t("09:30"), "Open Time", BlockKind::Open, "Anyone"),
        ScheduleBlock::new(t("09:30"), t("11:00"), "Nap 1", BlockKind::Nap, "Sam"),
    ]
}

fn exporter(server: &Server) -> GoogleCalendarExporter {
    let config = CalendarConfig {
        api_base: server.url(),
        time_zone: "America/Denver".into(),
        ..CalendarConfig::default()
    };
    GoogleCalendarExporter::new(&config, StaticToken("test-token".into()))
}

#[tokio::test]
async fn test_export_creates_one_event_per_scheduled_block() {
    let mut server = Server::new_async().await;
    let routine = server
        .mock("POST", "/calendars/primary/events")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "summary": "Wake & Morning Routine",
            "start": { "dateTime": "2026-10-17T07:00:00", "timeZone": "America/Denver" },
        })))
        .with_status(200)
        .with_body(r#"{"id":"ev-routine"}"#)
        .create_async()
        .await;
    let nap = server
        .mock("POST", "/calendars/primary/events")
        .match_body(Matcher::PartialJson(json!({
            "summary": "Nap 1",
            "description": "Caregiver: Sam",
        })))
        .with_status(200)
        .with_body(r#"{"id":"ev-nap"}"#)
        .create_async()
        .await;

    let store = SpaceStore::open_memory().unwrap();
    let report = export_day(&exporter(&server), &store, date(), &blocks())
        .await
        .unwrap();

    routine.assert_async().await;
    nap.assert_async().await;
    assert_eq!(report.created, vec!["ev-routine", "ev-nap"]);
    assert_eq!(report.removed, 0);

    let log = store.log(date()).unwrap().unwrap();
    assert_eq!(
        log.exported_events,
        Some(vec!["ev-routine".to_string(), "ev-nap".to_string()])
    );
}

#[tokio::test]
async fn test_reexport_removes_previous_events_first() {
    let mut server = Server::new_async().await;
    let store = SpaceStore::open_memory().unwrap();
    store
        .update_log(date(), |log| {
            log.exported_events = Some(vec!["old-1".into(), "old-2".into()]);
        })
        .unwrap();

    // already deleted on the calendar side
    let gone = server
        .mock("DELETE", "/calendars/primary/events/old-1")
        .with_status(410)
        .create_async()
        .await;
    let deleted = server
        .mock("DELETE", "/calendars/primary/events/old-2")
        .with_status(204)
        .create_async()
        .await;
    let created = server
        .mock("POST", "/calendars/primary/events")
        .with_status(200)
        .with_body(r#"{"id":"new"}"#)
        .expect(2)
        .create_async()
        .await;

    let report = export_day(&exporter(&server), &store, date(), &blocks())
        .await
        .unwrap();

    gone.assert_async().await;
    deleted.assert_async().await;
    created.assert_async().await;
    assert_eq!(report.removed, 2);
    assert_eq!(report.created.len(), 2);
}

#[tokio::test]
async fn test_first_failure_stops_export() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("POST", "/calendars/primary/events")
        .with_status(401)
        .with_body("invalid credentials")
        .expect(1)
        .create_async()
        .await;

    let store = SpaceStore::open_memory().unwrap();
    let err = export_day(&exporter(&server), &store, date(), &blocks())
        .await
        .unwrap_err();

    rejected.assert_async().await;
    match err {
        CoreError::Calendar(CalendarError::Rejected { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("unexpected error: {other}"),
    }
    let log = store.log(date()).unwrap().unwrap();
    assert_eq!(log.exported_events, Some(vec![]));
}

#[tokio::test]
async fn test_response_without_id_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/calendars/primary/events")
        .with_status(200)
        .with_body(r#"{"status":"confirmed"}"#)
        .create_async()
        .await;

    let store = SpaceStore::open_memory().unwrap();
    let err = export_day(&exporter(&server), &store, date(), &blocks())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Calendar(CalendarError::MissingEventId)));
}
