//! Calendar export.
//!
//! Sends the day's scheduled blocks (everything except open time) to an
//! external calendar as timed events. Authorization happens elsewhere; this
//! module only needs a bearer token.

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::keyring_store;
use crate::error::{CalendarError, Result};
use crate::schedule::ScheduleBlock;
use crate::storage::{CalendarConfig, RowStore, SpaceStore};

/// Keyring entry holding the calendar access token.
pub const TOKEN_KEY: &str = "calendar_access_token";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One event to create, in local wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventPayload {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CalendarEventPayload {
    /// Google Calendar event resource with times in `time_zone`.
    pub fn to_event_json(&self, time_zone: &str) -> serde_json::Value {
        json!({
            "summary": self.summary,
            "description": self.description,
            "start": {
                "dateTime": self.start.format(DATETIME_FORMAT).to_string(),
                "timeZone": time_zone,
            },
            "end": {
                "dateTime": self.end.format(DATETIME_FORMAT).to_string(),
                "timeZone": time_zone,
            },
        })
    }
}

/// Map blocks to event payloads on `date`, dropping open time.
pub fn export_payloads(date: NaiveDate, blocks: &[ScheduleBlock]) -> Vec<CalendarEventPayload> {
    blocks
        .iter()
        .filter(|b| b.kind.is_exportable())
        .map(|b| CalendarEventPayload {
            summary: b.title.clone(),
            description: format!("Caregiver: {}", b.caregiver),
            start: b.start.on_date(date),
            end: b.end.on_date(date),
        })
        .collect()
}

/// Source of a bearer token for the calendar API.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Result<String, CalendarError>;
}

/// Token stored in the OS keyring by `napwise calendar connect`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringTokenSource;

impl KeyringTokenSource {
    pub fn store(token: &str) -> Result<(), CalendarError> {
        keyring_store::set(TOKEN_KEY, token)
    }

    pub fn clear() -> Result<(), CalendarError> {
        keyring_store::delete(TOKEN_KEY)
    }

    pub fn is_connected() -> bool {
        matches!(keyring_store::get(TOKEN_KEY), Ok(Some(_)))
    }
}

impl TokenSource for KeyringTokenSource {
    fn access_token(&self) -> Result<String, CalendarError> {
        keyring_store::get(TOKEN_KEY)?.ok_or(CalendarError::NotConnected)
    }
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn access_token(&self) -> Result<String, CalendarError> {
        Ok(self.0.clone())
    }
}

/// Something that can create and remove calendar events.
#[allow(async_fn_in_trait)]
pub trait CalendarExporter {
    /// Create an event, returning its id.
    async fn insert_event(&self, payload: &CalendarEventPayload) -> Result<String, CalendarError>;

    /// Remove an event. Removing one that no longer exists succeeds.
    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError>;
}

/// Google Calendar v3 exporter.
pub struct GoogleCalendarExporter {
    http_client: Client,
    api_base: String,
    calendar_id: String,
    time_zone: String,
    tokens: Box<dyn TokenSource>,
}

impl GoogleCalendarExporter {
    pub fn new(config: &CalendarConfig, tokens: impl TokenSource + 'static) -> Self {
        Self {
            http_client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            time_zone: config.time_zone.clone(),
            tokens: Box::new(tokens),
        }
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }
}

impl CalendarExporter for GoogleCalendarExporter {
    async fn insert_event(&self, payload: &CalendarEventPayload) -> Result<String, CalendarError> {
        let token = self.tokens.access_token()?;
        let resp = self
            .http_client
            .post(self.events_url())
            .bearer_auth(&token)
            .json(&payload.to_event_json(&self.time_zone))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        body["id"]
            .as_str()
            .map(str::to_string)
            .ok_or(CalendarError::MissingEventId)
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let token = self.tokens.access_token()?;
        let url = format!("{}/{}", self.events_url(), urlencoding::encode(event_id));
        let resp = self
            .http_client
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(CalendarError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Outcome of exporting one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportReport {
    /// Ids of events created by this export
    pub created: Vec<String>,
    /// Events from an earlier export that were removed first
    pub removed: usize,
}

/// Replace the day's exported events with the current schedule.
///
/// Events recorded by an earlier export are removed first, then one event
/// per non-open block is created and the new ids are stored on the day log.
/// The first failure stops the export and is returned; ids created before it
/// are still recorded so the next export cleans them up.
pub async fn export_day<S, E>(
    exporter: &E,
    store: &SpaceStore<S>,
    date: NaiveDate,
    blocks: &[ScheduleBlock],
) -> Result<ExportReport>
where
    S: RowStore,
    E: CalendarExporter,
{
    let mut log = store.log_or_new(date)?;
    let mut report = ExportReport::default();

    let previous = log.exported_events.take().unwrap_or_default();
    for (i, id) in previous.iter().enumerate() {
        if let Err(e) = exporter.delete_event(id).await {
            log.exported_events = Some(previous[i..].to_vec());
            store.save_log(&log)?;
            return Err(e.into());
        }
        report.removed += 1;
    }

    let payloads = export_payloads(date, blocks);
    tracing::info!(date = %date, events = payloads.len(), removed = report.removed, "exporting schedule");

    for payload in &payloads {
        match exporter.insert_event(payload).await {
            Ok(id) => report.created.push(id),
            Err(e) => {
                tracing::warn!(summary = %payload.summary, "calendar export stopped: {e}");
                log.exported_events = Some(report.created.clone());
                store.save_log(&log)?;
                return Err(e.into());
            }
        }
    }

    log.exported_events = Some(report.created.clone());
    store.save_log(&log)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::schedule::BlockKind;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn payloads_skip_open_time() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let blocks = vec![
            ScheduleBlock::new(t("07:00"), t("07:30"), "Wake & Morning Routine", BlockKind::Routine, "Family"),
            ScheduleBlock::new(t("07:30"), t("09:30"), "Open Time", BlockKind::Open, "Anyone"),
            ScheduleBlock::new(t("09:30"), t("11:00"), "Nap 1", BlockKind::Nap, "Sam"),
        ];
        let payloads = export_payloads(date, &blocks);

        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[1].summary, "Nap 1");
        assert_eq!(payloads[1].description, "Caregiver: Sam");
        assert_eq!(payloads[1].start.to_string(), "2026-10-17 09:30:00");
        assert_eq!(payloads[1].end.to_string(), "2026-10-17 11:00:00");
    }

    #[test]
    fn event_json_carries_time_zone() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let payload = CalendarEventPayload {
            summary: "Swim".into(),
            description: "Caregiver: Family".into(),
            start: t("10:00").on_date(date),
            end: t("11:00").on_date(date),
        };
        let body = payload.to_event_json("America/Chicago");
        assert_eq!(body["start"]["dateTime"], "2026-10-17T10:00:00");
        assert_eq!(body["end"]["timeZone"], "America/Chicago");
        assert_eq!(body["summary"], "Swim");
    }

    #[test]
    fn events_url_encodes_calendar_id() {
        let config = CalendarConfig {
            calendar_id: "family@group.calendar.google.com".into(),
            api_base: "https://example.test/v3/".into(),
            ..CalendarConfig::default()
        };
        let exporter = GoogleCalendarExporter::new(&config, StaticToken("x".into()));
        assert_eq!(
            exporter.events_url(),
            "https://example.test/v3/calendars/family%40group.calendar.google.com/events"
        );
    }
}
