//! HTTP implementation of the `CalendarGateway` port

use async_trait::async_trait;
use fieldplan_core::CalendarGateway;
use fieldplan_domain::{CalendarEventPayload, FieldPlanError, Intervention, Result, SyncConfig};
use reqwest::{Method, Response};
use tracing::{debug, instrument};
use url::Url;

use super::types::{EventBody, RemoteEvent};
use crate::errors::conversions::status_error;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Calendar gateway talking to a Google-Calendar-shaped REST API
#[derive(Clone)]
pub struct HttpCalendarGateway {
    http: HttpClient,
    events_url: Url,
}

impl HttpCalendarGateway {
    /// Build a gateway from the sync settings.
    ///
    /// # Errors
    /// Returns `FieldPlanError::Config` if the base URL is unusable.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let http = HttpClient::from_sync_config(config)?;
        Self::with_client(http, &config.calendar_base_url, &config.calendar_id)
    }

    /// Build a gateway around an existing HTTP client.
    pub fn with_client(http: HttpClient, base_url: &str, calendar_id: &str) -> Result<Self> {
        let mut events_url = Url::parse(base_url).map_err(|e| {
            FieldPlanError::Config(format!("Invalid calendar URL '{base_url}': {e}"))
        })?;
        events_url
            .path_segments_mut()
            .map_err(|()| {
                FieldPlanError::Config(format!("Calendar URL cannot be a base: {base_url}"))
            })?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);

        Ok(Self { http, events_url })
    }

    fn event_url(&self, external_event_id: &str) -> Result<Url> {
        let mut url = self.events_url.clone();
        url.path_segments_mut()
            .map_err(|()| FieldPlanError::Internal("events URL lost its path".into()))?
            .push(external_event_id);
        Ok(url)
    }

    fn body(intervention: &Intervention) -> EventBody {
        EventBody::new(intervention.id, CalendarEventPayload::from(intervention))
    }

    async fn checked(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        debug!(%status, context, detail = %detail, "calendar API rejected request");
        Err(status_error(status, context))
    }
}

#[async_trait]
impl CalendarGateway for HttpCalendarGateway {
    #[instrument(skip(self, intervention), fields(intervention_id = ?intervention.id))]
    async fn create(&self, intervention: &Intervention) -> Result<String> {
        let request =
            self.http.request(Method::POST, self.events_url.clone()).json(&Self::body(intervention));
        let response = self.http.send(request).await?;
        let response = Self::checked(response, "create calendar event").await?;

        let event: RemoteEvent =
            response.json().await.map_err(|e| FieldPlanError::from(InfraError::from(e)))?;
        if event.id.is_empty() {
            return Err(FieldPlanError::InvalidInput("calendar returned an empty event id".into()));
        }
        debug!(external_event_id = %event.id, "calendar event created");
        Ok(event.id)
    }

    #[instrument(skip(self, intervention), fields(intervention_id = ?intervention.id))]
    async fn update(&self, external_event_id: &str, intervention: &Intervention) -> Result<()> {
        let request = self
            .http
            .request(Method::PUT, self.event_url(external_event_id)?)
            .json(&Self::body(intervention));
        let response = self.http.send(request).await?;
        Self::checked(response, "update calendar event").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, external_event_id: &str) -> Result<()> {
        let request = self.http.request(Method::DELETE, self.event_url(external_event_id)?);
        let response = self.http.send(request).await?;
        Self::checked(response, "delete calendar event").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str, calendar_id: &str) -> HttpCalendarGateway {
        let http = HttpClient::builder().build().unwrap();
        HttpCalendarGateway::with_client(http, base, calendar_id).unwrap()
    }

    #[test]
    fn events_url_appends_calendar_path() {
        let gw = gateway("https://www.googleapis.com/calendar/v3", "primary");
        assert_eq!(
            gw.events_url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/primary/events"
        );

        let gw = gateway("http://localhost:9000/", "team@example.com");
        assert_eq!(gw.events_url.as_str(), "http://localhost:9000/calendars/team@example.com/events");
    }

    #[test]
    fn event_ids_are_percent_encoded() {
        let gw = gateway("http://localhost:9000", "primary");
        let url = gw.event_url("abc/def ghi").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/calendars/primary/events/abc%2Fdef%20ghi");
    }

    #[test]
    fn rejects_non_base_urls() {
        let http = HttpClient::builder().build().unwrap();
        let err = HttpCalendarGateway::with_client(http, "mailto:ops@example.com", "primary")
            .err()
            .unwrap();
        assert!(matches!(err, FieldPlanError::Config(_)));
    }
}
