//! Calendar wire types
//!
//! Request and response bodies of the events API. Only the fields this
//! integration writes or reads are modelled.

use chrono::{DateTime, SecondsFormat, Utc};
use fieldplan_domain::{CalendarEventPayload, InterventionId};
use serde::{Deserialize, Serialize};

/// Event resource sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub summary: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub extended_properties: ExtendedProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// RFC 3339 timestamp.
    pub date_time: String,
    pub time_zone: String,
}

impl From<DateTime<Utc>> for EventTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self { date_time: at.to_rfc3339_opts(SecondsFormat::Secs, true), time_zone: "UTC".into() }
    }
}

/// Private properties used to trace an event back to its intervention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedProperties {
    pub private: PrivateProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateProperties {
    pub fieldplan_intervention_id: String,
    pub fieldplan_status: String,
    pub fieldplan_color: String,
}

impl EventBody {
    pub fn new(intervention_id: Option<InterventionId>, payload: CalendarEventPayload) -> Self {
        Self {
            summary: payload.summary,
            description: payload.description,
            location: payload.location,
            start: payload.start.into(),
            end: payload.end.into(),
            extended_properties: ExtendedProperties {
                private: PrivateProperties {
                    fieldplan_intervention_id: intervention_id
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                    fieldplan_status: payload.status.to_string(),
                    fieldplan_color: payload.color,
                },
            },
        }
    }
}

/// Event resource returned by the service; only the id matters here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
}
