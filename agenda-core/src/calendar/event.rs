//! Calendar event types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a calendar event, either assigned by the backend or synthesized locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    /// A client-side identifier for an event the backend has not seen yet.
    pub fn synthetic() -> Self {
        EventId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::new(id)
    }
}

/// Owner of an event as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// A calendar event.
///
/// `id` is `None` for a draft that has never been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "bgColor", default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<EventUser>,
}

impl CalendarEvent {
    pub fn new(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        CalendarEvent {
            id: None,
            title: title.to_string(),
            notes: None,
            start,
            end,
            bg_color: None,
            user: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_synthetic_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| EventId::synthetic()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_parses_backend_event_json() {
        let json = r##"{
            "_id": "65fe0c1fc0e70b851f35af2a",
            "title": "Cumpleaños del jefe",
            "notes": "Hay que comprar el pastel",
            "start": "2024-03-22T20:00:00.000Z",
            "end": "2024-03-22T22:00:00.000Z",
            "bgColor": "#fafafa",
            "user": { "_id": "65fe0b60c0e70b851f35af23", "name": "Test User" }
        }"##;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, Some(EventId::from("65fe0c1fc0e70b851f35af2a")));
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 3, 22, 20, 0, 0).unwrap());
        assert_eq!(event.bg_color.as_deref(), Some("#fafafa"));
        assert_eq!(event.user.unwrap().name, "Test User");
    }

    #[test]
    fn test_draft_omits_id_when_serialized() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        let draft = CalendarEvent::new("Standup", start, start);

        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("_id").is_none());
        assert!(!draft.is_saved());
        assert!(draft.with_id("abc").is_saved());
    }
}
