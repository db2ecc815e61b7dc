//! Discord scheduled-event wire shape and the derived response view.
//!
//! The event source collaborator hands us the raw REST representation;
//! this module owns reading it. Events are never mutated here — the engine
//! only derives filtered/grouped views over them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata attached to external (non-voice) events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(default)]
    pub location: Option<String>,
}

/// A scheduled event as delivered by the Discord REST binding.
///
/// Instants arrive as ISO-8601 strings; they are kept verbatim and parsed
/// on access, because the API emits both `Z`-suffixed and offset forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_start_time: Option<String>,
    #[serde(default)]
    pub scheduled_end_time: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub status: Option<u8>,
    #[serde(default)]
    pub entity_type: Option<u8>,
    #[serde(default)]
    pub entity_metadata: Option<EntityMetadata>,
}

impl Event {
    /// The start instant, if present and parseable.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.scheduled_start_time.as_deref().and_then(parse_instant)
    }

    /// The end instant, if present and parseable.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.scheduled_end_time.as_deref().and_then(parse_instant)
    }

    /// The external location, if any.
    pub fn location(&self) -> Option<&str> {
        self.entity_metadata
            .as_ref()
            .and_then(|m| m.location.as_deref())
    }
}

/// Lenient ISO-8601 instant parsing: RFC 3339 with offset or `Z`, or a
/// naive datetime which the API contract defines as UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// The flattened event view returned by window resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Present when both start and end instants exist.
    pub duration_minutes: Option<i64>,
    pub creator_id: Option<String>,
    pub status: Option<u8>,
    pub entity_type: Option<u8>,
    pub location: Option<String>,
}

impl EventView {
    /// Build the view, computing the duration when both bounds exist.
    pub fn from_event(event: &Event) -> Self {
        let duration_minutes = match (event.start_instant(), event.end_instant()) {
            (Some(start), Some(end)) => Some((end - start).num_minutes()),
            _ => None,
        };
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            description: event.description.clone(),
            start_time: event.scheduled_start_time.clone(),
            end_time: event.scheduled_end_time.clone(),
            duration_minutes,
            creator_id: event.creator_id.clone(),
            status: event.status,
            entity_type: event.entity_type,
            location: event.location().map(str::to_owned),
        }
    }

    /// The parsed start instant of the view.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start_time.as_deref().and_then(parse_instant)
    }

    /// The parsed end instant of the view.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.end_time.as_deref().and_then(parse_instant)
    }
}
