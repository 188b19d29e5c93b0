//! Persisted progress events.
//!
//! An event is written once and never changed. On disk each event is one
//! JSON document with exactly three top-level fields:
//!
//! ```json
//! { "timestamp": "2026-10-19T09:14:03.512204Z", "type": "milestone", "data": { ... } }
//! ```
//!
//! `type` and `data` are the wire contract shared with every other reader
//! and writer of the memory bank.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Milestone, TaskCompletion, TechnicalDecision};

/// An immutable record of something that happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// When the event was appended. Microsecond precision, UTC.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    /// What happened.
    #[serde(flatten)]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    TaskCompletion(TaskCompletion),
    TechnicalDecision(TechnicalDecision),
    Milestone(Milestone),
}

/// Discriminator for [`EventPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskCompletion,
    TechnicalDecision,
    Milestone,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::TaskCompletion => "task_completion",
            EventKind::TechnicalDecision => "technical_decision",
            EventKind::Milestone => "milestone",
        }
    }

    /// Leading component of the record's file name.
    pub fn file_prefix(self) -> &'static str {
        match self {
            EventKind::TaskCompletion => "task",
            EventKind::TechnicalDecision => "decision",
            EventKind::Milestone => "milestone",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Event {
    /// Build an event. The timestamp is truncated to the precision it is
    /// stored with, so what the caller holds equals what a reader gets back.
    pub fn new(timestamp: DateTime<Utc>, payload: EventPayload) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(6),
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self.payload {
            EventPayload::TaskCompletion(_) => EventKind::TaskCompletion,
            EventPayload::TechnicalDecision(_) => EventKind::TechnicalDecision,
            EventPayload::Milestone(_) => EventKind::Milestone,
        }
    }

    /// The caller-supplied id. Not unique: replays produce distinct events.
    pub fn id(&self) -> &str {
        match &self.payload {
            EventPayload::TaskCompletion(t) => &t.id,
            EventPayload::TechnicalDecision(d) => &d.id,
            EventPayload::Milestone(m) => &m.id,
        }
    }

    pub fn title(&self) -> &str {
        match &self.payload {
            EventPayload::TaskCompletion(t) => &t.title,
            EventPayload::TechnicalDecision(d) => &d.title,
            EventPayload::Milestone(m) => &m.title,
        }
    }

    pub fn as_task(&self) -> Option<&TaskCompletion> {
        match &self.payload {
            EventPayload::TaskCompletion(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_decision(&self) -> Option<&TechnicalDecision> {
        match &self.payload {
            EventPayload::TechnicalDecision(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_milestone(&self) -> Option<&Milestone> {
        match &self.payload {
            EventPayload::Milestone(m) => Some(m),
            _ => None,
        }
    }
}

/// Serde adapter for event timestamps.
///
/// Writes RFC 3339 with microseconds and a `Z` suffix. Reads RFC 3339, and
/// also naive ISO-8601 without an offset (taken as UTC), which older
/// records in the bank use.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewMilestone, NewTaskCompletion, Phase};
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn wire_shape_has_type_timestamp_data() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 9, 14, 3).unwrap();
        let event = Event::new(
            ts,
            EventPayload::Milestone(NewMilestone::new("M1", "Phase 1 done", "All green").build()),
        );

        let v = serde_json::to_value(&event).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(v["type"], "milestone");
        assert_eq!(v["timestamp"], "2026-10-19T09:14:03.000000Z");
        assert_eq!(v["data"]["id"], "M1");
        assert_eq!(v["data"]["achievements"], json!([]));
    }

    #[test]
    fn reads_naive_legacy_timestamp() {
        let raw = json!({
            "type": "task_completion",
            "timestamp": "2025-07-20T14:03:11.482913",
            "data": {
                "id": "MC-F-BE-001",
                "title": "Node.js/Express server with TypeScript",
                "phase": "foundation",
                "category": "backend",
                "duration_hours": 1.5,
                "description": "Production-ready Express server",
            }
        });

        let event: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(event.kind(), EventKind::TaskCompletion);
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2025, 7, 20, 14, 3, 11).unwrap()
                + chrono::Duration::microseconds(482_913)
        );
    }

    #[test]
    fn rejects_empty_timestamp_and_unknown_type() {
        let empty_ts = json!({"type": "milestone", "timestamp": "", "data": {"id": "x", "title": "y"}});
        assert!(serde_json::from_value::<Event>(empty_ts).is_err());

        let unknown = json!({"type": "retro", "timestamp": "2026-01-01T00:00:00Z", "data": {}});
        assert!(serde_json::from_value::<Event>(unknown).is_err());
    }

    #[test]
    fn new_truncates_to_stored_precision() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(1_234_567);
        let event = Event::new(
            ts,
            EventPayload::TaskCompletion(NewTaskCompletion::new("T1", "X", Phase::Core).build()),
        );

        let back: Event = serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(back, event);
    }
}
