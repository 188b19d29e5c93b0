//! Producer interface. The public API for recording progress.
//!
//! The tracker stamps each event with the current time, hands it to the
//! log and returns the materialized event. It holds no state of its own;
//! the log is passed in by whoever owns it.

use chrono::Utc;

use crate::error::Result;
use crate::event::{Event, EventPayload};
use crate::model::*;
use crate::storage::EventLog;

/// `source` value stamped on events recorded by the workflow hooks.
pub const HOOK_SOURCE: &str = "integration_hook";

pub struct Tracker<'a, L: EventLog + ?Sized> {
    log: &'a L,
}

impl<'a, L: EventLog + ?Sized> Tracker<'a, L> {
    pub fn new(log: &'a L) -> Self {
        Self { log }
    }

    /// Record a completed task.
    pub fn record_task_completion(&self, new: NewTaskCompletion) -> Result<Event> {
        self.record(EventPayload::TaskCompletion(new.task))
    }

    /// Record a technical decision.
    pub fn record_technical_decision(&self, new: NewTechnicalDecision) -> Result<Event> {
        self.record(EventPayload::TechnicalDecision(new.decision))
    }

    /// Record a milestone.
    pub fn record_milestone(&self, new: NewMilestone) -> Result<Event> {
        self.record(EventPayload::Milestone(new.milestone))
    }

    fn record(&self, payload: EventPayload) -> Result<Event> {
        let event = Event::new(Utc::now(), payload);
        self.log.append(&event)?;
        Ok(event)
    }

    // -----------------------------------------------------------------------
    // Workflow hooks
    // -----------------------------------------------------------------------

    /// A todo item was ticked off in the development workflow.
    ///
    /// Without a phase the task is recorded as `"unknown"` and shows up in
    /// the feed without counting toward any phase.
    pub fn track_todo_completion(
        &self,
        todo_id: &str,
        title: &str,
        phase: Option<Phase>,
        category: &str,
    ) -> Result<Event> {
        let mut new = NewTaskCompletion::new(todo_id, title, phase.unwrap_or(Phase::Foundation))
            .category(category)
            .duration_label("auto-tracked")
            .description(format!("Automatically tracked completion of {title}"))
            .extra("source", HOOK_SOURCE);
        if phase.is_none() {
            new.task.phase = "unknown".to_string();
        }
        self.record_task_completion(new)
    }

    /// A decision was made during development. An empty `impact` is omitted.
    pub fn track_technical_decision(
        &self,
        decision_id: &str,
        title: &str,
        decision: &str,
        reasoning: &str,
        impact: &str,
    ) -> Result<Event> {
        let mut new = NewTechnicalDecision::new(decision_id, title, decision, reasoning)
            .extra("source", HOOK_SOURCE);
        if !impact.is_empty() {
            new = new.impact(impact);
        }
        self.record_technical_decision(new)
    }

    pub fn track_milestone(
        &self,
        milestone_id: &str,
        title: &str,
        description: &str,
        achievements: &[String],
    ) -> Result<Event> {
        let new = NewMilestone::new(milestone_id, title, description)
            .achievements(achievements.iter().cloned())
            .extra("source", HOOK_SOURCE);
        self.record_milestone(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn record_returns_what_was_stored() {
        let store = MemoryStore::new();
        let tracker = Tracker::new(&store);

        let event = tracker
            .record_task_completion(
                NewTaskCompletion::new("T1", "X", Phase::Core)
                    .category("backend")
                    .hours(2.5),
            )
            .unwrap();

        let stored = store.list_all(10);
        assert_eq!(stored, vec![event]);
    }

    #[test]
    fn todo_hook_without_phase_records_unknown() {
        let store = MemoryStore::new();
        let tracker = Tracker::new(&store);

        let event = tracker
            .track_todo_completion("DASHBOARD_CREATION", "Progress dashboard", None, "tools")
            .unwrap();

        let task = event.as_task().unwrap();
        assert_eq!(task.phase, "unknown");
        assert_eq!(task.phase(), None);
        assert_eq!(task.duration_hours, DurationHours::Label("auto-tracked".into()));
        assert_eq!(task.description, "Automatically tracked completion of Progress dashboard");
        assert_eq!(task.extra["source"], HOOK_SOURCE);
    }
}
