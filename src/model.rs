//! Core data model.
//!
//! Three kinds of progress are recorded: a task was completed, a technical
//! decision was made, a milestone was reached. Each payload keeps whatever
//! supplementary keys it was given so records round-trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// One of the four fixed project buckets task completions are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Foundation,
    Core,
    Advanced,
    Polish,
}

impl Phase {
    /// All phases in delivery order.
    pub const ALL: [Phase; 4] = [Phase::Foundation, Phase::Core, Phase::Advanced, Phase::Polish];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Foundation => "foundation",
            Phase::Core => "core",
            Phase::Advanced => "advanced",
            Phase::Polish => "polish",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foundation" => Ok(Phase::Foundation),
            "core" => Ok(Phase::Core),
            "advanced" => Ok(Phase::Advanced),
            "polish" => Ok(Phase::Polish),
            other => Err(format!(
                "unknown phase: {other} (expected foundation, core, advanced or polish)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// Hours spent on a task, or a sentinel label such as `"unknown"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationHours {
    Hours(f64),
    Label(String),
}

impl DurationHours {
    pub fn unknown() -> Self {
        DurationHours::Label("unknown".to_string())
    }

    pub fn hours(&self) -> Option<f64> {
        match self {
            DurationHours::Hours(h) => Some(*h),
            DurationHours::Label(_) => None,
        }
    }
}

impl Default for DurationHours {
    fn default() -> Self {
        Self::unknown()
    }
}

impl std::fmt::Display for DurationHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationHours::Hours(h) => write!(f, "{h}h"),
            DurationHours::Label(label) => write!(f, "{label}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A finished task.
///
/// `phase` is kept as free text on the wire: records written with a phase
/// outside the fixed four still load, they just never count toward one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub id: String,
    pub title: String,
    pub phase: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub duration_hours: DurationHours,
    #[serde(default)]
    pub description: String,
    /// Supplementary keys (`source`, `technical_details`, ...). Opaque.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskCompletion {
    /// The phase this task counts toward, if it is one of the fixed four.
    pub fn phase(&self) -> Option<Phase> {
        self.phase.parse().ok()
    }
}

/// A recorded architecture or process decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDecision {
    pub id: String,
    pub title: String,
    pub decision: String,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives_considered: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_saved: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A project milestone and what it delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Builder for a task completion. Required fields go in `new`.
pub struct NewTaskCompletion {
    pub(crate) task: TaskCompletion,
}

impl NewTaskCompletion {
    pub fn new(id: impl Into<String>, title: impl Into<String>, phase: Phase) -> Self {
        Self {
            task: TaskCompletion {
                id: id.into(),
                title: title.into(),
                phase: phase.to_string(),
                category: "development".to_string(),
                duration_hours: DurationHours::unknown(),
                description: String::new(),
                extra: Map::new(),
            },
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.task.category = category.into();
        self
    }

    pub fn hours(mut self, hours: f64) -> Self {
        self.task.duration_hours = DurationHours::Hours(hours);
        self
    }

    pub fn duration_label(mut self, label: impl Into<String>) -> Self {
        self.task.duration_hours = DurationHours::Label(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.task.extra.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> TaskCompletion {
        self.task
    }
}

/// Builder for a technical decision.
pub struct NewTechnicalDecision {
    pub(crate) decision: TechnicalDecision,
}

impl NewTechnicalDecision {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            decision: TechnicalDecision {
                id: id.into(),
                title: title.into(),
                decision: decision.into(),
                reasoning: reasoning.into(),
                alternatives_considered: None,
                impact: None,
                time_saved: None,
                extra: Map::new(),
            },
        }
    }

    pub fn alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decision.alternatives_considered =
            Some(alternatives.into_iter().map(Into::into).collect());
        self
    }

    pub fn impact(mut self, impact: impl Into<String>) -> Self {
        self.decision.impact = Some(impact.into());
        self
    }

    pub fn time_saved(mut self, time_saved: impl Into<String>) -> Self {
        self.decision.time_saved = Some(time_saved.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.decision.extra.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> TechnicalDecision {
        self.decision
    }
}

/// Builder for a milestone.
pub struct NewMilestone {
    pub(crate) milestone: Milestone,
}

impl NewMilestone {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            milestone: Milestone {
                id: id.into(),
                title: title.into(),
                description: description.into(),
                achievements: Vec::new(),
                extra: Map::new(),
            },
        }
    }

    pub fn achievement(mut self, achievement: impl Into<String>) -> Self {
        self.milestone.achievements.push(achievement.into());
        self
    }

    pub fn achievements<I, S>(mut self, achievements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.milestone
            .achievements
            .extend(achievements.into_iter().map(Into::into));
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.milestone.extra.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Milestone {
        self.milestone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phase_parses_and_displays() {
        for phase in Phase::ALL {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
        }
        assert!("meta-tooling".parse::<Phase>().is_err());
    }

    #[test]
    fn duration_accepts_number_or_label() {
        let h: DurationHours = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(h.hours(), Some(1.5));

        let l: DurationHours = serde_json::from_value(json!("auto-tracked")).unwrap();
        assert_eq!(l, DurationHours::Label("auto-tracked".into()));
        assert_eq!(l.hours(), None);
    }

    #[test]
    fn task_keeps_supplementary_keys() {
        let raw = json!({
            "id": "MC-F-DB-001",
            "title": "Multi-tenant PostgreSQL setup with RLS",
            "phase": "foundation",
            "category": "database",
            "duration_hours": 1.5,
            "description": "RLS for tenant isolation",
            "blockers_resolved": ["Database security model"],
        });

        let task: TaskCompletion = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.phase(), Some(Phase::Foundation));
        assert!(task.extra.contains_key("blockers_resolved"));
        assert_eq!(serde_json::to_value(&task).unwrap(), raw);
    }

    #[test]
    fn non_standard_phase_still_loads() {
        let task: TaskCompletion = serde_json::from_value(json!({
            "id": "DASHBOARD_CREATION",
            "title": "Progress dashboard",
            "phase": "meta-tooling",
        }))
        .unwrap();
        assert_eq!(task.phase(), None);
        assert_eq!(task.duration_hours, DurationHours::unknown());
    }

    #[test]
    fn decision_omits_absent_optionals() {
        let d = NewTechnicalDecision::new("D1", "Pick a store", "Files", "Low volume").build();
        let v = serde_json::to_value(&d).unwrap();
        assert!(v.get("impact").is_none());
        assert!(v.get("alternatives_considered").is_none());
    }
}
