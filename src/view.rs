//! Read models over the event log.
//!
//! Nothing here is stored. Every call re-reads the full log and derives its
//! answer, so a projection can never disagree with the records behind it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{CriticalTask, ProjectPlan};
use crate::event::Event;
use crate::model::{Milestone, Phase, TechnicalDecision};
use crate::storage::EventLog;

/// Completed vs. planned tasks for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseProgress {
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Complete,
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::InProgress => "in progress",
            PhaseStatus::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

impl PhaseProgress {
    /// Share of `total` done, 0 to 100 (or above, if the plan undercounts).
    pub fn percent(&self) -> f64 {
        percent(self.completed, self.total)
    }

    pub fn status(&self) -> PhaseStatus {
        if self.completed == 0 {
            PhaseStatus::Pending
        } else if self.completed >= self.total {
            PhaseStatus::Complete
        } else {
            PhaseStatus::InProgress
        }
    }
}

/// Sum over the four phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallProgress {
    pub completed: u32,
    pub total: u32,
}

impl OverallProgress {
    pub fn percent(&self) -> f64 {
        percent(self.completed, self.total)
    }
}

fn percent(completed: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(completed) / f64::from(total) * 100.0
    }
}

/// Consumer interface for a presentation layer. Pure reads.
pub struct ProgressView<'a, L: EventLog + ?Sized> {
    log: &'a L,
    plan: &'a ProjectPlan,
}

impl<'a, L: EventLog + ?Sized> ProgressView<'a, L> {
    pub fn new(log: &'a L, plan: &'a ProjectPlan) -> Self {
        Self { log, plan }
    }

    fn all_events(&self) -> Vec<Event> {
        self.log.list_all(usize::MAX)
    }

    /// Completed task count per phase against the plan's totals.
    ///
    /// Tasks whose phase is not one of the four are ignored here.
    pub fn phase_progress(&self) -> BTreeMap<Phase, PhaseProgress> {
        let mut progress: BTreeMap<Phase, PhaseProgress> = Phase::ALL
            .into_iter()
            .map(|phase| {
                (
                    phase,
                    PhaseProgress {
                        completed: 0,
                        total: self.plan.phases.total(phase),
                    },
                )
            })
            .collect();

        for event in self.all_events() {
            if let Some(phase) = event.as_task().and_then(|t| t.phase())
                && let Some(entry) = progress.get_mut(&phase)
            {
                entry.completed += 1;
            }
        }

        progress
    }

    pub fn overall_progress(&self) -> OverallProgress {
        self.phase_progress()
            .values()
            .fold(OverallProgress { completed: 0, total: 0 }, |acc, p| {
                OverallProgress {
                    completed: acc.completed + p.completed,
                    total: acc.total + p.total,
                }
            })
    }

    /// The newest `limit` events of any kind.
    pub fn recent_activity(&self, limit: usize) -> Vec<Event> {
        self.log.list_all(limit)
    }

    /// Every technical decision, newest first, payload only.
    pub fn technical_decisions(&self) -> Vec<TechnicalDecision> {
        self.all_events()
            .into_iter()
            .filter_map(|event| event.as_decision().cloned())
            .collect()
    }

    /// Every milestone, newest first, payload only.
    pub fn milestones(&self) -> Vec<Milestone> {
        self.all_events()
            .into_iter()
            .filter_map(|event| event.as_milestone().cloned())
            .collect()
    }

    /// The configured critical path. Planning data, not derived from the log.
    pub fn critical_path(&self) -> &'a [CriticalTask] {
        &self.plan.critical_path
    }

    /// Task completions per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for event in self.all_events() {
            if let Some(task) = event.as_task() {
                *counts.entry(task.category.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Task completions per UTC calendar day, oldest day first.
    pub fn daily_completions(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for event in self.all_events() {
            if event.as_task().is_some() {
                *counts.entry(event.timestamp.date_naive()).or_insert(0) += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds() {
        let p = |completed, total| PhaseProgress { completed, total };
        assert_eq!(p(0, 68).status(), PhaseStatus::Pending);
        assert_eq!(p(4, 68).status(), PhaseStatus::InProgress);
        assert_eq!(p(68, 68).status(), PhaseStatus::Complete);
        assert_eq!(p(0, 0).status(), PhaseStatus::Pending);
    }

    #[test]
    fn percent_handles_empty_plan() {
        assert_eq!(OverallProgress { completed: 3, total: 0 }.percent(), 0.0);
        assert_eq!(PhaseProgress { completed: 17, total: 68 }.percent(), 25.0);
    }
}
