//! Project plan: static phase totals and the hand-curated critical path.
//!
//! This is planning data, not something derived from the event log. It is
//! loaded from TOML so it can change without touching code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Phase;

/// Top-level TOML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    #[serde(default)]
    pub phases: PhaseTotals,
    #[serde(default)]
    pub critical_path: Vec<CriticalTask>,
}

/// Target task count per phase. Missing phases are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTotals {
    #[serde(default)]
    pub foundation: u32,
    #[serde(default)]
    pub core: u32,
    #[serde(default)]
    pub advanced: u32,
    #[serde(default)]
    pub polish: u32,
}

impl PhaseTotals {
    pub fn total(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Foundation => self.foundation,
            Phase::Core => self.core,
            Phase::Advanced => self.advanced,
            Phase::Polish => self.polish,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// An upcoming task on the critical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalTask {
    pub id: String,
    pub title: String,
    pub phase: Phase,
    pub priority: Priority,
    /// How many other tasks wait on this one.
    #[serde(default)]
    pub blocks: u32,
    #[serde(default)]
    pub description: String,
}

impl ProjectPlan {
    /// Parse a plan from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("bad project plan: {e}")))
    }

    /// Load a plan from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read project plan {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("bad project plan {}: {e}", path.display())))
    }
}

impl Default for ProjectPlan {
    fn default() -> Self {
        Self {
            phases: PhaseTotals {
                foundation: 68,
                core: 148,
                advanced: 86,
                polish: 40,
            },
            critical_path: vec![
                CriticalTask {
                    id: "MC-F-BE-002".to_string(),
                    title: "JWT Authentication System".to_string(),
                    phase: Phase::Foundation,
                    priority: Priority::Critical,
                    blocks: 23,
                    description: "Implement JWT-based authentication for all secure endpoints"
                        .to_string(),
                },
                CriticalTask {
                    id: "MC-F-BE-003".to_string(),
                    title: "Role-Based Access Control (RBAC)".to_string(),
                    phase: Phase::Foundation,
                    priority: Priority::Critical,
                    blocks: 18,
                    description: "Implement RBAC for multi-role users with tenant isolation"
                        .to_string(),
                },
                CriticalTask {
                    id: "MC-C-BE-001".to_string(),
                    title: "Menu Management API".to_string(),
                    phase: Phase::Core,
                    priority: Priority::High,
                    blocks: 12,
                    description: "Core API for menu CRUD operations".to_string(),
                },
            ],
        }
    }
}
