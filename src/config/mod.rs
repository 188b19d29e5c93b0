//! Typed configuration from environment variables.
//!
//! Loads once at startup. The project plan (phase totals and critical path)
//! lives in a separate TOML file, see [`plan`].

pub mod plan;

use std::path::PathBuf;

use crate::error::{Error, Result};

pub use plan::{CriticalTask, PhaseTotals, Priority, ProjectPlan};

/// Directory used when `PROGRESS_MEMORY_DIR` is not set.
pub const DEFAULT_MEMORY_DIR: &str = "progress_memory";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one JSON file per event.
    pub memory_dir: PathBuf,
    /// Optional TOML project plan. `None` means the built-in plan.
    pub plan_path: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            memory_dir: optional_var("PROGRESS_MEMORY_DIR")?
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMORY_DIR)),
            plan_path: optional_var("PROGRESS_PLAN")?.map(PathBuf::from),
            log_level: optional_var("LOG_LEVEL")?.unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Load the configured project plan, or the built-in one.
    pub fn load_plan(&self) -> Result<ProjectPlan> {
        match &self.plan_path {
            Some(path) => ProjectPlan::from_file(path),
            None => Ok(ProjectPlan::default()),
        }
    }
}

/// Unset is fine; set-but-empty is a mistake worth reporting.
fn optional_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(Error::Config(format!(
            "environment variable {name} is set but empty"
        ))),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(Error::Config(format!(
            "environment variable {name} is not valid unicode"
        ))),
    }
}
