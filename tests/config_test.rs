use std::path::PathBuf;

use progress_bank::config::{Config, DEFAULT_MEMORY_DIR, Priority, ProjectPlan};
use progress_bank::error::Error;
use progress_bank::model::Phase;
use tempfile::TempDir;

const VARS: [&str; 3] = ["PROGRESS_MEMORY_DIR", "PROGRESS_PLAN", "LOG_LEVEL"];

fn clear_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

// One test touches the process environment so they cannot race each other.
#[test]
fn config_from_env() {
    clear_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config.memory_dir, PathBuf::from(DEFAULT_MEMORY_DIR));
    assert_eq!(config.plan_path, None);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.load_plan().unwrap(), ProjectPlan::default());

    unsafe {
        std::env::set_var("PROGRESS_MEMORY_DIR", "/var/lib/progress");
        std::env::set_var("PROGRESS_PLAN", "plan.toml");
        std::env::set_var("LOG_LEVEL", "debug");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.memory_dir, PathBuf::from("/var/lib/progress"));
    assert_eq!(config.plan_path, Some(PathBuf::from("plan.toml")));
    assert_eq!(config.log_level, "debug");

    unsafe { std::env::set_var("PROGRESS_MEMORY_DIR", "  ") };
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    clear_env();
}

#[test]
fn plan_loads_from_toml_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plan.toml");
    std::fs::write(
        &path,
        r#"
[phases]
foundation = 10
core = 20
advanced = 5
polish = 1

[[critical_path]]
id = "MC-F-BE-002"
title = "JWT Authentication System"
phase = "foundation"
priority = "critical"
blocks = 23
description = "JWT auth for secure endpoints"

[[critical_path]]
id = "MC-C-BE-001"
title = "Menu Management API"
phase = "core"
priority = "high"
"#,
    )
    .unwrap();

    let config = Config {
        memory_dir: tmp.path().join("bank"),
        plan_path: Some(path),
        log_level: "info".to_string(),
    };
    let plan = config.load_plan().unwrap();

    assert_eq!(plan.phases.total(Phase::Foundation), 10);
    assert_eq!(plan.phases.total(Phase::Polish), 1);
    assert_eq!(plan.critical_path.len(), 2);
    assert_eq!(plan.critical_path[0].priority, Priority::Critical);
    assert_eq!(plan.critical_path[1].phase, Phase::Core);
    assert_eq!(plan.critical_path[1].blocks, 0);
}

#[test]
fn missing_plan_file_is_a_config_error() {
    let tmp = TempDir::new().unwrap();
    let result = ProjectPlan::from_file(&tmp.path().join("nope.toml"));
    assert!(matches!(result, Err(Error::Config(_))));
}
