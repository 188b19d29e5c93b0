//! # progress-bank
//!
//! Append-only memory bank for project progress.
//!
//! Task completions, technical decisions and milestones are written as one
//! JSON file each ([`storage`]). The [`tracker`] records them; the [`view`]
//! derives phase progress, the activity feed and the decision log on demand.

pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod storage;
pub mod telemetry;
pub mod tracker;
pub mod view;
