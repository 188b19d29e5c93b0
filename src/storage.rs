//! Event log storage.
//!
//! The memory bank is a directory with one JSON file per event. Writing a
//! record never touches another record, so appends need no coordination
//! and a torn write can only damage the record being written. Reads scan
//! the whole directory; event volume is small and reads are infrequent.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::event::{Event, timestamp};
use crate::telemetry::store::{append_span, record_path};

/// Append-only event log. Implementations must keep every appended event
/// as a distinct entry; there is no update and no delete.
pub trait EventLog {
    /// Persist one event. Failures are returned once, never retried.
    fn append(&self, event: &Event) -> Result<()>;

    /// Every readable event, newest first, at most `limit` of them.
    /// Unreadable records are skipped. Never fails.
    fn list_all(&self, limit: usize) -> Vec<Event>;
}

// ---------------------------------------------------------------------------
// Directory-backed store
// ---------------------------------------------------------------------------

/// One pretty-printed JSON file per event under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on the first append, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `event` and return the path it landed at.
    ///
    /// The record is written to a hidden temp file and renamed into place.
    /// If another event already owns the name (same kind, id and
    /// microsecond) a `-N` suffix keeps both.
    pub fn write_record(&self, event: &Event) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Persistence {
            path: self.dir.clone(),
            source,
        })?;

        let body = serde_json::to_vec_pretty(event)?;
        let stem = record_stem(event);

        let tmp = self
            .dir
            .join(format!(".{stem}.{}.tmp", std::process::id()));
        fs::write(&tmp, &body).map_err(|source| Error::Persistence {
            path: tmp.clone(),
            source,
        })?;

        let path = self.unused_path(&stem);
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(Error::Persistence { path, source });
        }

        Ok(path)
    }

    /// Read and decode a single record.
    pub fn read_record(path: &Path) -> Result<Event> {
        let content = fs::read_to_string(path).map_err(|e| Error::Deserialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Deserialization {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn unused_path(&self, stem: &str) -> PathBuf {
        let first = self.dir.join(format!("{stem}.json"));
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| self.dir.join(format!("{stem}-{n}.json")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}

impl EventLog for FileStore {
    fn append(&self, event: &Event) -> Result<()> {
        let span = append_span(event.kind(), event.id());
        let _enter = span.enter();

        match self.write_record(event) {
            Ok(path) => {
                record_path(&span, &path);
                tracing::info!(title = event.title(), "event appended");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "event append failed");
                Err(e)
            }
        }
    }

    fn list_all(&self, limit: usize) -> Vec<Event> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "cannot read memory bank");
                return Vec::new();
            }
        };

        let mut events = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match Self::read_record(&path) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable record"),
            }
        }

        tracing::debug!(dir = %self.dir.display(), count = events.len(), "memory bank scanned");
        newest_first(events, limit)
    }
}

/// `<prefix>_<id>_<timestamp>` with `:` swapped out of the timestamp.
pub fn record_stem(event: &Event) -> String {
    format!(
        "{}_{}_{}",
        event.kind().file_prefix(),
        sanitize_id(event.id()),
        timestamp::format(&event.timestamp).replace(':', "-"),
    )
}

/// Ids are caller-supplied; keep them from escaping the directory.
fn sanitize_id(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local log with the same contract as [`FileStore`] (for testing).
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventLog for MemoryStore {
    fn append(&self, event: &Event) -> Result<()> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event.clone());
        Ok(())
    }

    fn list_all(&self, limit: usize) -> Vec<Event> {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        newest_first(events.clone(), limit)
    }
}

fn newest_first(mut events: Vec<Event>, limit: usize) -> Vec<Event> {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events.truncate(limit);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventPayload;
    use crate::model::{NewTaskCompletion, Phase};
    use chrono::{TimeZone, Utc};

    fn task(id: &str) -> Event {
        Event::new(
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 14, 3).unwrap(),
            EventPayload::TaskCompletion(NewTaskCompletion::new(id, "X", Phase::Core).build()),
        )
    }

    #[test]
    fn stem_uses_prefix_id_and_colon_free_timestamp() {
        assert_eq!(
            record_stem(&task("MC-F-DB-001")),
            "task_MC-F-DB-001_2026-10-19T09-14-03.000000Z"
        );
    }

    #[test]
    fn ids_cannot_escape_the_directory() {
        assert_eq!(sanitize_id("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_id("a b/c"), "a_b_c");
        assert_eq!(sanitize_id(""), "_");
    }

    #[test]
    fn memory_store_orders_and_limits() {
        let store = MemoryStore::new();
        let older = task("A");
        let mut newer = task("B");
        newer.timestamp += chrono::Duration::seconds(5);

        store.append(&older).unwrap();
        store.append(&newer).unwrap();

        let all = store.list_all(10);
        assert_eq!(all.iter().map(Event::id).collect::<Vec<_>>(), ["B", "A"]);
        assert_eq!(store.list_all(1).len(), 1);
        assert!(store.list_all(0).is_empty());
    }
}
