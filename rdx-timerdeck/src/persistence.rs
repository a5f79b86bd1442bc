//! Snapshot persistence for the timer state.
//!
//! The store hands the whole state to a [`StateRepository`] after every change
//! and asks it once for the stored snapshot at startup. Nothing is written
//! incrementally; a repository only ever sees complete `TimerState` values.

use crate::config::StorageConfig;
use crate::model::TimerState;
use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or saving the state snapshot.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data directory could be determined for this platform")]
    NoDataDir,
}

/// Loads and saves full state snapshots.
pub trait StateRepository: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<TimerState>, StorageError>;

    fn save(&self, state: &TimerState) -> Result<(), StorageError>;
}

/// Stores the snapshot as a single JSON document named after the storage key.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Stores under `<dir>/<key>.json`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Resolves the directory from configuration, falling back to the
    /// platform data directory.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        Ok(Self::new(dir, &config.key))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<TimerState>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), "Loaded state snapshot");
        Ok(Some(state))
    }

    fn save(&self, state: &TimerState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(state)?;
        // Write beside the target, then rename over it, so readers never see half a snapshot.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), "Saved state snapshot");
        Ok(())
    }
}

/// Keeps the serialized snapshot in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut Option<String>) -> T) -> T {
        let mut guard = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl StateRepository for MemoryRepository {
    fn load(&self) -> Result<Option<TimerState>, StorageError> {
        let raw = self.with_slot(|slot| slot.clone());
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &TimerState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        self.with_slot(|slot| *slot = Some(json));
        Ok(())
    }
}

/// The platform data directory for timerdeck, e.g. `~/.local/share/timerdeck` on Linux.
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    ProjectDirs::from("dev", "rustadex", "timerdeck")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(StorageError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TimerId;
    use crate::model::{Category, Timer};
    use crate::store::{transition_at, Action};
    use chrono::{TimeZone, Utc};

    fn sample_state() -> TimerState {
        let t0 = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut state = TimerState::default();
        state.categories.extend(Category::defaults());
        state.timers.push(Timer::new("timer_1", "Standup", 900, "category_work", t0).with_halfway_alert(true));
        state.timers.push(Timer::new("timer_2", "Plank", 60, "category_fitness", t0));
        let state = transition_at(state, Action::StartTimer(TimerId::from("timer_1")), t0);
        transition_at(state, Action::CompleteTimer(TimerId::from("timer_2")), t0)
    }

    #[test]
    fn file_repository_reports_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path(), "timerState");
        assert!(repository.load().unwrap().is_none());
    }

    #[test]
    fn file_repository_round_trips_state() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path().join("nested"), "timerState");
        let state = sample_state();
        repository.save(&state).unwrap();
        assert!(repository.path().ends_with("timerState.json"));
        assert_eq!(repository.load().unwrap(), Some(state));
    }

    #[test]
    fn file_repository_writes_three_collections() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path(), "timerState");
        repository.save(&sample_state()).unwrap();
        let raw = fs::read_to_string(repository.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timers"].as_array().unwrap().len(), 2);
        assert_eq!(value["categories"].as_array().unwrap().len(), 3);
        assert_eq!(value["logs"][0]["categoryName"], "Fitness");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path(), "timerState");
        fs::write(repository.path(), "{ not json").unwrap();
        assert!(matches!(repository.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn memory_repository_round_trips_state() {
        let repository = MemoryRepository::new();
        assert!(repository.load().unwrap().is_none());
        let state = sample_state();
        repository.save(&state).unwrap();
        assert_eq!(repository.clone().load().unwrap(), Some(state));
    }
}
