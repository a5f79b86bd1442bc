//! Exports the history log and hands the file to a share target.

use crate::config::ExportConfig;
use crate::model::TimerLog;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Errors raised while exporting history. None of them touch the store.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize history: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sharing is not available on this device")]
    ShareUnavailable,
}

/// Where an exported file goes once it is written.
pub trait ShareTarget: Send + Sync {
    fn is_available(&self) -> bool;

    fn share(&self, path: &Path) -> Result<(), ExportError>;
}

/// Leaves the file where it was written and reports its location.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevealShare;

impl ShareTarget for RevealShare {
    fn is_available(&self) -> bool {
        true
    }

    fn share(&self, path: &Path) -> Result<(), ExportError> {
        info!(path = %path.display(), "History export ready");
        Ok(())
    }
}

/// A share target for environments without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _path: &Path) -> Result<(), ExportError> {
        Err(ExportError::ShareUnavailable)
    }
}

/// Writes `logs` as pretty-printed JSON to the configured export file and shares it.
///
/// Returns the path of the written file.
pub fn export_logs(
    logs: &[TimerLog],
    config: &ExportConfig,
    share: &dyn ShareTarget,
) -> Result<PathBuf, ExportError> {
    let result = write_and_share(logs, config, share);
    if let Err(e) = &result {
        error!("Error exporting data: {}", e);
    }
    result
}

fn write_and_share(
    logs: &[TimerLog],
    config: &ExportConfig,
    share: &dyn ShareTarget,
) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(logs)?;
    let path = config.target_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, json)?;

    if !share.is_available() {
        return Err(ExportError::ShareUnavailable);
    }
    share.share(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{LogId, TimerId};
    use chrono::{TimeZone, Utc};

    fn log(id: &str) -> TimerLog {
        TimerLog {
            id: LogId::from(id),
            timer_id: TimerId::from("timer_1"),
            timer_name: "Tea".into(),
            category_id: "category_personal".into(),
            category_name: "Personal".into(),
            completed_at: Utc.timestamp_millis_opt(1_000).unwrap(),
            duration: 180,
        }
    }

    fn config_in(dir: &Path) -> ExportConfig {
        ExportConfig {
            directory: Some(dir.to_path_buf()),
            ..ExportConfig::default()
        }
    }

    #[test]
    fn writes_pretty_json_logs() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_logs(&[log("log_1"), log("log_2")], &config_in(dir.path()), &RevealShare).unwrap();
        assert!(path.ends_with("timer_history.json"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  {"));
        let parsed: Vec<TimerLog> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec![log("log_1"), log("log_2")]);
    }

    #[test]
    fn missing_share_target_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_logs(&[log("log_1")], &config_in(dir.path()), &NoShare);
        assert!(matches!(result, Err(ExportError::ShareUnavailable)));
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let result = export_logs(&[log("log_1")], &config_in(&blocker), &RevealShare);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
