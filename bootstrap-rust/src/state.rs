use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, UNIX_EPOCH},
};

use crate::fs_ops;

pub const STATE_FILE_NAME: &str = "noticeforge-install.json";

/// What the last successful `pip install -r` saw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallState {
    pub requirements: String,
    pub manifest_mtime_unix: u64,
}

impl InstallState {
    pub fn matches(&self, requirements: &str, manifest_mtime_unix: u64) -> bool {
        self.requirements == requirements
            && manifest_mtime_unix != 0
            && self.manifest_mtime_unix == manifest_mtime_unix
    }
}

pub fn state_path(venv: &Path) -> PathBuf {
    venv.join(STATE_FILE_NAME)
}

/// Zero when the file is missing, so a missing manifest never counts as unchanged.
pub fn file_mtime_unix(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Ok(0);
    }
    let meta = fs::metadata(path).with_context(|| format!("metadata {}", path.display()))?;
    let mtime = meta.modified().context("modified time")?;
    Ok(mtime
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs())
}

/// `None` for a missing or unreadable state file; a stale file just forces a reinstall.
pub fn read_state(state_path: &Path) -> Option<InstallState> {
    let s = fs::read_to_string(state_path).ok()?;
    match serde_json::from_str(&s) {
        Ok(st) => Some(st),
        Err(err) => {
            tracing::warn!(path = %state_path.display(), error = %err, "ignoring unreadable install state");
            None
        }
    }
}

pub fn write_state(state_path: &Path, state: &InstallState) -> Result<()> {
    let contents = serde_json::to_string_pretty(state).context("serialize install state")?;
    fs_ops::write_bytes_atomic(state_path, contents.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_state() {
        let tmp = tempfile::tempdir().unwrap();
        let path = state_path(tmp.path());
        let st = InstallState {
            requirements: "requirements.txt".to_string(),
            manifest_mtime_unix: 1_700_000_000,
        };
        write_state(&path, &st).unwrap();
        assert_eq!(read_state(&path), Some(st));
    }

    #[test]
    fn corrupt_state_reads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = state_path(tmp.path());
        fs::write(&path, "{not json").unwrap();
        assert_eq!(read_state(&path), None);
    }

    #[test]
    fn zero_mtime_never_matches() {
        let st = InstallState {
            requirements: "requirements.txt".to_string(),
            manifest_mtime_unix: 0,
        };
        assert!(!st.matches("requirements.txt", 0));
        let st = InstallState {
            manifest_mtime_unix: 42,
            ..st
        };
        assert!(st.matches("requirements.txt", 42));
        assert!(!st.matches("other.txt", 42));
        assert!(!st.matches("requirements.txt", 43));
    }

    #[test]
    fn missing_file_has_zero_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(file_mtime_unix(&tmp.path().join("nope.txt")).unwrap(), 0);
    }
}
