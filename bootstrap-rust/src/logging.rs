use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::paths;

/// Creates `<root>/logs/<file_name>`.
pub fn open_log_file(root: &Path, file_name: &str) -> Result<(PathBuf, fs::File)> {
    let dir = paths::logs_dir(root);
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let log_path = dir.join(file_name);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("open {}", log_path.display()))?;
    Ok((log_path, file))
}

/// Routes `tracing` output to the log file. Console output stays reserved for the
/// localized status lines.
pub fn init(root: &Path, file_name: &str, level: &str) -> Result<PathBuf> {
    let (log_path, file) = open_log_file(root, file_name)?;
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init in the same process (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        root = %root.display(),
        "logging initialised"
    );
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_file_creates_logs_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let (log_path, _file) = open_log_file(tmp.path(), "launcher.log").unwrap();
        assert!(log_path.exists());
        assert_eq!(log_path, paths::logs_dir(tmp.path()).join("launcher.log"));
    }

    #[test]
    fn init_accepts_bad_filter() {
        let tmp = tempfile::tempdir().unwrap();
        let log_path = init(tmp.path(), "importer.log", "not a [filter").unwrap();
        assert!(log_path.exists());
    }
}
