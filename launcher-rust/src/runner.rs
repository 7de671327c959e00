use std::path::Path;

use noticeforge_bootstrap::{
    launch::{self, LaunchOutcome},
    report_failure, venv, Host, LauncherConfig, SetupError, SystemHost,
};

pub fn run(root: &Path, cfg: &LauncherConfig) -> u8 {
    run_with_host(root, cfg, &mut SystemHost, &std::env::temp_dir())
}

/// Runs the whole sequence and maps the result to a process exit code.
/// Failures are reported and acknowledged before returning.
pub fn run_with_host(
    root: &Path,
    cfg: &LauncherConfig,
    host: &mut impl Host,
    temp_dir: &Path,
) -> u8 {
    match bootstrap_and_launch(host, root, cfg, temp_dir) {
        Ok(outcome) => {
            tracing::info!(?outcome, "launcher finished");
            0
        }
        Err(err) => report_failure(host, cfg.language, &err),
    }
}

pub fn bootstrap_and_launch(
    host: &mut impl Host,
    root: &Path,
    cfg: &LauncherConfig,
    temp_dir: &Path,
) -> Result<LaunchOutcome, SetupError> {
    venv::ensure_env(host, root, cfg)?;
    let env = venv::activate(host, root, cfg)?;
    venv::install_dependencies(host, &env, cfg)?;
    launch::launch(host, &env, cfg, temp_dir)
}
