use std::{path::Path, process::Command};

use noticeforge_bootstrap::{
    error::{DownstreamKind, StepFailure},
    host::strip_line_ending,
    message, paths, report_failure,
    venv::{self, run_step},
    Host, LauncherConfig, MessageKind, SetupError, SystemHost,
};

/// Flag `egov_downloader.py` takes for a bulk import from a local folder.
pub const IMPORT_ALL_DIR_FLAG: &str = "--import-all-dir";

pub fn run(root: &Path, cfg: &LauncherConfig) -> u8 {
    run_with_host(root, cfg, &mut SystemHost)
}

pub fn run_with_host(root: &Path, cfg: &LauncherConfig, host: &mut impl Host) -> u8 {
    match import(host, root, cfg) {
        Ok(()) => {
            host.say(message(cfg.language, MessageKind::ImportDone));
            host.pause(message(cfg.language, MessageKind::PressEnter));
            0
        }
        Err(err) => report_failure(host, cfg.language, &err),
    }
}

pub fn import(host: &mut impl Host, root: &Path, cfg: &LauncherConfig) -> Result<(), SetupError> {
    let line = host
        .read_line(message(cfg.language, MessageKind::ImportPrompt))
        .map_err(|err| {
            tracing::warn!(error = %err, "could not read folder path");
            SetupError::MissingInput
        })?;
    let folder = strip_line_ending(&line);
    if folder.is_empty() {
        return Err(SetupError::MissingInput);
    }

    host.say(message(cfg.language, MessageKind::Importing));
    tracing::info!(folder = %folder, "importing folder");

    let mut cmd = downloader_command(root, cfg);
    cmd.arg(IMPORT_ALL_DIR_FLAG).arg(folder);
    run_step(host, &mut cmd).map_err(|failure: StepFailure| SetupError::Downstream {
        tool: cfg.downloader_script.clone(),
        kind: DownstreamKind::Import,
        failure,
    })
}

/// The venv interpreter when one exists, otherwise the base interpreter.
fn downloader_command(root: &Path, cfg: &LauncherConfig) -> Command {
    let script = paths::downloader_script_path(root, cfg);
    let mut cmd = match venv::activate_with_path(root, cfg, std::env::var_os("PATH")) {
        Ok(env) => env.python_command(),
        Err(err) => {
            tracing::info!(reason = %err, "no usable venv, falling back to base python");
            let mut c = Command::new(&cfg.base_python);
            c.current_dir(root);
            c
        }
    };
    cmd.arg(script);
    cmd
}
