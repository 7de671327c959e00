//! The three setup steps: ensure the venv exists, activate it, install requirements.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    config::LauncherConfig,
    error::{SetupError, StepFailure},
    host::Host,
    messages::{message, MessageKind},
    paths, state,
};

/// Runs `create` only when `check` reports the resource missing.
/// Returns whether `create` ran.
pub fn ensure<E>(
    check: impl FnOnce() -> bool,
    create: impl FnOnce() -> Result<(), E>,
) -> Result<bool, E> {
    if check() {
        return Ok(false);
    }
    create()?;
    Ok(true)
}

/// Runs `cmd` and turns a spawn error or a non-zero exit into a [`StepFailure`].
pub fn run_step(host: &mut impl Host, cmd: &mut Command) -> Result<(), StepFailure> {
    let program = cmd.get_program().to_string_lossy().to_string();
    tracing::debug!(
        program = %program,
        args = ?cmd.get_args().collect::<Vec<_>>(),
        "running"
    );
    let status = host
        .status(cmd)
        .map_err(|source| StepFailure::Spawn { program, source })?;
    match StepFailure::from_status(status) {
        None => Ok(()),
        Some(failure) => Err(failure),
    }
}

/// Step 1: create the venv with the base interpreter unless its python already exists.
pub fn ensure_env(
    host: &mut impl Host,
    root: &Path,
    cfg: &LauncherConfig,
) -> Result<bool, SetupError> {
    let venv = paths::venv_dir(root, cfg);
    let python = paths::venv_python(&venv);
    let created = ensure(
        || python.exists(),
        || {
            tracing::info!(venv = %venv.display(), base = %cfg.base_python, "creating venv");
            host.say(message(cfg.language, MessageKind::CreatingEnv));
            let mut cmd = Command::new(&cfg.base_python);
            cmd.arg("-m").arg("venv").arg(&venv).current_dir(root);
            run_step(host, &mut cmd).map_err(SetupError::EnvCreate)
        },
    )?;
    if !created {
        tracing::info!(python = %python.display(), "venv present, skipping creation");
    }
    Ok(created)
}

/// An activated venv: the interpreters plus the environment `activate` would set.
#[derive(Debug, Clone)]
pub struct ActiveEnv {
    pub root: PathBuf,
    pub venv: PathBuf,
    pub python: PathBuf,
    pub pythonw: PathBuf,
    pub envs: Vec<(OsString, OsString)>,
}

impl ActiveEnv {
    /// `program` with the venv environment, run from the app root.
    pub fn command(&self, program: &Path) -> Command {
        let mut c = Command::new(program);
        c.current_dir(&self.root)
            .envs(self.envs.iter().cloned())
            .env_remove("PYTHONHOME");
        c
    }

    pub fn python_command(&self) -> Command {
        self.command(&self.python)
    }
}

/// Step 2: the in-process equivalent of sourcing `activate`.
pub fn activate(
    host: &mut impl Host,
    root: &Path,
    cfg: &LauncherConfig,
) -> Result<ActiveEnv, SetupError> {
    host.say(message(cfg.language, MessageKind::ActivatingEnv));
    activate_with_path(root, cfg, std::env::var_os("PATH"))
}

pub fn activate_with_path(
    root: &Path,
    cfg: &LauncherConfig,
    current_path: Option<OsString>,
) -> Result<ActiveEnv, SetupError> {
    let venv = paths::venv_dir(root, cfg);
    let python = paths::venv_python(&venv);
    if !python.exists() {
        return Err(SetupError::EnvActivate {
            venv,
            reason: format!("{} does not exist", python.display()),
        });
    }

    let bin = paths::venv_bin_dir(&venv);
    let mut dirs = vec![bin];
    if let Some(existing) = &current_path {
        dirs.extend(std::env::split_paths(existing));
    }
    let path = std::env::join_paths(dirs).map_err(|err| SetupError::EnvActivate {
        venv: venv.clone(),
        reason: format!("cannot extend PATH: {err}"),
    })?;

    tracing::info!(venv = %venv.display(), "venv activated");
    Ok(ActiveEnv {
        root: root.to_path_buf(),
        pythonw: paths::venv_pythonw(&venv),
        envs: vec![
            (OsString::from("VIRTUAL_ENV"), venv.clone().into_os_string()),
            (OsString::from("PATH"), path),
        ],
        venv,
        python,
    })
}

/// Step 3: upgrade pip, then install the manifest. Returns whether pip ran.
pub fn install_dependencies(
    host: &mut impl Host,
    env: &ActiveEnv,
    cfg: &LauncherConfig,
) -> Result<bool, SetupError> {
    let manifest = paths::requirements_path(&env.root, cfg);
    let state_path = state::state_path(&env.venv);
    let manifest_mtime = state::file_mtime_unix(&manifest).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "cannot stat requirements, forcing install");
        0
    });

    let installed = ensure(
        || {
            cfg.reuse_install
                && state::read_state(&state_path)
                    .is_some_and(|st| st.matches(&cfg.requirements, manifest_mtime))
        },
        || {
            host.say(message(cfg.language, MessageKind::InstallingDeps));

            let mut upgrade = env.python_command();
            upgrade.args(["-m", "pip", "install", "--upgrade", "pip"]);
            run_step(host, &mut upgrade).map_err(|failure| SetupError::DependencyInstall {
                step: "pip install --upgrade pip",
                failure,
            })?;

            let mut install = env.python_command();
            install.args(["-m", "pip", "install", "-r"]).arg(&manifest);
            run_step(host, &mut install).map_err(|failure| SetupError::DependencyInstall {
                step: "pip install -r",
                failure,
            })?;

            let st = state::InstallState {
                requirements: cfg.requirements.clone(),
                manifest_mtime_unix: manifest_mtime,
            };
            if let Err(err) = state::write_state(&state_path, &st) {
                tracing::warn!(error = %err, "could not record install state");
            }
            Ok(())
        },
    )?;

    if !installed {
        tracing::info!(manifest = %manifest.display(), "requirements unchanged, install skipped");
        host.say(message(cfg.language, MessageKind::InstallReused));
    }
    Ok(installed)
}
