//! Step 4: hand off to the GUI script.
//!
//! Foreground runs the script on this console and waits. Hidden mode starts it
//! detached through `pythonw` when the venv has one; otherwise it writes a throwaway
//! shim script that starts the console interpreter with no window, runs the shim,
//! and deletes it whatever happened.

use std::{
    io::{self, Write},
    path::Path,
    process::{Command, Stdio},
};

use crate::{
    config::{LaunchMode, LauncherConfig},
    error::{DownstreamKind, SetupError, StepFailure},
    host::Host,
    messages::{message, MessageKind},
    paths,
    venv::{run_step, ActiveEnv},
};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

const SHIM_PREFIX: &str = "noticeforge_launch_";
#[cfg(windows)]
const SHIM_SUFFIX: &str = ".vbs";
#[cfg(not(windows))]
const SHIM_SUFFIX: &str = ".sh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The GUI ran on this console and exited cleanly.
    Finished,
    /// `pythonw` was started and left running.
    Detached,
    /// A temporary shim started the GUI and has been deleted.
    Shim,
}

/// Whether the venv ships a console-less interpreter.
pub fn supports_hidden_launch(env: &ActiveEnv) -> bool {
    env.pythonw.exists()
}

pub fn launch(
    host: &mut impl Host,
    env: &ActiveEnv,
    cfg: &LauncherConfig,
    temp_dir: &Path,
) -> Result<LaunchOutcome, SetupError> {
    let script = paths::gui_script_path(&env.root, cfg);
    if !script.exists() {
        return Err(SetupError::TargetMissing(script));
    }
    host.say(message(cfg.language, MessageKind::Launching));
    tracing::info!(script = %script.display(), mode = ?cfg.launch_mode, "launching");

    match cfg.launch_mode {
        LaunchMode::Foreground => launch_foreground(host, env, cfg, &script),
        LaunchMode::Hidden if supports_hidden_launch(env) => {
            launch_detached(host, env, cfg, &script)
        }
        LaunchMode::Hidden => launch_via_shim(host, env, cfg, &script, temp_dir),
    }
}

fn launch_foreground(
    host: &mut impl Host,
    env: &ActiveEnv,
    cfg: &LauncherConfig,
    script: &Path,
) -> Result<LaunchOutcome, SetupError> {
    let mut cmd = env.python_command();
    cmd.arg(script);
    run_step(host, &mut cmd).map_err(|failure| SetupError::Downstream {
        tool: cfg.gui_script.clone(),
        kind: DownstreamKind::Launch,
        failure,
    })?;
    Ok(LaunchOutcome::Finished)
}

fn launch_detached(
    host: &mut impl Host,
    env: &ActiveEnv,
    cfg: &LauncherConfig,
    script: &Path,
) -> Result<LaunchOutcome, SetupError> {
    let mut cmd = env.command(&env.pythonw);
    cmd.arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    detach(&mut cmd);

    host.spawn_detached(&mut cmd).map_err(|source| SetupError::Downstream {
        tool: cfg.gui_script.clone(),
        kind: DownstreamKind::Launch,
        failure: StepFailure::Spawn {
            program: env.pythonw.to_string_lossy().to_string(),
            source,
        },
    })?;
    host.say(message(cfg.language, MessageKind::LaunchedHidden));
    Ok(LaunchOutcome::Detached)
}

fn launch_via_shim(
    host: &mut impl Host,
    env: &ActiveEnv,
    cfg: &LauncherConfig,
    script: &Path,
    temp_dir: &Path,
) -> Result<LaunchOutcome, SetupError> {
    let shim_failure = |failure: StepFailure| SetupError::Downstream {
        tool: "launch shim".to_string(),
        kind: DownstreamKind::Launch,
        failure,
    };

    let contents = encode_shim(&render_shim(&env.root, &env.python, script), cfg!(windows));
    let shim = write_shim(temp_dir, &contents)
        .map_err(|err| shim_failure(StepFailure::Io(err)))?;
    let shim_path = shim.to_path_buf();
    tracing::info!(shim = %shim_path.display(), "no pythonw in venv, launching through shim");

    let mut cmd = shim_command(env, &shim_path);
    let result = run_step(host, &mut cmd);

    if let Err(err) = shim.close() {
        tracing::warn!(shim = %shim_path.display(), error = %err, "could not delete launch shim");
    }

    result.map_err(shim_failure)?;
    host.say(message(cfg.language, MessageKind::LaunchedHidden));
    Ok(LaunchOutcome::Shim)
}

/// WSH reads a BOM-less `.vbs` in the ANSI code page, so non-ASCII paths only survive
/// as UTF-16LE with a BOM. `sh` takes UTF-8 as is.
fn encode_shim(contents: &str, utf16: bool) -> Vec<u8> {
    if !utf16 {
        return contents.as_bytes().to_vec();
    }
    let mut out = Vec::with_capacity(2 + contents.len() * 2);
    out.extend_from_slice(&[0xFF, 0xFE]);
    for unit in contents.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

fn write_shim(temp_dir: &Path, contents: &[u8]) -> io::Result<tempfile::TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix(SHIM_PREFIX)
        .suffix(SHIM_SUFFIX)
        .tempfile_in(temp_dir)?;
    file.write_all(contents)?;
    file.flush()?;
    // Release the handle so the script host can open the file.
    Ok(file.into_temp_path())
}

#[cfg(windows)]
fn shim_command(env: &ActiveEnv, shim: &Path) -> Command {
    use std::os::windows::process::CommandExt;
    let mut cmd = env.command(Path::new("wscript.exe"));
    cmd.args(["//B", "//Nologo"]).arg(shim);
    cmd.creation_flags(CREATE_NO_WINDOW);
    cmd
}

#[cfg(not(windows))]
fn shim_command(env: &ActiveEnv, shim: &Path) -> Command {
    let mut cmd = env.command(Path::new("sh"));
    cmd.arg(shim);
    cmd
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(any(windows, unix)))]
fn detach(_cmd: &mut Command) {}

fn render_shim(root: &Path, python: &Path, script: &Path) -> String {
    if cfg!(windows) {
        render_vbs(root, python, script)
    } else {
        render_sh(root, python, script)
    }
}

/// `Run` with window style 0 and `False` returns without waiting for the GUI.
fn render_vbs(root: &Path, python: &Path, script: &Path) -> String {
    let command_line = format!("\"{}\" \"{}\"", python.display(), script.display());
    format!(
        "Set shell = CreateObject(\"WScript.Shell\")\r\n\
         shell.CurrentDirectory = {}\r\n\
         shell.Run {}, 0, False\r\n",
        vbs_string(&root.display().to_string()),
        vbs_string(&command_line),
    )
}

fn render_sh(root: &Path, python: &Path, script: &Path) -> String {
    format!(
        "#!/bin/sh\n\
         cd {} || exit 1\n\
         nohup {} {} >/dev/null 2>&1 &\n",
        sh_quote(&root.display().to_string()),
        sh_quote(&python.display().to_string()),
        sh_quote(&script.display().to_string()),
    )
}

fn vbs_string(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
