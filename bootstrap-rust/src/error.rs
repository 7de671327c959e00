use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

use crate::{
    host::Host,
    messages::{message, Lang, MessageKind},
};

/// Why a launch sequence stopped. Every variant ends the process with status 1.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("could not create the virtual environment: {0}")]
    EnvCreate(#[source] StepFailure),

    #[error("could not activate the virtual environment at {venv}: {reason}")]
    EnvActivate { venv: PathBuf, reason: String },

    #[error("dependency installation failed during `{step}`: {failure}")]
    DependencyInstall {
        step: &'static str,
        #[source]
        failure: StepFailure,
    },

    #[error("{tool} failed: {failure}")]
    Downstream {
        tool: String,
        kind: DownstreamKind,
        #[source]
        failure: StepFailure,
    },

    #[error("no folder path was entered")]
    MissingInput,

    #[error("launch target not found: {0}")]
    TargetMissing(PathBuf),
}

/// Which user-facing message a downstream failure maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownstreamKind {
    Launch,
    Import,
}

/// How an external command failed.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("exited with {}", describe_code(.code))]
    Exit { code: Option<i32> },

    #[error("{0}")]
    Io(#[from] io::Error),
}

impl StepFailure {
    pub fn from_status(status: ExitStatus) -> Option<Self> {
        if status.success() {
            None
        } else {
            Some(StepFailure::Exit {
                code: status.code(),
            })
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl SetupError {
    pub fn message_kind(&self) -> MessageKind {
        match self {
            SetupError::EnvCreate(_) => MessageKind::EnvCreateFailed,
            SetupError::EnvActivate { .. } => MessageKind::EnvActivateFailed,
            SetupError::DependencyInstall { .. } => MessageKind::InstallFailed,
            SetupError::Downstream {
                kind: DownstreamKind::Launch,
                ..
            } => MessageKind::LaunchFailed,
            SetupError::Downstream {
                kind: DownstreamKind::Import,
                ..
            } => MessageKind::ImportFailed,
            SetupError::MissingInput => MessageKind::ImportEmptyPath,
            SetupError::TargetMissing(_) => MessageKind::TargetMissing,
        }
    }

    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Prints the localized message plus detail, waits for the user, returns the exit code.
pub fn report_failure(host: &mut impl Host, lang: Lang, err: &SetupError) -> u8 {
    tracing::error!(error = %err, "setup step failed");
    host.say(message(lang, err.message_kind()));
    if !matches!(err, SetupError::MissingInput) {
        host.say(&format!("  {err}"));
    }
    host.pause(message(lang, MessageKind::PressEnter));
    err.exit_code()
}
