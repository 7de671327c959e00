//! Shared plumbing for the NoticeForge launcher and import helper.
//!
//! Everything that touches processes or the console goes through [`host::Host`],
//! so the step sequences in the binaries can be driven by recording fakes in tests.

pub mod config;
pub mod error;
pub mod fs_ops;
pub mod host;
pub mod launch;
pub mod logging;
pub mod messages;
pub mod paths;
pub mod state;
pub mod venv;

pub use config::{LaunchMode, LauncherConfig};
pub use error::{report_failure, SetupError};
pub use host::{Host, SystemHost};
pub use messages::{message, Lang, MessageKind};
