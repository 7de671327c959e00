mod importer;

use anyhow::Result;
use noticeforge_bootstrap::{config, logging, message, paths, Host, MessageKind, SystemHost};
use std::process::ExitCode;

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            let lang = config::fallback_language();
            SystemHost.pause(message(lang, MessageKind::PressEnter));
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<u8> {
    let root = paths::root_dir()?;
    let cfg = config::load(&root)?;
    logging::init(&root, "importer.log", &cfg.log_level)?;
    Ok(importer::run(&root, &cfg))
}
