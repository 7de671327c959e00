use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::LauncherConfig;

pub const ROOT_ENV: &str = "NOTICEFORGE_ROOT";

pub fn self_path() -> Result<PathBuf> {
    std::env::current_exe().context("current_exe")
}

/// Directory holding the scripts, the manifest and the venv.
pub fn root_dir() -> Result<PathBuf> {
    if let Ok(dev_root) = std::env::var(ROOT_ENV) {
        if !dev_root.trim().is_empty() {
            return Ok(PathBuf::from(dev_root));
        }
    }
    let exe = self_path()?;
    Ok(exe.parent().context("exe has no parent")?.to_path_buf())
}

pub fn venv_dir(root: &Path, cfg: &LauncherConfig) -> PathBuf {
    root.join(&cfg.venv_dir)
}

/// `Scripts` on Windows, `bin` everywhere else.
pub fn venv_bin_dir(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts")
    } else {
        venv.join("bin")
    }
}

pub fn venv_python(venv: &Path) -> PathBuf {
    venv_bin_dir(venv).join(exe_name("python"))
}

pub fn venv_pythonw(venv: &Path) -> PathBuf {
    venv_bin_dir(venv).join(exe_name("pythonw"))
}

pub fn requirements_path(root: &Path, cfg: &LauncherConfig) -> PathBuf {
    root.join(&cfg.requirements)
}

pub fn gui_script_path(root: &Path, cfg: &LauncherConfig) -> PathBuf {
    root.join(&cfg.gui_script)
}

pub fn downloader_script_path(root: &Path, cfg: &LauncherConfig) -> PathBuf {
    root.join(&cfg.downloader_script)
}

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join("logs")
}

fn exe_name(stem: &str) -> String {
    format!("{stem}{}", std::env::consts::EXE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn root_dir_prefers_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var(ROOT_ENV).ok();

        let tmp = tempfile::tempdir().unwrap();
        std::env::set_var(ROOT_ENV, tmp.path());
        let root = root_dir().unwrap();
        assert_eq!(root, tmp.path());

        if let Some(v) = prior {
            std::env::set_var(ROOT_ENV, v);
        } else {
            std::env::remove_var(ROOT_ENV);
        }
    }

    #[test]
    fn root_dir_ignores_blank_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let prior = std::env::var(ROOT_ENV).ok();

        std::env::set_var(ROOT_ENV, "  ");
        let root = root_dir().unwrap();
        let exe_dir = self_path().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(root, exe_dir);

        if let Some(v) = prior {
            std::env::set_var(ROOT_ENV, v);
        } else {
            std::env::remove_var(ROOT_ENV);
        }
    }

    #[test]
    fn venv_interpreters_live_in_bin_dir() {
        let venv = PathBuf::from("app").join("venv");
        let bin = venv_bin_dir(&venv);
        assert_eq!(venv_python(&venv).parent().unwrap(), bin);
        assert_eq!(venv_pythonw(&venv).parent().unwrap(), bin);
        if cfg!(windows) {
            assert_eq!(venv_python(&venv), venv.join("Scripts").join("python.exe"));
        } else {
            assert_eq!(venv_python(&venv), venv.join("bin").join("python"));
        }
    }

    #[test]
    fn script_paths_are_rooted() {
        let root = PathBuf::from("apps").join("noticeforge");
        let cfg = LauncherConfig::default();
        assert_eq!(gui_script_path(&root, &cfg), root.join("noticeforge_gui.py"));
        assert_eq!(downloader_script_path(&root, &cfg), root.join("egov_downloader.py"));
        assert_eq!(requirements_path(&root, &cfg), root.join("requirements.txt"));
        assert_eq!(venv_dir(&root, &cfg), root.join("venv"));
    }
}
