use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::messages::Lang;

pub const CONFIG_FILE_NAME: &str = "launcher.toml";
pub const LANG_ENV: &str = "NOTICEFORGE_LANG";
pub const LAUNCH_MODE_ENV: &str = "NOTICEFORGE_LAUNCH_MODE";
pub const LOG_ENV: &str = "NOTICEFORGE_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Run the GUI attached to this console and wait for it.
    Foreground,
    /// Start the GUI without a console window and return at once.
    Hidden,
}

impl LaunchMode {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "foreground" => Ok(Self::Foreground),
            "hidden" => Ok(Self::Hidden),
            other => bail!("unknown launch mode: {other}"),
        }
    }
}

/// Contents of `launcher.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    pub language: Lang,
    pub base_python: String,
    pub venv_dir: String,
    pub requirements: String,
    pub gui_script: String,
    pub downloader_script: String,
    pub launch_mode: LaunchMode,
    pub reuse_install: bool,
    pub log_level: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            language: Lang::Ja,
            base_python: default_base_python().to_string(),
            venv_dir: "venv".to_string(),
            requirements: "requirements.txt".to_string(),
            gui_script: "noticeforge_gui.py".to_string(),
            downloader_script: "egov_downloader.py".to_string(),
            launch_mode: LaunchMode::Foreground,
            reuse_install: false,
            log_level: "info".to_string(),
        }
    }
}

fn default_base_python() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

/// Reads `<root>/launcher.toml` if present, then applies environment overrides.
pub fn load(root: &Path) -> Result<LauncherConfig> {
    let mut cfg = read_file(root)?;
    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

/// Language for messages shown before `launcher.toml` has been read.
pub fn fallback_language() -> Lang {
    language_from_env(|key| std::env::var(key).ok())
}

fn language_from_env(lookup: impl Fn(&str) -> Option<String>) -> Lang {
    lookup(LANG_ENV)
        .and_then(|v| Lang::parse(&v).ok())
        .unwrap_or(LauncherConfig::default().language)
}

fn read_file(root: &Path) -> Result<LauncherConfig> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(LauncherConfig::default());
    }
    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("read {}", config_path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parse {}", config_path.display()))
}

fn apply_env_overrides(
    cfg: &mut LauncherConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(lang) = lookup(LANG_ENV).filter(|v| !v.trim().is_empty()) {
        cfg.language = Lang::parse(&lang).with_context(|| format!("{LANG_ENV}={lang}"))?;
    }
    if let Some(mode) = lookup(LAUNCH_MODE_ENV).filter(|v| !v.trim().is_empty()) {
        cfg.launch_mode =
            LaunchMode::parse(&mode).with_context(|| format!("{LAUNCH_MODE_ENV}={mode}"))?;
    }
    if let Some(level) = lookup(LOG_ENV).filter(|v| !v.trim().is_empty()) {
        cfg.log_level = level;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_file_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = read_file(tmp.path()).unwrap();
        assert_eq!(cfg, LauncherConfig::default());
        assert_eq!(cfg.launch_mode, LaunchMode::Foreground);
        assert!(!cfg.reuse_install);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "language = \"en\"\nlaunch_mode = \"hidden\"\nvenv_dir = \".venv\"\n",
        )
        .unwrap();
        let cfg = read_file(tmp.path()).unwrap();
        assert_eq!(cfg.language, Lang::En);
        assert_eq!(cfg.launch_mode, LaunchMode::Hidden);
        assert_eq!(cfg.venv_dir, ".venv");
        assert_eq!(cfg.requirements, "requirements.txt");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "venv = \"x\"\n").unwrap();
        let err = read_file(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let mut cfg = LauncherConfig::default();
        let vars: HashMap<&str, &str> = [
            (LANG_ENV, "en"),
            (LAUNCH_MODE_ENV, "Hidden"),
            (LOG_ENV, "debug"),
        ]
        .into_iter()
        .collect();
        apply_env_overrides(&mut cfg, |k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.language, Lang::En);
        assert_eq!(cfg.launch_mode, LaunchMode::Hidden);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn fallback_language_follows_env() {
        let lang = language_from_env(|k| (k == LANG_ENV).then(|| "en".to_string()));
        assert_eq!(lang, Lang::En);
        assert_eq!(language_from_env(|_| Some("klingon".to_string())), Lang::Ja);
        assert_eq!(language_from_env(|_| None), Lang::Ja);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = LauncherConfig::default();
        apply_env_overrides(&mut cfg, |_| Some(String::new())).unwrap();
        assert_eq!(cfg, LauncherConfig::default());
    }

    #[test]
    fn bad_launch_mode_env_is_an_error() {
        let mut cfg = LauncherConfig::default();
        let err = apply_env_overrides(&mut cfg, |k| {
            (k == LAUNCH_MODE_ENV).then(|| "minimized".to_string())
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown launch mode"));
    }
}
