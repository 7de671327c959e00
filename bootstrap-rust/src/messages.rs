//! User-facing text, keyed by [`MessageKind`] and [`Lang`].
//!
//! The launcher and the import helper print only strings from this table, so a
//! translation fix happens in one place.

use anyhow::{bail, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ja,
    En,
}

impl Lang {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Ok(Self::Ja),
            "en" | "english" => Ok(Self::En),
            other => bail!("unknown language: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    CreatingEnv,
    EnvCreateFailed,
    ActivatingEnv,
    EnvActivateFailed,
    InstallingDeps,
    InstallReused,
    InstallFailed,
    TargetMissing,
    Launching,
    LaunchedHidden,
    LaunchFailed,
    ImportPrompt,
    ImportEmptyPath,
    Importing,
    ImportFailed,
    ImportDone,
    PressEnter,
}

impl MessageKind {
    pub const ALL: [MessageKind; 17] = [
        MessageKind::CreatingEnv,
        MessageKind::EnvCreateFailed,
        MessageKind::ActivatingEnv,
        MessageKind::EnvActivateFailed,
        MessageKind::InstallingDeps,
        MessageKind::InstallReused,
        MessageKind::InstallFailed,
        MessageKind::TargetMissing,
        MessageKind::Launching,
        MessageKind::LaunchedHidden,
        MessageKind::LaunchFailed,
        MessageKind::ImportPrompt,
        MessageKind::ImportEmptyPath,
        MessageKind::Importing,
        MessageKind::ImportFailed,
        MessageKind::ImportDone,
        MessageKind::PressEnter,
    ];
}

pub fn message(lang: Lang, kind: MessageKind) -> &'static str {
    use MessageKind::*;
    match lang {
        Lang::Ja => match kind {
            CreatingEnv => "仮想環境を作成しています...",
            EnvCreateFailed => {
                "[エラー] 仮想環境の作成に失敗しました。Python がインストールされているか確認してください。"
            }
            ActivatingEnv => "仮想環境を有効化しています...",
            EnvActivateFailed => "[エラー] 仮想環境の有効化に失敗しました。",
            InstallingDeps => "必要なライブラリをインストールしています...",
            InstallReused => "ライブラリは最新です。インストールを省略します。",
            InstallFailed => {
                "[エラー] ライブラリのインストールに失敗しました。ネットワーク接続やプロキシ設定を確認してください。"
            }
            TargetMissing => "[エラー] 起動するスクリプトが見つかりません。",
            Launching => "アプリを起動しています...",
            LaunchedHidden => "アプリを起動しました。このウィンドウは閉じても構いません。",
            LaunchFailed => "[エラー] アプリが異常終了しました。",
            ImportPrompt => "取り込むフォルダのパスを入力してください: ",
            ImportEmptyPath => "[エラー] フォルダのパスが入力されていません。",
            Importing => "フォルダ内の法令を取り込んでいます...",
            ImportFailed => "[エラー] 取り込みに失敗しました。",
            ImportDone => "取り込みが完了しました。次にランチャーを実行してください。",
            PressEnter => "Enter キーを押すと終了します...",
        },
        Lang::En => match kind {
            CreatingEnv => "Creating virtual environment...",
            EnvCreateFailed => {
                "[ERROR] Failed to create the virtual environment. Check that Python is installed."
            }
            ActivatingEnv => "Activating virtual environment...",
            EnvActivateFailed => "[ERROR] Failed to activate the virtual environment.",
            InstallingDeps => "Installing required packages...",
            InstallReused => "Packages are up to date, skipping install.",
            InstallFailed => {
                "[ERROR] Failed to install packages. Check your network connection and proxy settings."
            }
            TargetMissing => "[ERROR] The script to launch was not found.",
            Launching => "Starting the application...",
            LaunchedHidden => "The application has started. You can close this window.",
            LaunchFailed => "[ERROR] The application exited with an error.",
            ImportPrompt => "Enter the folder path to import: ",
            ImportEmptyPath => "[ERROR] No folder path was entered.",
            Importing => "Importing every law text in the folder...",
            ImportFailed => "[ERROR] Import failed.",
            ImportDone => "Import finished. Run the launcher next.",
            PressEnter => "Press Enter to exit...",
        },
    }
}
