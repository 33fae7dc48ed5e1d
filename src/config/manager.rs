//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    Settings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: Settings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: Settings::default(), workspace_root: None }
    }

    /// 設定を読み込む
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSONC パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!(?workspace_root, "Loading settings");

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(Settings::default, |ws| {
                tracing::debug!(settings = ?ws, "Loaded workspace settings");
                ws
            })
        } else {
            Settings::default()
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!(settings = ?self.current_settings, "Settings loaded");

        Ok(())
    }

    /// 設定を差し替える（CLI フラグによる上書き用）
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn update_settings(&mut self, new_settings: Settings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &Settings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// 実行時カタログのディレクトリ（ワークスペース相対なら解決済み）
    #[must_use]
    pub fn translations_dir(&self) -> PathBuf {
        let directory = Path::new(&self.current_settings.translation_files.directory);
        match &self.workspace_root {
            Some(root) if directory.is_relative() => root.join(directory),
            _ => directory.to_path_buf(),
        }
    }
}
