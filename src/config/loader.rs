//! 設定ファイルの読み込み関数

use std::path::Path;

use jsonc_parser::ParseOptions;

use super::{
    ConfigError,
    Settings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".nbr5410.json";

/// ワークスペースから設定を読み込む
///
/// `.nbr5410.json` ファイルを探して読み込む（コメントと末尾カンマを許可）
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSONC パースエラー
pub(super) fn load_from_workspace(workspace_root: &Path) -> Result<Option<Settings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "Configuration file not found");
        return Ok(None);
    }

    tracing::debug!(path = %config_path.display(), "Loading configuration");

    let content = std::fs::read_to_string(&config_path)?;
    parse_settings(&content).map(Some)
}

/// JSONC テキストから設定をパース
///
/// 空のファイルはデフォルト設定として扱う。
fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
        .map_err(|e| ConfigError::JsoncError(e.to_string()))?;

    match value {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_workspace`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_workspace_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"translationFiles": {"prefix": "nbr5410"}}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let result = load_from_workspace(temp_dir.path());

        let settings = result.unwrap().unwrap();
        assert_eq!(settings.translation_files.prefix, "nbr5410");
        assert_eq!(settings.translation_files.directory, "share/translations");
    }

    /// `load_from_workspace`: コメント付きの設定ファイル
    #[rstest]
    fn test_load_from_workspace_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{
            // 英語カタログは原文なので任意
            "optionalLanguages": ["en_US"],
            "includeUnfinished": false, /* 未完了は使わない */
        }"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let settings = load_from_workspace(temp_dir.path()).unwrap().unwrap();

        assert_eq!(settings.optional_languages, Some(vec!["en_US".to_string()]));
        assert!(!settings.include_unfinished);
    }

    /// `load_from_workspace`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_workspace_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.unwrap().is_none());
    }

    /// `load_from_workspace`: 空ファイルはデフォルト値
    #[rstest]
    fn test_load_from_workspace_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "  // nothing\n").unwrap();

        let settings = load_from_workspace(temp_dir.path()).unwrap().unwrap();

        assert_eq!(settings.translation_files.prefix, "app");
    }

    #[rstest]
    #[case::syntax("invalid json")]
    #[case::wrong_type(r#"{"excludePatterns": "target/**"}"#)]
    fn test_load_from_workspace_invalid(#[case] content: &str) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), content).unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_err());
    }
}
