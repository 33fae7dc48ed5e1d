//! ワークスペース内の `.ts` カタログを探索して Salsa 入力を作る
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use tokio::sync::Semaphore;

use crate::config::Settings;
use crate::db::CatalogDatabase;
use crate::indexer::types::IndexerError;
use crate::input::catalog::CatalogFile;
use crate::syntax::CatalogError;

/// カタログインデクサー
#[derive(Clone, Debug)]
pub struct CatalogIndexer {
    /// 同時に読み込むファイル数の上限
    semaphore: Arc<Semaphore>,
}

impl CatalogIndexer {
    /// 新しいインデクサーを作成
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(num_threads.max(1))) }
    }

    /// 設定から作成
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.indexing.effective_threads())
    }

    /// ワークスペースをインデックス
    ///
    /// 読み込めなかったファイルも結果に含める（パースすると読み込みエラーになる）。
    /// 結果はパス順。
    ///
    /// # Errors
    /// - ワークスペースが存在しない
    /// - 無効なパターン
    pub async fn index_workspace(
        &self,
        db: &dyn CatalogDatabase,
        workspace_path: &Path,
        settings: &Settings,
    ) -> Result<Vec<CatalogFile>, IndexerError> {
        tracing::debug!(workspace_path = %workspace_path.display(), "Indexing workspace");
        if !workspace_path.is_dir() {
            return Err(IndexerError::InvalidPath(workspace_path.display().to_string()));
        }

        let files = Self::find_catalog_files(
            workspace_path,
            std::slice::from_ref(&settings.translation_files.file_pattern),
            &settings.exclude_patterns,
        )?;

        // 並列でファイルを読み込む
        let futures: Vec<_> = files.into_iter().map(|file| self.read_file(file)).collect();
        let contents = futures::future::join_all(futures).await;

        let catalogs: Vec<CatalogFile> = contents
            .into_iter()
            .map(|(path, content)| match content {
                Ok(text) => CatalogFile::from_text(db, &path, text),
                Err(error) => CatalogFile::unreadable(db, &path, error),
            })
            .collect();

        tracing::info!(count = catalogs.len(), "Indexed translation catalogs");
        Ok(catalogs)
    }

    /// 単一ファイルを読み込む
    async fn read_file(&self, file_path: PathBuf) -> (PathBuf, Result<String, CatalogError>) {
        let content = match self.semaphore.acquire().await {
            Ok(_permit) => tokio::fs::read_to_string(&file_path).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        let content = content.map_err(|e| {
            // 読み込みエラーは警告として扱い、処理を続行
            tracing::warn!(path = %file_path.display(), error = %e, "Failed to read file");
            CatalogError::Read(format!("{}: {e}", file_path.display()))
        });
        (file_path, content)
    }

    /// カタログファイルを検索
    fn find_catalog_files(
        workspace_path: &Path,
        include_patterns: &[String],
        exclude_patterns: &[String],
    ) -> Result<Vec<PathBuf>, IndexerError> {
        let include_set = build_glob_set(include_patterns)?;
        let exclude_set = build_glob_set(exclude_patterns)?;

        let mut found_files = Vec::new();
        for result in WalkBuilder::new(workspace_path)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();

            // workspace からの相対パスで判定
            let Ok(relative_path) = path.strip_prefix(workspace_path) else {
                continue;
            };
            if !include_set.is_match(relative_path) || exclude_set.is_match(relative_path) {
                continue;
            }

            found_files.push(path.to_path_buf());
        }

        found_files.sort();
        Ok(found_files)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, IndexerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| IndexerError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| IndexerError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::db::CatalogDatabaseImpl;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_index_workspace_finds_catalogs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "share/translations/app_pt_BR.ts", "<TS language=\"pt_BR\"/>");
        write(root, "share/translations/app_en_US.ts", "<TS/>");
        write(root, "share/translations/notes.txt", "not a catalog");
        write(root, "target/share/translations/app_de.ts", "<TS/>");

        let db = CatalogDatabaseImpl::default();
        let indexer = CatalogIndexer::new(2);
        let files = indexer.index_workspace(&db, root, &Settings::default()).await.unwrap();

        let languages: Vec<&str> = files.iter().map(|file| file.language(&db).as_str()).collect();
        assert_that!(languages, elements_are![eq(&"en_US"), eq(&"pt_BR")]);
    }

    #[gtest]
    #[tokio::test]
    async fn test_index_workspace_custom_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "i18n/pt/app.ts", "<TS/>");
        write(root, "share/translations/app_en_US.ts", "<TS/>");

        let mut settings = Settings::default();
        settings.translation_files.file_pattern = "i18n/**/*.ts".to_string();

        let db = CatalogDatabaseImpl::default();
        let files =
            CatalogIndexer::from_settings(&settings).index_workspace(&db, root, &settings).await.unwrap();

        assert_that!(files, len(eq(1)));
        expect_that!(files[0].language(&db), eq("pt"));
    }

    #[gtest]
    #[tokio::test]
    async fn test_index_workspace_keeps_unreadable_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "share/translations/app_en_US.ts", "<TS/>");
        // Latin-1 の "ã"
        let latin1 = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<TS><context><name>Alimenta\xe7\xe3o</name></context></TS>";
        fs::write(root.join("share/translations/app_pt_BR.ts"), latin1).unwrap();

        let db = CatalogDatabaseImpl::default();
        let files = CatalogIndexer::new(2).index_workspace(&db, root, &Settings::default()).await.unwrap();

        assert_that!(files, len(eq(2)));
        expect_that!(files[0].read_error(&db).is_none(), eq(true));
        expect_that!(files[1].language(&db), eq("pt_BR"));
        assert!(matches!(files[1].read_error(&db), Some(CatalogError::Read(_))));
    }

    #[tokio::test]
    async fn test_index_workspace_missing_root() {
        let db = CatalogDatabaseImpl::default();
        let result = CatalogIndexer::new(1)
            .index_workspace(&db, Path::new("/nonexistent/workspace"), &Settings::default())
            .await;

        assert!(matches!(result, Err(IndexerError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_index_workspace_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.exclude_patterns = vec!["invalid[pattern".to_string()];

        let db = CatalogDatabaseImpl::default();
        let result = CatalogIndexer::new(1).index_workspace(&db, temp_dir.path(), &settings).await;

        assert!(matches!(result, Err(IndexerError::InvalidPattern { .. })));
    }
}
