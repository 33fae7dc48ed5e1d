//! Salsa データベース定義

/// 翻訳カタログのデータベーストレイト
#[salsa::db]
pub trait CatalogDatabase: salsa::Database {}

/// 翻訳カタログデータベースの実装
#[salsa::db]
#[derive(Default, Clone)]
pub struct CatalogDatabaseImpl {
    /// Salsa のストレージ
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for CatalogDatabaseImpl {}

#[salsa::db]
impl CatalogDatabase for CatalogDatabaseImpl {}

impl std::fmt::Debug for CatalogDatabaseImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDatabaseImpl").finish_non_exhaustive()
    }
}
