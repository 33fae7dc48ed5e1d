pub mod error;
pub mod reader;
pub mod writer;

pub use error::CatalogError;
pub use reader::parse_ts;
pub use writer::write_ts;

use crate::db::CatalogDatabase;
use crate::input::catalog::CatalogFile;
use crate::ir::catalog::Catalog;

/// カタログファイルをパースする（Salsa クエリ）
///
/// テキストが変わらない限り結果はキャッシュされる。
/// 読み込めなかったファイルはその読み込みエラーを返す。
#[salsa::tracked]
pub fn parse_catalog(db: &dyn CatalogDatabase, file: CatalogFile) -> Result<Catalog, CatalogError> {
    let result = match file.read_error(db) {
        Some(error) => Err(error.clone()),
        None => parse_ts(file.text(db)),
    };
    if let Err(error) = &result {
        tracing::warn!(path = %file.path(db), %error, "Failed to parse catalog");
    }
    result
}

/// カタログの言語を取得（Salsa クエリ）
///
/// `<TS language="...">` を優先し、なければファイルパスから推定した言語を使う。
#[salsa::tracked]
pub fn catalog_language(db: &dyn CatalogDatabase, file: CatalogFile) -> String {
    parse_catalog(db, file)
        .ok()
        .and_then(|catalog| catalog.language)
        .filter(|language| !language.is_empty())
        .unwrap_or_else(|| file.language(db).clone())
}
