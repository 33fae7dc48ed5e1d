//! 翻訳カタログの探索と読み込み
pub mod types;
pub mod workspace;

pub use types::IndexerError;
pub use workspace::CatalogIndexer;
