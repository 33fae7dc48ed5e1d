//! 翻訳カタログの利用（ルックアップ、検査、更新）
pub mod diagnostics;
pub mod index;
pub mod merge;
pub mod plural;
pub mod translator;

pub use diagnostics::{
    CatalogDiagnostic,
    CheckSummary,
    DiagnosticCode,
    check_catalogs,
};
pub use index::{
    CatalogIndex,
    DuplicateMessage,
};
pub use merge::{
    ExtractedMessage,
    MergeOptions,
    MergeStats,
    merge_catalog,
};
pub use plural::PluralRule;
pub use translator::{
    Translator,
    load_translator,
};
