//! ワークスペース設定（`.nbr5410.json`）
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    DiagnosticsConfig,
    IndexingConfig,
    Settings,
    Severity,
    TranslationFilesConfig,
    ValidationError,
};
