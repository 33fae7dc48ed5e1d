use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "excludePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    JsoncError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Diagnostic severity as written in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
    /// The check is disabled.
    Off,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "information",
            Self::Hint => "hint",
            Self::Off => "off",
        }
    }

    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub translation_files: TranslationFilesConfig,

    pub exclude_patterns: Vec<String>,

    /// UI locale. When unset, the CLI flag and then the environment decide.
    pub locale: Option<String>,

    /// Languages whose catalogs must be complete.
    ///
    /// - `None`: All detected languages are required (default)
    /// - `Some([...])`: Only specified languages are required
    ///
    /// Mutually exclusive with `optional_languages`.
    pub required_languages: Option<Vec<String>>,

    /// Languages where missing or untranslated messages are ignored.
    ///
    /// Mutually exclusive with `required_languages`.
    pub optional_languages: Option<Vec<String>>,

    /// Serve non-empty translations still marked `unfinished`.
    pub include_unfinished: bool,

    pub indexing: IndexingConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Parallel read count for indexing.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl IndexingConfig {
    /// Effective parallelism.
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    pub missing_message: Severity,
    pub duplicate_message: Severity,
    pub untranslated: Severity,
    pub obsolete_message: Severity,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            missing_message: Severity::Error,
            duplicate_message: Severity::Error,
            untranslated: Severity::Information,
            obsolete_message: Severity::Hint,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub file_pattern: String,
    /// Directory the CLI loads runtime catalogs from (relative to the workspace).
    pub directory: String,
    /// Catalog base name (`<prefix>_<locale>.ts`).
    pub prefix: String,
}

impl Settings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Invalid thread count
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.translation_files.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                "The pattern cannot be empty. Example: \"**/translations/*.ts\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.translation_files.file_pattern) {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                format!("Invalid glob pattern '{}': {e}", self.translation_files.file_pattern),
            ));
        }

        if self.translation_files.prefix.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.prefix",
                "The prefix cannot be empty. Example: \"app\"",
            ));
        }

        if self.indexing.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "indexing.numThreads",
                "At least one thread is required. Remove this field to use the default",
            ));
        }

        if self.required_languages.is_some() && self.optional_languages.is_some() {
            errors.push(ValidationError::new(
                "requiredLanguages/optionalLanguages",
                "Cannot specify both 'requiredLanguages' and 'optionalLanguages'. Please use only one",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Whether catalogs of `language` must be complete.
    #[must_use]
    pub fn is_required_language(&self, language: &str) -> bool {
        let matches = |languages: &[String]| {
            languages.iter().any(|candidate| {
                crate::input::catalog::canonical_locale(candidate)
                    == crate::input::catalog::canonical_locale(language)
            })
        };

        if let Some(required) = &self.required_languages {
            return matches(required);
        }
        if let Some(optional) = &self.optional_languages {
            return !matches(optional);
        }
        true
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self {
            file_pattern: "**/translations/*.ts".to_string(),
            directory: "share/translations".to_string(),
            prefix: "app".to_string(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            exclude_patterns: vec!["target/**".to_string(), ".git/**".to_string()],
            locale: None,
            required_languages: None,
            optional_languages: None,
            include_unfinished: true,
            indexing: IndexingConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = Settings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"locale": "pt_BR", "diagnostics": {"untranslated": "off"}}"#;

        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_that!(settings.locale, some(eq("pt_BR")));
        assert_that!(settings.diagnostics.untranslated, eq(Severity::Off));
        assert_that!(settings.diagnostics.missing_message, eq(Severity::Error));
        assert_that!(settings.translation_files.prefix, eq("app"));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_that!(settings.exclude_patterns, elements_are![eq("target/**"), eq(".git/**")]);
        assert_that!(settings.translation_files.file_pattern, eq("**/translations/*.ts"));
        assert_that!(settings.translation_files.directory, eq("share/translations"));
        assert_that!(settings.include_unfinished, eq(true));
    }

    #[rstest]
    fn deserialize_unknown_severity_fails() {
        let json = r#"{"diagnostics": {"missingMessage": "fatal"}}"#;

        let result = serde_json::from_str::<Settings>(json);

        assert_that!(result, err(anything()));
    }

    #[rstest]
    fn validate_invalid_exclude_pattern_invalid_glob() {
        let settings = Settings {
            exclude_patterns: vec![
                "target/**".to_string(),
                "build/**".to_string(),
                "invalid[pattern".to_string(),
            ],
            ..Settings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("excludePatterns[2]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("invalid[pattern"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_translation_file_pattern_empty() {
        let settings = Settings {
            translation_files: TranslationFilesConfig {
                file_pattern: String::new(),
                ..TranslationFilesConfig::default()
            },
            ..Settings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.filePattern")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_translation_file_pattern_invalid_glob() {
        let settings = Settings {
            translation_files: TranslationFilesConfig {
                file_pattern: "**/{translations,i18n/*.ts".to_string(),
                ..TranslationFilesConfig::default()
            },
            ..Settings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.filePattern")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern"))
            ]])
        );
    }

    #[rstest]
    fn validate_zero_threads() {
        let settings =
            Settings { indexing: IndexingConfig { num_threads: Some(0) }, ..Settings::default() };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("indexing.numThreads"))])
        );
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = Settings {
            translation_files: TranslationFilesConfig {
                prefix: String::new(),
                ..TranslationFilesConfig::default()
            },
            required_languages: Some(vec!["pt_BR".to_string()]),
            optional_languages: Some(vec!["en_US".to_string()]),
            ..Settings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. translationFiles.prefix"));
        assert_that!(error_message, contains_substring("2. requiredLanguages/optionalLanguages"));
    }

    #[rstest]
    #[case::all_required(None, None, "de", true)]
    #[case::listed(Some(vec!["pt_BR"]), None, "pt-br", true)]
    #[case::not_listed(Some(vec!["pt_BR"]), None, "en_US", false)]
    #[case::optional(None, Some(vec!["en_US"]), "en_US", false)]
    #[case::not_optional(None, Some(vec!["en_US"]), "pt_BR", true)]
    fn test_is_required_language(
        #[case] required: Option<Vec<&str>>,
        #[case] optional: Option<Vec<&str>>,
        #[case] language: &str,
        #[case] expected: bool,
    ) {
        let to_owned = |languages: Vec<&str>| -> Vec<String> {
            languages.into_iter().map(String::from).collect()
        };
        let settings = Settings {
            required_languages: required.map(to_owned),
            optional_languages: optional.map(to_owned),
            ..Settings::default()
        };

        assert_eq!(settings.is_required_language(language), expected);
    }

    #[rstest]
    fn test_effective_threads() {
        assert_eq!(IndexingConfig { num_threads: Some(3) }.effective_threads(), 3);
        assert!(IndexingConfig::default().effective_threads() >= 1);
    }
}
