//! 診断メッセージ生成モジュール
//!
//! 複数ロケールのカタログを突き合わせて、欠けているメッセージ・重複・未翻訳・
//! 廃止済みメッセージを報告する。

use std::collections::{
    BTreeMap,
    HashSet,
};
use std::fmt;

use crate::config::{
    Settings,
    Severity,
};
use crate::db::CatalogDatabase;
use crate::i18n::index::CatalogIndex;
use crate::input::catalog::CatalogFile;
use crate::ir::catalog::{
    Catalog,
    MessageKey,
    TranslationState,
};
use crate::syntax::{
    catalog_language,
    parse_catalog,
};

/// 診断の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    MissingMessage,
    DuplicateMessage,
    Untranslated,
    ObsoleteMessage,
    ParseError,
}

impl DiagnosticCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingMessage => "missing-message",
            Self::DuplicateMessage => "duplicate-message",
            Self::Untranslated => "untranslated",
            Self::ObsoleteMessage => "obsolete-message",
            Self::ParseError => "parse-error",
        }
    }
}

/// カタログの診断
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDiagnostic {
    pub path: String,
    pub language: String,
    /// カタログ上の行（1 始まり）
    pub line: u32,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl fmt::Display for CatalogDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}[{}] {}",
            self.path,
            self.line,
            self.severity.as_str(),
            self.code.as_str(),
            self.message
        )
    }
}

/// 重要度ごとの件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckSummary {
    pub errors: usize,
    pub warnings: usize,
    pub information: usize,
    pub hints: usize,
}

impl CheckSummary {
    #[must_use]
    pub fn from_diagnostics(diagnostics: &[CatalogDiagnostic]) -> Self {
        diagnostics.iter().fold(Self::default(), |mut summary, diagnostic| {
            match diagnostic.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Information => summary.information += 1,
                Severity::Hint => summary.hints += 1,
                Severity::Off => {}
            }
            summary
        })
    }

    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s), {} information, {} hint(s)",
            self.errors, self.warnings, self.information, self.hints
        )
    }
}

/// 解析済みのカタログ
struct CheckedCatalog {
    path: String,
    language: String,
    index: CatalogIndex,
    /// 廃止されていないメッセージのキー
    active_keys: HashSet<MessageKey>,
}

impl CheckedCatalog {
    fn catalog(&self) -> &Catalog {
        self.index.catalog()
    }

    /// キーのコンテキストの行（なければ 1 行目）
    fn context_line(&self, key: &MessageKey) -> u32 {
        self.catalog().context(&key.context).map_or(1, |context| context.position.line.max(1))
    }

    /// 原文と同じ言語のカタログか
    fn is_source_language(&self) -> bool {
        let source = self.catalog().source_language.as_deref().unwrap_or("en");
        base_language(source) == base_language(&self.language)
    }
}

fn base_language(locale: &str) -> String {
    crate::input::catalog::canonical_locale(locale)
        .split('_')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// カタログ群の診断メッセージを生成
///
/// 結果はパス、行の順に並ぶ。
pub fn check_catalogs(
    db: &dyn CatalogDatabase,
    files: &[CatalogFile],
    settings: &Settings,
) -> Vec<CatalogDiagnostic> {
    let severities = settings.diagnostics;
    let mut diagnostics = Vec::new();
    let mut checked = Vec::new();

    for &file in files {
        let path = file.path(db).clone();
        let language = catalog_language(db, file);
        match parse_catalog(db, file) {
            Ok(catalog) => {
                let active_keys = catalog
                    .messages()
                    .filter(|(_, message)| !message.state.is_retired())
                    .map(|(context, message)| MessageKey::of(context, message))
                    .collect();
                checked.push(CheckedCatalog {
                    path,
                    language,
                    index: CatalogIndex::build(catalog),
                    active_keys,
                });
            }
            Err(error) => diagnostics.push(CatalogDiagnostic {
                path,
                language,
                line: error.line().unwrap_or(1),
                severity: Severity::Error,
                code: DiagnosticCode::ParseError,
                message: error.to_string(),
            }),
        }
    }

    // キー -> そのキーを持つ言語
    let mut presence: BTreeMap<&MessageKey, Vec<&str>> = BTreeMap::new();
    for catalog in &checked {
        for key in &catalog.active_keys {
            presence.entry(key).or_default().push(&catalog.language);
        }
    }

    for catalog in &checked {
        tracing::debug!(path = %catalog.path, language = %catalog.language, "Checking catalog");
        let required = settings.is_required_language(&catalog.language);
        let mut push = |line: u32, severity: Severity, code: DiagnosticCode, message: String| {
            if severity.is_enabled() {
                diagnostics.push(CatalogDiagnostic {
                    path: catalog.path.clone(),
                    language: catalog.language.clone(),
                    line,
                    severity,
                    code,
                    message,
                });
            }
        };

        if required {
            for (key, languages) in &presence {
                if !catalog.active_keys.contains(*key) {
                    push(
                        catalog.context_line(key),
                        severities.missing_message,
                        DiagnosticCode::MissingMessage,
                        format!("Message {key} is missing (present in: {})", languages.join(", ")),
                    );
                }
            }
        }

        for duplicate in catalog.index.duplicates() {
            push(
                duplicate.duplicate_line,
                severities.duplicate_message,
                DiagnosticCode::DuplicateMessage,
                format!(
                    "Duplicate message {} (first defined at line {})",
                    duplicate.key, duplicate.first_line
                ),
            );
        }

        let check_untranslated = required && !catalog.is_source_language();
        for (context, message) in catalog.index.catalog().messages() {
            let key = MessageKey::of(context, message);
            match message.state {
                TranslationState::Obsolete | TranslationState::Vanished => push(
                    message.position.line,
                    severities.obsolete_message,
                    DiagnosticCode::ObsoleteMessage,
                    format!("Message {key} is no longer used in the source"),
                ),
                TranslationState::Finished | TranslationState::Unfinished => {
                    if check_untranslated && message.translation.is_empty() {
                        push(
                            message.position.line,
                            severities.untranslated,
                            DiagnosticCode::Untranslated,
                            format!("Message {key} has no translation"),
                        );
                    }
                }
            }
        }
    }

    diagnostics.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
    diagnostics
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::db::CatalogDatabaseImpl;

    const EN_US: &str = r#"<TS version="2.1" language="en_US">
<context>
    <name>CircuitsModel</name>
    <message>
        <source>Name</source>
        <translation type="unfinished"></translation>
    </message>
    <message>
        <source>Power</source>
        <translation type="unfinished"></translation>
    </message>
</context>
</TS>"#;

    const PT_BR: &str = r#"<TS version="2.1" language="pt_BR">
<context>
    <name>CircuitsModel</name>
    <message>
        <source>Name</source>
        <translation>Nome</translation>
    </message>
    <message>
        <source>Name</source>
        <translation>Nome</translation>
    </message>
    <message>
        <source>Length</source>
        <translation type="unfinished"></translation>
    </message>
    <message>
        <source>Supply</source>
        <translation type="vanished">Alimentação</translation>
    </message>
</context>
</TS>"#;

    fn files(db: &CatalogDatabaseImpl, catalogs: &[(&str, &str)]) -> Vec<CatalogFile> {
        catalogs
            .iter()
            .map(|(path, text)| {
                CatalogFile::from_text(db, std::path::Path::new(path), (*text).to_string())
            })
            .collect()
    }

    fn codes(diagnostics: &[CatalogDiagnostic]) -> Vec<(&str, u32, DiagnosticCode)> {
        diagnostics.iter().map(|d| (d.language.as_str(), d.line, d.code)).collect()
    }

    #[googletest::test]
    fn test_check_catalogs_default_settings() {
        let db = CatalogDatabaseImpl::default();
        let files = files(&db, &[("app_en_US.ts", EN_US), ("app_pt_BR.ts", PT_BR)]);

        let diagnostics = check_catalogs(&db, &files, &Settings::default());

        expect_that!(
            codes(&diagnostics),
            elements_are![
                // Length は en_US にない
                eq(&("en_US", 2, DiagnosticCode::MissingMessage)),
                // Power は pt_BR にない
                eq(&("pt_BR", 2, DiagnosticCode::MissingMessage)),
                eq(&("pt_BR", 8, DiagnosticCode::DuplicateMessage)),
                eq(&("pt_BR", 12, DiagnosticCode::Untranslated)),
                eq(&("pt_BR", 16, DiagnosticCode::ObsoleteMessage))
            ]
        );
        expect_that!(diagnostics[0].message, contains_substring("CircuitsModel::\"Length\""));
        expect_that!(diagnostics[0].message, contains_substring("present in: pt_BR"));
        expect_that!(diagnostics[2].message, contains_substring("first defined at line 4"));
    }

    #[googletest::test]
    fn test_check_catalogs_optional_language() {
        let db = CatalogDatabaseImpl::default();
        let files = files(&db, &[("app_en_US.ts", EN_US), ("app_pt_BR.ts", PT_BR)]);
        let settings = Settings {
            optional_languages: Some(vec!["pt_BR".to_string()]),
            ..Settings::default()
        };

        let diagnostics = check_catalogs(&db, &files, &settings);

        expect_that!(
            codes(&diagnostics),
            elements_are![
                eq(&("en_US", 2, DiagnosticCode::MissingMessage)),
                eq(&("pt_BR", 8, DiagnosticCode::DuplicateMessage)),
                eq(&("pt_BR", 16, DiagnosticCode::ObsoleteMessage))
            ]
        );
    }

    #[googletest::test]
    fn test_check_catalogs_severity_off() {
        let db = CatalogDatabaseImpl::default();
        let files = files(&db, &[("app_en_US.ts", EN_US), ("app_pt_BR.ts", PT_BR)]);
        let mut settings = Settings::default();
        settings.diagnostics.missing_message = Severity::Off;
        settings.diagnostics.obsolete_message = Severity::Off;
        settings.diagnostics.duplicate_message = Severity::Warning;

        let diagnostics = check_catalogs(&db, &files, &settings);
        let summary = CheckSummary::from_diagnostics(&diagnostics);

        expect_that!(
            codes(&diagnostics),
            elements_are![
                eq(&("pt_BR", 8, DiagnosticCode::DuplicateMessage)),
                eq(&("pt_BR", 12, DiagnosticCode::Untranslated))
            ]
        );
        expect_that!(summary.errors, eq(0));
        expect_that!(summary.warnings, eq(1));
        expect_that!(summary.information, eq(1));
        expect_that!(summary.has_errors(), eq(false));
    }

    #[googletest::test]
    fn test_check_catalogs_parse_error() {
        let db = CatalogDatabaseImpl::default();
        let files = files(&db, &[("app_de.ts", "<TS>\n<context>\n</context>\n</TS>")]);

        let diagnostics = check_catalogs(&db, &files, &Settings::default());

        expect_that!(codes(&diagnostics), elements_are![eq(&("de", 2, DiagnosticCode::ParseError))]);
        expect_that!(diagnostics[0].severity, eq(Severity::Error));
        expect_that!(CheckSummary::from_diagnostics(&diagnostics).has_errors(), eq(true));
    }

    #[googletest::test]
    fn test_consistent_catalogs_have_no_diagnostics() {
        let db = CatalogDatabaseImpl::default();
        let pt = EN_US.replace("en_US", "pt");
        let files = files(&db, &[("app_en_US.ts", EN_US), ("app_pt.ts", &pt)]);

        let diagnostics = check_catalogs(&db, &files, &Settings::default());

        // pt の未翻訳のみ
        expect_that!(diagnostics, len(eq(2)));
        expect_that!(
            diagnostics.iter().all(|d| d.code == DiagnosticCode::Untranslated),
            eq(true)
        );
    }

    #[googletest::test]
    fn test_diagnostic_display() {
        let diagnostic = CatalogDiagnostic {
            path: "share/translations/app_pt_BR.ts".to_string(),
            language: "pt_BR".to_string(),
            line: 12,
            severity: Severity::Warning,
            code: DiagnosticCode::Untranslated,
            message: "Message CircuitsModel::\"Length\" has no translation".to_string(),
        };

        expect_that!(
            diagnostic.to_string(),
            eq("share/translations/app_pt_BR.ts:12: warning[untranslated] Message CircuitsModel::\"Length\" has no translation")
        );
    }
}
