//! 実行時の翻訳ルックアップ
//!
//! ロケールのフォールバック順（`pt_BR` → `pt` → 基本カタログ）に並べたカタログを
//! 順に引き、空でない翻訳が見つからなければソース文字列をそのまま返す。

use std::path::Path;

use crate::db::CatalogDatabase;
use crate::i18n::index::CatalogIndex;
use crate::i18n::plural::PluralRule;
use crate::input::catalog::{
    load_catalog_file,
    locale_fallbacks,
};
use crate::ir::catalog::{
    Message,
    Translation,
    TranslationState,
};
use crate::syntax::{
    catalog_language,
    parse_catalog,
};

/// 言語付きの索引
#[derive(Debug, Clone)]
struct LoadedCatalog {
    language: String,
    index: CatalogIndex,
}

/// 翻訳器
#[derive(Debug, Clone, Default)]
pub struct Translator {
    /// 優先順のカタログ
    catalogs: Vec<LoadedCatalog>,
    include_unfinished: bool,
}

impl Translator {
    /// すべてのルックアップがソース文字列を返す翻訳器
    #[must_use]
    pub const fn empty() -> Self {
        Self { catalogs: Vec::new(), include_unfinished: true }
    }

    /// `(language, index)` の優先順リストから作成
    #[must_use]
    pub fn new(catalogs: Vec<(String, CatalogIndex)>, include_unfinished: bool) -> Self {
        let catalogs = catalogs
            .into_iter()
            .map(|(language, index)| LoadedCatalog { language, index })
            .collect();
        Self { catalogs, include_unfinished }
    }

    /// 読み込まれたカタログの言語（優先順）
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        self.catalogs.iter().map(|catalog| catalog.language.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// ソース文字列を翻訳
    #[must_use]
    pub fn translate<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.translate_disambiguated(context, source, None)
    }

    /// 注釈付きで翻訳
    #[must_use]
    pub fn translate_disambiguated<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        self.catalogs
            .iter()
            .filter_map(|catalog| catalog.index.get(context, source, comment))
            .filter(|message| self.is_servable(message))
            .find_map(|message| message.translation.text().filter(|text| !text.is_empty()))
            .unwrap_or(source)
    }

    /// 数に応じた形を選んで翻訳し、`%n` を `n` に置き換える
    #[must_use]
    pub fn translate_plural(&self, context: &str, source: &str, n: i64) -> String {
        let translated = self
            .catalogs
            .iter()
            .find_map(|catalog| {
                let message = catalog.index.get(context, source, None)?;
                if !self.is_servable(message) {
                    return None;
                }
                match &message.translation {
                    Translation::Numerus(forms) => {
                        let index = PluralRule::for_language(&catalog.language).form_index(n);
                        // 足りない場合は最後の形
                        forms.get(index).or_else(|| forms.last()).filter(|form| !form.is_empty())
                    }
                    Translation::Text(text) => Some(text).filter(|text| !text.is_empty()),
                }
            })
            .map_or(source, String::as_str);

        translated.replace("%n", &n.to_string())
    }

    fn is_servable(&self, message: &Message) -> bool {
        match message.state {
            TranslationState::Finished => true,
            TranslationState::Unfinished => self.include_unfinished,
            TranslationState::Obsolete | TranslationState::Vanished => false,
        }
    }
}

/// ディレクトリからロケールのカタログを読み込む
///
/// `pt_BR` なら `{prefix}_pt_BR.ts`、`{prefix}_pt.ts`、`{prefix}.ts` の順に探し、
/// 存在するものをすべて優先順に使う。パースできないカタログは警告して飛ばす。
#[must_use]
pub fn load_translator(
    db: &dyn CatalogDatabase,
    directory: &Path,
    prefix: &str,
    locale: &str,
    include_unfinished: bool,
) -> Translator {
    let candidates = locale_fallbacks(locale)
        .into_iter()
        .map(|locale| format!("{prefix}_{locale}.ts"))
        .chain(std::iter::once(format!("{prefix}.ts")));

    let mut catalogs = Vec::new();
    for file_name in candidates {
        let path = directory.join(&file_name);
        if !path.is_file() {
            continue;
        }

        let file = match load_catalog_file(db, &path) {
            Ok(file) => file,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Failed to load catalog");
                continue;
            }
        };
        let Ok(catalog) = parse_catalog(db, file) else {
            continue;
        };

        tracing::debug!(path = %path.display(), "Loaded catalog");
        catalogs.push((catalog_language(db, file), CatalogIndex::build(catalog)));
    }

    if catalogs.is_empty() {
        tracing::warn!(
            directory = %directory.display(),
            locale,
            "No translation catalog found, using source strings"
        );
    }

    Translator::new(catalogs, include_unfinished)
}
