//! カタログのルックアップ索引
//!
//! `(context, source, comment)` からメッセージを引く。同じキーが複数ある場合は
//! 文書順で最初のものを採用し、残りは [`DuplicateMessage`] として記録する。

use std::collections::HashMap;

use crate::ir::catalog::{
    Catalog,
    Message,
    MessageKey,
};

/// 重複したメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMessage {
    pub key: MessageKey,
    /// 採用された最初の出現（カタログ上の行）
    pub first_line: u32,
    /// 無視された出現（カタログ上の行）
    pub duplicate_line: u32,
}

/// カタログ内のメッセージの位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MessageRef {
    context: usize,
    message: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    comment: Option<String>,
    target: MessageRef,
}

/// 索引付きのカタログ
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    catalog: Catalog,
    /// context -> source -> 注釈ごとのエントリ
    entries: HashMap<String, HashMap<String, Vec<Entry>>>,
    duplicates: Vec<DuplicateMessage>,
}

impl CatalogIndex {
    /// カタログから索引を構築
    #[must_use]
    pub fn build(catalog: Catalog) -> Self {
        let mut entries: HashMap<String, HashMap<String, Vec<Entry>>> = HashMap::new();
        let mut duplicates = Vec::new();

        for (context_index, context) in catalog.contexts.iter().enumerate() {
            for (message_index, message) in context.messages.iter().enumerate() {
                let key = MessageKey::of(&context.name, message);
                let by_comment = entries
                    .entry(key.context.clone())
                    .or_default()
                    .entry(key.source.clone())
                    .or_default();

                if let Some(first) = by_comment.iter().find(|entry| entry.comment == key.comment)
                {
                    let first_line = message_at(&catalog, first.target)
                        .map_or(0, |first| first.position.line);
                    duplicates.push(DuplicateMessage {
                        key,
                        first_line,
                        duplicate_line: message.position.line,
                    });
                    continue;
                }

                by_comment.push(Entry {
                    comment: key.comment,
                    target: MessageRef { context: context_index, message: message_index },
                });
            }
        }

        if !duplicates.is_empty() {
            tracing::debug!(count = duplicates.len(), "Duplicate messages in catalog");
        }

        Self { catalog, entries, duplicates }
    }

    /// メッセージを検索
    ///
    /// 注釈付きで見つからなければ注釈なしのメッセージを探す。
    #[must_use]
    pub fn get(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let by_comment = self.entries.get(context)?.get(source)?;
        let comment = comment.filter(|comment| !comment.is_empty());

        let entry = by_comment
            .iter()
            .find(|entry| entry.comment.as_deref() == comment)
            .or_else(|| {
                comment.and_then(|_| by_comment.iter().find(|entry| entry.comment.is_none()))
            })?;
        message_at(&self.catalog, entry.target)
    }

    /// キーで検索（注釈も一致するもののみ）
    #[must_use]
    pub fn get_exact(&self, key: &MessageKey) -> Option<&Message> {
        let by_comment = self.entries.get(&key.context)?.get(&key.source)?;
        let entry = by_comment.iter().find(|entry| entry.comment == key.comment)?;
        message_at(&self.catalog, entry.target)
    }

    #[must_use]
    pub fn contains(&self, key: &MessageKey) -> bool {
        self.get_exact(key).is_some()
    }

    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateMessage] {
        &self.duplicates
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 一意なキーの数
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().flat_map(HashMap::values).map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn message_at(catalog: &Catalog, target: MessageRef) -> Option<&Message> {
    catalog.contexts.get(target.context)?.messages.get(target.message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::syntax::parse_ts;

    const CATALOG: &str = r#"<TS version="2.1" language="pt_BR">
<context>
    <name>CircuitsModel</name>
    <message>
        <source>Name</source>
        <translation>Nome</translation>
    </message>
    <message>
        <source>Power</source>
        <translation>Potência</translation>
    </message>
    <message>
        <source>Name</source>
        <translation>Nome (duplicado)</translation>
    </message>
    <message>
        <source>Open</source>
        <comment>file</comment>
        <translation>Abrir</translation>
    </message>
</context>
<context>
    <name>ConduitRunsModel</name>
    <message>
        <source>Name</source>
        <translation>Nome do eletroduto</translation>
    </message>
</context>
</TS>"#;

    fn index() -> CatalogIndex {
        CatalogIndex::build(parse_ts(CATALOG).unwrap())
    }

    #[googletest::test]
    fn test_lookup_by_context_and_source() {
        let index = index();

        expect_that!(
            index.get("CircuitsModel", "Power", None).and_then(|m| m.translation.text()),
            some(eq("Potência"))
        );
        expect_that!(
            index.get("ConduitRunsModel", "Name", None).and_then(|m| m.translation.text()),
            some(eq("Nome do eletroduto"))
        );
        expect_that!(index.get("MainWindow", "Name", None), none());
        expect_that!(index.get("CircuitsModel", "Length", None), none());
    }

    #[googletest::test]
    fn test_first_occurrence_wins() {
        let index = index();

        expect_that!(
            index.get("CircuitsModel", "Name", None).and_then(|m| m.translation.text()),
            some(eq("Nome"))
        );
        assert_eq!(
            index.duplicates(),
            &[DuplicateMessage {
                key: MessageKey::new("CircuitsModel", "Name"),
                first_line: 4,
                duplicate_line: 12,
            }]
        );
        expect_that!(index.len(), eq(4));
    }

    #[googletest::test]
    fn test_disambiguation_comment() {
        let index = index();
        let key = MessageKey::new("CircuitsModel", "Open").with_comment(Some("file".to_string()));

        expect_that!(index.contains(&key), eq(true));
        expect_that!(index.contains(&MessageKey::new("CircuitsModel", "Open")), eq(false));
        expect_that!(
            index.get("CircuitsModel", "Open", Some("file")).and_then(|m| m.translation.text()),
            some(eq("Abrir"))
        );
        // 注釈なしでは引けない
        expect_that!(index.get("CircuitsModel", "Open", None), none());
        // 未知の注釈は注釈なしのメッセージに落ちる
        expect_that!(
            index.get("CircuitsModel", "Power", Some("unit")).and_then(|m| m.translation.text()),
            some(eq("Potência"))
        );
    }

    #[googletest::test]
    fn test_empty_catalog() {
        let index = CatalogIndex::default();

        expect_that!(index.is_empty(), eq(true));
        expect_that!(index.get("CircuitsModel", "Name", None), none());
    }
}
