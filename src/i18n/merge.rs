//! 抽出したメッセージを既存カタログにマージする（lupdate 相当）

use std::collections::{
    HashMap,
    HashSet,
};

use crate::i18n::plural::PluralRule;
use crate::ir::catalog::{
    Catalog,
    Context,
    Message,
    MessageKey,
    Translation,
    TranslationState,
};
use crate::types::SourceLocation;

/// ソースから抽出した 1 メッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
    /// 複数形メッセージ（`%n` を含む）
    pub numerus: bool,
    pub location: SourceLocation,
}

impl ExtractedMessage {
    #[must_use]
    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.context.as_str(), self.source.as_str()).with_comment(self.comment.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOptions {
    /// ソースから消えたメッセージを残さずに削除する
    pub no_obsolete: bool,
}

/// マージ結果の件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    /// 新しく追加したメッセージ
    pub added: usize,
    /// 既存のまま残したメッセージ
    pub kept: usize,
    /// `vanished` にしたメッセージ
    pub vanished: usize,
    /// 削除したメッセージ（`no_obsolete` と重複分）
    pub dropped: usize,
}

/// 同じキーの抽出結果をまとめたもの
struct Extracted<'a> {
    first: &'a ExtractedMessage,
    locations: Vec<SourceLocation>,
}

/// カタログをマージする
///
/// - 既存のキーは翻訳と状態を保ち、出現位置だけ新しくする
/// - 廃止済みのキーが再び現れたら、翻訳があれば完了、なければ未完了に戻す
/// - 抽出されなかったキーは `vanished`（`no_obsolete` なら削除）
/// - コンテキストの順序は既存のまま、新しいものは末尾に追加
#[must_use]
pub fn merge_catalog(
    existing: &Catalog,
    extracted: &[ExtractedMessage],
    options: MergeOptions,
) -> (Catalog, MergeStats) {
    // 抽出順を保ったままキーごとにまとめる
    let mut order: Vec<MessageKey> = Vec::new();
    let mut by_key: HashMap<MessageKey, Extracted<'_>> = HashMap::new();
    for message in extracted {
        let key = message.key();
        if let Some(entry) = by_key.get_mut(&key) {
            entry.locations.push(message.location.clone());
        } else {
            order.push(key.clone());
            by_key.insert(key, Extracted { first: message, locations: vec![message.location.clone()] });
        }
    }

    // 新しい複数形メッセージに用意する形の数
    let form_count = existing
        .language
        .as_deref()
        .map_or(PluralRule::OneOther, PluralRule::for_language)
        .form_count();

    let mut stats = MergeStats::default();
    let mut emitted: HashSet<MessageKey> = HashSet::new();
    let mut contexts: Vec<Context> = Vec::new();

    for context in &existing.contexts {
        let mut merged = Context { name: context.name.clone(), messages: Vec::new(), ..Context::default() };

        for message in &context.messages {
            let key = MessageKey::of(&context.name, message);
            if emitted.contains(&key) {
                // 重複は最初のものだけ残す
                stats.dropped += 1;
                continue;
            }

            match by_key.get(&key) {
                Some(found) => {
                    let mut message = message.clone();
                    message.locations.clone_from(&found.locations);
                    if message.state.is_retired() {
                        message.state = if message.translation.is_empty() {
                            TranslationState::Unfinished
                        } else {
                            TranslationState::Finished
                        };
                    }
                    merged.messages.push(message);
                    stats.kept += 1;
                }
                None if options.no_obsolete => {
                    stats.dropped += 1;
                    continue;
                }
                None => {
                    let mut message = message.clone();
                    message.locations.clear();
                    message.state = TranslationState::Vanished;
                    merged.messages.push(message);
                    stats.vanished += 1;
                }
            }
            emitted.insert(key);
        }

        // このコンテキストの新しいメッセージ
        for key in order.iter().filter(|key| key.context == context.name) {
            if emitted.contains(key) {
                continue;
            }
            if let Some(found) = by_key.get(key) {
                merged.messages.push(new_message(found, form_count));
                stats.added += 1;
                emitted.insert(key.clone());
            }
        }

        if !merged.messages.is_empty() {
            merge_into(&mut contexts, merged);
        }
    }

    // 新しいコンテキスト
    for key in &order {
        if emitted.contains(key) {
            continue;
        }
        if let Some(found) = by_key.get(key) {
            let message = new_message(found, form_count);
            match contexts.iter_mut().find(|context| context.name == key.context) {
                Some(context) => context.messages.push(message),
                None => contexts.push(Context::new(key.context.as_str()).with_message(message)),
            }
            stats.added += 1;
            emitted.insert(key.clone());
        }
    }

    tracing::debug!(?stats, "Merged catalog");

    let catalog = Catalog {
        version: existing.version.clone().or_else(|| Some("2.1".to_string())),
        language: existing.language.clone(),
        source_language: existing.source_language.clone(),
        contexts,
    };
    (catalog, stats)
}

fn new_message(found: &Extracted<'_>, form_count: usize) -> Message {
    let translation = if found.first.numerus {
        Translation::Numerus(vec![String::new(); form_count])
    } else {
        Translation::default()
    };
    Message {
        source: found.first.source.clone(),
        comment: found.first.comment.clone(),
        locations: found.locations.clone(),
        translation,
        numerus: found.first.numerus,
        state: TranslationState::Unfinished,
        ..Message::default()
    }
}

/// 同名のコンテキストが既にあればそこに追加する
fn merge_into(contexts: &mut Vec<Context>, context: Context) {
    match contexts.iter_mut().find(|existing| existing.name == context.name) {
        Some(existing) => existing.messages.extend(context.messages),
        None => contexts.push(context),
    }
}
