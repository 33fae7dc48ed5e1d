//! 翻訳カタログの中間表現
//!
//! Qt Linguist の `.ts` ファイル 1 つ分を表す。コンテキストとメッセージの順序は
//! ファイル上の順序をそのまま保持する。

use std::fmt;

use crate::types::{
    FilePosition,
    SourceLocation,
};

/// 翻訳の状態（`<translation type="...">`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationState {
    /// `type` 属性なし
    #[default]
    Finished,
    /// `type="unfinished"`
    Unfinished,
    /// `type="obsolete"`
    Obsolete,
    /// `type="vanished"`
    Vanished,
}

impl TranslationState {
    /// `type` 属性の値から状態を取得
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    /// `type` 属性の値（`Finished` は属性なし）
    #[must_use]
    pub const fn as_attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// ソースから消えたメッセージかどうか
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

/// 翻訳テキスト
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Translation {
    /// 通常のメッセージ
    Text(String),
    /// 複数形メッセージ（`<numerusform>` の並び）
    Numerus(Vec<String>),
}

impl Default for Translation {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Translation {
    /// 翻訳が空かどうか
    ///
    /// 複数形の場合はすべての形が空のときに空とみなす。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Numerus(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// 単数形として使えるテキスト
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Numerus(forms) => forms.first().map(String::as_str),
        }
    }
}

/// カタログ内のメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// 翻訳前のテキスト（ルックアップキー）
    pub source: String,
    /// 同じソースを区別するための注釈（`<comment>`）
    pub comment: Option<String>,
    /// 開発者向けコメント（`<extracomment>`）
    pub extra_comment: Option<String>,
    /// 翻訳者のコメント（`<translatorcomment>`）
    pub translator_comment: Option<String>,
    /// ソース上の出現位置（参考情報）
    pub locations: Vec<SourceLocation>,
    pub translation: Translation,
    pub state: TranslationState,
    /// `numerus="yes"`
    pub numerus: bool,
    /// カタログファイル上の位置
    pub position: FilePosition,
}

impl Message {
    /// 未翻訳のメッセージを作成
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), state: TranslationState::Unfinished, ..Self::default() }
    }

    /// 翻訳済みのメッセージを作成
    #[must_use]
    pub fn translated(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation::Text(translation.into()),
            state: TranslationState::Finished,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// コンテキスト（UI コンポーネント単位のグループ）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    pub name: String,
    pub messages: Vec<Message>,
    /// カタログファイル上の位置
    pub position: FilePosition,
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// `.ts` カタログ全体
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    /// `<TS version="...">`
    pub version: Option<String>,
    /// 翻訳先ロケール（`<TS language="...">`）
    pub language: Option<String>,
    /// `<TS sourcelanguage="...">`
    pub source_language: Option<String>,
    pub contexts: Vec<Context>,
}

impl Catalog {
    #[must_use]
    pub fn new(language: Option<String>) -> Self {
        Self { version: Some("2.1".to_string()), language, ..Self::default() }
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    /// 全メッセージをコンテキスト名と共に列挙
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts.iter().flat_map(|context| {
            context.messages.iter().map(move |message| (context.name.as_str(), message))
        })
    }

    /// メッセージ総数
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }

    /// 名前でコンテキストを取得（同名が複数ある場合は最初のもの）
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }
}

/// メッセージのルックアップキー
///
/// 注釈（`comment`）のないメッセージは `(context, source)` で一意に決まる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
}

impl MessageKey {
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self { context: context.into(), source: source.into(), comment: None }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment.filter(|comment| !comment.is_empty());
        self
    }

    /// メッセージからキーを作成
    #[must_use]
    pub fn of(context: &str, message: &Message) -> Self {
        Self::new(context, message.source.as_str()).with_comment(message.comment.clone())
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::\"{}\"", self.context, self.source)?;
        if let Some(comment) = &self.comment {
            write!(f, " ({comment})")?;
        }
        Ok(())
    }
}
