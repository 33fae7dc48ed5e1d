//! `.ts` カタログの読み込み
//!
//! quick-xml のイベントを順に処理し、`Catalog` を組み立てる。
//! 未知の要素は無視する（`<userdata>`、`<oldsource>` など）。
//! 長さ違いの訳（`<lengthvariant>`）は最初のものだけを使う。

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use super::error::CatalogError;
use crate::ir::catalog::{
    Catalog,
    Context,
    Message,
    Translation,
    TranslationState,
};
use crate::types::{
    FilePosition,
    LineIndex,
    SourceLocation,
};

/// テキストを収集中の要素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ContextName,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
    LengthVariant,
}

/// パース中の状態
#[derive(Debug, Default)]
struct ParserState {
    catalog: Catalog,
    seen_root: bool,
    context: Option<Context>,
    context_has_name: bool,
    message: Option<Message>,
    message_has_source: bool,
    numerus_forms: Vec<String>,
    field: Option<Field>,
    buffer: String,
    /// `<lengthvariant>` を囲む要素
    variant_parent: Option<Field>,
    /// 囲む要素の最初の `<lengthvariant>`
    first_variant: Option<String>,
    /// 相対行番号（`line="+3"`）を解決するためのファイルごとの直前の行
    last_lines: HashMap<String, u32>,
    last_filename: Option<String>,
}

/// `.ts` テキストをパースする
///
/// # Errors
/// - XML として不正
/// - ルート要素が `<TS>` ではない
/// - `<context>` に `<name>`、`<message>` に `<source>` がない
pub fn parse_ts(text: &str) -> Result<Catalog, CatalogError> {
    let mut reader = Reader::from_str(text);
    let mut state = ParserState::default();
    let lines = LineIndex::new(text);

    loop {
        let offset = usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
        let position = lines.position(offset);

        let event = reader
            .read_event()
            .map_err(|e| CatalogError::Xml { line: position.line, message: e.to_string() })?;

        match event {
            Event::Start(element) => state.start(&element, position, false)?,
            Event::Empty(element) => {
                state.start(&element, position, true)?;
                state.end(element.name().as_ref())?;
            }
            Event::End(element) => state.end(element.name().as_ref())?,
            Event::Text(content) => {
                if state.field.is_some() {
                    let unescaped = content.unescape().map_err(|e| CatalogError::Xml {
                        line: position.line,
                        message: e.to_string(),
                    })?;
                    state.buffer.push_str(&unescaped);
                }
            }
            Event::CData(content) => {
                if state.field.is_some() {
                    state.buffer.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(context) = &state.context {
        return Err(CatalogError::UnexpectedEof(format!("context {}", context.name)));
    }
    if !state.seen_root {
        return Err(CatalogError::UnexpectedRoot(String::new()));
    }

    Ok(state.catalog)
}

impl ParserState {
    fn start(
        &mut self,
        element: &BytesStart<'_>,
        position: FilePosition,
        is_empty: bool,
    ) -> Result<(), CatalogError> {
        let name = element.name();
        let name = name.as_ref();

        if !self.seen_root {
            if name != b"TS" {
                return Err(CatalogError::UnexpectedRoot(
                    String::from_utf8_lossy(name).into_owned(),
                ));
            }
            self.seen_root = true;
            self.catalog.version = attribute(element, b"version", position)?;
            self.catalog.language = attribute(element, b"language", position)?;
            self.catalog.source_language = attribute(element, b"sourcelanguage", position)?;
            return Ok(());
        }

        match name {
            b"context" => {
                self.context = Some(Context { position, ..Context::default() });
                self.context_has_name = false;
            }
            b"name" if self.context.is_some() && self.message.is_none() => {
                self.begin_field(Field::ContextName);
                self.context_has_name = true;
            }
            b"message" if self.context.is_some() => {
                let numerus = attribute(element, b"numerus", position)?.as_deref() == Some("yes");
                self.message = Some(Message { numerus, position, ..Message::default() });
                self.message_has_source = false;
                self.numerus_forms.clear();
                self.first_variant = None;
            }
            b"location" if self.message.is_some() => {
                let location = self.resolve_location(element, position)?;
                if let Some(message) = &mut self.message {
                    message.locations.push(location);
                }
            }
            b"source" if self.message.is_some() => {
                self.begin_field(Field::Source);
                self.message_has_source = true;
            }
            b"comment" if self.message.is_some() => self.begin_field(Field::Comment),
            b"extracomment" if self.message.is_some() => self.begin_field(Field::ExtraComment),
            b"translatorcomment" if self.message.is_some() => {
                self.begin_field(Field::TranslatorComment);
            }
            b"translation" if self.message.is_some() => {
                let state = attribute(element, b"type", position)?
                    .as_deref()
                    .and_then(TranslationState::from_attribute)
                    .unwrap_or_default();
                if let Some(message) = &mut self.message {
                    message.state = state;
                }
                self.begin_field(Field::Translation);
            }
            b"numerusform" if self.field == Some(Field::Translation) => {
                self.begin_field(Field::NumerusForm);
            }
            b"lengthvariant"
                if matches!(self.field, Some(Field::Translation | Field::NumerusForm)) =>
            {
                self.variant_parent = self.field;
                self.begin_field(Field::LengthVariant);
            }
            _ => {
                if !is_empty {
                    tracing::trace!(element = %String::from_utf8_lossy(name), "Skipping element");
                }
            }
        }

        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<(), CatalogError> {
        match name {
            b"context" => {
                let Some(context) = self.context.take() else {
                    return Ok(());
                };
                if !self.context_has_name {
                    return Err(CatalogError::MissingElement {
                        element: "name",
                        parent: "context",
                        line: context.position.line,
                    });
                }
                self.catalog.contexts.push(context);
            }
            b"message" => {
                let Some(mut message) = self.message.take() else {
                    return Ok(());
                };
                if !self.message_has_source {
                    return Err(CatalogError::MissingElement {
                        element: "source",
                        parent: "message",
                        line: message.position.line,
                    });
                }
                if message.numerus && !self.numerus_forms.is_empty() {
                    message.translation =
                        Translation::Numerus(std::mem::take(&mut self.numerus_forms));
                }
                if let Some(context) = &mut self.context {
                    context.messages.push(message);
                }
            }
            b"name" | b"source" | b"comment" | b"extracomment" | b"translatorcomment"
            | b"translation" | b"numerusform" | b"lengthvariant" => self.finish_field(name),
            _ => {}
        }

        Ok(())
    }

    fn begin_field(&mut self, field: Field) {
        self.field = Some(field);
        self.buffer.clear();
    }

    fn finish_field(&mut self, name: &[u8]) {
        let Some(field) = self.field else {
            return;
        };
        let mut text = std::mem::take(&mut self.buffer);
        if matches!(
            (field, name),
            (Field::Translation, b"translation") | (Field::NumerusForm, b"numerusform")
        ) && let Some(variant) = self.first_variant.take()
        {
            text = variant;
        }

        match (field, name) {
            (Field::ContextName, b"name") => {
                if let Some(context) = &mut self.context {
                    context.name = text;
                }
                self.field = None;
            }
            (Field::LengthVariant, b"lengthvariant") => {
                if self.first_variant.is_none() {
                    self.first_variant = Some(text);
                }
                self.field = self.variant_parent.take();
            }
            (Field::NumerusForm, b"numerusform") => {
                self.numerus_forms.push(text);
                // </translation> まで translation の中にいる
                self.field = Some(Field::Translation);
            }
            (Field::Translation, b"translation") => {
                if let Some(message) = &mut self.message
                    && !message.numerus
                {
                    message.translation = Translation::Text(text);
                }
                self.field = None;
            }
            (_, _) => {
                if let Some(message) = &mut self.message {
                    match (field, name) {
                        (Field::Source, b"source") => message.source = text,
                        (Field::Comment, b"comment") => message.comment = Some(text),
                        (Field::ExtraComment, b"extracomment") => {
                            message.extra_comment = Some(text);
                        }
                        (Field::TranslatorComment, b"translatorcomment") => {
                            message.translator_comment = Some(text);
                        }
                        _ => {}
                    }
                }
                self.field = None;
            }
        }
    }

    /// `<location>` を解決する
    ///
    /// lupdate の相対モードでは `filename` が省略され、`line` が `+N`/`-N` になる。
    fn resolve_location(
        &mut self,
        element: &BytesStart<'_>,
        position: FilePosition,
    ) -> Result<SourceLocation, CatalogError> {
        let filename = attribute(element, b"filename", position)?
            .or_else(|| self.last_filename.clone())
            .unwrap_or_default();
        let raw_line = attribute(element, b"line", position)?;

        let line = raw_line.as_deref().and_then(|raw| {
            let previous = self.last_lines.get(&filename).copied().unwrap_or(0);
            if let Some(delta) = raw.strip_prefix('+') {
                delta.parse::<u32>().ok().map(|delta| previous.saturating_add(delta))
            } else if let Some(delta) = raw.strip_prefix('-') {
                delta.parse::<u32>().ok().map(|delta| previous.saturating_sub(delta))
            } else {
                raw.parse::<u32>().ok()
            }
        });

        if let Some(line) = line {
            self.last_lines.insert(filename.clone(), line);
        }
        self.last_filename = Some(filename.clone());

        Ok(SourceLocation::new(filename, line))
    }
}

/// 属性値をアンエスケープして取得
fn attribute(
    element: &BytesStart<'_>,
    key: &[u8],
    position: FilePosition,
) -> Result<Option<String>, CatalogError> {
    for attr in element.attributes() {
        let attr = attr
            .map_err(|e| CatalogError::Xml { line: position.line, message: e.to_string() })?;
        if attr.key.as_ref() == key {
            let value: Cow<'_, str> = attr
                .unescape_value()
                .map_err(|e| CatalogError::Xml { line: position.line, message: e.to_string() })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
