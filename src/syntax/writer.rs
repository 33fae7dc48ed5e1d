//! `.ts` カタログの書き出し
//!
//! lupdate と同じレイアウト（4 スペースインデント、`<!DOCTYPE TS>`）で出力する。

use quick_xml::escape::escape;

use crate::ir::catalog::{
    Catalog,
    Message,
    Translation,
};

impl Catalog {
    /// `.ts` 形式の文字列に変換
    #[must_use]
    pub fn to_ts_string(&self) -> String {
        write_ts(self)
    }
}

/// カタログを `.ts` 形式で書き出す
#[must_use]
pub fn write_ts(catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");

    out.push_str("<TS");
    push_attribute(&mut out, "version", catalog.version.as_deref());
    push_attribute(&mut out, "language", catalog.language.as_deref());
    push_attribute(&mut out, "sourcelanguage", catalog.source_language.as_deref());
    out.push_str(">\n");

    for context in &catalog.contexts {
        out.push_str("<context>\n");
        out.push_str(&format!("    <name>{}</name>\n", escape(context.name.as_str())));
        for message in &context.messages {
            write_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    out
}

fn write_message(out: &mut String, message: &Message) {
    if message.numerus {
        out.push_str("    <message numerus=\"yes\">\n");
    } else {
        out.push_str("    <message>\n");
    }

    for location in &message.locations {
        out.push_str(&format!(
            "        <location filename=\"{}\"",
            escape(location.filename.as_str())
        ));
        if let Some(line) = location.line {
            out.push_str(&format!(" line=\"{line}\""));
        }
        out.push_str("/>\n");
    }

    push_element(out, "source", Some(&message.source));
    push_element(out, "comment", message.comment.as_deref());
    push_element(out, "extracomment", message.extra_comment.as_deref());
    push_element(out, "translatorcomment", message.translator_comment.as_deref());

    out.push_str("        <translation");
    // 空の翻訳は lupdate と同じく unfinished として書く
    let state = if message.translation.is_empty() && !message.state.is_retired() {
        Some("unfinished")
    } else {
        message.state.as_attribute()
    };
    push_attribute(out, "type", state);
    out.push('>');

    match &message.translation {
        Translation::Text(text) => out.push_str(&escape(text.as_str())),
        Translation::Numerus(forms) => {
            out.push('\n');
            for form in forms {
                out.push_str(&format!(
                    "            <numerusform>{}</numerusform>\n",
                    escape(form.as_str())
                ));
            }
            out.push_str("        ");
        }
    }
    out.push_str("</translation>\n");

    out.push_str("    </message>\n");
}

fn push_element(out: &mut String, name: &str, text: Option<&str>) {
    if let Some(text) = text {
        out.push_str(&format!("        <{name}>{}</{name}>\n", escape(text)));
    }
}

fn push_attribute(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!(" {name}=\"{}\"", escape(value)));
    }
}
