//! 画面に出す文字列の一覧
//!
//! `ui_message!` はコンパイル時にファイルと行を記録する。`i18n update` はこの一覧を
//! 抽出結果としてカタログにマージする。

use crate::i18n::{
    ExtractedMessage,
    Translator,
};
use crate::types::SourceLocation;

/// 翻訳対象の文字列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiMessage {
    pub context: &'static str,
    pub source: &'static str,
    /// `%n` を含む複数形メッセージ
    pub numerus: bool,
    pub file: &'static str,
    pub line: u32,
}

macro_rules! ui_message {
    ($context:literal, $source:literal) => {
        UiMessage { context: $context, source: $source, numerus: false, file: file!(), line: line!() }
    };
    ($context:literal, $source:literal, numerus) => {
        UiMessage { context: $context, source: $source, numerus: true, file: file!(), line: line!() }
    };
}

impl UiMessage {
    /// 翻訳したテキスト
    #[must_use]
    pub fn tr<'a>(&self, translator: &'a Translator) -> &'a str {
        translator.translate(self.context, self.source)
    }

    /// 数に応じて翻訳し `%n` を置き換えたテキスト
    #[must_use]
    pub fn tr_n(&self, translator: &Translator, n: i64) -> String {
        translator.translate_plural(self.context, self.source, n)
    }

    #[must_use]
    pub fn extracted(&self) -> ExtractedMessage {
        ExtractedMessage {
            context: self.context.to_string(),
            source: self.source.to_string(),
            comment: None,
            numerus: self.numerus,
            location: SourceLocation::new(self.file, Some(self.line)),
        }
    }
}

/// 回路表
pub mod circuits {
    use super::UiMessage;

    pub const NAME: UiMessage = ui_message!("CircuitsModel", "Name");
    pub const SUPPLY: UiMessage = ui_message!("CircuitsModel", "Supply");
    pub const LOAD_TYPE: UiMessage = ui_message!("CircuitsModel", "Load Type");
    pub const POWER: UiMessage = ui_message!("CircuitsModel", "Power");
    pub const LENGTH: UiMessage = ui_message!("CircuitsModel", "Length");
    pub const CURRENT: UiMessage = ui_message!("CircuitsModel", "Current");
    pub const BREAKER: UiMessage = ui_message!("CircuitsModel", "Breaker");
    pub const WIRE_SECTION: UiMessage = ui_message!("CircuitsModel", "Wire Section");
    pub const WIRE_CAPACITY: UiMessage = ui_message!("CircuitsModel", "Wire Capacity");
    pub const VOLTAGE_DROP: UiMessage = ui_message!("CircuitsModel", "Voltage Drop");
    pub const NEW_CIRCUIT: UiMessage = ui_message!("CircuitsModel", "New Circuit");
    pub const NEW_UPSTREAM_CIRCUIT: UiMessage =
        ui_message!("CircuitsModel", "New Upstream Circuit");
}

/// 電線管表
pub mod conduit_runs {
    use super::UiMessage;

    pub const NAME: UiMessage = ui_message!("ConduitRunsModel", "Name");
    pub const REFERENCE_METHOD: UiMessage = ui_message!("ConduitRunsModel", "Ref. Method");
    pub const TEMPERATURE: UiMessage = ui_message!("ConduitRunsModel", "Temperature");
    pub const GROUPING: UiMessage = ui_message!("ConduitRunsModel", "Grouping");
    pub const LENGTH: UiMessage = ui_message!("ConduitRunsModel", "Length");
    pub const DIAMETER: UiMessage = ui_message!("ConduitRunsModel", "Diameter");
    pub const FILL_FACTOR: UiMessage = ui_message!("ConduitRunsModel", "Fill Factor");
    pub const NEW_CONDUIT_RUN: UiMessage = ui_message!("ConduitRunsModel", "New Conduit Run");
}

pub mod main_window {
    use super::UiMessage;

    pub const TITLE: UiMessage = ui_message!("MainWindow", "NBR 5410 Calculator");
    pub const NEW_PROJECT: UiMessage = ui_message!("MainWindow", "New Project");
    pub const DEFAULT_LOAD_TYPE: UiMessage = ui_message!("MainWindow", "Power");
    pub const ERROR: UiMessage = ui_message!("MainWindow", "Error");
    pub const CIRCUIT_COUNT: UiMessage = ui_message!("MainWindow", "%n circuit(s)", numerus);
    pub const CONDUIT_RUN_COUNT: UiMessage =
        ui_message!("MainWindow", "%n conduit run(s)", numerus);
}

/// すべての文字列（コンテキストごと、定義順）
pub const UI_MESSAGES: &[UiMessage] = &[
    circuits::NAME,
    circuits::SUPPLY,
    circuits::LOAD_TYPE,
    circuits::POWER,
    circuits::LENGTH,
    circuits::CURRENT,
    circuits::BREAKER,
    circuits::WIRE_SECTION,
    circuits::WIRE_CAPACITY,
    circuits::VOLTAGE_DROP,
    circuits::NEW_CIRCUIT,
    circuits::NEW_UPSTREAM_CIRCUIT,
    conduit_runs::NAME,
    conduit_runs::REFERENCE_METHOD,
    conduit_runs::TEMPERATURE,
    conduit_runs::GROUPING,
    conduit_runs::LENGTH,
    conduit_runs::DIAMETER,
    conduit_runs::FILL_FACTOR,
    conduit_runs::NEW_CONDUIT_RUN,
    main_window::TITLE,
    main_window::NEW_PROJECT,
    main_window::DEFAULT_LOAD_TYPE,
    main_window::ERROR,
    main_window::CIRCUIT_COUNT,
    main_window::CONDUIT_RUN_COUNT,
];

/// カタログ更新用の抽出結果
#[must_use]
pub fn extracted_messages() -> Vec<ExtractedMessage> {
    UI_MESSAGES.iter().map(UiMessage::extracted).collect()
}
