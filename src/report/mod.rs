//! 計算結果のレポート
//!
//! プロジェクトのすべての回路と電線管を計算し、表または JSON で出力する。
//! 計算できなかった行は値の代わりにエラーを持つ。

pub mod labels;
mod table;

use serde::Serialize;

use crate::i18n::Translator;
use crate::installation::{
    CircuitId,
    ConduitFill,
    ConduitRunId,
    Project,
    ReferenceMethod,
    Sizing,
};
use labels::{
    circuits,
    conduit_runs,
    main_window,
};
use table::Table;

/// 回路 1 行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitRow {
    pub id: CircuitId,
    pub name: String,
    /// 回路ツリー上の深さ（トップレベルは 0）
    pub depth: usize,
    pub supply: Option<String>,
    pub load_type: Option<String>,
    /// m
    pub length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizing: Option<Sizing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 電線管 1 行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConduitRunRow {
    pub id: ConduitRunId,
    pub name: String,
    pub reference_method: ReferenceMethod,
    pub temperature: i32,
    pub grouping: u32,
    pub length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<ConduitFill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub name: String,
    pub circuits: Vec<CircuitRow>,
    pub conduit_runs: Vec<ConduitRunRow>,
}

impl ProjectReport {
    /// プロジェクト全体を計算
    #[must_use]
    pub fn build(project: &Project) -> Self {
        let circuits = project
            .walk()
            .into_iter()
            .map(|(depth, circuit)| {
                let (sizing, error) = split(project.calculate(circuit));
                CircuitRow {
                    id: circuit.id,
                    name: circuit.name.clone(),
                    depth,
                    supply: project.supply(circuit.supply).ok().map(ToString::to_string),
                    load_type: project
                        .load_type(circuit.load_type)
                        .ok()
                        .map(|load_type| load_type.name.clone()),
                    length: circuit.length,
                    sizing,
                    error,
                }
            })
            .collect();

        let conduit_runs = project
            .conduit_runs
            .iter()
            .map(|run| {
                let (correction_factor, factor_error) = split(project.correction_factor(run));
                let (fill, fill_error) = split(project.conduit_fill(run.id));
                ConduitRunRow {
                    id: run.id,
                    name: run.name.clone(),
                    reference_method: run.reference_method,
                    temperature: run.temperature,
                    grouping: project.grouping(run.id),
                    length: run.length,
                    correction_factor,
                    fill,
                    error: factor_error.or(fill_error),
                }
            })
            .collect();

        let report = Self { name: project.name.clone(), circuits, conduit_runs };
        tracing::debug!(
            circuits = report.circuits.len(),
            failed = report.failed_rows(),
            "Built project report"
        );
        report
    }

    /// エラーになった行の数
    #[must_use]
    pub fn failed_rows(&self) -> usize {
        self.circuits.iter().filter(|row| row.error.is_some()).count()
            + self.conduit_runs.iter().filter(|row| row.error.is_some()).count()
    }
}

fn split<T, E: ToString>(result: Result<T, E>) -> (Option<T>, Option<String>) {
    match result {
        Ok(value) => (Some(value), None),
        Err(error) => (None, Some(error.to_string())),
    }
}

/// 見出しを翻訳した固定幅の表
#[must_use]
pub fn render_table(report: &ProjectReport, translator: &Translator) -> String {
    let error_label = main_window::ERROR.tr(translator);
    let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);

    let mut circuit_table = Table::new(vec![
        circuits::NAME.tr(translator),
        circuits::SUPPLY.tr(translator),
        circuits::LOAD_TYPE.tr(translator),
        circuits::POWER.tr(translator),
        circuits::LENGTH.tr(translator),
        circuits::CURRENT.tr(translator),
        circuits::BREAKER.tr(translator),
        circuits::WIRE_SECTION.tr(translator),
        circuits::WIRE_CAPACITY.tr(translator),
        circuits::VOLTAGE_DROP.tr(translator),
    ]);
    for row in &report.circuits {
        let mut cells = vec![
            format!("{}{}", "  ".repeat(row.depth), row.name),
            row.supply.clone().unwrap_or_default(),
            row.load_type.clone().unwrap_or_default(),
        ];
        match (&row.sizing, &row.error) {
            (Some(sizing), _) => cells.extend([
                format!("{:.0} W", sizing.power),
                format!("{:.1} m", row.length),
                format!("{:.2} A", sizing.current),
                sizing.breaker.to_string(),
                sizing.wire.to_string(),
                format!("{:.2} A", sizing.wire.capacity()),
                format!("{:.2} %", sizing.voltage_drop * 100.0),
            ]),
            (None, error) => cells.push(format!(
                "{error_label}: {}",
                error.as_deref().unwrap_or_default()
            )),
        }
        circuit_table.push_row(cells);
    }

    let mut run_table = Table::new(vec![
        conduit_runs::NAME.tr(translator),
        conduit_runs::REFERENCE_METHOD.tr(translator),
        conduit_runs::TEMPERATURE.tr(translator),
        conduit_runs::GROUPING.tr(translator),
        conduit_runs::LENGTH.tr(translator),
        conduit_runs::DIAMETER.tr(translator),
        conduit_runs::FILL_FACTOR.tr(translator),
    ]);
    for row in &report.conduit_runs {
        let mut cells = vec![
            row.name.clone(),
            row.reference_method.to_string(),
            format!("{} °C", row.temperature),
            row.grouping.to_string(),
            format!("{:.1} m", row.length),
        ];
        match (&row.fill, &row.error) {
            (Some(fill), _) => cells.extend([
                fill.conduit.to_string(),
                format!("{:.1} %", fill.fill_factor * 100.0),
            ]),
            (None, error) => cells.push(format!(
                "{error_label}: {}",
                error.as_deref().unwrap_or_default()
            )),
        }
        run_table.push_row(cells);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{} ({}, {})\n\n",
        report.name,
        main_window::CIRCUIT_COUNT.tr_n(translator, count(report.circuits.len())),
        main_window::CONDUIT_RUN_COUNT.tr_n(translator, count(report.conduit_runs.len())),
    ));
    out.push_str(&circuit_table.render());
    out.push('\n');
    out.push_str(&run_table.render());
    out
}

/// 機械向けの JSON
pub fn render_json(report: &ProjectReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
