//! 同梱カタログと CLI の結合テスト

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::fs;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use clap::Parser;
use googletest::prelude::*;
use nbr_5410_calculator::cli::{
    Cli,
    run,
};
use nbr_5410_calculator::config::Settings;
use nbr_5410_calculator::db::CatalogDatabaseImpl;
use nbr_5410_calculator::i18n::{
    check_catalogs,
    load_translator,
};
use nbr_5410_calculator::indexer::CatalogIndexer;
use nbr_5410_calculator::installation::Project;
use nbr_5410_calculator::report::labels::UI_MESSAGES;
use tempfile::TempDir;

fn shipped_translations() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("share/translations")
}

/// 同梱カタログを `share/translations` に置いたワークスペース
fn workspace_with_catalogs() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let translations = temp_dir.path().join("share/translations");
    fs::create_dir_all(&translations).unwrap();
    for name in ["app_en_US.ts", "app_pt_BR.ts"] {
        fs::copy(shipped_translations().join(name), translations.join(name)).unwrap();
    }
    temp_dir
}

async fn run_cli(args: &[&str]) -> (ExitCode, String) {
    let cli = Cli::try_parse_from(std::iter::once("nbr5410").chain(args.iter().copied())).unwrap();
    let mut out = Vec::new();
    let code = run(cli, &mut out).await.unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[googletest::test]
fn test_every_ui_message_is_translated_in_pt_br() {
    let db = CatalogDatabaseImpl::default();
    let translator = load_translator(&db, &shipped_translations(), "app", "pt_BR", false);

    expect_that!(translator.languages(), elements_are![eq(&"pt_BR")]);
    for message in UI_MESSAGES {
        let translated = message.tr(&translator);
        assert_ne!(translated, message.source, "{}: {}", message.context, message.source);
    }
}

#[tokio::test]
async fn test_shipped_catalogs_are_consistent() {
    let workspace = workspace_with_catalogs();
    let db = CatalogDatabaseImpl::default();
    let settings = Settings::default();

    let files = CatalogIndexer::from_settings(&settings)
        .index_workspace(&db, workspace.path(), &settings)
        .await
        .unwrap();
    let diagnostics = check_catalogs(&db, &files, &settings);

    assert_eq!(files.len(), 2);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[googletest::test]
#[tokio::test]
async fn test_new_then_calc_in_portuguese() {
    let workspace = workspace_with_catalogs();
    let root = workspace.path().to_str().unwrap();
    let project = workspace.path().join("casa.json");
    let project_path = project.to_str().unwrap();

    let (code, _) =
        run_cli(&["--workspace", root, "new", project_path, "--locale", "pt_BR"]).await;
    assert_eq!(code, ExitCode::SUCCESS);

    let saved = Project::load(&project).unwrap();
    assert_eq!(saved.name, "Novo Projeto");
    assert_eq!(saved.circuits[0].name, "Novo Circuito");
    assert_eq!(saved.load_types[0].name, "Força");

    let (code, table) =
        run_cli(&["--workspace", root, "calc", project_path, "--locale", "pt-BR"]).await;
    assert_eq!(code, ExitCode::SUCCESS);
    expect_that!(table, starts_with("Novo Projeto (1 circuito, 1 eletroduto)"));
    expect_that!(table, contains_substring("Disjuntor"));
    expect_that!(table, contains_substring("C10"));
    expect_that!(table, contains_substring("2.50 mm²"));

    let (_, json) = run_cli(&["--workspace", root, "calc", project_path, "--format", "json"]).await;
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["circuits"][0]["sizing"]["breaker"]["current"], 10);
}

#[googletest::test]
#[tokio::test]
async fn test_new_refuses_to_overwrite() {
    let workspace = TempDir::new().unwrap();
    let project = workspace.path().join("casa.json");
    fs::write(&project, "{}").unwrap();

    let cli = Cli::try_parse_from([
        "nbr5410",
        "--workspace",
        workspace.path().to_str().unwrap(),
        "new",
        project.to_str().unwrap(),
    ])
    .unwrap();
    let result = run(cli, &mut Vec::new()).await;

    expect_that!(result.is_err(), eq(true));
    expect_that!(fs::read_to_string(&project).unwrap(), eq("{}"));
}

#[googletest::test]
#[tokio::test]
async fn test_check_reports_missing_message() {
    let workspace = workspace_with_catalogs();
    let pt_br = workspace.path().join("share/translations/app_pt_BR.ts");
    let text = fs::read_to_string(&pt_br).unwrap().replace(
        "    <message>\n        <location filename=\"src/report/labels.rs\" line=\"62\"/>\n        <source>Supply</source>\n        <translation>Alimentação</translation>\n    </message>\n",
        "",
    );
    fs::write(&pt_br, text).unwrap();

    let (code, output) = run_cli(&["--workspace", workspace.path().to_str().unwrap(), "i18n", "check"]).await;

    assert_eq!(code, ExitCode::FAILURE);
    expect_that!(output, contains_substring("missing-message"));
    expect_that!(output, contains_substring("Supply"));
}

#[googletest::test]
#[tokio::test]
async fn test_update_restores_removed_message() {
    let workspace = workspace_with_catalogs();
    let root = workspace.path().to_str().unwrap();
    let en_us = workspace.path().join("share/translations/app_en_US.ts");
    let shipped = fs::read_to_string(&en_us).unwrap();
    let trimmed = shipped.replace("<source>Fill Factor</source>", "<source>Occupancy</source>");
    fs::write(&en_us, trimmed).unwrap();

    let (code, output) = run_cli(&["--workspace", root, "i18n", "update", "--no-obsolete"]).await;

    assert_eq!(code, ExitCode::SUCCESS);
    expect_that!(output, contains_substring("app_en_US.ts: 1 added, 25 kept, 0 vanished, 1 dropped"));
    expect_that!(output, contains_substring("app_pt_BR.ts: 0 added, 26 kept, 0 vanished, 0 dropped"));
    let updated = fs::read_to_string(&en_us).unwrap();
    expect_that!(updated, contains_substring("<source>Fill Factor</source>"));
    expect_that!(updated, not(contains_substring("Occupancy")));
}

#[test]
fn test_lookup_plural() {
    let workspace = workspace_with_catalogs();
    let root = workspace.path().to_str().unwrap().to_string();

    let (code, output) = tokio_test::block_on(run_cli(&[
        "--workspace",
        &root,
        "i18n",
        "lookup",
        "--locale",
        "pt_BR",
        "--context",
        "MainWindow",
        "-n",
        "2",
        "%n circuit(s)",
    ]));

    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(output, "2 circuitos\n");
}

/// `app_pt_BR.ts` を Latin-1 で書き直す（UTF-8 としては読めない）
fn write_latin1_pt_br(workspace: &Path) -> (PathBuf, Vec<u8>) {
    let pt_br = workspace.join("share/translations/app_pt_BR.ts");
    let bytes = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<TS version=\"2.1\" language=\"pt_BR\">\n<context>\n    <name>CircuitsModel</name>\n    <message>\n        <source>Supply</source>\n        <translation>Alimenta\xe7\xe3o</translation>\n    </message>\n</context>\n</TS>\n".to_vec();
    fs::write(&pt_br, &bytes).unwrap();
    (pt_br, bytes)
}

#[googletest::test]
#[tokio::test]
async fn test_check_reports_unreadable_catalog() {
    let workspace = workspace_with_catalogs();
    write_latin1_pt_br(workspace.path());

    let (code, output) = run_cli(&["--workspace", workspace.path().to_str().unwrap(), "i18n", "check"]).await;

    assert_eq!(code, ExitCode::FAILURE);
    expect_that!(output, contains_substring("app_pt_BR.ts:1: error[parse-error] Failed to read catalog file"));
    expect_that!(output, contains_substring("2 catalog(s) checked"));
}

#[googletest::test]
#[tokio::test]
async fn test_update_leaves_unreadable_catalog_untouched() {
    let workspace = workspace_with_catalogs();
    fs::write(workspace.path().join(".nbr5410.json"), r#"{ "requiredLanguages": ["pt_BR"] }"#)
        .unwrap();
    let (pt_br, bytes) = write_latin1_pt_br(workspace.path());

    let (code, output) =
        run_cli(&["--workspace", workspace.path().to_str().unwrap(), "i18n", "update"]).await;

    assert_eq!(code, ExitCode::FAILURE);
    expect_that!(output, contains_substring("app_pt_BR.ts: skipped"));
    expect_that!(output, contains_substring("app_en_US.ts: 0 added, 26 kept"));
    assert_eq!(fs::read(&pt_br).unwrap(), bytes);
}

#[googletest::test]
#[tokio::test]
async fn test_update_does_not_create_over_existing_catalog() {
    let workspace = workspace_with_catalogs();
    // share/translations はインデックス対象外だが、新規作成先でもある
    fs::write(
        workspace.path().join(".nbr5410.json"),
        r#"{
            // 別の場所だけを探す
            "translationFiles": { "filePattern": "i18n/*.ts" },
            "requiredLanguages": ["pt_BR"]
        }"#,
    )
    .unwrap();
    let pt_br = workspace.path().join("share/translations/app_pt_BR.ts");
    let shipped = fs::read_to_string(&pt_br).unwrap();

    let (code, output) =
        run_cli(&["--workspace", workspace.path().to_str().unwrap(), "i18n", "update"]).await;

    assert_eq!(code, ExitCode::FAILURE);
    expect_that!(output, contains_substring("app_pt_BR.ts: skipped (exists"));
    assert_eq!(fs::read_to_string(&pt_br).unwrap(), shipped);
}
