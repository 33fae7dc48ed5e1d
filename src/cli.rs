//! `nbr5410` コマンドの実装
//!
//! `main.rs` はログの初期化と引数の解析だけを行い、ここに処理を任せる。

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use anyhow::{
    Context as _,
    bail,
};
use clap::{
    Parser,
    Subcommand,
    ValueEnum,
};

use crate::config::ConfigManager;
use crate::db::CatalogDatabaseImpl;
use crate::i18n::{
    CheckSummary,
    MergeOptions,
    Translator,
    check_catalogs,
    load_translator,
    merge_catalog,
};
use crate::indexer::CatalogIndexer;
use crate::input::catalog::canonical_locale;
use crate::installation::{
    DefaultNames,
    Project,
};
use crate::ir::catalog::Catalog;
use crate::report::labels::{
    circuits,
    conduit_runs,
    extracted_messages,
    main_window,
};
use crate::report::{
    ProjectReport,
    render_json,
    render_table,
};
use crate::syntax::{
    catalog_language,
    parse_catalog,
};

/// ロケールが決まらないときの既定値
const FALLBACK_LOCALE: &str = "en_US";

#[derive(Debug, Parser)]
#[command(name = "nbr5410", version, about = "Electrical circuit sizing per NBR 5410")]
pub struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Size every circuit and conduit run of a project
    Calc {
        project: PathBuf,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Create a project with one default circuit
    New {
        project: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Translation catalog tools
    #[command(subcommand)]
    I18n(I18nCommand),
}

#[derive(Debug, Subcommand)]
pub enum I18nCommand {
    /// Check every catalog of the workspace
    Check,
    /// Translate one string
    Lookup {
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        context: String,
        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,
        /// Count for plural forms
        #[arg(short = 'n')]
        count: Option<i64>,
        source: String,
    },
    /// Merge the strings of this program into every catalog
    Update {
        /// Remove messages no longer used instead of marking them vanished
        #[arg(long)]
        no_obsolete: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

/// コマンドを実行して終了コードを返す
///
/// # Errors
/// 設定、プロジェクト、カタログの読み書きに失敗した場合
pub async fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<ExitCode> {
    let workspace = match cli.workspace {
        Some(workspace) => workspace,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let mut config = ConfigManager::new();
    config
        .load_settings(Some(workspace.clone()))
        .with_context(|| format!("Failed to load settings from {}", workspace.display()))?;
    let session = Session { db: CatalogDatabaseImpl::default(), config };

    match cli.command {
        Command::Calc { project, locale, format } => {
            session.calc(&project, locale.as_deref(), format, out)
        }
        Command::New { project, name, locale, force } => {
            session.new_project(&project, name, locale.as_deref(), force, out)
        }
        Command::I18n(I18nCommand::Check) => session.check(&workspace, out).await,
        Command::I18n(I18nCommand::Lookup { locale, context, comment, count, source }) => {
            let translator = session.translator(locale.as_deref());
            let text = match count {
                Some(n) => translator.translate_plural(&context, &source, n),
                None => translator
                    .translate_disambiguated(&context, &source, comment.as_deref())
                    .to_string(),
            };
            writeln!(out, "{text}")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::I18n(I18nCommand::Update { no_obsolete }) => {
            session.update(&workspace, MergeOptions { no_obsolete }, out).await
        }
    }
}

struct Session {
    db: CatalogDatabaseImpl,
    config: ConfigManager,
}

impl Session {
    /// フラグ、設定、環境変数の順にロケールを決める
    fn locale(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.config.get_settings().locale.clone())
            .or_else(locale_from_env)
            .map_or_else(|| FALLBACK_LOCALE.to_string(), |locale| canonical_locale(&locale))
    }

    fn translator(&self, locale: Option<&str>) -> Translator {
        let settings = self.config.get_settings();
        let locale = self.locale(locale);
        tracing::debug!(locale = %locale, "Loading translations");
        load_translator(
            &self.db,
            &self.config.translations_dir(),
            &settings.translation_files.prefix,
            &locale,
            settings.include_unfinished,
        )
    }

    fn calc(
        &self,
        path: &Path,
        locale: Option<&str>,
        format: Format,
        out: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        let project = Project::load(path)
            .with_context(|| format!("Failed to load project {}", path.display()))?;
        let report = ProjectReport::build(&project);

        match format {
            Format::Table => write!(out, "{}", render_table(&report, &self.translator(locale)))?,
            Format::Json => writeln!(out, "{}", render_json(&report)?)?,
        }
        Ok(ExitCode::SUCCESS)
    }

    fn new_project(
        &self,
        path: &Path,
        name: Option<String>,
        locale: Option<&str>,
        force: bool,
        out: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }

        let translator = self.translator(locale);
        let names = DefaultNames {
            load_type: main_window::DEFAULT_LOAD_TYPE.tr(&translator).to_string(),
            conduit_run: conduit_runs::NEW_CONDUIT_RUN.tr(&translator).to_string(),
            circuit: circuits::NEW_CIRCUIT.tr(&translator).to_string(),
        };
        let name = name.unwrap_or_else(|| main_window::NEW_PROJECT.tr(&translator).to_string());

        let project = Project::new_default_with(name, &names);
        project.save(path).with_context(|| format!("Failed to save {}", path.display()))?;
        writeln!(out, "{}", path.display())?;
        Ok(ExitCode::SUCCESS)
    }

    async fn check(&self, workspace: &Path, out: &mut dyn Write) -> anyhow::Result<ExitCode> {
        let settings = self.config.get_settings();
        let files = CatalogIndexer::from_settings(settings)
            .index_workspace(&self.db, workspace, settings)
            .await?;

        let diagnostics = check_catalogs(&self.db, &files, settings);
        for diagnostic in &diagnostics {
            writeln!(out, "{diagnostic}")?;
        }
        let summary = CheckSummary::from_diagnostics(&diagnostics);
        writeln!(out, "{} catalog(s) checked: {summary}", files.len())?;

        Ok(if summary.has_errors() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
    }

    async fn update(
        &self,
        workspace: &Path,
        options: MergeOptions,
        out: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        let settings = self.config.get_settings();
        let files = CatalogIndexer::from_settings(settings)
            .index_workspace(&self.db, workspace, settings)
            .await?;
        let extracted = extracted_messages();

        let mut targets: Vec<(PathBuf, Catalog)> = Vec::new();
        let mut languages = Vec::new();
        let mut skipped = 0_usize;
        for file in files {
            let path = PathBuf::from(file.path(&self.db));
            languages.push(canonical_locale(&catalog_language(&self.db, file)));
            match parse_catalog(&self.db, file) {
                Ok(catalog) => targets.push((path, catalog)),
                Err(error) => {
                    // 読めないカタログは書き換えない
                    tracing::warn!(path = %path.display(), %error, "Skipping unparsable catalog");
                    writeln!(out, "{}: skipped ({error})", path.display())?;
                    skipped += 1;
                }
            }
        }

        // 必須言語でカタログがないものは新しく作る
        let directory = self.config.translations_dir();
        for language in settings.required_languages.iter().flatten() {
            let language = canonical_locale(language);
            if languages.contains(&language) {
                continue;
            }
            let path =
                directory.join(format!("{}_{language}.ts", settings.translation_files.prefix));
            // 対象外のパターンにある既存ファイルは上書きしない
            if tokio::fs::try_exists(&path).await.unwrap_or(true) {
                tracing::warn!(path = %path.display(), "Catalog exists outside the indexed files");
                writeln!(
                    out,
                    "{}: skipped (exists but is not matched by filePattern)",
                    path.display()
                )?;
                skipped += 1;
                continue;
            }
            targets.push((path, Catalog::new(Some(language))));
        }

        if targets.is_empty() && skipped == 0 {
            writeln!(out, "No translation catalogs found")?;
            return Ok(ExitCode::SUCCESS);
        }

        for (path, catalog) in targets {
            let (merged, stats) = merge_catalog(&catalog, &extracted, options);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, merged.to_ts_string())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writeln!(
                out,
                "{}: {} added, {} kept, {} vanished, {} dropped",
                path.display(),
                stats.added,
                stats.kept,
                stats.vanished,
                stats.dropped
            )?;
        }
        Ok(if skipped == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

/// POSIX のロケール環境変数（`pt_BR.UTF-8` など）から言語を取り出す
fn locale_from_env() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| parse_posix_locale(&value))
}

fn parse_posix_locale(value: &str) -> Option<String> {
    let locale = value.split(['.', '@']).next().unwrap_or_default();
    match locale {
        "" | "C" | "POSIX" => None,
        locale => Some(locale.to_string()),
    }
}
