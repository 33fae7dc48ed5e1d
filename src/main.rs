//! `nbr5410` entry point.

use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use nbr_5410_calculator::cli::{
    Cli,
    run,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref())?;

    let mut stdout = std::io::stdout();
    let code = run(cli, &mut stdout).await?;
    stdout.flush()?;
    Ok(code)
}

/// ログは標準エラーに出す（`RUST_LOG` で調整、既定は warn）
///
/// `--log-file` があればファイルにも書く。返したガードが生きている間だけ書き込まれる。
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr.and(writer))
        .init();
    Ok(Some(guard))
}
