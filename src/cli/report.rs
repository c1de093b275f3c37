use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    notice::Notice,
    report::{ReportGenerator, PDF_MIME_TYPE},
    storage::task_store::{TaskStore, TaskStoreImpl},
    utils::{clock::DefaultClock, dir::AppPaths},
};

use super::date::DateSelection;

#[derive(Debug, clap::Args)]
pub struct ReportCommand {
    #[command(flatten)]
    date: DateSelection,
    #[arg(
        long,
        short,
        help = "File or directory to write the report to. Defaults to dashboard-<DD>-<MM>-<YYYY>.pdf in the current directory"
    )]
    output: Option<PathBuf>,
    #[arg(long, help = "Logo shown in the header. Defaults to logo/sketch.png in the application directory")]
    logo: Option<PathBuf>,
}

pub async fn process_report_command(
    ReportCommand { date, output, logo }: ReportCommand,
    paths: &AppPaths,
) -> Result<Option<Notice>> {
    let store = TaskStoreImpl::new(paths.task_dir())?;
    let collection = store.load(date.resolve()?).await?;
    if collection.is_empty() {
        return Ok(Some(Notice::Info(
            "No tasks available to generate a PDF.".into(),
        )));
    }

    let logo = logo.unwrap_or_else(|| paths.default_logo());
    let report = ReportGenerator::new(Box::new(DefaultClock))
        .generate(&collection, &logo)
        .await?;

    let target = report_target(output, &report.file_name);
    tokio::fs::write(&target, &report.bytes)
        .await
        .with_context(|| format!("Failed to write report {target:?}"))?;
    info!("Saved {PDF_MIME_TYPE} report to {target:?}");

    Ok(Some(Notice::Success(format!(
        "Report saved to {}",
        target.display()
    ))))
}

fn report_target(output: Option<PathBuf>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path,
        None => Path::new(".").join(file_name),
    }
}
