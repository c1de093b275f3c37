pub mod date;
pub mod project;
pub mod report;
pub mod task;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use project::{process_project_command, ProjectCommand};
use report::{process_report_command, ReportCommand};
use task::{process_task_command, TaskCommand};
use tracing::level_filters::LevelFilter;

use crate::utils::{
    dir::{application_path, AppPaths},
    logging::enable_logging,
};

#[derive(Parser, Debug)]
#[command(name = "Taskboard", version, long_about = None)]
#[command(about = "Daily task dashboard with PDF reports", long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs to the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Log level, overrides RUST_LOG")]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    #[command(about = "List, add or remove projects")]
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    #[command(about = "List, add, edit or remove the tasks of a day")]
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    #[command(about = "Export the tasks of a day as a PDF report")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let paths = AppPaths::new(application_path(args.dir)?);
    enable_logging(&paths.logs(), args.log_filter, args.log)?;

    let notice = match args.commands {
        Commands::Project { command } => process_project_command(command, &paths).await?,
        Commands::Task { command } => process_task_command(command, &paths).await?,
        Commands::Report { command } => process_report_command(command, &paths).await?,
    };
    if let Some(notice) = notice {
        notice.print();
    }
    Ok(())
}

/// Parses a command line the same way the binary does.
#[cfg(test)]
pub(crate) fn parse_commands(args: &[&str]) -> Commands {
    Args::parse_from(std::iter::once(&"taskboard").chain(args)).commands
}
