use anyhow::Result;
use clap::{Subcommand, ValueEnum};

use crate::{
    notice::Notice,
    storage::{
        entities::{Status, TaskEntity},
        project_registry::ProjectRegistry,
        task_store::{
            add_task, remove_task, update_task, NewTask, TaskEdit, TaskStore, TaskStoreImpl,
        },
    },
    utils::dir::AppPaths,
};

use super::date::DateSelection;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    InProgress,
    Completed,
}

impl From<StatusArg> for Status {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => Status::Pending,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Completed => Status::Completed,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    #[command(about = "Print the tasks of the selected day")]
    List {
        #[arg(long, short, help = "Only show tasks of this project")]
        project: Option<String>,
        #[arg(long, help = "Print as JSON")]
        json: bool,
        #[arg(long, requires = "project", help = "Only print the task names of the project")]
        names: bool,
        #[command(flatten)]
        date: DateSelection,
    },
    #[command(about = "Print the people already responsible for tasks of a project")]
    Responsibles {
        #[arg(long, short)]
        project: String,
        #[command(flatten)]
        date: DateSelection,
    },
    #[command(about = "Add a task to a project")]
    Add {
        #[arg(long, short)]
        project: String,
        #[arg(long, short)]
        task: String,
        #[arg(long, short, value_enum, default_value_t = StatusArg::Pending)]
        status: StatusArg,
        #[arg(long, short)]
        responsible: Option<String>,
        #[command(flatten)]
        date: DateSelection,
    },
    #[command(about = "Overwrite name, status and responsible of a task")]
    Update {
        #[arg(long, short)]
        project: String,
        #[arg(long, short, help = "Current name of the task")]
        task: String,
        #[arg(long, help = "New name of the task. Keeps the current name when omitted")]
        new_task: Option<String>,
        #[arg(long, short, value_enum)]
        status: StatusArg,
        #[arg(long, short, help = "Responsible person. The task has none when omitted")]
        responsible: Option<String>,
        #[command(flatten)]
        date: DateSelection,
    },
    #[command(about = "Remove a task from a project")]
    Remove {
        #[arg(long, short)]
        project: String,
        #[arg(long, short)]
        task: String,
        #[command(flatten)]
        date: DateSelection,
    },
}

pub async fn process_task_command(
    command: TaskCommand,
    paths: &AppPaths,
) -> Result<Option<Notice>> {
    let store = TaskStoreImpl::new(paths.task_dir())?;

    match command {
        TaskCommand::List {
            project,
            json,
            names,
            date,
        } => {
            let collection = store.load(date.resolve()?).await?;
            if names {
                let names = project
                    .as_deref()
                    .map(|v| collection.task_names(v))
                    .unwrap_or_default();
                if json {
                    println!("{}", serde_json::to_string_pretty(&names)?);
                } else {
                    for name in names {
                        println!("{name}");
                    }
                }
                return Ok(None);
            }
            let tasks = match &project {
                Some(project) => collection.filter_by_project(project).collect::<Vec<_>>(),
                None => collection.tasks().iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in tasks {
                    println!("{}", format_task(task));
                }
            }
            Ok(None)
        }
        TaskCommand::Responsibles { project, date } => {
            let collection = store.load(date.resolve()?).await?;
            for name in collection.distinct_responsibles(&project) {
                println!("{name}");
            }
            Ok(None)
        }
        TaskCommand::Add {
            project,
            task,
            status,
            responsible,
            date,
        } => {
            let registry = ProjectRegistry::load(paths.projects_file()).await?;
            if !registry.contains(&project) {
                return Ok(Some(Notice::Error(format!(
                    "Project '{project}' does not exist!"
                ))));
            }
            let mut collection = store.load(date.resolve()?).await?;
            let new_task = NewTask {
                project,
                task,
                status: status.into(),
                responsible,
            };
            Ok(Some(add_task(&store, &mut collection, new_task).await?))
        }
        TaskCommand::Update {
            project,
            task,
            new_task,
            status,
            responsible,
            date,
        } => {
            let mut collection = store.load(date.resolve()?).await?;
            let edit = TaskEdit {
                task: new_task.unwrap_or_else(|| task.clone()),
                status: status.into(),
                responsible,
            };
            Ok(Some(
                update_task(&store, &mut collection, &project, &task, edit).await?,
            ))
        }
        TaskCommand::Remove {
            project,
            task,
            date,
        } => {
            let mut collection = store.load(date.resolve()?).await?;
            Ok(Some(
                remove_task(&store, &mut collection, &project, &task).await?,
            ))
        }
    }
}

fn format_task(task: &TaskEntity) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        task.project,
        task.task,
        task.status,
        task.responsible.as_deref().unwrap_or("-")
    )
}
