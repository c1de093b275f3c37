use anyhow::Result;
use clap::Subcommand;

use crate::{
    notice::Notice,
    storage::{
        project_registry::ProjectRegistry,
        task_store::{TaskStore, TaskStoreImpl},
    },
    utils::dir::AppPaths,
};

use super::date::DateSelection;

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(about = "Print every project, in the order they were added")]
    List,
    #[command(about = "Add a new project")]
    Add { name: String },
    #[command(about = "Remove a project that has no tasks on the selected day")]
    Remove {
        name: String,
        #[command(flatten)]
        date: DateSelection,
    },
}

pub async fn process_project_command(
    command: ProjectCommand,
    paths: &AppPaths,
) -> Result<Option<Notice>> {
    let mut registry = ProjectRegistry::load(paths.projects_file()).await?;

    match command {
        ProjectCommand::List => {
            for project in registry.projects() {
                println!("{project}");
            }
            Ok(None)
        }
        ProjectCommand::Add { name } => Ok(Some(registry.add(&name).await?)),
        ProjectCommand::Remove { name, date } => {
            let store = TaskStoreImpl::new(paths.task_dir())?;
            let current = store.load(date.resolve()?).await?;
            Ok(Some(registry.remove(&name, &current).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        cli::{parse_commands, task::process_task_command, Commands},
        notice::Notice,
        storage::project_registry::ProjectRegistry,
        utils::dir::AppPaths,
    };

    use super::process_project_command;

    async fn run(args: &[&str], paths: &AppPaths) -> Result<Option<Notice>> {
        match parse_commands(args) {
            Commands::Project { command } => process_project_command(command, paths).await,
            Commands::Task { command } => process_task_command(command, paths).await,
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remove_checks_only_selected_day() -> Result<()> {
        let dir = tempdir()?;
        let paths = AppPaths::new(dir.path().to_owned());

        let notice = run(
            &["task", "add", "-p", "IT", "-t", "Backup", "-d", "2024-01-09"],
            &paths,
        )
        .await?;
        assert!(notice.is_some_and(|v| v.is_success()));

        let notice = run(&["project", "remove", "IT", "--date", "2024-01-09"], &paths).await?;
        assert_eq!(
            notice,
            Some(Notice::Error(
                "Cannot remove 'IT' as it has associated tasks!".into()
            ))
        );

        let notice = run(&["project", "remove", "IT", "--date", "2024-01-10"], &paths).await?;
        assert_eq!(
            notice,
            Some(Notice::Success("Project 'IT' removed successfully!".into()))
        );

        let registry = ProjectRegistry::load(paths.projects_file()).await?;
        assert!(!registry.contains("IT"));
        assert!(paths.task_dir().join("tasks_2024-01-09.csv").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_then_list() -> Result<()> {
        let dir = tempdir()?;
        let paths = AppPaths::new(dir.path().to_owned());

        let notice = run(&["project", "add", "NEOM"], &paths).await?;
        assert_eq!(
            notice,
            Some(Notice::Success("Project 'NEOM' added successfully!".into()))
        );
        assert_eq!(run(&["project", "list"], &paths).await?, None);

        let registry = ProjectRegistry::load(paths.projects_file()).await?;
        assert_eq!(registry.projects().last().map(String::as_str), Some("NEOM"));
        Ok(())
    }
}
