use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::notice::Notice;

use super::{
    entities::{ProjectEntity, PROJECT_COLUMNS},
    table_file::{overwrite_rows, read_rows},
    task_store::TaskCollection,
};

/// Projects offered before anyone has edited the list.
pub const DEFAULT_PROJECTS: [&str; 5] = ["DUDP", "JAFURAH-II", "BULL HANINE", "IT", "ADMIN/HR"];

/// Ordered list of project names backed by a single file. The value is loaded at the start of a
/// command and written back in full after every change.
#[derive(Debug)]
pub struct ProjectRegistry {
    path: PathBuf,
    projects: Vec<String>,
    skipped_rows: usize,
}

impl ProjectRegistry {
    pub async fn load(path: PathBuf) -> Result<Self> {
        let (projects, skipped_rows) = match read_rows::<ProjectEntity>(&path).await? {
            Some(table) => (
                table.rows.into_iter().map(|v| v.name).collect(),
                table.skipped,
            ),
            None => {
                debug!("No project file at {path:?}, using defaults");
                (DEFAULT_PROJECTS.iter().map(|v| v.to_string()).collect(), 0)
            }
        };
        Ok(Self {
            path,
            projects,
            skipped_rows,
        })
    }

    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    /// Names are compared without surrounding whitespace, the way they are stored.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.projects.iter().any(|v| v == name)
    }

    #[instrument(skip(self))]
    pub async fn add(&mut self, name: &str) -> Result<Notice> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Notice::Error("Please enter a valid project name.".into()));
        }
        if let Some(notice) = self.refuse_partial_write() {
            return Ok(notice);
        }
        if self.contains(name) {
            return Ok(Notice::Warning(format!("Project '{name}' already exists!")));
        }

        self.projects.push(name.to_string());
        self.persist().await?;
        info!("Project added");
        Ok(Notice::Success(format!("Project '{name}' added successfully!")))
    }

    /// Removes a project unless `current` still has tasks for it. Only the day being viewed is
    /// checked, tasks of other days may keep referring to a removed project.
    #[instrument(skip(self, current), fields(date = %current.date()))]
    pub async fn remove(&mut self, name: &str, current: &TaskCollection) -> Result<Notice> {
        let name = name.trim();
        let Some(position) = self.projects.iter().position(|v| v == name) else {
            return Ok(Notice::Error(format!("Project '{name}' does not exist!")));
        };
        if current.has_project(name) {
            return Ok(Notice::Error(format!(
                "Cannot remove '{name}' as it has associated tasks!"
            )));
        }

        if let Some(notice) = self.refuse_partial_write() {
            return Ok(notice);
        }

        self.projects.remove(position);
        self.persist().await?;
        info!("Project removed");
        Ok(Notice::Success(format!("Project '{name}' removed successfully!")))
    }

    fn refuse_partial_write(&self) -> Option<Notice> {
        (self.skipped_rows > 0).then(|| {
            Notice::Error(format!(
                "{} rows of the project list could not be read. Fix the file before changing projects.",
                self.skipped_rows
            ))
        })
    }

    async fn persist(&self) -> Result<()> {
        let rows = self
            .projects
            .iter()
            .map(|v| ProjectEntity { name: v.clone() })
            .collect::<Vec<_>>();
        overwrite_rows(&self.path, &PROJECT_COLUMNS, &rows).await
    }
}
