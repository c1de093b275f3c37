use std::{future::Future, ops::Deref, path::PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::{notice::Notice, utils::time::date_to_task_file_name};

use super::{
    entities::{normalize_responsible, Status, TaskEntity, TASK_COLUMNS},
    table_file::{overwrite_rows, read_rows},
};

/// Interface for abstracting storage of per-date task collections.
pub trait TaskStore {
    /// Retrieves the tasks recorded for a certain day. A day without a file is an empty collection.
    fn load(&self, date: NaiveDate) -> impl Future<Output = Result<TaskCollection>> + Send;

    /// Replaces everything stored for the collection's day with the collection.
    fn save(&self, collection: &TaskCollection) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Deref + Sync> TaskStore for T
where
    T::Target: TaskStore + Sync,
{
    fn load(&self, date: NaiveDate) -> impl Future<Output = Result<TaskCollection>> + Send {
        self.deref().load(date)
    }

    fn save(&self, collection: &TaskCollection) -> impl Future<Output = Result<()>> + Send {
        self.deref().save(collection)
    }
}

/// The main realization of [TaskStore], one CSV file per day inside `task_dir`.
pub struct TaskStoreImpl {
    task_dir: PathBuf,
}

impl TaskStoreImpl {
    pub fn new(task_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&task_dir)?;

        Ok(Self { task_dir })
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.task_dir.join(date_to_task_file_name(date))
    }
}

impl TaskStore for TaskStoreImpl {
    async fn load(&self, date: NaiveDate) -> Result<TaskCollection> {
        let collection = match read_rows::<TaskEntity>(&self.path_for(date)).await? {
            Some(table) => TaskCollection {
                date,
                tasks: table.rows,
                skipped_rows: table.skipped,
            },
            None => TaskCollection::empty(date),
        };
        Ok(collection)
    }

    async fn save(&self, collection: &TaskCollection) -> Result<()> {
        overwrite_rows(&self.path_for(collection.date), &TASK_COLUMNS, &collection.tasks).await
    }
}

/// All tasks of one day, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCollection {
    date: NaiveDate,
    tasks: Vec<TaskEntity>,
    /// Rows of the day file that couldn't be read. The day is read-only while this isn't zero.
    skipped_rows: usize,
}

impl TaskCollection {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            tasks: vec![],
            skipped_rows: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tasks(&self) -> &[TaskEntity] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_project(&self, project: &str) -> bool {
        self.tasks.iter().any(|v| v.project == project)
    }

    pub fn filter_by_project<'a>(&'a self, project: &'a str) -> impl Iterator<Item = &'a TaskEntity> {
        self.tasks.iter().filter(move |v| v.project == project)
    }

    /// Names offered when picking a task of a project.
    pub fn task_names<'a>(&'a self, project: &'a str) -> Vec<&'a str> {
        self.filter_by_project(project)
            .map(|v| v.task.as_str())
            .collect()
    }

    /// People already responsible for something in the project, first seen first.
    pub fn distinct_responsibles<'a>(&'a self, project: &'a str) -> Vec<&'a str> {
        let mut seen: Vec<&str> = vec![];
        for name in self
            .filter_by_project(project)
            .filter_map(|v| v.responsible.as_deref())
        {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }

    /// Saving a partially read day would drop the rows that couldn't be read.
    fn refuse_partial_write(&self) -> Option<Notice> {
        (self.skipped_rows > 0).then(|| {
            Notice::Error(format!(
                "{} rows of the tasks for {} could not be read. Fix the file before changing this day.",
                self.skipped_rows, self.date
            ))
        })
    }

    fn contains_identical(&self, task: &TaskEntity) -> bool {
        self.tasks.iter().any(|v| {
            v.project == task.project
                && v.task == task.task
                && v.status == task.status
                && v.responsible == task.responsible
        })
    }
}

/// Values entered for a new task. The date comes from the collection it's added to.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project: String,
    pub task: String,
    pub status: Status,
    pub responsible: Option<String>,
}

/// Replacement values for every task matching a (project, task) pair.
#[derive(Debug, Clone)]
pub struct TaskEdit {
    pub task: String,
    pub status: Status,
    pub responsible: Option<String>,
}

/// Appends a task to the collection and persists the day, unless an identical task is already
/// there.
#[instrument(skip(store, collection), fields(date = %collection.date))]
pub async fn add_task(
    store: &impl TaskStore,
    collection: &mut TaskCollection,
    new_task: NewTask,
) -> Result<Notice> {
    if let Some(notice) = collection.refuse_partial_write() {
        return Ok(notice);
    }

    let task = TaskEntity {
        date: collection.date,
        project: new_task.project,
        task: new_task.task.trim().to_string(),
        status: new_task.status,
        responsible: normalize_responsible(new_task.responsible),
    };

    if task.task.is_empty() {
        return Ok(Notice::Error("Please enter a valid task name.".into()));
    }

    if collection.contains_identical(&task) {
        return Ok(Notice::Warning("This task already exists!".into()));
    }

    collection.tasks.push(task);
    store.save(collection).await?;
    info!("Added task, {} tasks for the day", collection.tasks.len());
    Ok(Notice::Success("Task added successfully!".into()))
}

/// Overwrites name, status and responsible of every task matching `project` and `task`. Date and
/// project of those rows are left as they were.
#[instrument(skip(store, collection, edit), fields(date = %collection.date))]
pub async fn update_task(
    store: &impl TaskStore,
    collection: &mut TaskCollection,
    project: &str,
    task: &str,
    edit: TaskEdit,
) -> Result<Notice> {
    if let Some(notice) = collection.refuse_partial_write() {
        return Ok(notice);
    }

    let new_name = edit.task.trim().to_string();
    if new_name.is_empty() {
        return Ok(Notice::Error("Please enter a valid task name.".into()));
    }
    let responsible = normalize_responsible(edit.responsible);

    let mut updated = 0usize;
    for row in collection.tasks.iter_mut().filter(|v| v.matches(project, task)) {
        row.task = new_name.clone();
        row.status = edit.status.clone();
        row.responsible = responsible.clone();
        updated += 1;
    }

    if updated == 0 {
        return Ok(no_such_task(project, task));
    }

    store.save(collection).await?;
    info!("Updated {updated} rows");
    Ok(Notice::Success("Task updated successfully!".into()))
}

/// Deletes every task matching `project` and `task`.
#[instrument(skip(store, collection), fields(date = %collection.date))]
pub async fn remove_task(
    store: &impl TaskStore,
    collection: &mut TaskCollection,
    project: &str,
    task: &str,
) -> Result<Notice> {
    if let Some(notice) = collection.refuse_partial_write() {
        return Ok(notice);
    }

    let before = collection.tasks.len();
    collection.tasks.retain(|v| !v.matches(project, task));
    let removed = before - collection.tasks.len();

    if removed == 0 {
        return Ok(no_such_task(project, task));
    }

    store.save(collection).await?;
    info!("Removed {removed} rows");
    Ok(Notice::Success("Task removed successfully!".into()))
}

fn no_such_task(project: &str, task: &str) -> Notice {
    Notice::Warning(format!("There is no task '{task}' in project '{project}'."))
}
