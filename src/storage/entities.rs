use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Progress of a task. Files written by hand or by older tools may contain other values, those
/// are kept verbatim in [Status::Other] so that rewriting a file never loses them.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Other(v) => v,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => Status::Pending,
            "In Progress" => Status::InProgress,
            "Completed" => Status::Completed,
            _ => Status::Other(value),
        }
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        match value {
            Status::Other(v) => v,
            known => known.as_str().to_string(),
        }
    }
}

/// A row of a task file. Within one date the pair (project, task) is what identifies a task.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct TaskEntity {
    pub date: NaiveDate,
    pub project: String,
    pub task: String,
    pub status: Status,
    pub responsible: Option<String>,
}

impl TaskEntity {
    pub fn matches(&self, project: &str, task: &str) -> bool {
        self.project == project && self.task == task
    }
}

pub const TASK_COLUMNS: [&str; 5] = ["Date", "Project", "Task", "Status", "Responsible"];

/// A row of the project file.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct ProjectEntity {
    #[serde(rename = "Project")]
    pub name: String,
}

pub const PROJECT_COLUMNS: [&str; 1] = ["Project"];

/// Blank names are stored as missing, the same way an empty CSV cell reads back.
pub fn normalize_responsible(responsible: Option<String>) -> Option<String> {
    responsible
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
