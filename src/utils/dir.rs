use std::{env, io, path::PathBuf};

use anyhow::{anyhow, Result};

/// Resolves the directory holding projects, task files, logos and logs. An explicit directory
/// wins over the platform default.
pub fn application_path(dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match dir {
        Some(dir) => dir,
        None => default_application_path()?,
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

/// Files kept inside the application directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn projects_file(&self) -> PathBuf {
        self.root.join("projects.csv")
    }

    pub fn task_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    pub fn default_logo(&self) -> PathBuf {
        self.root.join("logo").join("sketch.png")
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }
}

fn default_application_path() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let mut path = PathBuf::from(
            env::var("APPDATA").map_err(|_| anyhow!("APPDATA should be present on Windows"))?,
        );
        path.push("taskboard");
        Ok(path)
    }
    #[cfg(not(windows))]
    {
        let mut path = env::var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .or_else(|_| {
                env::var("HOME").map(|home| {
                    let mut path = PathBuf::from(home);
                    path.push(".local/state");
                    path
                })
            })
            .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?;
        path.push("taskboard");
        Ok(path)
    }
}
