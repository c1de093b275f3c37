//!  Storage is organized through two kinds of CSV tables.
//!  The basic idea is:
//!   - There is a single `projects.csv` listing project names in insertion order.
//!   - Tasks are stored in a directory with one file per calendar date.
//!   - Every mutation rewrites the whole file under an exclusive lock; reads take a shared lock.

pub mod entities;
pub mod project_registry;
pub mod table_file;
pub mod task_store;
