//! Small dashboard for tracking the tasks of a day. Projects live in one CSV file, tasks in one
//! CSV file per date, and a day can be exported as a PDF report grouped by project.
//!

pub mod cli;
pub mod notice;
pub mod report;
pub mod storage;
pub mod utils;
