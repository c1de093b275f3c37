use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Asia::Kolkata;

/// This is the standard way of converting a date to a task file name in taskboard.
pub fn date_to_task_file_name(date: NaiveDate) -> String {
    format!("tasks_{}.csv", date.format("%Y-%m-%d"))
}

/// Date printed in the report header, e.g. "07 March 2025". Always evaluated in the office
/// time zone regardless of where the report is produced.
pub fn report_generation_date<Tz: TimeZone>(now: DateTime<Tz>) -> String {
    now.with_timezone(&Kolkata).format("%d %B %Y").to_string()
}

/// Name of the exported report for the selected date.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("dashboard-{}.pdf", date.format("%d-%m-%Y"))
}
