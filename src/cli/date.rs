use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// The day a command works on.
#[derive(Debug, Clone, clap::Args)]
pub struct DateSelection {
    #[arg(
        long,
        short,
        help = "Day to work on. Examples are \"today\", \"yesterday\", \"2024-01-10\", \"10/01/2024\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl DateSelection {
    pub fn resolve(&self) -> Result<NaiveDate> {
        let now = Local::now();
        match &self.date {
            Some(text) => parse_day(text, now, self.date_style).map_err(|e| {
                Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        format!("Failed to validate date {e}"),
                    )
                    .into()
            }),
            None => Ok(now.date_naive()),
        }
    }
}

/// ISO dates are accepted as-is, anything else goes through the english date parser relative to
/// `now`.
fn parse_day<Tz: TimeZone>(
    text: &str,
    now: DateTime<Tz>,
    style: DateStyle,
) -> Result<NaiveDate, String>
where
    Tz::Offset: Copy,
{
    if let Ok(date) = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(text, now, style.into())
        .map(|v| v.date_naive())
        .map_err(|e| format!("'{text}': {e}"))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{parse_day, DateStyle};

    #[test]
    fn test_parse_day() {
        let now = Utc.with_ymd_and_hms(2024, 1, 12, 9, 0, 0).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        assert_eq!(parse_day("2024-01-10", now, DateStyle::Uk), Ok(expected));
        assert_eq!(parse_day("10/01/2024", now, DateStyle::Uk), Ok(expected));
        assert_eq!(parse_day("01/10/2024", now, DateStyle::Us), Ok(expected));
        assert_eq!(
            parse_day("yesterday", now, DateStyle::Uk),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap())
        );
        assert!(parse_day("not a date", now, DateStyle::Uk).is_err());
    }
}
