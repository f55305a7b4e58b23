//! Report request building.
//!
//! Maps a command to the date range sent to the reports search endpoint.
//! Clock-based commands use the bot's wall-clock date, not the report-derived
//! anchor of [`crate::window`]; the two can disagree around midnight.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::command::Command;
use crate::window::{is_night, local_today, ShiftOptions};

/// Body of a time entry search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    /// Serialized as `yyyy-MM-dd`.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
}

/// Build the search body for `command` as handled at `now`.
pub fn build_request(command: &Command, now: DateTime<Utc>, options: &ShiftOptions) -> ReportRequest {
    let (start_date, end_date) = match command {
        Command::DateRange(c) => (c.start.date(), c.end.date()),
        Command::TimeOfDay(_) | Command::BareTask(_) => {
            let today = local_today(now, options);
            if is_night(now, options) {
                (today - Duration::days(1), today)
            } else {
                (today, today)
            }
        }
    };

    ReportRequest {
        start_date,
        end_date,
        description: command.task().to_string(),
    }
}
