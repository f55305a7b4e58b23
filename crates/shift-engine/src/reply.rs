//! Chat replies.

use std::fmt;

use chrono::Duration;

/// Usage text sent back for anything that is not a command.
pub const HELP_TEXT: &str = "Text format should be:\n\
{\n    \"Start\": \"yyyy-mm-dd hh:mm\",\n    \"End\": \"yyyy-mm-dd hh:mm\",\n    \"Task\": \"TaskType\"\n}\n\
Or if you want statistics for today you can just use:\n\
{\n    \"Start\": \"hh:mm\",\n    \"End\": \"hh:mm\",\n    \"Task\": \"TaskType\"\n}\n\
Or just type \"Task {TaskType}\" and get total for today from 7am";

pub const NO_DATA_TEXT: &str = "Sorry, there is no response..... ";

pub const ERROR_TEXT: &str = "There was some error..... ";

/// The outcome of handling one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The message is not a command.
    Help,
    /// The report had nothing for the window.
    NoData,
    /// Something failed along the way. Details stay in the logs.
    Error,
    Total(Duration),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Help => f.write_str(HELP_TEXT),
            Reply::NoData => f.write_str(NO_DATA_TEXT),
            Reply::Error => f.write_str(ERROR_TEXT),
            Reply::Total(total) => write!(f, "Total time is: {}", format_timespan(*total)),
        }
    }
}

/// Short general timespan: `[-][d:]h:mm:ss[.fffffff]`.
///
/// Days appear only when non-zero, hours are unpadded, and the fraction is
/// written in 100ns ticks with trailing zeros trimmed.
///
/// ```
/// use chrono::Duration;
/// use shift_engine::reply::format_timespan;
///
/// assert_eq!(format_timespan(Duration::minutes(75)), "1:15:00");
/// assert_eq!(format_timespan(Duration::hours(26) + Duration::seconds(3)), "1:2:00:03");
/// ```
pub fn format_timespan(duration: Duration) -> String {
    let negative = duration < Duration::zero();
    let duration = if negative { -duration } else { duration };

    let total_seconds = duration.num_seconds();
    let nanos = (duration - Duration::seconds(total_seconds))
        .num_nanoseconds()
        .unwrap_or(0);
    let ticks = nanos / 100;

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{days}:"));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        let fraction = format!("{ticks:07}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}
