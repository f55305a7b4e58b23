//! Chat command parsing.
//!
//! An incoming chat message is classified into one of three request shapes:
//!
//! - [`DateRangeCommand`] — `{ "Start": "yyyy-mm-dd hh:mm", "End": "yyyy-mm-dd hh:mm", "Task": "…" }`
//! - [`TimeOfDayCommand`] — `{ "Start": "hh:mm", "End": "hh:mm", "Task": "…" }`
//! - [`BareTaskCommand`] — `Task <name>`
//!
//! Each shape is attempted independently. A shape that fails to decode is
//! simply a non-match; only a candidate that passes its validity check can
//! win, and date ranges beat clock ranges beat bare task names.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ShiftError;

/// Literal prefix of a bare task command. Note the trailing space.
pub const TASK_PREFIX: &str = "Task ";

// ── Command ─────────────────────────────────────────────────────────────────

/// A successfully parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    DateRange(DateRangeCommand),
    TimeOfDay(TimeOfDayCommand),
    BareTask(BareTaskCommand),
}

/// Explicit calendar range. The timestamps carry no zone; they are read in
/// the bot's wall-clock timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRangeCommand {
    #[serde(rename = "Start", with = "minute_format")]
    pub start: NaiveDateTime,
    #[serde(rename = "End", with = "minute_format")]
    pub end: NaiveDateTime,
    #[serde(rename = "Task")]
    pub task: String,
}

/// Clock range for "today", expressed as offsets since midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfDayCommand {
    pub start: ClockOffset,
    pub end: ClockOffset,
    pub task: String,
}

/// `Task <name>`: everything for the current shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareTaskCommand {
    pub task: String,
}

impl Command {
    /// Classify a chat message.
    ///
    /// Returns `None` when the text is absent or empty, when it matches no
    /// shape, or when every shape it matches is missing a required field.
    ///
    /// # Examples
    ///
    /// ```
    /// use shift_engine::command::Command;
    ///
    /// let cmd = Command::parse(Some("Task Coding")).unwrap();
    /// assert_eq!(cmd.task(), "Coding");
    /// assert!(Command::parse(Some("hello")).is_none());
    /// ```
    pub fn parse(text: Option<&str>) -> Option<Command> {
        let text = text.filter(|t| !t.is_empty())?;

        let date_range = try_date_range(text);
        let time_of_day = try_time_of_day(text);
        let bare_task = try_bare_task(text);

        date_range
            .map(Command::DateRange)
            .or_else(|| time_of_day.map(Command::TimeOfDay))
            .or_else(|| bare_task.map(Command::BareTask))
    }

    /// The task descriptor used both in the report query and as the
    /// aggregation filter.
    pub fn task(&self) -> &str {
        match self {
            Command::DateRange(c) => &c.task,
            Command::TimeOfDay(c) => &c.task,
            Command::BareTask(c) => &c.task,
        }
    }

    /// Short name of the shape, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::DateRange(_) => "date_range",
            Command::TimeOfDay(_) => "time_of_day",
            Command::BareTask(_) => "bare_task",
        }
    }
}

// ── Shape attempts ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawDateRange {
    #[serde(
        rename = "Start",
        default,
        deserialize_with = "minute_format::deserialize_some"
    )]
    start: Option<NaiveDateTime>,
    #[serde(
        rename = "End",
        default,
        deserialize_with = "minute_format::deserialize_some"
    )]
    end: Option<NaiveDateTime>,
    #[serde(rename = "Task", default)]
    task: Option<String>,
}

#[derive(Deserialize)]
struct RawTimeOfDay {
    #[serde(rename = "Start", default, deserialize_with = "deserialize_clock")]
    start: Option<ClockOffset>,
    #[serde(rename = "End", default, deserialize_with = "deserialize_clock")]
    end: Option<ClockOffset>,
    #[serde(rename = "Task", default)]
    task: Option<String>,
}

fn try_date_range(text: &str) -> Option<DateRangeCommand> {
    let raw: RawDateRange = serde_json::from_str(text).ok()?;
    Some(DateRangeCommand {
        start: raw.start?,
        end: raw.end?,
        task: raw.task.filter(|t| !t.is_empty())?,
    })
}

fn try_time_of_day(text: &str) -> Option<TimeOfDayCommand> {
    let raw: RawTimeOfDay = serde_json::from_str(text).ok()?;
    let start = raw.start.filter(|s| !s.is_zero())?;
    let end = raw.end.filter(|e| !e.is_zero())?;
    Some(TimeOfDayCommand {
        start,
        end,
        task: raw.task.filter(|t| !t.is_empty())?,
    })
}

fn try_bare_task(text: &str) -> Option<BareTaskCommand> {
    let task = text.strip_prefix(TASK_PREFIX)?;
    if task.trim().is_empty() {
        return None;
    }
    Some(BareTaskCommand {
        task: task.to_string(),
    })
}

fn deserialize_clock<'de, D>(deserializer: D) -> Result<Option<ClockOffset>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map(Some).map_err(serde::de::Error::custom)
}

// ── ClockOffset ─────────────────────────────────────────────────────────────

/// Largest whole-day count a clock offset may carry.
pub const MAX_OFFSET_DAYS: i64 = 10_675_199;

/// Offset since midnight, written `[-][d.]h:mm[:ss[.fffffff]]`.
///
/// The optional day prefix lets an offset run past midnight; [`hours`]
/// reports only the hour-of-day component, signed like the offset.
///
/// [`hours`]: ClockOffset::hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockOffset {
    offset: Duration,
}

impl ClockOffset {
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            offset: Duration::hours(i64::from(hours))
                + Duration::minutes(i64::from(minutes))
                + Duration::seconds(i64::from(seconds)),
        }
    }

    /// Hour-of-day component (-23..=23), ignoring whole days.
    pub fn hours(&self) -> i64 {
        self.offset.num_hours() % 24
    }

    pub fn is_zero(&self) -> bool {
        self.offset == Duration::zero()
    }

    pub fn as_duration(&self) -> Duration {
        self.offset
    }
}

impl FromStr for ClockOffset {
    type Err = ShiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ShiftError::InvalidTime(format!("'{s}'"));

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        // A '.' before the first ':' separates whole days.
        let (days, clock) = match unsigned.split_once('.') {
            Some((d, rest)) if !d.contains(':') => (
                parse_field(d, 8)
                    .filter(|d| *d <= MAX_OFFSET_DAYS)
                    .ok_or_else(invalid)?,
                rest,
            ),
            _ => (0, unsigned),
        };

        let parts: Vec<&str> = clock.split(':').collect();
        let (h, m, sec) = match parts.as_slice() {
            [h, m] => (*h, *m, None),
            [h, m, sec] => (*h, *m, Some(*sec)),
            _ => return Err(invalid()),
        };

        let hours = parse_field(h, 2).filter(|h| *h < 24).ok_or_else(invalid)?;
        let minutes = parse_field(m, 2).filter(|m| *m < 60).ok_or_else(invalid)?;
        let (seconds, ticks) = match sec {
            Some(sec) => {
                let (whole, fraction) = match sec.split_once('.') {
                    Some((whole, fraction)) => (whole, Some(fraction)),
                    None => (sec, None),
                };
                (
                    parse_field(whole, 2).filter(|s| *s < 60).ok_or_else(invalid)?,
                    fraction.map_or(Some(0), parse_ticks).ok_or_else(invalid)?,
                )
            }
            None => (0, 0),
        };

        let offset = Duration::days(days)
            + Duration::hours(hours)
            + Duration::minutes(minutes)
            + Duration::seconds(seconds)
            + Duration::nanoseconds(ticks * 100);
        Ok(Self {
            offset: if negative { -offset } else { offset },
        })
    }
}

impl fmt::Display for ClockOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.offset < Duration::zero();
        let abs = if negative { -self.offset } else { self.offset };
        let total = abs.num_seconds();
        let ticks = (abs - Duration::seconds(total))
            .num_nanoseconds()
            .unwrap_or(0)
            / 100;
        let (days, rem) = (total / 86_400, total % 86_400);

        if negative {
            write!(f, "-")?;
        }
        if days > 0 {
            write!(f, "{days}.")?;
        }
        write!(f, "{:02}:{:02}", rem / 3600, (rem % 3600) / 60)?;
        if rem % 60 != 0 || ticks != 0 {
            write!(f, ":{:02}", rem % 60)?;
        }
        if ticks != 0 {
            write!(f, ".{ticks:07}")?;
        }
        Ok(())
    }
}

/// Parse 1..=`max_digits` ASCII digits.
fn parse_field(s: &str, max_digits: usize) -> Option<i64> {
    if s.is_empty() || s.len() > max_digits || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Fractional seconds (1..=7 digits) as 100 ns ticks.
fn parse_ticks(fraction: &str) -> Option<i64> {
    let digits = parse_field(fraction, 7)?;
    Some(digits * 10_i64.pow(7 - fraction.len() as u32))
}

// ── minute_format ───────────────────────────────────────────────────────────

/// Serde adapter for the `yyyy-MM-dd HH:mm` timestamps of date range commands.
pub mod minute_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&dt.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }

    pub(crate) fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use proptest::prelude::*;

    fn ndt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    // ── date range ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_date_range() {
        let text = r#"{ "Start": "2026-03-02 09:00", "End": "2026-03-06 18:30", "Task": "Coding" }"#;
        let cmd = Command::parse(Some(text)).unwrap();
        assert_eq!(
            cmd,
            Command::DateRange(DateRangeCommand {
                start: ndt(2026, 3, 2, 9, 0),
                end: ndt(2026, 3, 6, 18, 30),
                task: "Coding".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_date_range_multiline_with_extra_keys() {
        let text = "{\n  \"Start\": \"2026-01-01 00:05\",\n  \"End\": \"2026-01-02 00:00\",\n  \"Task\": \"Review\",\n  \"Note\": 1\n}";
        let cmd = Command::parse(Some(text)).unwrap();
        assert_eq!(cmd.kind(), "date_range");
        assert_eq!(cmd.task(), "Review");
    }

    #[test]
    fn test_date_range_missing_end_is_invalid() {
        let text = r#"{ "Start": "2026-03-02 09:00", "Task": "Coding" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    #[test]
    fn test_date_range_empty_task_is_invalid() {
        let text = r#"{ "Start": "2026-03-02 09:00", "End": "2026-03-02 10:00", "Task": "" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    #[test]
    fn test_date_range_null_task_is_invalid() {
        let text = r#"{ "Start": "2026-03-02 09:00", "End": "2026-03-02 10:00", "Task": null }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    #[test]
    fn test_date_range_keys_are_case_sensitive() {
        let text = r#"{ "start": "2026-03-02 09:00", "end": "2026-03-02 10:00", "task": "Coding" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    #[test]
    fn test_date_range_with_seconds_does_not_match() {
        let text = r#"{ "Start": "2026-03-02 09:00:15", "End": "2026-03-02 10:00", "Task": "Coding" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    // ── time of day ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_time_of_day() {
        let text = r#"{ "Start": "08:30", "End": "17:00", "Task": "Coding" }"#;
        let cmd = Command::parse(Some(text)).unwrap();
        assert_eq!(
            cmd,
            Command::TimeOfDay(TimeOfDayCommand {
                start: ClockOffset::from_hms(8, 30, 0),
                end: ClockOffset::from_hms(17, 0, 0),
                task: "Coding".to_string(),
            })
        );
    }

    #[test]
    fn test_time_of_day_zero_start_is_invalid() {
        let text = r#"{ "Start": "00:00", "End": "17:00", "Task": "Coding" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    #[test]
    fn test_time_of_day_missing_task_is_invalid() {
        let text = r#"{ "Start": "08:00", "End": "17:00" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    #[test]
    fn test_time_of_day_out_of_range_hour_does_not_match() {
        let text = r#"{ "Start": "25:00", "End": "17:00", "Task": "Coding" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    // ── bare task ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_bare_task() {
        let cmd = Command::parse(Some("Task Coding")).unwrap();
        assert_eq!(
            cmd,
            Command::BareTask(BareTaskCommand {
                task: "Coding".to_string()
            })
        );
    }

    #[test]
    fn test_bare_task_keeps_inner_whitespace() {
        let cmd = Command::parse(Some("Task  Deep work ")).unwrap();
        assert_eq!(cmd.task(), " Deep work ");
    }

    #[test]
    fn test_bare_task_prefix_is_case_sensitive() {
        assert!(Command::parse(Some("task Coding")).is_none());
        assert!(Command::parse(Some("TaskCoding")).is_none());
    }

    #[test]
    fn test_bare_task_empty_remainder_is_invalid() {
        assert!(Command::parse(Some("Task ")).is_none());
        assert!(Command::parse(Some("Task    ")).is_none());
    }

    // ── general ─────────────────────────────────────────────────────────

    #[test]
    fn test_absent_or_empty_text_is_invalid() {
        assert!(Command::parse(None).is_none());
        assert!(Command::parse(Some("")).is_none());
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        assert!(Command::parse(Some(r#"{ "Start": "08:30", "#)).is_none());
        assert!(Command::parse(Some("null")).is_none());
        assert!(Command::parse(Some("[1, 2]")).is_none());
    }

    #[test]
    fn test_bare_task_prefix_wins_for_non_json_text() {
        // Not JSON, so only the bare-task shape can match.
        let cmd = Command::parse(Some(r#"Task { "Start": "2026-03-02 09:00" }"#)).unwrap();
        assert_eq!(cmd.kind(), "bare_task");
    }

    // ── ClockOffset ─────────────────────────────────────────────────────

    #[test]
    fn test_clock_offset_parse_forms() {
        assert_eq!("8:05".parse::<ClockOffset>().unwrap(), ClockOffset::from_hms(8, 5, 0));
        assert_eq!(
            "08:05:30".parse::<ClockOffset>().unwrap(),
            ClockOffset::from_hms(8, 5, 30)
        );
        let with_day = "1.02:00".parse::<ClockOffset>().unwrap();
        assert_eq!(with_day.as_duration(), Duration::hours(26));
        assert_eq!(with_day.hours(), 2);
    }

    #[test]
    fn test_clock_offset_rejects_garbage() {
        for s in [
            "",
            "8",
            "8:5:",
            "08:60",
            "ab:cd",
            "08:30.5",
            "--1:00",
            "1.-02:00",
            "08:30:15.",
            "08:30:15.12345678",
            "2026-03-02 09:00",
        ] {
            assert!(s.parse::<ClockOffset>().is_err(), "accepted {s:?}");
        }
    }

    #[test]
    fn test_clock_offset_day_prefix_is_capped() {
        let max = format!("{MAX_OFFSET_DAYS}.00:00");
        assert_eq!(
            max.parse::<ClockOffset>().unwrap().as_duration(),
            Duration::days(MAX_OFFSET_DAYS)
        );
        assert!("10675200.00:00".parse::<ClockOffset>().is_err());
        assert!("99999999.08:00".parse::<ClockOffset>().is_err());
    }

    #[test]
    fn test_huge_day_prefix_is_not_a_command() {
        let text = r#"{ "Start": "99999999.08:00", "End": "09:00", "Task": "X" }"#;
        assert!(Command::parse(Some(text)).is_none());
    }

    #[test]
    fn test_clock_offset_fractional_seconds() {
        let c = "08:30:15.5".parse::<ClockOffset>().unwrap();
        assert_eq!(
            c.as_duration(),
            Duration::seconds(8 * 3600 + 30 * 60 + 15) + Duration::milliseconds(500)
        );
        let c = "0:00:00.0000001".parse::<ClockOffset>().unwrap();
        assert_eq!(c.as_duration(), Duration::nanoseconds(100));
    }

    #[test]
    fn test_clock_offset_negative() {
        let c = "-08:30".parse::<ClockOffset>().unwrap();
        assert_eq!(c.as_duration(), -Duration::minutes(8 * 60 + 30));
        assert_eq!(c.hours(), -8);
        assert!("-00:00".parse::<ClockOffset>().unwrap().is_zero());
        let c = "-1.02:00".parse::<ClockOffset>().unwrap();
        assert_eq!(c.as_duration(), -Duration::hours(26));
    }

    #[test]
    fn test_clock_offset_display() {
        assert_eq!(ClockOffset::from_hms(8, 30, 0).to_string(), "08:30");
        assert_eq!(ClockOffset::from_hms(26, 0, 5).to_string(), "1.02:00:05");
        assert_eq!("-08:30".parse::<ClockOffset>().unwrap().to_string(), "-08:30");
        assert_eq!(
            "08:30:15.25".parse::<ClockOffset>().unwrap().to_string(),
            "08:30:15.2500000"
        );
    }

    // ── properties ──────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_unstructured_text_is_invalid(text in "[a-zA-Z0-9 ]{0,40}") {
            prop_assume!(!text.starts_with(TASK_PREFIX));
            prop_assert!(Command::parse(Some(text.as_str())).is_none());
        }

        #[test]
        fn prop_date_range_roundtrips_through_json(
            start_secs in 0i64..4_000_000_000,
            span_mins in 1i64..100_000,
            task in "[A-Za-z][A-Za-z ]{0,20}",
        ) {
            let start = chrono::DateTime::from_timestamp(start_secs, 0)
                .unwrap()
                .naive_utc()
                .with_second(0)
                .unwrap();
            let command = DateRangeCommand {
                start,
                end: start + Duration::minutes(span_mins),
                task,
            };
            let json = serde_json::to_string(&command).unwrap();
            prop_assert_eq!(
                Command::parse(Some(json.as_str())),
                Some(Command::DateRange(command))
            );
        }
    }
}
