//! Shift window resolution.
//!
//! Turns a parsed [`Command`] into the absolute instant after which time
//! entries count toward the reply. All functions take an explicit `now`
//! (no system clock access) so the night-shift rule is testable at any hour.
//!
//! # Night shift
//!
//! A message sent before the night cutoff hour (default 7 AM, bot wall
//! clock) still belongs to the previous day's shift. Bare task commands then
//! start counting at the cutoff hour of the previous day, and clock ranges
//! whose start hour lies past the cutoff are read as yesterday's clock.
//!
//! # Anchor
//!
//! Clock-based windows hang off the *today anchor*: midnight of the bot's
//! local calendar date, expressed at the UTC offset of the first time entry
//! in the report. Without any entry there is no anchor and resolution fails
//! with [`ShiftError::NoAnchor`].

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;

use crate::command::Command;
use crate::error::{Result, ShiftError};

/// Default hour before which a message refers to the previous day's shift.
pub const DEFAULT_NIGHT_CUTOFF_HOUR: u32 = 7;

/// Wall-clock settings shared by resolution and request building.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftOptions {
    /// Local hour (0–23) before which "today" means the previous day's shift.
    pub night_cutoff_hour: u32,
    /// Bot wall-clock timezone. Also gives meaning to the zone-less
    /// timestamps of date range commands.
    pub timezone: Tz,
}

impl Default for ShiftOptions {
    fn default() -> Self {
        Self {
            night_cutoff_hour: DEFAULT_NIGHT_CUTOFF_HOUR,
            timezone: Tz::UTC,
        }
    }
}

/// The resolved aggregation window for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftWindow {
    /// Entries must start strictly after this instant.
    pub filter_start: DateTime<FixedOffset>,
    /// Exact description entries must carry.
    pub task: String,
}

/// Whether `now` falls before the night cutoff on the bot's wall clock.
pub fn is_night(now: DateTime<Utc>, options: &ShiftOptions) -> bool {
    now.with_timezone(&options.timezone).hour() < options.night_cutoff_hour
}

/// The bot's local calendar date at `now`.
pub fn local_today(now: DateTime<Utc>, options: &ShiftOptions) -> NaiveDate {
    now.with_timezone(&options.timezone).date_naive()
}

/// Midnight of the local calendar date, carried at `offset`.
pub fn today_anchor(
    now: DateTime<Utc>,
    offset: FixedOffset,
    options: &ShiftOptions,
) -> Result<DateTime<FixedOffset>> {
    let midnight = local_today(now, options).and_time(NaiveTime::MIN);
    offset
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(|| ShiftError::InvalidDatetime(format!("'{midnight}' at {offset}")))
}

/// Resolve the aggregation window for `command`.
///
/// # Arguments
///
/// * `command` — The parsed chat command
/// * `now` — The instant the message is handled; decides the night rule
/// * `anchored_at` — The instant the report arrived; its local date is the anchor date
/// * `anchor_offset` — UTC offset of the first time entry in the report, if any
/// * `options` — Night cutoff and wall-clock timezone
///
/// # Errors
///
/// Returns [`ShiftError::NoAnchor`] when `anchor_offset` is `None`, for every
/// command shape. Returns [`ShiftError::InvalidDatetime`] when a date range
/// start falls inside a DST gap of the bot timezone, and
/// [`ShiftError::InvalidTime`] when a clock offset moves the window start out
/// of the representable range.
pub fn resolve_window(
    command: &Command,
    now: DateTime<Utc>,
    anchored_at: DateTime<Utc>,
    anchor_offset: Option<FixedOffset>,
    options: &ShiftOptions,
) -> Result<ShiftWindow> {
    let offset = anchor_offset.ok_or(ShiftError::NoAnchor)?;
    let anchor = today_anchor(anchored_at, offset, options)?;
    let night = is_night(now, options);
    let cutoff = options.night_cutoff_hour;

    let filter_start = match command {
        Command::DateRange(c) => options
            .timezone
            .from_local_datetime(&c.start)
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| {
                ShiftError::InvalidDatetime(format!(
                    "'{}' does not exist in {}",
                    c.start, options.timezone
                ))
            })?,
        Command::TimeOfDay(c) => {
            // Past the cutoff, a clock time sent at night means yesterday's clock.
            let yesterday = night && c.start.hours() > i64::from(cutoff);
            shift_anchor(anchor, yesterday, c.start.as_duration())?
        }
        Command::BareTask(_) => shift_anchor(anchor, night, Duration::hours(i64::from(cutoff)))?,
    };

    Ok(ShiftWindow {
        filter_start,
        task: command.task().to_string(),
    })
}

/// `anchor`, a day earlier when `yesterday`, moved by `offset`.
fn shift_anchor(
    anchor: DateTime<FixedOffset>,
    yesterday: bool,
    offset: Duration,
) -> Result<DateTime<FixedOffset>> {
    let day = if yesterday {
        anchor.checked_sub_signed(Duration::days(1))
    } else {
        Some(anchor)
    };
    day.and_then(|day| day.checked_add_signed(offset))
        .ok_or_else(|| ShiftError::InvalidTime(format!("{offset} from {anchor} is out of range")))
}
