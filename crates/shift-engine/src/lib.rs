//! # shift-engine
//!
//! Deterministic core of the shift-total bot.
//!
//! Everything here is pure: no network, no system clock. The caller passes
//! the message text, the "now" instant and the report payload, and gets back
//! the reply to send.
//!
//! ## Modules
//!
//! - [`command`] — Chat text → date range, clock range or bare task command
//! - [`window`] — Night-shift aware resolution of the aggregation start instant
//! - [`request`] — Command → date range of the report search
//! - [`aggregate`] — Report payload → summed duration for one task
//! - [`reply`] — Reply texts and timespan formatting
//! - [`error`] — Error types

pub mod aggregate;
pub mod command;
pub mod error;
pub mod reply;
pub mod request;
pub mod window;

pub use aggregate::{aggregate, anchor_offset, ReportGroup, TimeEntry};
pub use command::{
    BareTaskCommand, ClockOffset, Command, DateRangeCommand, TimeOfDayCommand, MAX_OFFSET_DAYS,
};
pub use error::ShiftError;
pub use reply::{format_timespan, Reply, HELP_TEXT};
pub use request::{build_request, ReportRequest};
pub use window::{
    is_night, local_today, resolve_window, today_anchor, ShiftOptions, ShiftWindow,
    DEFAULT_NIGHT_CUTOFF_HOUR,
};
