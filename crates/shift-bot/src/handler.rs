//! Per-message pipeline.
//!
//! parse → build request → search → anchor → resolve → aggregate → reply.
//! [`answer`] is the only place faults are turned into chat text: whatever
//! goes wrong after parsing becomes [`Reply::Error`], with the detail kept
//! in the logs.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use shift_engine::{
    aggregate, anchor_offset, build_request, resolve_window, Command, Reply, ShiftError,
    ShiftOptions,
};
use tracing::{debug, info, warn};

use crate::toggl::ReportsClient;

/// Compute the reply for one message.
///
/// `clock` is read once when the message is handled and once more after the
/// report arrives: the request dates and the night rule use the first
/// reading, the anchor date the second.
pub async fn answer<C>(
    text: Option<&str>,
    clock: C,
    reports: &ReportsClient,
    options: &ShiftOptions,
) -> Reply
where
    C: Fn() -> DateTime<Utc>,
{
    let Some(command) = Command::parse(text) else {
        debug!("Message is not a command");
        return Reply::Help;
    };
    info!(kind = command.kind(), task = command.task(), "Handling command");

    match total_for(&command, &clock, reports, options).await {
        Ok(Some(total)) => Reply::Total(total),
        Ok(None) => Reply::NoData,
        Err(err) => {
            warn!("Failed to compute total: {err:#}");
            Reply::Error
        }
    }
}

/// `Ok(None)` means the report had nothing for the window.
async fn total_for<C>(
    command: &Command,
    clock: &C,
    reports: &ReportsClient,
    options: &ShiftOptions,
) -> Result<Option<Duration>>
where
    C: Fn() -> DateTime<Utc>,
{
    let now = clock();
    let request = build_request(command, now, options);
    let groups = reports.search_time_entries(&request).await?;
    let anchored_at = clock();

    let window = match resolve_window(command, now, anchored_at, anchor_offset(&groups), options)
    {
        Ok(window) => window,
        Err(ShiftError::NoAnchor) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    debug!(filter_start = %window.filter_start, groups = groups.len(), "Resolved window");

    Ok(aggregate(&groups, &window.task, window.filter_start))
}
