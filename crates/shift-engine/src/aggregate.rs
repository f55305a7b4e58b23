//! Time entry aggregation.
//!
//! The reports search endpoint answers with entries grouped by description.
//! Aggregation keeps the group whose description matches the task exactly,
//! drops entries that started at or before the window start, and sums what
//! is left.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// One group of the search response. Entries without a description come
/// back as a group whose description is `null` or missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportGroup {
    #[serde(default)]
    pub description: Option<String>,
    pub time_entries: Vec<TimeEntry>,
}

/// A single tracked interval, with the offset the service reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub start: DateTime<FixedOffset>,
    pub stop: DateTime<FixedOffset>,
}

impl TimeEntry {
    pub fn duration(&self) -> Duration {
        self.stop - self.start
    }
}

/// UTC offset of the first entry of the first group.
///
/// Only the very first group is consulted: a leading group without entries
/// yields `None` even when later groups have some.
pub fn anchor_offset(groups: &[ReportGroup]) -> Option<FixedOffset> {
    groups
        .first()?
        .time_entries
        .first()
        .map(|entry| *entry.start.offset())
}

/// Sum the entries of `task` that started strictly after `filter_start`.
///
/// Returns `None` when no entry survives the filters.
pub fn aggregate(
    groups: &[ReportGroup],
    task: &str,
    filter_start: DateTime<FixedOffset>,
) -> Option<Duration> {
    groups
        .iter()
        .filter(|group| group.description.as_deref() == Some(task))
        .flat_map(|group| group.time_entries.iter())
        .filter(|entry| entry.start > filter_start)
        .map(TimeEntry::duration)
        .fold(None, |total: Option<Duration>, d| {
            Some(total.unwrap_or_else(Duration::zero) + d)
        })
}
