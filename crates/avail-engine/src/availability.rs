//! Multi-calendar availability across several windows.
//!
//! Accepts N busy streams (one per calendar), pads every busy interval, unions
//! them, and computes free time inside each window. Overlap between calendars is
//! resolved by simple union; no calendar takes precedence over another.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AvailError, Result};
use crate::freebusy;
use crate::interval::Interval;
use crate::meeting;

/// Busy intervals reported by a single calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyStream {
    /// Calendar identifier (e.g., "alice@example.com").
    pub calendar_id: String,
    pub busy: Vec<Interval>,
}

/// Spare time kept free around every busy interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub before_minutes: u32,
    pub after_minutes: u32,
}

impl Padding {
    /// Widen `interval` to `[start - before, end + after)`.
    pub fn apply(&self, interval: &Interval) -> Interval {
        Interval {
            start: interval.start - TimeDelta::minutes(i64::from(self.before_minutes)),
            end: interval.end + TimeDelta::minutes(i64::from(self.after_minutes)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvailabilityOptions {
    pub padding: Padding,
    /// When set, free intervals are fitted to a meeting grid of this length and
    /// shorter gaps are dropped.
    pub meeting_length_minutes: Option<u32>,
}

/// Sort windows and merge the ones that overlap or touch.
fn normalize_windows(windows: &[Interval]) -> Result<Vec<Interval>> {
    let mut sorted = Vec::with_capacity(windows.len());
    for w in windows {
        if !w.is_valid() {
            return Err(AvailError::InvalidWindow {
                start: w.start,
                end: w.end,
            });
        }
        sorted.push(*w);
    }
    sorted.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for w in sorted {
        if let Some(last) = merged.last_mut() {
            if w.start <= last.end {
                last.end = last.end.max(w.end);
                continue;
            }
        }
        merged.push(w);
    }
    Ok(merged)
}

/// Compute the free time of the union of `streams` inside each of `windows`.
///
/// Returns a single sorted, disjoint list covering all windows.
///
/// # Errors
/// `AvailError::InvalidWindow` for an empty or inverted window and
/// `AvailError::InvalidInterval` for an empty or inverted busy entry.
pub fn compute_availability(
    streams: &[BusyStream],
    windows: &[Interval],
    options: &AvailabilityOptions,
) -> Result<Vec<Interval>> {
    let windows = normalize_windows(windows)?;

    // Validate before padding so a bad entry is never widened into a valid one.
    let mut busy: Vec<Interval> = Vec::new();
    for stream in streams {
        for b in &stream.busy {
            b.validate()?;
            busy.push(options.padding.apply(b));
        }
        debug!(
            calendar = %stream.calendar_id,
            busy = stream.busy.len(),
            "collected busy stream"
        );
    }

    let mut free = Vec::new();
    for window in &windows {
        let gaps = freebusy::find_free_intervals(&busy, window)?;
        match options.meeting_length_minutes {
            Some(len) => free.extend(meeting::fit_meeting_slots(&gaps, window, len)),
            None => free.extend(gaps),
        }
    }

    debug!(
        windows = windows.len(),
        free = free.len(),
        "computed availability"
    );
    Ok(free)
}
