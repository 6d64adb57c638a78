//! Compute free intervals from a busy set.
//!
//! Clips busy intervals to the window, sorts them by start time, merges
//! overlapping or touching periods in one sweep, then emits the gaps between
//! merged periods. A zero-length gap between back-to-back meetings yields no
//! free interval.

use tracing::debug;

use crate::error::{AvailError, Result};
use crate::interval::Interval;

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Intervals with no overlap with the window are discarded. Returns a sorted,
/// non-overlapping list.
///
/// # Errors
/// Same as [`find_free_intervals`]: `InvalidWindow` for an empty or inverted
/// window, `InvalidInterval` for the first busy entry with `start >= end`.
pub fn merge_busy_periods(busy: &[Interval], window: &Interval) -> Result<Vec<Interval>> {
    check_inputs(busy, window)?;
    Ok(merge_clipped(busy, window))
}

fn check_inputs(busy: &[Interval], window: &Interval) -> Result<()> {
    if !window.is_valid() {
        return Err(AvailError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }
    busy.iter().try_for_each(Interval::validate)
}

/// Inputs must already have passed [`check_inputs`].
fn merge_clipped(busy: &[Interval], window: &Interval) -> Vec<Interval> {
    let mut clipped: Vec<Interval> = busy.iter().filter_map(|b| b.clip_to(window)).collect();

    if clipped.is_empty() {
        return Vec::new();
    }

    // Sort by start time (then by end time for stability).
    clipped.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(clipped.len());
    for interval in clipped {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Subtract a busy set from a window.
///
/// The busy set may be unsorted, may overlap and may extend past the window.
/// The result is sorted ascending, pairwise disjoint, fully contained in the
/// window, and together with the merged busy periods covers it exactly.
///
/// # Errors
/// Returns `AvailError::InvalidWindow` if the window is empty or inverted, and
/// `AvailError::InvalidInterval` for the first busy entry with `start >= end`.
/// Nothing is returned on error.
pub fn find_free_intervals(busy: &[Interval], window: &Interval) -> Result<Vec<Interval>> {
    check_inputs(busy, window)?;

    let merged = merge_clipped(busy, window);
    debug!(
        window = %window,
        busy = busy.len(),
        merged = merged.len(),
        "merged busy periods"
    );

    let mut free = Vec::with_capacity(merged.len() + 1);
    let mut cursor = window.start;

    for b in &merged {
        if cursor < b.start {
            free.push(Interval {
                start: cursor,
                end: b.start,
            });
        }
        cursor = cursor.max(b.end);
    }

    // Trailing free interval after the last busy period.
    if cursor < window.end {
        free.push(Interval {
            start: cursor,
            end: window.end,
        });
    }

    Ok(free)
}
