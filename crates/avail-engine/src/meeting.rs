//! Fit free intervals to a meeting-length grid.
//!
//! Meetings are offered on a grid anchored at the window start: with a 30 minute
//! meeting length and a 09:00 window, a gap opening at 10:10 is offered from
//! 10:30. Gaps too short for one meeting are dropped.

use chrono::{DateTime, TimeDelta, Utc};

use crate::interval::Interval;

/// Round `t` up to the next instant of the form `anchor + k * step`.
///
/// Instants at or before `anchor` map to `anchor`.
pub fn ceil_to_grid(t: DateTime<Utc>, anchor: DateTime<Utc>, step: TimeDelta) -> DateTime<Utc> {
    if t <= anchor {
        return anchor;
    }
    let step_ms = step.num_milliseconds().max(1);
    let offset_ms = (t - anchor).num_milliseconds();
    let mut k = offset_ms.div_euclid(step_ms) + i64::from(offset_ms.rem_euclid(step_ms) != 0);
    let mut rounded = anchor + TimeDelta::milliseconds(k * step_ms);
    // Sub-millisecond remainders are truncated by num_milliseconds.
    if rounded < t {
        k += 1;
        rounded = anchor + TimeDelta::milliseconds(k * step_ms);
    }
    rounded
}

/// Keep only the parts of `free` where a meeting of `meeting_length_minutes`
/// can start on the grid anchored at `window.start`.
///
/// A length of zero disables fitting and returns the input unchanged.
pub fn fit_meeting_slots(
    free: &[Interval],
    window: &Interval,
    meeting_length_minutes: u32,
) -> Vec<Interval> {
    if meeting_length_minutes == 0 {
        return free.to_vec();
    }
    let step = TimeDelta::minutes(i64::from(meeting_length_minutes));

    free.iter()
        .filter_map(|slot| {
            let start = ceil_to_grid(slot.start, window.start, step);
            let fitted = Interval {
                start,
                end: slot.end,
            };
            (start < slot.end && fitted.duration_minutes() >= i64::from(meeting_length_minutes))
                .then_some(fitted)
        })
        .collect()
}
