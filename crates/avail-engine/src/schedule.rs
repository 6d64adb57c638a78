//! Working hours → concrete availability windows.
//!
//! Working hours are wall-clock times in the configured local timezone. Each
//! configured range is localized on every day of the look-ahead period and
//! converted to absolute instants before any busy arithmetic happens.

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::config::{AvailabilityConfig, HourRange};
use crate::error::{AvailError, Result};
use crate::interval::Interval;

/// Parse a time of day such as `9am`, `9:30 PM`, `12am`, `17:00` or `17:00:00`.
///
/// # Errors
/// Returns `AvailError::InvalidTimeOfDay` for anything else.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime> {
    let invalid = || AvailError::InvalidTimeOfDay(text.to_string());

    let lower = text.trim().to_ascii_lowercase();
    let (body, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Some(true))
    } else {
        (lower.as_str(), None)
    };

    let mut parts = [0u32; 3];
    let mut count = 0;
    for piece in body.split(':') {
        if count == parts.len() || piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        parts[count] = piece.parse().map_err(|_| invalid())?;
        count += 1;
    }
    let [mut hour, minute, second] = parts;

    if let Some(pm) = meridiem {
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }
        hour = hour % 12 + if pm { 12 } else { 0 };
    }

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)
}

/// Resolve a wall-clock time in `tz`, refusing times skipped or repeated by a
/// DST transition.
fn localize(tz: Tz, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, _) => Err(AvailError::InvalidLocalTime(format!(
            "{naive} is ambiguous in {tz}"
        ))),
        LocalResult::None => Err(AvailError::InvalidLocalTime(format!(
            "{naive} does not exist in {tz}"
        ))),
    }
}

/// Earliest instant a meeting may be offered: `now` plus the lead time,
/// truncated to the hour on the local wall clock.
///
/// # Errors
/// `AvailError::InvalidConfig` when the result falls outside chrono's range.
pub fn earliest_start(now: DateTime<Utc>, tz: Tz, lead_hours: u32) -> Result<DateTime<Utc>> {
    let out_of_range = || {
        AvailError::InvalidConfig(format!("lead time of {lead_hours}h from {now} is out of range"))
    };

    let lead = now
        .checked_add_signed(TimeDelta::hours(i64::from(lead_hours)))
        .ok_or_else(out_of_range)?
        .with_timezone(&tz);
    let past_the_hour = TimeDelta::minutes(i64::from(lead.minute()))
        + TimeDelta::seconds(i64::from(lead.second()))
        + TimeDelta::nanoseconds(i64::from(lead.nanosecond()));
    let truncated = lead
        .checked_sub_signed(past_the_hour)
        .ok_or_else(out_of_range)?;
    Ok(truncated.with_timezone(&Utc))
}

fn range_on_day(tz: Tz, day: NaiveDate, range: &HourRange) -> Result<Interval> {
    let start_time = parse_time_of_day(&range.0)?;
    let end_time = parse_time_of_day(&range.1)?;
    let end_day = if end_time < start_time {
        day.checked_add_days(Days::new(1))
            .ok_or_else(|| AvailError::InvalidLocalTime(format!("{day} has no next day")))?
    } else {
        day
    };
    Ok(Interval {
        start: localize(tz, day.and_time(start_time))?,
        end: localize(tz, end_day.and_time(end_time))?,
    })
}

/// Build the availability windows for the next `days_forward` days.
///
/// Ranges that end before the lead time has passed are skipped; a range that
/// straddles it starts at the lead time instead. Output is chronological.
///
/// # Errors
/// Timezone, time-of-day and DST errors from the configuration, and
/// `AvailError::InvalidConfig` for a look-ahead beyond the accepted bounds.
pub fn work_windows(config: &AvailabilityConfig, now: DateTime<Utc>) -> Result<Vec<Interval>> {
    config.check_horizon()?;
    let tz = config.local_tz()?;
    let today = now.with_timezone(&tz).date_naive();
    let min_time = earliest_start(now, tz, config.hours_till_first_meeting)?;

    let mut windows = Vec::new();
    for offset in 0..u64::from(config.days_forward) {
        let Some(day) = today.checked_add_days(Days::new(offset)) else {
            break;
        };
        for range in config.days.ranges_for(day.weekday()) {
            let mut window = range_on_day(tz, day, range)?;
            if window.end <= min_time {
                continue;
            }
            window.start = window.start.max(min_time);
            if window.is_valid() {
                windows.push(window);
            }
        }
    }
    windows.sort();

    debug!(
        windows = windows.len(),
        min_time = %min_time,
        timezone = %tz,
        "generated working-hours windows"
    );
    Ok(windows)
}
