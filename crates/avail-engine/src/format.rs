//! Render free intervals as availability text for an email.
//!
//! ```text
//! Availability for next few days (all PT):
//!  * Mon (Mar 16th): 9am - 10am, 11am - 5pm
//!  * Tue (Mar 17th): 1:30pm - 5pm
//! ```
//!
//! Intervals are converted to the display zone here and nowhere else.

use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;

use crate::interval::Interval;

/// A timezone to render in, with the short name shown in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayZone {
    pub tz: Tz,
    /// e.g. "PT"; `None` omits the "(all ...)" header suffix.
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub show_24hr: bool,
    pub week_starts_on_sunday: bool,
}

/// `9am`, `9:30am`, or `9:30` / `17:00` in 24 hour mode.
pub fn format_time(t: &DateTime<Tz>, show_24hr: bool) -> String {
    if show_24hr {
        return format!("{}:{:02}", t.hour(), t.minute());
    }
    let (pm, hour) = t.hour12();
    let meridiem = if pm { "pm" } else { "am" };
    if t.minute() == 0 {
        format!("{hour}{meridiem}")
    } else {
        format!("{hour}:{:02}{meridiem}", t.minute())
    }
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `Mon (Mar 16th):`
pub fn day_label(t: &DateTime<Tz>) -> String {
    format!(
        "{} ({} {}{}):",
        t.format("%a"),
        t.format("%b"),
        t.day(),
        ordinal_suffix(t.day())
    )
}

fn weekday_index(t: &DateTime<Tz>, week_starts_on_sunday: bool) -> u32 {
    (t.weekday().num_days_from_monday() + u32::from(week_starts_on_sunday)) % 7
}

/// Render `free` in `zone`, one line per day.
///
/// Days are grouped by the local date of each interval's start; an interval
/// running past midnight stays on the line of the day it starts. A
/// `Next week:` line separates days that wrap past the start of the week.
pub fn render_availability(free: &[Interval], zone: &DisplayZone, options: &FormatOptions) -> String {
    let mut out = match &zone.label {
        Some(label) => format!("Availability for next few days (all {label}):\n"),
        None => "Availability for next few days:\n".to_string(),
    };

    if free.is_empty() {
        out.push_str(" * No availability.\n");
        return out;
    }

    // (first start of the day, rendered ranges)
    let mut days: Vec<(DateTime<Tz>, Vec<String>)> = Vec::new();
    for interval in free {
        let start = interval.start.with_timezone(&zone.tz);
        let end = interval.end.with_timezone(&zone.tz);
        let range = format!(
            "{} - {}",
            format_time(&start, options.show_24hr),
            format_time(&end, options.show_24hr)
        );
        let same_day = days
            .last()
            .is_some_and(|(first, _)| first.date_naive() == start.date_naive());
        match days.last_mut() {
            Some((_, ranges)) if same_day => ranges.push(range),
            _ => days.push((start, vec![range])),
        }
    }

    let mut previous: Option<(u32, NaiveDate)> = None;
    for (first, ranges) in &days {
        let index = weekday_index(first, options.week_starts_on_sunday);
        let date = first.date_naive();
        if let Some((prev_index, prev_date)) = previous {
            if index < prev_index || (date - prev_date).num_days() >= 7 {
                out.push_str("Next week:\n");
            }
        }
        previous = Some((index, date));

        out.push_str(&format!(" * {:14} {}\n", day_label(first), ranges.join(", ")));
    }

    out
}
