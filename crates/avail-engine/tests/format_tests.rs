//! Tests for availability text rendering.

use avail_engine::format::{day_label, format_time};
use avail_engine::{render_availability, DisplayZone, FormatOptions, Interval};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
}

fn iv(start: DateTime<Utc>, end: DateTime<Utc>) -> Interval {
    Interval { start, end }
}

fn pacific() -> DisplayZone {
    DisplayZone {
        tz: chrono_tz::America::Los_Angeles,
        label: Some("PT".to_string()),
    }
}

fn twelve_hour() -> FormatOptions {
    FormatOptions::default()
}

/// Two days of availability in PDT (UTC-7).
fn sample() -> Vec<Interval> {
    vec![
        iv(utc(16, 16, 0), utc(16, 17, 0)), // Mon 9am-10am
        iv(utc(16, 18, 0), utc(17, 0, 0)),  // Mon 11am-5pm
        iv(utc(17, 20, 30), utc(18, 0, 0)), // Tue 1:30pm-5pm
    ]
}

#[test]
fn renders_twelve_hour_lines_grouped_by_day() {
    let text = render_availability(&sample(), &pacific(), &twelve_hour());

    assert_eq!(
        text,
        "Availability for next few days (all PT):\n\
         \x20* Mon (Mar 16th): 9am - 10am, 11am - 5pm\n\
         \x20* Tue (Mar 17th): 1:30pm - 5pm\n"
    );
}

#[test]
fn renders_twenty_four_hour_times() {
    let options = FormatOptions {
        show_24hr: true,
        ..FormatOptions::default()
    };

    let text = render_availability(&sample(), &pacific(), &options);

    assert!(text.contains(" * Mon (Mar 16th): 9:00 - 10:00, 11:00 - 17:00\n"), "{text}");
    assert!(text.contains(" * Tue (Mar 17th): 13:30 - 17:00\n"), "{text}");
}

#[test]
fn header_without_label() {
    let zone = DisplayZone {
        tz: chrono_tz::America::Los_Angeles,
        label: None,
    };

    let text = render_availability(&sample(), &zone, &twelve_hour());

    assert!(text.starts_with("Availability for next few days:\n"));
}

#[test]
fn empty_availability_says_so() {
    let text = render_availability(&[], &pacific(), &twelve_hour());

    assert_eq!(
        text,
        "Availability for next few days (all PT):\n * No availability.\n"
    );
}

#[test]
fn same_instants_render_in_another_zone() {
    let zone = DisplayZone {
        tz: chrono_tz::Europe::London,
        label: Some("UK".to_string()),
    };

    let text = render_availability(&sample()[..1], &zone, &twelve_hour());

    // London is still on GMT until 2026-03-29.
    assert_eq!(
        text,
        "Availability for next few days (all UK):\n * Mon (Mar 16th): 4pm - 5pm\n"
    );
}

#[test]
fn next_week_separator_when_weekday_wraps() {
    let free = vec![
        iv(utc(20, 16, 0), utc(20, 17, 0)), // Fri
        iv(utc(23, 16, 0), utc(23, 17, 0)), // Mon
    ];

    let text = render_availability(&free, &pacific(), &twelve_hour());

    assert_eq!(
        text,
        "Availability for next few days (all PT):\n\
         \x20* Fri (Mar 20th): 9am - 10am\n\
         Next week:\n\
         \x20* Mon (Mar 23rd): 9am - 10am\n"
    );
}

#[test]
fn week_start_on_sunday_moves_the_separator() {
    let free = vec![
        iv(utc(21, 17, 0), utc(21, 18, 0)), // Sat 10am
        iv(utc(22, 17, 0), utc(22, 18, 0)), // Sun 10am
    ];
    let monday_start = render_availability(&free, &pacific(), &twelve_hour());
    let sunday_start = render_availability(
        &free,
        &pacific(),
        &FormatOptions {
            week_starts_on_sunday: true,
            ..FormatOptions::default()
        },
    );

    assert!(!monday_start.contains("Next week:"));
    assert!(sunday_start.contains("Next week:\n * Sun (Mar 22nd):"), "{sunday_start}");
}

#[test]
fn gap_of_a_full_week_is_a_new_week() {
    let free = vec![
        iv(utc(16, 16, 0), utc(16, 17, 0)), // Mon
        iv(utc(24, 16, 0), utc(24, 17, 0)), // Tue of the following week
    ];

    let text = render_availability(&free, &pacific(), &twelve_hour());

    assert!(text.contains("Next week:\n * Tue (Mar 24th):"), "{text}");
}

#[test]
fn interval_past_midnight_stays_on_its_start_day() {
    let free = vec![iv(utc(17, 5, 0), utc(17, 9, 0))]; // Mon 10pm - Tue 2am PDT

    let text = render_availability(&free, &pacific(), &twelve_hour());

    assert!(text.contains(" * Mon (Mar 16th): 10pm - 2am\n"), "{text}");
}

#[test]
fn time_formats() {
    let tz: Tz = chrono_tz::UTC;
    let t = |h, m| tz.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap();

    assert_eq!(format_time(&t(0, 0), false), "12am");
    assert_eq!(format_time(&t(12, 0), false), "12pm");
    assert_eq!(format_time(&t(12, 5), false), "12:05pm");
    assert_eq!(format_time(&t(9, 30), false), "9:30am");
    assert_eq!(format_time(&t(9, 5), true), "9:05");
    assert_eq!(format_time(&t(0, 0), true), "0:00");
    assert_eq!(day_label(&t(9, 0)), "Mon (Mar 2nd):");
}
