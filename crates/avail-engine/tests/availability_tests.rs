//! Tests for multi-calendar availability: union, padding, meeting grid, and
//! multiple windows.

use avail_engine::error::AvailError;
use avail_engine::{compute_availability, AvailabilityOptions, BusyStream, Interval, Padding};
use chrono::{DateTime, TimeZone, Utc};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
}

fn iv(day: u32, start: (u32, u32), end: (u32, u32)) -> Interval {
    Interval {
        start: at(day, start.0, start.1),
        end: at(day, end.0, end.1),
    }
}

fn stream(id: &str, busy: Vec<Interval>) -> BusyStream {
    BusyStream {
        calendar_id: id.to_string(),
        busy,
    }
}

fn plain() -> AvailabilityOptions {
    AvailabilityOptions::default()
}

// ── Union ───────────────────────────────────────────────────────────────────

#[test]
fn overlapping_calendars_are_unioned() {
    let work = stream("work", vec![iv(16, (9, 0), (11, 0))]);
    let personal = stream("personal", vec![iv(16, (10, 0), (12, 0))]);
    let window = iv(16, (8, 0), (17, 0));

    let free = compute_availability(&[work, personal], &[window], &plain()).unwrap();

    assert_eq!(
        free,
        vec![iv(16, (8, 0), (9, 0)), iv(16, (12, 0), (17, 0))]
    );
}

#[test]
fn no_streams_frees_every_window() {
    let windows = vec![iv(17, (9, 0), (17, 0)), iv(16, (9, 0), (17, 0))];

    let free = compute_availability(&[], &windows, &plain()).unwrap();

    // Sorted regardless of window order.
    assert_eq!(free, vec![iv(16, (9, 0), (17, 0)), iv(17, (9, 0), (17, 0))]);
}

#[test]
fn no_windows_no_availability() {
    let work = stream("work", vec![iv(16, (9, 0), (11, 0))]);

    assert!(compute_availability(&[work], &[], &plain()).unwrap().is_empty());
}

#[test]
fn busy_spanning_two_windows_blocks_both() {
    let overnight = stream("travel", vec![Interval {
        start: at(16, 15, 0),
        end: at(17, 11, 0),
    }]);
    let windows = vec![iv(16, (9, 0), (17, 0)), iv(17, (9, 0), (17, 0))];

    let free = compute_availability(&[overnight], &windows, &plain()).unwrap();

    assert_eq!(
        free,
        vec![iv(16, (9, 0), (15, 0)), iv(17, (11, 0), (17, 0))]
    );
}

#[test]
fn overlapping_windows_are_merged_before_computing() {
    let windows = vec![iv(16, (9, 0), (12, 0)), iv(16, (11, 0), (14, 0))];

    let free = compute_availability(&[], &windows, &plain()).unwrap();

    assert_eq!(free, vec![iv(16, (9, 0), (14, 0))]);
}

// ── Padding ─────────────────────────────────────────────────────────────────

#[test]
fn padding_widens_busy_periods() {
    let work = stream("work", vec![iv(16, (10, 0), (11, 0))]);
    let options = AvailabilityOptions {
        padding: Padding {
            before_minutes: 15,
            after_minutes: 15,
        },
        meeting_length_minutes: None,
    };

    let free = compute_availability(&[work], &[iv(16, (9, 0), (17, 0))], &options).unwrap();

    assert_eq!(
        free,
        vec![iv(16, (9, 0), (9, 45)), iv(16, (11, 15), (17, 0))]
    );
}

#[test]
fn padding_does_not_rescue_an_empty_busy_entry() {
    let bad = stream("work", vec![Interval {
        start: at(16, 10, 0),
        end: at(16, 10, 0),
    }]);
    let options = AvailabilityOptions {
        padding: Padding {
            before_minutes: 0,
            after_minutes: 30,
        },
        meeting_length_minutes: None,
    };

    let err = compute_availability(&[bad], &[iv(16, (9, 0), (17, 0))], &options).unwrap_err();

    assert!(matches!(err, AvailError::InvalidInterval { .. }));
}

#[test]
fn empty_window_is_rejected() {
    let window = Interval {
        start: at(16, 10, 0),
        end: at(16, 10, 0),
    };

    assert!(matches!(
        compute_availability(&[], &[window], &plain()),
        Err(AvailError::InvalidWindow { .. })
    ));
}

// ── Meeting grid ────────────────────────────────────────────────────────────

fn meetings(len: u32) -> AvailabilityOptions {
    AvailabilityOptions {
        padding: Padding::default(),
        meeting_length_minutes: Some(len),
    }
}

#[test]
fn free_start_rounds_up_to_meeting_grid() {
    // Busy until 10:10 → next 30 minute slot on the 09:00 grid is 10:30.
    let work = stream("work", vec![iv(16, (9, 0), (10, 10)), iv(16, (16, 45), (17, 0))]);

    let free = compute_availability(&[work], &[iv(16, (9, 0), (17, 0))], &meetings(30)).unwrap();

    assert_eq!(free, vec![iv(16, (10, 30), (16, 45))]);
}

#[test]
fn gaps_shorter_than_a_meeting_are_dropped() {
    // 10:00-10:20 is only 20 minutes.
    let work = stream("work", vec![iv(16, (9, 0), (10, 0)), iv(16, (10, 20), (17, 0))]);

    let free = compute_availability(&[work], &[iv(16, (9, 0), (17, 0))], &meetings(30)).unwrap();

    assert!(free.is_empty());
}

#[test]
fn rounding_can_shrink_a_gap_below_meeting_length() {
    // Gap 10:10-10:50 is 40 minutes, but after rounding to 10:30 only 20 remain.
    let work = stream("work", vec![iv(16, (9, 0), (10, 10)), iv(16, (10, 50), (17, 0))]);

    let free = compute_availability(&[work], &[iv(16, (9, 0), (17, 0))], &meetings(30)).unwrap();

    assert!(free.is_empty());
}

#[test]
fn grid_is_anchored_per_window() {
    // Second window starts at 13:15; busy until 13:20 → next 30 minute slot 13:45.
    let work = stream("work", vec![iv(16, (13, 0), (13, 20))]);
    let windows = vec![iv(16, (9, 0), (10, 0)), iv(16, (13, 15), (15, 0))];

    let free = compute_availability(&[work], &windows, &meetings(30)).unwrap();

    assert_eq!(
        free,
        vec![iv(16, (9, 0), (10, 0)), iv(16, (13, 45), (15, 0))]
    );
}

#[test]
fn exact_meeting_length_gap_is_kept() {
    let work = stream("work", vec![iv(16, (9, 0), (10, 0)), iv(16, (10, 30), (17, 0))]);

    let free = compute_availability(&[work], &[iv(16, (9, 0), (17, 0))], &meetings(30)).unwrap();

    assert_eq!(free, vec![iv(16, (10, 0), (10, 30))]);
}
