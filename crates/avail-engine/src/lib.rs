//! # avail-engine
//!
//! Turns calendar busy periods into free time that can be pasted into an email.
//!
//! Every computation runs on absolute instants (`DateTime<Utc>`). Timezones only
//! appear at the edges: [`schedule`] localizes working hours into instants, and
//! [`format`] renders the resulting free intervals in one or more display zones.
//!
//! ## Modules
//!
//! - [`interval`] — half-open `[start, end)` instant ranges
//! - [`freebusy`] — clip, merge and subtract busy intervals from a window
//! - [`meeting`] — fit free intervals to a meeting-length grid
//! - [`availability`] — union of several calendars over several windows
//! - [`schedule`] — weekly working hours → concrete windows
//! - [`config`] — user configuration and `NAME=VALUE` overrides
//! - [`gcal`] — Google Calendar API JSON documents
//! - [`format`] — availability text rendering
//! - [`error`] — Error types

pub mod availability;
pub mod config;
pub mod error;
pub mod format;
pub mod freebusy;
pub mod gcal;
pub mod interval;
pub mod meeting;
pub mod schedule;

pub use availability::{compute_availability, AvailabilityOptions, BusyStream, Padding};
pub use config::AvailabilityConfig;
pub use error::AvailError;
pub use format::{render_availability, DisplayZone, FormatOptions};
pub use freebusy::{find_free_intervals, merge_busy_periods};
pub use interval::Interval;
pub use meeting::fit_meeting_slots;
pub use schedule::{parse_time_of_day, work_windows};
