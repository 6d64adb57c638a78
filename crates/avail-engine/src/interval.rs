//! Half-open time ranges over absolute instants.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AvailError, Result};

/// A half-open range `[start, end)` of absolute instants.
///
/// Fields are public so callers can carry raw data from a calendar feed; the
/// `start < end` invariant is enforced by [`Interval::new`] and re-checked by
/// every computation that accepts intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, rejecting empty and inverted ranges.
    ///
    /// # Errors
    /// Returns `AvailError::InvalidInterval` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let interval = Interval { start, end };
        interval.validate()?;
        Ok(interval)
    }

    /// Check the `start < end` invariant.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AvailError::InvalidInterval {
                start: self.start,
                end: self.end,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Length in whole minutes, rounded down.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Touching intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The part of `self` inside `window`, or `None` when they do not overlap.
    pub fn clip_to(&self, window: &Interval) -> Option<Interval> {
        if !self.overlaps(window) {
            return None;
        }
        Some(Interval {
            start: self.start.max(window.start),
            end: self.end.min(window.end),
        })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}
