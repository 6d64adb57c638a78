//! Google Calendar API v3 JSON documents.
//!
//! Only the documents the tool needs are modelled: the `freebusy.query`
//! request body and response, and the `calendarList.list` response. Fetching
//! them (OAuth, HTTP) happens outside this crate; these types are the boundary.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::availability::BusyStream;
use crate::config::AvailabilityConfig;
use crate::error::{AvailError, Result};
use crate::interval::Interval;

/// Scope required to issue the calls these documents belong to.
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: String,
}

/// Body of `POST https://www.googleapis.com/calendar/v3/freeBusy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyRequest {
    pub time_min: DateTime<FixedOffset>,
    pub time_max: DateTime<FixedOffset>,
    pub time_zone: String,
    pub items: Vec<CalendarItem>,
}

impl FreeBusyRequest {
    /// Query `[now, now + days_forward days)` for the given calendars, expressed
    /// in the configured local timezone.
    ///
    /// # Errors
    /// `AvailError::InvalidConfig` when `days_forward` is out of bounds or the
    /// end of the range is not representable.
    pub fn for_config(
        config: &AvailabilityConfig,
        now: DateTime<Utc>,
        calendar_ids: &[String],
    ) -> Result<Self> {
        config.check_horizon()?;
        let tz = config.local_tz()?;
        let end = now
            .checked_add_signed(TimeDelta::days(i64::from(config.days_forward)))
            .ok_or_else(|| {
                AvailError::InvalidConfig(format!(
                    "{} days from {now} is out of range",
                    config.days_forward
                ))
            })?;
        Ok(FreeBusyRequest {
            time_min: now.with_timezone(&tz).fixed_offset(),
            time_max: end.with_timezone(&tz).fixed_offset(),
            time_zone: config.local_timezone.clone(),
            items: calendar_ids
                .iter()
                .map(|id| CalendarItem { id: id.clone() })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Per-calendar failure reported inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub domain: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarBusy {
    #[serde(default)]
    pub busy: Vec<BusyPeriod>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

/// Response of `freebusy.query`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBusyResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_min: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_max: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub calendars: BTreeMap<String, CalendarBusy>,
}

impl FreeBusyResponse {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn calendar_ids(&self) -> Vec<&str> {
        self.calendars.keys().map(String::as_str).collect()
    }

    /// Busy intervals of the requested calendars, or of every calendar in the
    /// response when `calendar_ids` is empty.
    ///
    /// Busy periods are converted to UTC but not validated; the availability
    /// computation rejects inverted entries.
    ///
    /// # Errors
    /// `AvailError::UnknownCalendar` when a requested calendar is missing or the
    /// response carries errors for it (e.g. `notFound`).
    pub fn busy_streams(&self, calendar_ids: &[String]) -> Result<Vec<BusyStream>> {
        let ids: Vec<&str> = if calendar_ids.is_empty() {
            self.calendar_ids()
        } else {
            calendar_ids.iter().map(String::as_str).collect()
        };

        ids.into_iter()
            .map(|id| {
                let calendar = self
                    .calendars
                    .get(id)
                    .ok_or_else(|| AvailError::UnknownCalendar(id.to_string()))?;
                if !calendar.errors.is_empty() {
                    let reasons: Vec<&str> =
                        calendar.errors.iter().map(|e| e.reason.as_str()).collect();
                    warn!(calendar = id, reasons = ?reasons, "calendar reported errors");
                    return Err(AvailError::UnknownCalendar(format!(
                        "{id} ({})",
                        reasons.join(", ")
                    )));
                }
                Ok(BusyStream {
                    calendar_id: id.to_string(),
                    busy: calendar
                        .busy
                        .iter()
                        .map(|p| Interval {
                            start: p.start.with_timezone(&Utc),
                            end: p.end.with_timezone(&Utc),
                        })
                        .collect(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: String,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub access_role: String,
    #[serde(default)]
    pub default_reminders: Vec<Reminder>,
}

/// Response of `calendarList.list`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarList {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
}

impl CalendarList {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Owned calendars first, then calendars with more default reminders
    /// (the ones the user actually looks at), then by id.
    pub fn sorted_for_display(&self) -> Vec<&CalendarListEntry> {
        let mut entries: Vec<&CalendarListEntry> = self.items.iter().collect();
        entries.sort_by_key(|c| {
            (
                c.access_role != "owner",
                Reverse(c.default_reminders.len()),
                c.id.clone(),
            )
        });
        entries
    }

    /// Requested ids that are not in the list, in request order.
    pub fn missing<'a>(&self, calendar_ids: &'a [String]) -> Vec<&'a str> {
        calendar_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !self.items.iter().any(|c| c.id == *id))
            .collect()
    }
}
