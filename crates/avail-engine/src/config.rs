//! User configuration: working hours, lead time, meeting length and display.
//!
//! Loaded from a JSON file where every key is optional, then adjusted with
//! `NAME=VALUE` overrides from the command line. Unknown keys are rejected.

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::availability::{AvailabilityOptions, Padding};
use crate::error::{AvailError, Result};
use crate::format::{DisplayZone, FormatOptions};
use crate::schedule::parse_time_of_day;

/// A working-hours range as written in the config, e.g. `["9am", "5pm"]`.
///
/// An end earlier than the start denotes a range running past midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange(pub String, pub String);

impl HourRange {
    pub fn new(start: &str, end: &str) -> Self {
        HourRange(start.to_string(), end.to_string())
    }
}

/// Working hours per weekday. Days missing from the config have no hours.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklyHours {
    #[serde(rename = "Mon", default)]
    pub mon: Vec<HourRange>,
    #[serde(rename = "Tue", default)]
    pub tue: Vec<HourRange>,
    #[serde(rename = "Wed", default)]
    pub wed: Vec<HourRange>,
    #[serde(rename = "Thu", default)]
    pub thu: Vec<HourRange>,
    #[serde(rename = "Fri", default)]
    pub fri: Vec<HourRange>,
    #[serde(rename = "Sat", default)]
    pub sat: Vec<HourRange>,
    #[serde(rename = "Sun", default)]
    pub sun: Vec<HourRange>,
}

impl WeeklyHours {
    pub fn ranges_for(&self, weekday: Weekday) -> &[HourRange] {
        match weekday {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    fn all(&self) -> impl Iterator<Item = (Weekday, &HourRange)> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .flat_map(move |wd| self.ranges_for(wd).iter().map(move |r| (wd, r)))
    }
}

/// An additional timezone to render availability in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraZone {
    pub timezone: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvailabilityConfig {
    /// Number of days, starting today, to offer.
    pub days_forward: u32,
    /// Minimum lead time before the first offered slot.
    pub hours_till_first_meeting: u32,
    pub meeting_length_minutes: u32,
    /// Spare minutes kept free before every busy period.
    pub meeting_spare_before: u32,
    /// Spare minutes kept free after every busy period.
    pub meeting_spare_after: u32,
    pub show_timezone: String,
    pub show_24hr: bool,
    pub show_timezone_name: Option<String>,
    pub also_show: Vec<ExtraZone>,
    pub week_starts_on_sunday: bool,
    /// Timezone the working hours in `days` are expressed in.
    pub local_timezone: String,
    pub days: WeeklyHours,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        let nine_to_five = vec![HourRange::new("9am", "5pm")];
        AvailabilityConfig {
            days_forward: 14,
            hours_till_first_meeting: 3,
            meeting_length_minutes: 30,
            meeting_spare_before: 0,
            meeting_spare_after: 0,
            show_timezone: "America/Los_Angeles".to_string(),
            show_24hr: false,
            show_timezone_name: Some("PT".to_string()),
            also_show: Vec::new(),
            week_starts_on_sunday: false,
            local_timezone: "America/Los_Angeles".to_string(),
            days: WeeklyHours {
                mon: nine_to_five.clone(),
                tue: nine_to_five.clone(),
                wed: nine_to_five.clone(),
                thu: nine_to_five,
                fri: vec![HourRange::new("9am", "2pm")],
                sat: Vec::new(),
                sun: Vec::new(),
            },
        }
    }
}

/// Largest accepted `days_forward`.
pub const MAX_DAYS_FORWARD: u32 = 366;
/// Largest accepted `hours_till_first_meeting`.
pub const MAX_LEAD_HOURS: u32 = 24 * MAX_DAYS_FORWARD;

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| AvailError::InvalidTimezone(name.to_string()))
}

impl AvailabilityConfig {
    /// Parse a JSON config document. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check everything that can be checked without a clock.
    pub fn validate(&self) -> Result<()> {
        parse_timezone(&self.local_timezone)?;
        self.display_zones()?;
        self.check_horizon()?;

        if self.meeting_length_minutes == 0 {
            return Err(AvailError::InvalidConfig(
                "meeting_length_minutes must be at least 1".to_string(),
            ));
        }

        for (weekday, HourRange(start, end)) in self.days.all() {
            let s = parse_time_of_day(start)?;
            let e = parse_time_of_day(end)?;
            if s == e {
                return Err(AvailError::InvalidConfig(format!(
                    "empty working-hours range {start} - {end} on {weekday}"
                )));
            }
        }
        Ok(())
    }

    /// Upper bounds on `days_forward` and `hours_till_first_meeting`.
    pub(crate) fn check_horizon(&self) -> Result<()> {
        if self.days_forward > MAX_DAYS_FORWARD {
            return Err(AvailError::InvalidConfig(format!(
                "days_forward must be at most {MAX_DAYS_FORWARD}, got {}",
                self.days_forward
            )));
        }
        if self.hours_till_first_meeting > MAX_LEAD_HOURS {
            return Err(AvailError::InvalidConfig(format!(
                "hours_till_first_meeting must be at most {MAX_LEAD_HOURS}, got {}",
                self.hours_till_first_meeting
            )));
        }
        Ok(())
    }

    pub fn local_tz(&self) -> Result<Tz> {
        parse_timezone(&self.local_timezone)
    }

    /// The primary display zone followed by every `also_show` entry.
    pub fn display_zones(&self) -> Result<Vec<DisplayZone>> {
        let mut zones = vec![DisplayZone {
            tz: parse_timezone(&self.show_timezone)?,
            label: self.show_timezone_name.clone(),
        }];
        for extra in &self.also_show {
            zones.push(DisplayZone {
                tz: parse_timezone(&extra.timezone)?,
                label: extra.name.clone(),
            });
        }
        Ok(zones)
    }

    pub fn availability_options(&self) -> AvailabilityOptions {
        AvailabilityOptions {
            padding: Padding {
                before_minutes: self.meeting_spare_before,
                after_minutes: self.meeting_spare_after,
            },
            meeting_length_minutes: Some(self.meeting_length_minutes),
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            show_24hr: self.show_24hr,
            week_starts_on_sunday: self.week_starts_on_sunday,
        }
    }

    /// Apply a single `NAME=VALUE` override.
    ///
    /// The value is interpreted according to the option's current kind:
    /// objects and lists as JSON, booleans as an integer (non-zero is true) or
    /// `true`/`false`, numbers as integers, and everything else as raw text.
    pub fn apply_override(&mut self, entry: &str) -> Result<()> {
        let (name, raw) = entry.split_once('=').ok_or_else(|| {
            AvailError::InvalidConfig(format!(
                "option '{entry}' should be provided as OPTNAME=VALUE"
            ))
        })?;

        let mut doc = serde_json::to_value(&*self)?;
        let fields = doc
            .as_object_mut()
            .ok_or_else(|| AvailError::InvalidConfig("config is not an object".to_string()))?;
        let current = fields.get(name).ok_or_else(|| {
            AvailError::InvalidConfig(format!(
                "unknown option {name}, use `avail options` to see possible options"
            ))
        })?;

        let value = match current {
            Value::Object(_) | Value::Array(_) => serde_json::from_str(raw).map_err(|e| {
                AvailError::InvalidConfig(format!("bad JSON for option {name}: {e}"))
            })?,
            Value::Bool(_) => Value::Bool(parse_bool(name, raw)?),
            Value::Number(_) => raw.trim().parse::<i64>().map(Value::from).map_err(|e| {
                AvailError::InvalidConfig(format!(
                    "bad type for option {name}, should be an integer but is '{raw}': {e}"
                ))
            })?,
            Value::String(_) | Value::Null => Value::String(raw.to_string()),
        };
        fields.insert(name.to_string(), value);

        *self = serde_json::from_value(doc)
            .map_err(|e| AvailError::InvalidConfig(format!("bad value for option {name}: {e}")))?;
        Ok(())
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(n != 0);
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AvailError::InvalidConfig(format!(
            "bad type for option {name}, should be like a boolean, but is '{raw}'"
        ))),
    }
}

/// Every option name with its default value, in declaration order.
pub fn option_defaults() -> Vec<(String, String)> {
    let doc = match serde_json::to_value(AvailabilityConfig::default()) {
        Ok(Value::Object(map)) => map,
        _ => return Vec::new(),
    };
    doc.into_iter()
        .map(|(name, value)| {
            let shown = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (name, shown)
        })
        .collect()
}
