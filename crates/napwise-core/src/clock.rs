//! Wall-clock time of day.
//!
//! Times are stored as `HH:MM` strings and carried in memory as minutes since
//! midnight. All arithmetic happens on the integer form. A day never wraps:
//! results that would cross midnight are clamped to `00:00..=23:59`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const LAST_MINUTE: u16 = 23 * 60 + 59;

/// A time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// 00:00
    pub const MIDNIGHT: ClockTime = ClockTime(0);
    /// 23:59, the latest representable time.
    pub const END_OF_DAY: ClockTime = ClockTime(LAST_MINUTE);

    /// Build from minutes since midnight, clamping to the last minute of the day.
    pub const fn from_minutes(minutes: u16) -> Self {
        if minutes > LAST_MINUTE {
            ClockTime(LAST_MINUTE)
        } else {
            ClockTime(minutes)
        }
    }

    /// Build from an hour and minute, `None` when either is out of range.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| ClockTime(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Add (or subtract, when negative) minutes. Clamped to the same day.
    pub fn add_minutes(self, delta: i32) -> Self {
        let total = i32::from(self.0)
            .saturating_add(delta)
            .clamp(0, i32::from(LAST_MINUTE));
        ClockTime(total as u16)
    }

    /// Signed minutes from `self` to `later`.
    pub fn minutes_until(self, later: ClockTime) -> i32 {
        i32::from(later.0) - i32::from(self.0)
    }

    /// Render as a 12-hour display string, e.g. `7:05 PM`.
    pub fn display_12h(self) -> String {
        let (h, m) = (self.hour(), self.minute());
        let suffix = if h < 12 { "AM" } else { "PM" };
        let h12 = match h % 12 {
            0 => 12,
            other => other,
        };
        format!("{h12}:{m:02} {suffix}")
    }

    /// Combine with a calendar date.
    pub fn on_date(self, date: NaiveDate) -> NaiveDateTime {
        let time = NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or(NaiveTime::MIN);
        date.and_time(time)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        ClockTime::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde helper for optional times in stored records.
///
/// A malformed or empty stored value reads back as `None` instead of failing
/// the whole record.
pub mod lenient {
    use super::ClockTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ClockTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()))
    }
}
