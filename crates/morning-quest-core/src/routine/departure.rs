//! Departure time-of-day and the countdown to it.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Minutes at or below which the departure countdown is urgent.
pub const URGENT_MINUTES: u64 = 5;

/// Configured departure time-of-day. Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepartureTime {
    hour: u8,
    minute: u8,
}

impl DepartureTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidDepartureTime(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Parse `H:MM` or `HH:MM`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDepartureTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour = h.parse::<u8>().map_err(|_| invalid())?;
        let minute = m.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    fn as_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl Default for DepartureTime {
    fn default() -> Self {
        Self { hour: 8, minute: 0 }
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for DepartureTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DepartureTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DepartureTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Whole minutes from `now` until `departure` on the same calendar day.
///
/// Floors partial minutes and clamps to zero once departure has passed;
/// never rolls over to the next day.
pub fn minutes_until_departure(now: NaiveDateTime, departure: DepartureTime) -> u64 {
    let target = now.date().and_time(departure.as_time());
    let diff_secs = (target - now).num_seconds();
    if diff_secs <= 0 {
        return 0;
    }
    (diff_secs / 60) as u64
}
