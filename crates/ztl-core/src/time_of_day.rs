//! Wall-clock time within a single day.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ScheduleError};

/// Time of day represented as hour and minute.
///
/// Ordered by (hour, minute). Persisted as a zero-padded `HH:MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// 00:00.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// 23:59, the inclusive end of an all-day window.
    pub const END_OF_DAY: TimeOfDay = TimeOfDay {
        hour: 23,
        minute: 59,
    };

    /// Creates a new TimeOfDay, rejecting hour >= 24 or minute >= 60.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(ScheduleError::InvalidTime(format!("{hour}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// Hour (0-23).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute (0-59).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    pub fn to_minutes(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Creates from a chrono NaiveTime, dropping seconds.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self::from_timelike(&time)
    }

    /// Wall-clock part of any chrono time value, dropping seconds.
    pub fn from_timelike<T: Timelike>(time: &T) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Strict `H:MM` / `HH:MM` parse used by direct construction and by
    /// deserialization. Nothing is normalized: no dots, no padding, no
    /// surrounding text.
    pub fn parse_strict(text: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidTime(text.to_string());

        let (hours, minutes) = text.split_once(':').ok_or_else(invalid)?;
        let hours_ok = (1..=2).contains(&hours.len()) && hours.bytes().all(|b| b.is_ascii_digit());
        let minutes_ok = minutes.len() == 2 && minutes.bytes().all(|b| b.is_ascii_digit());
        if !hours_ok || !minutes_ok {
            return Err(invalid());
        }

        let hour: u8 = hours.parse().map_err(|_| invalid())?;
        let minute: u8 = minutes.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_strict(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse_strict(&raw).map_err(serde::de::Error::custom)
    }
}
