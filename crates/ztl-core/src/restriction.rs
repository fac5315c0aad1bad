//! Time-based vehicle restrictions.
//!
//! A [`Restriction`] is a single (days, time window) rule attached to a zone.
//! It is built once, from parsed text or directly from values, and never
//! changes afterwards.

use std::collections::BTreeSet;

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::day_range::{parse_day_range, DayRangePolicy};
use crate::error::Result;
use crate::overnight::is_active_across_midnight;
use crate::time_of_day::TimeOfDay;
use crate::time_window::{parse_time_window, TimeWindow};
use crate::weekday::Weekday;

/// A single restriction window.
///
/// Serialized as `{days, start_time, end_time, vehicle_types}` with times
/// as zero-padded `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    #[serde(rename = "days")]
    active_days: BTreeSet<Weekday>,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    #[serde(default)]
    vehicle_types: Vec<String>,
}

impl Restriction {
    /// Creates a restriction covering `days` during `window`.
    pub fn new(days: impl IntoIterator<Item = Weekday>, window: TimeWindow) -> Self {
        Self {
            active_days: days.into_iter().collect(),
            start_time: window.start,
            end_time: window.end,
            vehicle_types: Vec::new(),
        }
    }

    /// Limits the restriction to the given vehicle categories.
    pub fn with_vehicle_types<I, S>(mut self, vehicle_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vehicle_types = vehicle_types.into_iter().map(Into::into).collect();
        self
    }

    /// Direct construction from day names and `HH:MM` strings.
    ///
    /// Fails fast on the first unknown day or malformed time; no partial
    /// restriction is produced.
    pub fn from_strings(days: &[&str], start_time: &str, end_time: &str) -> Result<Self> {
        let active_days = days
            .iter()
            .map(|day| Weekday::parse(day))
            .collect::<Result<BTreeSet<_>>>()?;
        let start_time = TimeOfDay::parse_strict(start_time)?;
        let end_time = TimeOfDay::parse_strict(end_time)?;

        Ok(Self {
            active_days,
            start_time,
            end_time,
            vehicle_types: Vec::new(),
        })
    }

    /// Builds a restriction from a day expression and a time-range expression.
    pub fn from_text(day_range: &str, time_range: &str, policy: DayRangePolicy) -> Result<Self> {
        let days = parse_day_range(day_range, policy)?;
        let window = parse_time_window(time_range)?;
        Ok(Self::new(days, window))
    }

    /// Lenient variant of [`Restriction::from_text`] used by importers:
    /// malformed input yields `None` and the entry is skipped.
    pub fn try_from_text(day_range: &str, time_range: &str, policy: DayRangePolicy) -> Option<Self> {
        match Self::from_text(day_range, time_range, policy) {
            Ok(restriction) => Some(restriction),
            Err(err) => {
                debug!(
                    day_range = day_range,
                    time_range = time_range,
                    error = %err,
                    "Dropping unparseable restriction entry"
                );
                None
            }
        }
    }

    /// Days on which the window starts, in canonical order.
    pub fn active_days(&self) -> &BTreeSet<Weekday> {
        &self.active_days
    }

    pub fn start_time(&self) -> TimeOfDay {
        self.start_time
    }

    pub fn end_time(&self) -> TimeOfDay {
        self.end_time
    }

    /// The restriction's time window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    /// Vehicle categories this restriction names. Empty means all traffic.
    pub fn vehicle_types(&self) -> &[String] {
        &self.vehicle_types
    }

    /// Returns true if the window crosses midnight.
    pub fn is_overnight(&self) -> bool {
        self.window().is_overnight()
    }

    /// Returns true if this restriction concerns the given vehicle category.
    pub fn applies_to_vehicle(&self, vehicle_type: &str) -> bool {
        self.vehicle_types.is_empty()
            || self
                .vehicle_types
                .iter()
                .any(|kind| kind.eq_ignore_ascii_case(vehicle_type))
    }

    /// Checks if the restriction is active on the given day and time.
    pub fn is_active_on(&self, day: Weekday, time: TimeOfDay) -> bool {
        let window = self.window();
        if window.is_overnight() {
            is_active_across_midnight(&self.active_days, &window, day, time)
        } else {
            self.active_days.contains(&day) && window.contains(time)
        }
    }

    /// Checks if the restriction is active at the given instant.
    ///
    /// Seconds are ignored, so 19:30:45 counts as 19:30.
    pub fn is_active_at<T>(&self, instant: &T) -> bool
    where
        T: Datelike + Timelike,
    {
        let day = Weekday::from(instant.weekday());
        let time = TimeOfDay::from_timelike(instant);
        self.is_active_on(day, time)
    }
}
