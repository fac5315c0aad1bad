//! Time windows and the free-text time-range parser.
//!
//! Municipal pages describe hours in many shapes: `7:30-19:30`, `07.30 - 19.30`,
//! `7,30-20`, `dalle ore 7.00 alle 20.00`, `24 hours`, `24 ore su 24`. All of
//! them end up as a [`TimeWindow`] with inclusive bounds.
//!
//! Two entry points exist. [`parse_time_window`] is strict and returns an
//! error the caller must handle; [`try_parse_time_window`] is what importers
//! use, and simply yields `None` so the offending entry can be skipped.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::time_of_day::TimeOfDay;

const ALL_DAY_PATTERN: &str = r"(?:\bh\s?24\b|\b24\s*(?:ore(?:\s+su\s+24)?|hours?|h)\b|\b24\s*/\s*(?:24|7)\b)";

const ITALIAN_PATTERN: &str = r"\bdalle\s+(?:ore\s+)?(\d{1,2})(?:\s*[.:,]\s*(\d{2}))?\s+alle\s+(?:ore\s+)?(\d{1,2})(?:\s*[.:,]\s*(\d{2}))?\b";

const DELIMITED_PATTERN: &str =
    r"\b(\d{1,2})(?:\s*[.:,]\s*(\d{2}))?\s*[-–]\s*(\d{1,2})(?:\s*[.:,]\s*(\d{2}))?\b";

static ALL_DAY_SEARCH: Lazy<Regex> = Lazy::new(|| compile(ALL_DAY_PATTERN, false));
static ITALIAN_SEARCH: Lazy<Regex> = Lazy::new(|| compile(ITALIAN_PATTERN, false));
static DELIMITED_SEARCH: Lazy<Regex> = Lazy::new(|| compile(DELIMITED_PATTERN, false));

static ALL_DAY_EXACT: Lazy<Regex> = Lazy::new(|| compile(ALL_DAY_PATTERN, true));
static ITALIAN_EXACT: Lazy<Regex> = Lazy::new(|| compile(ITALIAN_PATTERN, true));
static DELIMITED_EXACT: Lazy<Regex> = Lazy::new(|| compile(DELIMITED_PATTERN, true));

fn compile(pattern: &str, anchored: bool) -> Regex {
    let source = if anchored {
        format!("(?i)^(?:{pattern})$")
    } else {
        format!("(?i){pattern}")
    };
    Regex::new(&source).expect("invalid regex pattern")
}

/// A window of wall-clock time with inclusive bounds.
///
/// When `end < start` the window crosses midnight (e.g. 23:00-03:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start time (inclusive).
    pub start: TimeOfDay,
    /// End time (inclusive).
    pub end: TimeOfDay,
}

impl TimeWindow {
    /// 00:00-23:59.
    pub const ALL_DAY: TimeWindow = TimeWindow {
        start: TimeOfDay::MIDNIGHT,
        end: TimeOfDay::END_OF_DAY,
    };

    /// Creates a new time window.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Returns true if this window crosses midnight.
    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Checks if a given time falls within this window, ignoring days.
    ///
    /// Both bounds are inclusive. For overnight windows this is true for
    /// either side of midnight; pairing each side with the right day is the
    /// job of [`crate::overnight`].
    pub fn contains(&self, time: TimeOfDay) -> bool {
        if self.is_overnight() {
            time >= self.start || time <= self.end
        } else {
            self.start <= time && time <= self.end
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Strictly parses a complete time-range expression.
pub fn parse_time_window(text: &str) -> Result<TimeWindow> {
    let normalized = normalize(text);

    if ALL_DAY_EXACT.is_match(&normalized) {
        return Ok(TimeWindow::ALL_DAY);
    }
    if let Some(caps) = ITALIAN_EXACT.captures(&normalized) {
        return window_from_captures(&caps, text);
    }
    if let Some(caps) = DELIMITED_EXACT.captures(&normalized) {
        return window_from_captures(&caps, text);
    }

    Err(ScheduleError::InvalidTimeRange(text.to_string()))
}

/// Lenient variant of [`parse_time_window`]: malformed input yields `None`.
pub fn try_parse_time_window(text: &str) -> Option<TimeWindow> {
    match parse_time_window(text) {
        Ok(window) => Some(window),
        Err(err) => {
            debug!(text = text, error = %err, "Skipping unparseable time range");
            None
        }
    }
}

/// Finds the earliest time window embedded in a longer text.
///
/// Returns the byte range of the match within `text` along with the parsed
/// window. Matches whose clock values are out of range are skipped. When two
/// forms start at the same offset, all-day phrases win over clock windows.
pub fn find_time_window(text: &str) -> Option<(Range<usize>, TimeWindow)> {
    let all_day = ALL_DAY_SEARCH
        .find(text)
        .map(|found| (found.range(), TimeWindow::ALL_DAY));

    let clock = [&*ITALIAN_SEARCH, &*DELIMITED_SEARCH]
        .into_iter()
        .filter_map(|regex| {
            regex.captures_iter(text).find_map(|caps| {
                let whole = caps.get(0)?.range();
                window_from_captures(&caps, text).ok().map(|window| (whole, window))
            })
        });

    all_day
        .into_iter()
        .chain(clock)
        .min_by_key(|(range, _)| range.start)
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', ',', ';', ':'])
        .trim()
        .to_string()
}

fn window_from_captures(caps: &Captures<'_>, original: &str) -> Result<TimeWindow> {
    let start = clock_value(caps, 1, 2, original, false)?;
    let end = clock_value(caps, 3, 4, original, true)?;
    Ok(TimeWindow::new(start, end))
}

/// Builds a time from hour/minute capture groups. A missing minute group
/// means `:00`; `24:00` is only accepted as an end and becomes 23:59.
fn clock_value(
    caps: &Captures<'_>,
    hour_group: usize,
    minute_group: usize,
    original: &str,
    is_end: bool,
) -> Result<TimeOfDay> {
    let invalid = || ScheduleError::InvalidTime(original.to_string());

    let hour: u8 = caps
        .get(hour_group)
        .ok_or_else(invalid)?
        .as_str()
        .parse()
        .map_err(|_| invalid())?;
    let minute: u8 = match caps.get(minute_group) {
        Some(m) => m.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };

    if is_end && hour == 24 && minute == 0 {
        return Ok(TimeOfDay::END_OF_DAY);
    }
    TimeOfDay::new(hour, minute).map_err(|_| invalid())
}
