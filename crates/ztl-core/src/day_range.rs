//! Day-range expansion.
//!
//! Turns day expressions as they appear on municipal pages ("Monday-Friday",
//! "Every day", "dal lunedì al venerdì", "sabato e domenica", "Sat") into an
//! explicit list of [`Weekday`]s. Ranges follow the Monday-first cycle and
//! wrap around the end of the week, so "Friday-Monday" covers four days.
//!
//! Callers pick how unresolvable input is handled through [`DayRangePolicy`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ScheduleError};
use crate::weekday::Weekday;

/// Phrases meaning "every day of the week".
const EVERY_DAY_KEYWORDS: &[&str] = &[
    "every day",
    "everyday",
    "all days",
    "daily",
    "tutti i giorni",
    "ogni giorno",
];

/// Phrases meaning the Monday-Friday work week.
const WORK_WEEK_KEYWORDS: &[&str] = &["weekdays", "working days", "feriali", "giorni feriali"];

/// Phrases meaning Saturday and Sunday.
const WEEKEND_KEYWORDS: &[&str] = &["weekend", "weekends", "fine settimana"];

static ITALIAN_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:dal|da)\s+(\w+)\s+(?:al|a)\s+(\w+)$").expect("invalid regex pattern")
});

static HYPHEN_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\.?\s*[-–]\s*(\w+)$").expect("invalid regex pattern"));

static DAY_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)\s*(?:\s(?:e|and)\s|&)\s*(\w+)$").expect("invalid regex pattern")
});

static SINGLE_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)$").expect("invalid regex pattern"));

/// What to do when a day expression cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayRangePolicy {
    /// Return an error.
    #[default]
    Strict,
    /// Log a warning and use Monday-Friday instead.
    FallbackToWeekdays,
}

/// Expands an inclusive range between two day tokens.
///
/// Tokens go through [`Weekday::parse`], so abbreviations and Italian names
/// are accepted. Fails with [`ScheduleError::InvalidDayRange`] if either end
/// cannot be resolved.
pub fn expand_day_range(start: &str, end: &str) -> Result<Vec<Weekday>> {
    match (Weekday::parse(start), Weekday::parse(end)) {
        (Ok(start_day), Ok(end_day)) => Ok(expand_weekdays(start_day, end_day)),
        _ => Err(ScheduleError::InvalidDayRange {
            start: start.trim().to_string(),
            end: end.trim().to_string(),
        }),
    }
}

/// Inclusive, wrapping range between two resolved days.
pub fn expand_weekdays(start: Weekday, end: Weekday) -> Vec<Weekday> {
    let span = (end.index() + 7 - start.index()) % 7;
    (0..=span)
        .map(|offset| Weekday::from_index(start.index() + offset))
        .collect()
}

/// Parses a complete day expression under the given policy.
pub fn parse_day_range(expression: &str, policy: DayRangePolicy) -> Result<Vec<Weekday>> {
    match parse_day_expression(expression) {
        Ok(days) => Ok(days),
        Err(err) => match policy {
            DayRangePolicy::Strict => Err(err),
            DayRangePolicy::FallbackToWeekdays => {
                warn!(
                    expression = expression,
                    error = %err,
                    "Unrecognized day expression, falling back to Monday-Friday"
                );
                Ok(Weekday::weekdays())
            }
        },
    }
}

fn parse_day_expression(expression: &str) -> Result<Vec<Weekday>> {
    let normalized = expression
        .trim()
        .trim_end_matches(['.', ',', ':', ';'])
        .trim()
        .to_lowercase();

    if EVERY_DAY_KEYWORDS.contains(&normalized.as_str()) {
        return Ok(Weekday::ALL.to_vec());
    }
    if WORK_WEEK_KEYWORDS.contains(&normalized.as_str()) {
        return Ok(Weekday::weekdays());
    }
    if WEEKEND_KEYWORDS.contains(&normalized.as_str()) {
        return Ok(Weekday::weekend());
    }

    if let Some(caps) = ITALIAN_RANGE
        .captures(&normalized)
        .or_else(|| HYPHEN_RANGE.captures(&normalized))
    {
        return expand_day_range(&caps[1], &caps[2]);
    }

    if let Some(caps) = DAY_PAIR.captures(&normalized) {
        let first = Weekday::parse(&caps[1])?;
        let second = Weekday::parse(&caps[2])?;
        let mut days = vec![first];
        if second != first {
            days.push(second);
        }
        return Ok(days);
    }

    if let Some(caps) = SINGLE_DAY.captures(&normalized) {
        return Ok(vec![Weekday::parse(&caps[1])?]);
    }

    Err(ScheduleError::InvalidDayExpression(expression.to_string()))
}
