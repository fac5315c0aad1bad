//! Schedule parsing errors.

use thiserror::Error;

/// Errors raised by the strict day and time parsing paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A single day token could not be resolved to a weekday.
    #[error("unknown day name: {0:?}")]
    InvalidDay(String),

    /// One end of a day range could not be resolved.
    #[error("could not parse day range: {start}-{end}")]
    InvalidDayRange {
        /// Start token as given.
        start: String,
        /// End token as given.
        end: String,
    },

    /// A day-range expression did not match any known form.
    #[error("could not parse day expression: {0:?}")]
    InvalidDayExpression(String),

    /// A time value was not in `H:MM`/`HH:MM` form or was out of range.
    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),

    /// A time-range expression could not be split into a start and an end.
    #[error("invalid time range: {0:?}")]
    InvalidTimeRange(String),
}

/// Result type for schedule parsing.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised while reading boundary coordinates.
#[derive(Debug, Error)]
pub enum CoordinateError {
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),

    #[error("invalid coordinate value: {0:?}")]
    InvalidNumber(String),

    #[error("malformed coordinate pair: {0:?}")]
    MalformedPair(String),
}
