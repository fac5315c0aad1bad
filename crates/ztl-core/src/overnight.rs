//! Activity of windows that cross midnight.
//!
//! A restriction tagged "Thursday, Friday, Saturday 23:00-03:00" starts on
//! each listed day and spills into the following morning. At a given instant
//! the window is therefore active if either:
//!
//! - today is listed and the clock is at or past the start (the evening part), or
//! - yesterday is listed and the clock is at or before the end (the morning tail).
//!
//! The second case is why Sunday 02:00 is restricted by a Saturday-night rule
//! even though Sunday itself is not listed.

use std::collections::BTreeSet;

use crate::time_of_day::TimeOfDay;
use crate::time_window::TimeWindow;
use crate::weekday::Weekday;

/// Evaluates an overnight window (`window.is_overnight()`) for `day` at `time`.
pub fn is_active_across_midnight(
    days: &BTreeSet<Weekday>,
    window: &TimeWindow,
    day: Weekday,
    time: TimeOfDay,
) -> bool {
    debug_assert!(window.is_overnight());

    let evening = days.contains(&day) && time >= window.start;
    let morning_tail = days.contains(&day.pred()) && time <= window.end;
    evening || morning_tail
}
