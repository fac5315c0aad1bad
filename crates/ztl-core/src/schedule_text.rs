//! Extraction of day/time pairs from free-text schedule descriptions.
//!
//! Operating hours are published as prose: "Monday-Friday 07:00-19:00,
//! Saturday-Sunday 10:00-14:00" or "dal lunedì al venerdì dalle ore 7,30
//! alle ore 20 e il sabato dalle ore 7,30 alle ore 16". The text is split
//! into segments and every time window found is paired with the day
//! expression written just before it.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::day_range::{parse_day_range, DayRangePolicy};
use crate::restriction::Restriction;
use crate::time_window::{find_time_window, TimeWindow};
use crate::weekday::Weekday;

static LEADING_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:orari|orario|operating hours|hours)\s*:\s*")
        .expect("invalid regex pattern")
});

static LEADING_CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:e|ed|and|il|la|the)\s+)+").expect("invalid regex pattern")
});

/// One day/time pair found in a schedule description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Days the window applies to, `None` when the text names no days.
    pub days: Option<Vec<Weekday>>,
    pub window: TimeWindow,
}

/// Extracts every day/time pair from a schedule description.
///
/// Unparseable parts are dropped and logged at debug level. A segment
/// holding only a day expression ("tutti i giorni, 24 ore su 24") lends
/// its days to the following segment.
pub fn extract_schedule(text: &str, policy: DayRangePolicy) -> Vec<ScheduleEntry> {
    let body = LEADING_LABEL.replace(text, "");
    let mut entries = Vec::new();
    let mut pending_days: Option<&str> = None;

    for segment in split_segments(&body) {
        let mut rest = segment;
        let mut found_window = false;

        while let Some((range, window)) = find_time_window(rest) {
            let mut day_text = clean_day_text(&rest[..range.start]);
            if day_text.is_empty() {
                day_text = pending_days.take().unwrap_or_default();
            }
            found_window = true;
            rest = &rest[range.end..];

            if day_text.is_empty() {
                entries.push(ScheduleEntry { days: None, window });
                continue;
            }
            match parse_day_range(day_text, policy) {
                Ok(days) => entries.push(ScheduleEntry {
                    days: Some(days),
                    window,
                }),
                Err(err) => {
                    debug!(days = day_text, window = %window, error = %err, "Dropping schedule entry");
                }
            }
        }

        if !found_window {
            let day_text = clean_day_text(segment);
            if !day_text.is_empty() {
                pending_days = Some(day_text);
            }
        }
    }

    if let Some(day_text) = pending_days {
        debug!(days = day_text, "Dropping day expression without a time window");
    }

    entries
}

/// Builds restrictions from a schedule description, applying `default_days`
/// to entries that name no days.
pub fn restrictions_from_schedule(
    text: &str,
    policy: DayRangePolicy,
    default_days: &[Weekday],
) -> Vec<Restriction> {
    extract_schedule(text, policy)
        .into_iter()
        .filter_map(|entry| {
            let days = entry.days.unwrap_or_else(|| default_days.to_vec());
            if days.is_empty() {
                debug!(window = %entry.window, "Dropping schedule entry without days");
                return None;
            }
            Some(Restriction::new(days, entry.window))
        })
        .collect()
}

/// Splits on `;` and on `,` unless the comma sits between two digits
/// (a decimal separator as in "7,30").
fn split_segments(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        let split = match ch {
            ';' => true,
            ',' => {
                let before = index.checked_sub(1).map(|i| bytes[i]);
                let after = bytes.get(index + 1).copied();
                !matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
            }
            _ => false,
        };
        if split {
            segments.push(&text[start..index]);
            start = index + 1;
        }
    }
    segments.push(&text[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn clean_day_text(text: &str) -> &str {
    let trimmed = text
        .trim()
        .trim_matches([',', ';', ':', '.', '-', '–'])
        .trim();
    match LEADING_CONNECTOR.find(trimmed) {
        Some(found) => trimmed[found.end()..].trim(),
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_of_day::TimeOfDay;
    use Weekday::*;

    fn window(sh: u8, sm: u8, eh: u8, em: u8) -> TimeWindow {
        TimeWindow::new(
            TimeOfDay::new(sh, sm).unwrap(),
            TimeOfDay::new(eh, em).unwrap(),
        )
    }

    // ==================== Segment Tests ====================

    #[test]
    fn splits_on_separators_but_not_decimal_commas() {
        assert_eq!(
            split_segments("Mon-Fri 7,30-20, Sat 8-12; Sun 9-11"),
            vec!["Mon-Fri 7,30-20", "Sat 8-12", "Sun 9-11"]
        );
        assert_eq!(split_segments(" , ;"), Vec::<&str>::new());
    }

    #[test]
    fn cleans_connectors_and_punctuation() {
        assert_eq!(clean_day_text(" e il sabato "), "sabato");
        assert_eq!(clean_day_text("Monday-Friday: "), "Monday-Friday");
        assert_eq!(clean_day_text(", and Sunday"), "Sunday");
        assert_eq!(clean_day_text("   "), "");
    }

    // ==================== Extraction Tests ====================

    #[test]
    fn english_two_segment_schedule() {
        let entries = extract_schedule(
            "Monday-Friday 07:00-19:00, Saturday-Sunday 10:00-14:00",
            DayRangePolicy::Strict,
        );

        assert_eq!(
            entries,
            vec![
                ScheduleEntry {
                    days: Some(Weekday::weekdays()),
                    window: window(7, 0, 19, 0),
                },
                ScheduleEntry {
                    days: Some(vec![Saturday, Sunday]),
                    window: window(10, 0, 14, 0),
                },
            ]
        );
    }

    #[test]
    fn italian_sentence_with_two_windows() {
        let entries = extract_schedule(
            "dal lunedì al venerdì dalle ore 7,30 alle ore 20 e il sabato dalle ore 7,30 alle ore 16",
            DayRangePolicy::Strict,
        );

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].days, Some(Weekday::weekdays()));
        assert_eq!(entries[0].window, window(7, 30, 20, 0));
        assert_eq!(entries[1].days, Some(vec![Saturday]));
        assert_eq!(entries[1].window, window(7, 30, 16, 0));
    }

    #[test]
    fn label_without_days_yields_none() {
        let entries = extract_schedule("Orari: 7:30-19:30", DayRangePolicy::Strict);
        assert_eq!(
            entries,
            vec![ScheduleEntry {
                days: None,
                window: window(7, 30, 19, 30),
            }]
        );
    }

    #[test]
    fn day_only_segment_carries_to_next_window() {
        let entries = extract_schedule("tutti i giorni, 24 ore su 24", DayRangePolicy::Strict);
        assert_eq!(
            entries,
            vec![ScheduleEntry {
                days: Some(Weekday::ALL.to_vec()),
                window: TimeWindow::ALL_DAY,
            }]
        );
    }

    #[test]
    fn overnight_window_is_kept() {
        let entries = extract_schedule("Every day 21:00-07:30", DayRangePolicy::Strict);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].window.is_overnight());
    }

    #[test]
    fn mixed_window_forms_in_one_segment() {
        let text = "dal lunedì al venerdì 7.30-19.30 e il sabato dalle 10 alle 18";
        let expected = vec![
            ScheduleEntry {
                days: Some(Weekday::weekdays()),
                window: window(7, 30, 19, 30),
            },
            ScheduleEntry {
                days: Some(vec![Saturday]),
                window: window(10, 0, 18, 0),
            },
        ];

        assert_eq!(extract_schedule(text, DayRangePolicy::Strict), expected);
        assert_eq!(
            extract_schedule(text, DayRangePolicy::FallbackToWeekdays),
            expected
        );
    }

    #[test]
    fn all_day_phrase_after_a_clock_window() {
        let text = "Monday-Friday 7:30-19:30 and Sunday 24h";
        let entries = extract_schedule(text, DayRangePolicy::FallbackToWeekdays);

        assert_eq!(
            entries,
            vec![
                ScheduleEntry {
                    days: Some(Weekday::weekdays()),
                    window: window(7, 30, 19, 30),
                },
                ScheduleEntry {
                    days: Some(vec![Sunday]),
                    window: TimeWindow::ALL_DAY,
                },
            ]
        );

        let restrictions =
            restrictions_from_schedule(text, DayRangePolicy::FallbackToWeekdays, &[]);
        let active = |day: Weekday, hour: u8| {
            let time = TimeOfDay::new(hour, 0).unwrap();
            restrictions.iter().any(|r| r.is_active_on(day, time))
        };
        assert!(active(Tuesday, 8));
        assert!(!active(Tuesday, 20));
        assert!(active(Sunday, 3));
        assert!(!active(Saturday, 12));
    }

    #[test]
    fn unresolvable_days_follow_policy() {
        let text = "Funday 08:00-10:00, Sunday 09:00-11:00";

        let strict = extract_schedule(text, DayRangePolicy::Strict);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].days, Some(vec![Sunday]));

        let lenient = extract_schedule(text, DayRangePolicy::FallbackToWeekdays);
        assert_eq!(lenient.len(), 2);
        assert_eq!(lenient[0].days, Some(Weekday::weekdays()));
    }

    #[test]
    fn text_without_windows_is_empty() {
        assert!(extract_schedule("chiuso per lavori", DayRangePolicy::Strict).is_empty());
        assert!(extract_schedule("", DayRangePolicy::FallbackToWeekdays).is_empty());
    }

    // ==================== Restriction Building Tests ====================

    #[test]
    fn restrictions_use_default_days() {
        let restrictions = restrictions_from_schedule(
            "7:30-19:30; Saturday 10:00-18:00",
            DayRangePolicy::Strict,
            &Weekday::weekdays(),
        );

        assert_eq!(restrictions.len(), 2);
        assert_eq!(restrictions[0].active_days().len(), 5);
        assert!(restrictions[0].is_active_on(Tuesday, TimeOfDay::new(8, 0).unwrap()));
        assert!(restrictions[1].is_active_on(Saturday, TimeOfDay::new(18, 0).unwrap()));
    }

    #[test]
    fn restrictions_without_any_days_are_dropped() {
        let restrictions = restrictions_from_schedule("7:30-19:30", DayRangePolicy::Strict, &[]);
        assert!(restrictions.is_empty());
    }
}
