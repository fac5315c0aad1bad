//! Canonical days of the week.
//!
//! Every piece of day arithmetic in the crate (range expansion, wraparound,
//! previous-day lookup for overnight windows) goes through [`Weekday`] and its
//! index, so the Monday-first ordering lives in exactly one place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, ScheduleError};

/// Days of the week, ordered Monday (0) through Sunday (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Italian day names without the final accent, indexed like [`Weekday::ALL`].
const ITALIAN_NAMES: [&str; 7] = [
    "lunedi",
    "martedi",
    "mercoledi",
    "giovedi",
    "venerdi",
    "sabato",
    "domenica",
];

impl Weekday {
    /// All days in canonical order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Returns the work week (Monday through Friday).
    pub fn weekdays() -> Vec<Weekday> {
        Self::ALL[..5].to_vec()
    }

    /// Returns weekend days (Saturday and Sunday).
    pub fn weekend() -> Vec<Weekday> {
        Self::ALL[5..].to_vec()
    }

    /// Position in the week, Monday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day at the given position, taken modulo 7.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 7]
    }

    /// The following day (Sunday wraps to Monday).
    pub fn succ(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The preceding day (Monday wraps to Sunday).
    pub fn pred(self) -> Self {
        Self::from_index(self.index() + 6)
    }

    /// Canonical English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Resolves a day token.
    ///
    /// Matching is case-insensitive and accepts the full English name, any
    /// prefix of it ("Mon", "thu"), and Italian names with or without the
    /// final accent ("lunedì", "venerdi", "sab"). A prefix shared by two
    /// different days ("T", "S") is rejected rather than guessed.
    pub fn parse(token: &str) -> Result<Self> {
        let normalized = normalize_token(token);
        if normalized.is_empty() {
            return Err(ScheduleError::InvalidDay(token.to_string()));
        }

        let mut found: Option<Weekday> = None;
        for day in Self::ALL {
            let english = day.name().to_ascii_lowercase();
            let italian = ITALIAN_NAMES[day.index()];
            if english.starts_with(&normalized) || italian.starts_with(&normalized) {
                match found {
                    Some(other) if other != day => {
                        return Err(ScheduleError::InvalidDay(token.to_string()));
                    }
                    _ => found = Some(day),
                }
            }
        }

        found.ok_or_else(|| ScheduleError::InvalidDay(token.to_string()))
    }
}

fn normalize_token(token: &str) -> String {
    token
        .trim()
        .trim_end_matches(['.', ',', ':', ';'])
        .to_lowercase()
        .replace(['ì', 'í'], "i")
}

impl From<chrono::Weekday> for Weekday {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Weekday::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Ordering Tests ====================

    #[test]
    fn canonical_order_starts_monday() {
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Sunday.index(), 6);
        assert!(Weekday::Monday < Weekday::Sunday);
        assert_eq!(Weekday::from_index(7), Weekday::Monday);
    }

    #[test]
    fn groups() {
        assert_eq!(Weekday::weekdays().len(), 5);
        assert_eq!(
            Weekday::weekend(),
            vec![Weekday::Saturday, Weekday::Sunday]
        );
        assert!(!Weekday::weekdays().contains(&Weekday::Saturday));
    }

    #[test]
    fn succ_and_pred_wrap() {
        assert_eq!(Weekday::Sunday.succ(), Weekday::Monday);
        assert_eq!(Weekday::Monday.pred(), Weekday::Sunday);
        assert_eq!(Weekday::Sunday.pred(), Weekday::Saturday);
        assert_eq!(Weekday::Friday.pred(), Weekday::Thursday);
    }

    #[test]
    fn from_chrono() {
        assert_eq!(Weekday::from(chrono::Weekday::Thu), Weekday::Thursday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }

    // ==================== Parsing Tests ====================

    #[test]
    fn parse_full_names_any_case() {
        assert_eq!(Weekday::parse("Monday").unwrap(), Weekday::Monday);
        assert_eq!(Weekday::parse("friday").unwrap(), Weekday::Friday);
        assert_eq!(Weekday::parse("  SUNDAY ").unwrap(), Weekday::Sunday);
    }

    #[test]
    fn parse_abbreviations() {
        assert_eq!(Weekday::parse("Mon").unwrap(), Weekday::Monday);
        assert_eq!(Weekday::parse("thu").unwrap(), Weekday::Thursday);
        assert_eq!(Weekday::parse("Sat.").unwrap(), Weekday::Saturday);
    }

    #[test]
    fn parse_italian_names() {
        assert_eq!(Weekday::parse("lunedì").unwrap(), Weekday::Monday);
        assert_eq!(Weekday::parse("Venerdi").unwrap(), Weekday::Friday);
        assert_eq!(Weekday::parse("sabato").unwrap(), Weekday::Saturday);
        assert_eq!(Weekday::parse("Domenica").unwrap(), Weekday::Sunday);
        assert_eq!(Weekday::parse("mer").unwrap(), Weekday::Wednesday);
    }

    #[test]
    fn parse_rejects_ambiguous_and_unknown() {
        assert!(matches!(
            Weekday::parse("T"),
            Err(ScheduleError::InvalidDay(_))
        ));
        assert!(Weekday::parse("s").is_err());
        assert!(Weekday::parse("").is_err());
        assert!(Weekday::parse("Funday").is_err());
        assert!(Weekday::parse("Mondays").is_err());
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn serializes_as_canonical_name() {
        let json = serde_json::to_string(&Weekday::Wednesday).unwrap();
        assert_eq!(json, "\"Wednesday\"");

        let day: Weekday = serde_json::from_str("\"wednesday\"").unwrap();
        assert_eq!(day, Weekday::Wednesday);
    }

    #[test]
    fn deserialize_rejects_unknown_day() {
        let result: std::result::Result<Weekday, _> = serde_json::from_str("\"Holiday\"");
        assert!(result.is_err());
    }
}
