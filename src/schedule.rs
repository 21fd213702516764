//! Static weekly class schedule and day-of-week lookup.
//!
//! The schedule is compiled-in data: seven ordered session lists, one per
//! day, never mutated at runtime. Lookup validates the day name against the
//! fixed enumeration before touching the table.

use std::fmt;

use crate::error::AppError;

/// Fixed set of classes the gym offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassName {
    Yoga,
    Cycling,
    Dance,
    Kickboxing,
}

impl ClassName {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassName::Yoga => "Yoga",
            ClassName::Cycling => "Cycling",
            ClassName::Dance => "Dance",
            ClassName::Kickboxing => "Kickboxing",
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of week, matching the platform's resolved day names exactly
/// (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    /// Case-sensitive parse against the fixed seven names.
    pub fn from_name(name: &str) -> Result<Day, AppError> {
        Day::ALL
            .into_iter()
            .find(|d| d.as_str() == name)
            .ok_or_else(|| AppError::InvalidDay(name.to_string()))
    }

    /// Today's day name in the server's local time zone.
    pub fn today() -> Day {
        use chrono::{Datelike, Local, Weekday};
        match Local::now().weekday() {
            Weekday::Sun => Day::Sunday,
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled class occurrence. Times are display labels, not parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassSession {
    pub name: ClassName,
    pub start_time: &'static str,
    pub end_time: &'static str,
}

const fn session(name: ClassName, start_time: &'static str, end_time: &'static str) -> ClassSession {
    ClassSession { name, start_time, end_time }
}

const MONDAY: &[ClassSession] = &[
    session(ClassName::Yoga, "6am", "7am"),
    session(ClassName::Cycling, "7am", "8am"),
    session(ClassName::Dance, "6pm", "7pm"),
    session(ClassName::Yoga, "7pm", "8pm"),
];

const TUESDAY: &[ClassSession] = &[
    session(ClassName::Kickboxing, "6am", "7am"),
    session(ClassName::Dance, "7am", "8am"),
    session(ClassName::Dance, "6pm", "7pm"),
    session(ClassName::Kickboxing, "7pm", "8pm"),
];

const WEDNESDAY: &[ClassSession] = &[
    session(ClassName::Yoga, "6am", "7am"),
    session(ClassName::Yoga, "7am", "8am"),
    session(ClassName::Dance, "6pm", "7pm"),
    session(ClassName::Yoga, "7pm", "8pm"),
];

const THURSDAY: &[ClassSession] = &[
    session(ClassName::Kickboxing, "6am", "7am"),
    session(ClassName::Cycling, "7am", "8am"),
    session(ClassName::Dance, "6pm", "7pm"),
    session(ClassName::Kickboxing, "7pm", "8pm"),
];

const FRIDAY: &[ClassSession] = &[
    session(ClassName::Yoga, "6am", "7am"),
    session(ClassName::Yoga, "7am", "8am"),
    session(ClassName::Dance, "6pm", "7pm"),
    session(ClassName::Yoga, "7pm", "8pm"),
];

const SATURDAY: &[ClassSession] = &[
    session(ClassName::Cycling, "6am", "7am"),
    session(ClassName::Yoga, "7am", "8am"),
    session(ClassName::Dance, "6pm", "7pm"),
    session(ClassName::Kickboxing, "7pm", "8pm"),
];

const SUNDAY: &[ClassSession] = &[
    session(ClassName::Cycling, "6am", "7am"),
    session(ClassName::Yoga, "7am", "8am"),
    session(ClassName::Dance, "6pm", "7pm"),
    session(ClassName::Kickboxing, "7pm", "8pm"),
];

/// Ordered sessions for a day.
pub fn sessions_for(day: Day) -> &'static [ClassSession] {
    match day {
        Day::Sunday => SUNDAY,
        Day::Monday => MONDAY,
        Day::Tuesday => TUESDAY,
        Day::Wednesday => WEDNESDAY,
        Day::Thursday => THURSDAY,
        Day::Friday => FRIDAY,
        Day::Saturday => SATURDAY,
    }
}

/// Distinct `"<name> at <start_time>"` labels for a day, first-occurrence
/// order preserved.
pub fn distinct_offerings(day: Day) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for s in sessions_for(day) {
        let label = format!("{} at {}", s.name, s.start_time);
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_day_has_distinct_offerings() {
        for day in Day::ALL {
            let offerings = distinct_offerings(day);
            assert!(!offerings.is_empty(), "{day} should offer classes");
            for (i, a) in offerings.iter().enumerate() {
                for b in &offerings[i + 1..] {
                    assert_ne!(a, b, "{day} offerings must be distinct");
                }
            }
            // Each label corresponds to a real table entry.
            for label in &offerings {
                assert!(
                    sessions_for(day)
                        .iter()
                        .any(|s| format!("{} at {}", s.name, s.start_time) == *label),
                    "{label} missing from {day} table"
                );
            }
        }
    }

    #[test]
    fn monday_exact_listing() {
        let offerings = distinct_offerings(Day::Monday);
        assert_eq!(
            offerings,
            vec![
                "Yoga at 6am",
                "Cycling at 7am",
                "Dance at 6pm",
                "Yoga at 7pm",
            ]
        );
    }

    #[test]
    fn tuesday_keeps_first_occurrence_order() {
        // Tuesday has Dance twice (7am and 6pm) — distinct start times, so
        // both labels survive, in table order.
        let offerings = distinct_offerings(Day::Tuesday);
        assert_eq!(
            offerings,
            vec![
                "Kickboxing at 6am",
                "Dance at 7am",
                "Dance at 6pm",
                "Kickboxing at 7pm",
            ]
        );
    }

    #[test]
    fn valid_day_names_parse() {
        for day in Day::ALL {
            assert_eq!(Day::from_name(day.as_str()).unwrap(), day);
        }
    }

    #[test]
    fn unknown_day_rejected() {
        for bad in &["monday", "MONDAY", "Funday", ""] {
            match Day::from_name(bad) {
                Err(AppError::InvalidDay(name)) => assert_eq!(name, *bad),
                other => panic!("expected InvalidDay for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn today_is_a_known_day() {
        // Smoke check: whatever today is, it round-trips through the parser.
        let today = Day::today();
        assert_eq!(Day::from_name(today.as_str()).unwrap(), today);
    }
}
