//! Weekend and public-holiday calendar used by the billing exemptions.

use chrono::{Datelike, NaiveDate, Weekday};

/// Fixed yearly public-holiday list (month, day).
///
/// April 1st stands in for Easter: the upstream calendar pinned Easter to a
/// fixed date, and the intended calendar is ambiguous, so the placeholder is
/// kept rather than silently corrected.
const PUBLIC_HOLIDAYS: [(u32, u32); 9] = [
    (1, 1),   // New Year's Day
    (4, 1),   // Easter placeholder
    (5, 1),   // Labour Day
    (5, 8),   // Victory Day
    (7, 14),  // Bastille Day
    (8, 15),  // Assumption
    (11, 1),  // All Saints' Day
    (11, 11), // Armistice Day
    (12, 25), // Christmas
];

pub fn is_public_holiday(date: NaiveDate) -> bool {
    PUBLIC_HOLIDAYS.contains(&(date.month(), date.day()))
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn fixed_holidays_match_any_year() {
        assert!(is_public_holiday(d(2025, 7, 14)));
        assert!(is_public_holiday(d(2026, 12, 25)));
        assert!(is_public_holiday(d(2026, 4, 1))); // Easter placeholder
        assert!(!is_public_holiday(d(2026, 4, 2)));
    }

    #[test]
    fn weekend_detection() {
        assert!(is_weekend(d(2026, 8, 1))); // Saturday
        assert!(is_weekend(d(2026, 8, 2))); // Sunday
        assert!(!is_weekend(d(2026, 8, 3))); // Monday
    }
}
