use chrono::{DateTime, Datelike, TimeDelta, Utc};
use regex::Captures;

use crate::parse::patterns::RELATIVE_DATE;

/// Weekday names indexed Sunday = 0
const DAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Count words indexed by their value. Index 0 is never matched.
const DIGIT_WORDS: [&str; 10] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

const MS_PER_DAY: i64 = 86_400_000;

/// Fixed unit lengths in milliseconds. Month and year are 28 and 336 days.
fn unit_millis(unit: &str) -> Option<i64> {
    match unit {
        "millisecond" => Some(1),
        "second" => Some(1_000),
        "minute" => Some(60_000),
        "hour" => Some(3_600_000),
        "day" => Some(MS_PER_DAY),
        "week" => Some(604_800_000),
        "month" => Some(2_419_200_000),
        "year" => Some(29_030_400_000),
        _ => None,
    }
}

/// Replace every relative-date shorthand (`due:tomorrow`, `t:friday`,
/// `due:three-days`, `due:2weeks`) with an absolute `YYYY-MM-DD` date computed
/// from `now`. Keys are kept; anything that doesn't fully match is left as is.
pub fn resolve_relative_dates(text: &str, now: DateTime<Utc>) -> String {
    RELATIVE_DATE
        .replace_all(text, |caps: &Captures| {
            let key = &caps[1];
            match resolve_value(caps, now) {
                Some(instant) => format!("{}{}", key, instant.format("%Y-%m-%d")),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Compute the instant a matched shorthand value points at.
fn resolve_value(caps: &Captures, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if let (Some(count), Some(unit)) = (caps.get(3), caps.get(4)) {
        let count = parse_count(count.as_str())?;
        let unit_ms = unit_millis(&unit.as_str().to_ascii_lowercase())?;
        let offset = TimeDelta::try_milliseconds(count.checked_mul(unit_ms)?)?;
        return now.checked_add_signed(offset);
    }

    let value = caps[2].to_ascii_lowercase();
    let days = match value.as_str() {
        "today" => 0,
        "tomorrow" => 1,
        day => {
            let target = DAYS.iter().position(|d| *d == day)? as i64;
            let today = now.weekday().num_days_from_sunday() as i64;
            weekday_offset(target, today)
        }
    };
    now.checked_add_signed(TimeDelta::try_milliseconds(days * MS_PER_DAY)?)
}

/// Days until the next `target` weekday, counting today as 0.
pub fn weekday_offset(target: i64, today: i64) -> i64 {
    let diff = target - today;
    if diff >= 0 { diff } else { 7 + diff }
}

/// Digit strings are taken numerically, words through the lookup table.
fn parse_count(count: &str) -> Option<i64> {
    if count.bytes().all(|b| b.is_ascii_digit()) {
        return count.parse().ok();
    }
    let word = count.to_ascii_lowercase();
    DIGIT_WORDS
        .iter()
        .skip(1)
        .position(|w| *w == word)
        .map(|i| i as i64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_today_and_tomorrow() {
        let now = at(2024, 1, 1);
        assert_eq!(resolve_relative_dates("due:today", now), "due:2024-01-01");
        assert_eq!(resolve_relative_dates("due:tomorrow", now), "due:2024-01-02");
        assert_eq!(resolve_relative_dates("due:TOMORROW", now), "due:2024-01-02");
    }

    #[test]
    fn test_word_count_units() {
        let now = at(2024, 1, 1);
        assert_eq!(resolve_relative_dates("due:three-day", now), "due:2024-01-04");
        assert_eq!(resolve_relative_dates("due:two-weeks", now), "due:2024-01-15");
        assert_eq!(resolve_relative_dates("due:one-month", now), "due:2024-01-29");
        assert_eq!(resolve_relative_dates("due:one-year", now), "due:2024-12-02");
    }

    #[test]
    fn test_digit_counts_bypass_word_lookup() {
        let now = at(2024, 1, 1);
        assert_eq!(resolve_relative_dates("due:3days", now), "due:2024-01-04");
        assert_eq!(resolve_relative_dates("due:10-day", now), "due:2024-01-11");
        assert_eq!(resolve_relative_dates("due:36hours", now), "due:2024-01-03");
    }

    #[test]
    fn test_sub_day_units_use_utc_date() {
        // 12:00 + 11h stays on the same day, + 13h rolls over
        let now = at(2024, 1, 1);
        assert_eq!(resolve_relative_dates("due:11-hours", now), "due:2024-01-01");
        assert_eq!(resolve_relative_dates("due:13-hours", now), "due:2024-01-02");
        assert_eq!(resolve_relative_dates("due:90-minutes", now), "due:2024-01-01");
    }

    #[test]
    fn test_weekday_same_day_is_zero_offset() {
        // 2024-01-01 is a Monday
        let now = at(2024, 1, 1);
        assert_eq!(resolve_relative_dates("due:monday", now), "due:2024-01-01");
        assert_eq!(resolve_relative_dates("due:tuesday", now), "due:2024-01-02");
        assert_eq!(resolve_relative_dates("due:sunday", now), "due:2024-01-07");
        assert_eq!(resolve_relative_dates("due:Saturday", now), "due:2024-01-06");
    }

    #[test]
    fn test_weekday_offset_wraps() {
        assert_eq!(weekday_offset(1, 1), 0);
        assert_eq!(weekday_offset(5, 1), 4);
        assert_eq!(weekday_offset(0, 6), 1);
        assert_eq!(weekday_offset(2, 3), 6);
    }

    #[test]
    fn test_keeps_key_and_surrounding_text() {
        let now = at(2024, 1, 1);
        assert_eq!(
            resolve_relative_dates("(A) pay rent t:tomorrow @home due:friday", now),
            "(A) pay rent t:2024-01-02 @home due:2024-01-05"
        );
    }

    #[test]
    fn test_unmatched_expressions_left_verbatim() {
        let now = at(2024, 1, 1);
        for text in [
            "due:todayish",
            "due:3-fortnights",
            "due:ten-days",
            "due:-day",
            "today tomorrow",
            "due: today",
        ] {
            assert_eq!(resolve_relative_dates(text, now), text);
        }
    }

    #[test]
    fn test_overflowing_offset_left_verbatim() {
        let now = at(2024, 1, 1);
        let text = "due:99999999999999999999-years";
        assert_eq!(resolve_relative_dates(text, now), text);
        let text = "due:9999999999-years";
        assert_eq!(resolve_relative_dates(text, now), text);
    }

    #[test]
    fn test_idempotent() {
        let now = at(2024, 3, 15);
        for text in [
            "due:today",
            "call bob due:next due:two-weeks t:monday",
            "plain text",
            "x done due:3days +proj @work",
        ] {
            let once = resolve_relative_dates(text, now);
            assert_eq!(resolve_relative_dates(&once, now), once);
        }
    }
}
