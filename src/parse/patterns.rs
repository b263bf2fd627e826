use std::sync::LazyLock;

use regex::Regex;

/// Prefix that marks a task as done
pub const COMPLETED_MARKER: &str = "x ";

/// Completed task: line starts with `x `
pub static COMPLETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^x ").unwrap());

/// `due:YYYY-MM-DD` (capture 1 is the date)
pub static DUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"due:(\d{4}-\d{2}-\d{2})").unwrap());

/// `key:value` pairs (capture 1 key, capture 2 value)
pub static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z]+):([a-zA-Z0-9\-]+)").unwrap());

/// `+project`
pub static PROJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+[a-zA-Z0-9]+").unwrap());

/// `@context`
pub static CONTEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@[a-zA-Z]+").unwrap());

/// `(A)` priority marker (capture 1 is the letter)
pub static PRIORITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([A-Z])\)").unwrap());

/// Relative-date shorthand in a `key:value` slot.
///
/// Captures: 1 = `key:`, 2 = whole value, 3 = count, 4 = unit.
/// The value has to end on a word boundary so `due:todayish` stays untouched.
pub static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([a-z]+:)(today|tomorrow|sunday|monday|tuesday|wednesday|thursday|friday|saturday|([0-9]+|one|two|three|four|five|six|seven|eight|nine)-?(millisecond|second|minute|hour|day|week|month|year)s?)\b",
    )
    .unwrap()
});
