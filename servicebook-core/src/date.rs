//! Calendar-date helpers shared by the scheduler and the store.
//!
//! Weekdays are addressed by index with 0 = Sunday through 6 = Saturday,
//! which is how responsibilities persist them.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Weekday};

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Parse a stored ISO date. Accepts `YYYY-MM-DD`, optionally followed by a
/// `T...` time part, in which case only the date part is used.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse YYYY-MM-DD, reporting the expected format on failure.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

/// Parse YYYY-MM-DDTHH:MM (seconds optional), or a bare date as midnight.
pub fn parse_datetime_arg(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| parse_date_arg(s).ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
        .ok_or_else(|| format!("Invalid date/time '{}'. Expected YYYY-MM-DDTHH:MM", s))
}

pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Short display name ("Sun".."Sat"), or "?" for an out-of-range index.
pub fn weekday_name(index: u8) -> &'static str {
    WEEKDAY_NAMES.get(index as usize).copied().unwrap_or("?")
}

/// Parse a weekday given as an index ("0".."6") or an English name or
/// abbreviation ("sun", "Sunday", "wed").
pub fn parse_weekday(s: &str) -> Option<u8> {
    let lower = s.trim().to_lowercase();
    if let Ok(n) = lower.parse::<u8>() {
        return (n <= 6).then_some(n);
    }
    lower.parse::<Weekday>().ok().map(|w| w.num_days_from_sunday() as u8)
}

/// The last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
