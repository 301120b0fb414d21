//! Recurrence rules for responsibilities and their expansion into dates.
//!
//! A responsibility recurs weekly on a set of weekdays, monthly on the
//! Nth (or last) occurrence of one weekday, or on an explicit list of dates.
//! [`expand`] turns a rule into the concrete dates that fall inside the
//! rolling [`Horizon`] starting at `today`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HORIZON_DAYS, DEFAULT_HORIZON_MONTHS};
use crate::date::{
    last_day_of_month, parse_iso_date, weekday_from_index, weekday_index, weekday_name,
};
use crate::error::{ServiceBookError, ServiceBookResult};

/// How a responsibility repeats.
///
/// Persisted with a `frequency` tag (`weekly`, `monthly`, `custom`). Any other
/// tag loads as [`Recurrence::Unsupported`], which never produces occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "lowercase")]
pub enum Recurrence {
    /// Every matching weekday (0 = Sunday .. 6 = Saturday)
    Weekly {
        #[serde(default)]
        days_of_week: Vec<u8>,
    },
    /// The Nth or last `day_of_week` of each month
    Monthly {
        day_of_week: u8,
        #[serde(default)]
        week_of_month: WeekOfMonth,
    },
    /// Explicit ISO dates (YYYY-MM-DD)
    Custom {
        #[serde(default)]
        dates: Vec<String>,
    },
    #[serde(other)]
    Unsupported,
}

/// Ordinal weekday selector for monthly recurrence.
///
/// Serialized as `1`..`4` or `"last"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "WeekOfMonthRepr", into = "WeekOfMonthRepr")]
pub enum WeekOfMonth {
    #[default]
    First,
    Second,
    Third,
    Fourth,
    Last,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WeekOfMonthRepr {
    Ordinal(u8),
    Named(String),
}

impl TryFrom<WeekOfMonthRepr> for WeekOfMonth {
    type Error = String;

    fn try_from(repr: WeekOfMonthRepr) -> Result<Self, Self::Error> {
        match repr {
            WeekOfMonthRepr::Ordinal(n) => WeekOfMonth::from_ordinal(n)
                .ok_or_else(|| format!("week_of_month must be 1-4 or \"last\", got {n}")),
            WeekOfMonthRepr::Named(s) => s.parse(),
        }
    }
}

impl From<WeekOfMonth> for WeekOfMonthRepr {
    fn from(week: WeekOfMonth) -> Self {
        match week.ordinal() {
            Some(n) => WeekOfMonthRepr::Ordinal(n as u8),
            None => WeekOfMonthRepr::Named("last".to_string()),
        }
    }
}

impl WeekOfMonth {
    pub fn from_ordinal(n: u8) -> Option<Self> {
        match n {
            1 => Some(WeekOfMonth::First),
            2 => Some(WeekOfMonth::Second),
            3 => Some(WeekOfMonth::Third),
            4 => Some(WeekOfMonth::Fourth),
            _ => None,
        }
    }

    /// 1-based ordinal, or None for `Last`.
    pub fn ordinal(self) -> Option<u32> {
        match self {
            WeekOfMonth::First => Some(1),
            WeekOfMonth::Second => Some(2),
            WeekOfMonth::Third => Some(3),
            WeekOfMonth::Fourth => Some(4),
            WeekOfMonth::Last => None,
        }
    }
}

impl FromStr for WeekOfMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1st" | "first" => Ok(WeekOfMonth::First),
            "2" | "2nd" | "second" => Ok(WeekOfMonth::Second),
            "3" | "3rd" | "third" => Ok(WeekOfMonth::Third),
            "4" | "4th" | "fourth" => Ok(WeekOfMonth::Fourth),
            "last" => Ok(WeekOfMonth::Last),
            other => Err(format!(
                "Invalid week of month '{other}'. Expected 1st, 2nd, 3rd, 4th or last"
            )),
        }
    }
}

impl fmt::Display for WeekOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            WeekOfMonth::First => "1st",
            WeekOfMonth::Second => "2nd",
            WeekOfMonth::Third => "3rd",
            WeekOfMonth::Fourth => "4th",
            WeekOfMonth::Last => "Last",
        };
        write!(f, "{label}")
    }
}

/// The forward-looking window occurrences are generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Days scanned for weekly and custom rules
    pub days: u32,
    /// Calendar months scanned for monthly rules, starting with the current one
    pub months: u32,
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon {
            days: DEFAULT_HORIZON_DAYS,
            months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

impl Recurrence {
    /// Reject rules that can never be scheduled as entered.
    pub fn validate(&self) -> ServiceBookResult<()> {
        match self {
            Recurrence::Weekly { days_of_week } => {
                if days_of_week.is_empty() {
                    return Err(ServiceBookError::Validation(
                        "Weekly responsibilities need at least one weekday".into(),
                    ));
                }
                if let Some(bad) = days_of_week.iter().find(|d| **d > 6) {
                    return Err(ServiceBookError::Validation(format!(
                        "Weekday index {bad} is out of range (0-6)"
                    )));
                }
                Ok(())
            }
            Recurrence::Monthly { day_of_week, .. } => {
                if *day_of_week > 6 {
                    return Err(ServiceBookError::Validation(format!(
                        "Weekday index {day_of_week} is out of range (0-6)"
                    )));
                }
                Ok(())
            }
            Recurrence::Custom { dates } => {
                if let Some(bad) = dates.iter().find(|d| parse_iso_date(d).is_none()) {
                    return Err(ServiceBookError::Validation(format!(
                        "Invalid custom date '{bad}'. Expected YYYY-MM-DD"
                    )));
                }
                Ok(())
            }
            Recurrence::Unsupported => Err(ServiceBookError::Validation(
                "Unsupported recurrence frequency".into(),
            )),
        }
    }

    pub fn frequency(&self) -> &'static str {
        match self {
            Recurrence::Weekly { .. } => "weekly",
            Recurrence::Monthly { .. } => "monthly",
            Recurrence::Custom { .. } => "custom",
            Recurrence::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Recurrence::Weekly { days_of_week } => {
                let mut days = days_of_week.clone();
                days.sort_unstable();
                days.dedup();
                let names: Vec<&str> = days.into_iter().map(weekday_name).collect();
                write!(f, "Weekly on {}", names.join(", "))
            }
            Recurrence::Monthly {
                day_of_week,
                week_of_month,
            } => write!(f, "Monthly on {} {}", week_of_month, weekday_name(*day_of_week)),
            Recurrence::Custom { dates } => write!(f, "{} custom dates", dates.len()),
            Recurrence::Unsupported => write!(f, "Unsupported schedule"),
        }
    }
}

/// Expand a recurrence rule into its occurrence dates within the horizon.
///
/// Dates are ascending and unique. Rules with nothing to schedule (empty
/// weekday set, out-of-range weekday, unsupported frequency) yield nothing.
pub fn expand(recurrence: &Recurrence, today: NaiveDate, horizon: Horizon) -> Vec<NaiveDate> {
    match recurrence {
        Recurrence::Weekly { days_of_week } => expand_weekly(days_of_week, today, horizon.days),
        Recurrence::Monthly {
            day_of_week,
            week_of_month,
        } => expand_monthly(*day_of_week, *week_of_month, today, horizon.months),
        Recurrence::Custom { dates } => expand_custom(dates, today, horizon.days),
        Recurrence::Unsupported => Vec::new(),
    }
}

/// Every day in `[today, today + horizon_days]` whose weekday is in the set.
fn expand_weekly(days_of_week: &[u8], today: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    if days_of_week.is_empty() {
        return Vec::new();
    }

    today
        .iter_days()
        .take(horizon_days as usize + 1)
        .filter(|d| days_of_week.contains(&weekday_index(*d)))
        .collect()
}

/// The selected weekday of each month, from the month containing `today`.
fn expand_monthly(
    day_of_week: u8,
    week: WeekOfMonth,
    today: NaiveDate,
    months: u32,
) -> Vec<NaiveDate> {
    let Some(weekday) = weekday_from_index(day_of_week) else {
        return Vec::new();
    };
    let Some(first_of_month) = today.with_day(1) else {
        return Vec::new();
    };

    (0..months)
        .filter_map(|m| first_of_month.checked_add_months(Months::new(m)))
        .filter_map(|month_start| nth_weekday_of_month(month_start, weekday, week))
        .filter(|date| *date >= today)
        .collect()
}

/// Resolve the Nth (or last) `weekday` in the month starting at `month_start`.
///
/// Returns None when the Nth weekday would land past the end of the month.
pub fn nth_weekday_of_month(
    month_start: NaiveDate,
    weekday: Weekday,
    week: WeekOfMonth,
) -> Option<NaiveDate> {
    match week.ordinal() {
        Some(n) => {
            let first_weekday = month_start.weekday().num_days_from_sunday();
            let offset = (weekday.num_days_from_sunday() + 7 - first_weekday) % 7;
            let day = 1 + offset + (n - 1) * 7;
            // with_day fails for days past the month's end
            month_start.with_day(day)
        }
        None => {
            let last = last_day_of_month(month_start)?;
            (0..7)
                .filter_map(|back| last.checked_sub_days(Days::new(back)))
                .find(|d| d.weekday() == weekday)
        }
    }
}

/// Stored dates in `[today, today + horizon_days)`.
fn expand_custom(dates: &[String], today: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    let end = today
        .checked_add_days(Days::new(horizon_days.into()))
        .unwrap_or(NaiveDate::MAX);

    let mut result: Vec<NaiveDate> = dates
        .iter()
        .filter_map(|raw| {
            let parsed = parse_iso_date(raw);
            if parsed.is_none() {
                tracing::warn!(date = %raw, "skipping unparsable custom date");
            }
            parsed
        })
        .filter(|d| *d >= today && *d < end)
        .collect();

    result.sort_unstable();
    result.dedup();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly(days: &[u8]) -> Recurrence {
        Recurrence::Weekly {
            days_of_week: days.to_vec(),
        }
    }

    fn monthly(day_of_week: u8, week_of_month: WeekOfMonth) -> Recurrence {
        Recurrence::Monthly {
            day_of_week,
            week_of_month,
        }
    }

    fn custom(dates: &[&str]) -> Recurrence {
        Recurrence::Custom {
            dates: dates.iter().map(|d| d.to_string()).collect(),
        }
    }

    // --- weekly ---

    #[test]
    fn weekly_wednesday_from_new_year_2024() {
        let today = date(2024, 1, 1); // Monday
        let dates = expand(&weekly(&[3]), today, Horizon::default());

        assert_eq!(dates.first(), Some(&date(2024, 1, 3)));
        // 2024-01-01 + 150 days = 2024-05-30 (Thursday); last Wednesday on/before is 05-29
        assert_eq!(dates.last(), Some(&date(2024, 5, 29)));
        assert!(dates.iter().all(|d| d.weekday() == Weekday::Wed));
    }

    #[test]
    fn weekly_count_matches_calendar_days() {
        let today = date(2024, 3, 10);
        let set = [0u8, 2, 5];
        let horizon = Horizon::default();
        let dates = expand(&weekly(&set), today, horizon);

        let expected = (0..=horizon.days as u64)
            .map(|i| today + Days::new(i))
            .filter(|d| set.contains(&weekday_index(*d)))
            .count();
        assert_eq!(dates.len(), expected);
        assert!(dates.iter().all(|d| set.contains(&weekday_index(*d))));
    }

    #[test]
    fn weekly_includes_today_and_last_horizon_day() {
        let today = date(2024, 1, 1); // Monday
        let horizon = Horizon { days: 7, months: 6 };
        let dates = expand(&weekly(&[1]), today, horizon);
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 8)]);
    }

    #[test]
    fn weekly_empty_set_yields_nothing() {
        assert!(expand(&weekly(&[]), date(2024, 1, 1), Horizon::default()).is_empty());
    }

    #[test]
    fn weekly_out_of_range_index_never_matches() {
        assert!(expand(&weekly(&[9]), date(2024, 1, 1), Horizon::default()).is_empty());
    }

    #[test]
    fn weekly_is_ascending_without_duplicates() {
        let dates = expand(&weekly(&[3, 3, 1]), date(2024, 1, 1), Horizon::default());
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    // --- monthly ---

    #[test]
    fn last_sunday_of_february_2024() {
        let resolved =
            nth_weekday_of_month(date(2024, 2, 1), Weekday::Sun, WeekOfMonth::Last);
        assert_eq!(resolved, Some(date(2024, 2, 25)));
    }

    #[test]
    fn nth_weekday_resolution() {
        // March 2024 starts on a Friday
        let march = date(2024, 3, 1);
        assert_eq!(
            nth_weekday_of_month(march, Weekday::Fri, WeekOfMonth::First),
            Some(date(2024, 3, 1))
        );
        assert_eq!(
            nth_weekday_of_month(march, Weekday::Thu, WeekOfMonth::First),
            Some(date(2024, 3, 7))
        );
        assert_eq!(
            nth_weekday_of_month(march, Weekday::Sun, WeekOfMonth::Second),
            Some(date(2024, 3, 10))
        );
        assert_eq!(
            nth_weekday_of_month(march, Weekday::Thu, WeekOfMonth::Fourth),
            Some(date(2024, 3, 28))
        );
        assert_eq!(
            nth_weekday_of_month(march, Weekday::Sun, WeekOfMonth::Last),
            Some(date(2024, 3, 31))
        );
    }

    #[test]
    fn monthly_covers_six_months_from_start_of_current_month() {
        let today = date(2024, 1, 1);
        let dates = expand(&monthly(0, WeekOfMonth::First), today, Horizon::default());
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 7),
                date(2024, 2, 4),
                date(2024, 3, 3),
                date(2024, 4, 7),
                date(2024, 5, 5),
                date(2024, 6, 2),
            ]
        );
    }

    #[test]
    fn monthly_skips_this_month_when_already_past() {
        let today = date(2024, 1, 10);
        let dates = expand(&monthly(0, WeekOfMonth::First), today, Horizon::default());
        // January's first Sunday (the 7th) is before today
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], date(2024, 2, 4));
    }

    #[test]
    fn monthly_today_itself_is_eligible() {
        let today = date(2024, 1, 7);
        let dates = expand(&monthly(0, WeekOfMonth::First), today, Horizon::default());
        assert_eq!(dates[0], today);
    }

    #[test]
    fn monthly_results_have_correct_weekday_and_position() {
        let today = date(2024, 9, 15);
        for week in [
            WeekOfMonth::First,
            WeekOfMonth::Second,
            WeekOfMonth::Third,
            WeekOfMonth::Fourth,
            WeekOfMonth::Last,
        ] {
            for dow in 0..7u8 {
                for d in expand(&monthly(dow, week), today, Horizon::default()) {
                    assert_eq!(weekday_index(d), dow);
                    match week.ordinal() {
                        Some(n) => assert_eq!((d.day() - 1) / 7 + 1, n),
                        None => {
                            let next = d + Days::new(7);
                            assert_ne!(next.month(), d.month());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn monthly_crosses_year_boundary() {
        let today = date(2024, 11, 1);
        let dates = expand(&monthly(5, WeekOfMonth::Last), today, Horizon::default());
        assert_eq!(dates.len(), 6);
        assert_eq!(dates[2], date(2025, 1, 31));
        assert_eq!(dates[5], date(2025, 4, 25));
    }

    #[test]
    fn monthly_invalid_weekday_yields_nothing() {
        assert!(expand(&monthly(8, WeekOfMonth::First), date(2024, 1, 1), Horizon::default())
            .is_empty());
    }

    // --- custom ---

    #[test]
    fn custom_bounds_are_inclusive_start_exclusive_end() {
        let today = date(2024, 1, 1);
        let rule = custom(&[
            "2023-12-31", // yesterday
            "2024-01-01", // today
            "2024-05-29", // today + 149
            "2024-05-30", // today + 150
        ]);
        let dates = expand(&rule, today, Horizon::default());
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 5, 29)]);
    }

    #[test]
    fn custom_skips_malformed_dates() {
        let today = date(2024, 1, 1);
        let rule = custom(&["not-a-date", "2024-02-03", "2024-13-01"]);
        assert_eq!(expand(&rule, today, Horizon::default()), vec![date(2024, 2, 3)]);
    }

    #[test]
    fn custom_sorts_and_dedups() {
        let today = date(2024, 1, 1);
        let rule = custom(&["2024-03-01", "2024-02-01", "2024-03-01T00:00:00.000Z"]);
        assert_eq!(
            expand(&rule, today, Horizon::default()),
            vec![date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn custom_with_overflowing_horizon_keeps_dates() {
        let today = date(2024, 1, 1);
        let rule = custom(&["2024-01-02"]);
        let horizon = Horizon {
            days: u32::MAX,
            months: 6,
        };
        assert_eq!(expand(&rule, today, horizon), vec![date(2024, 1, 2)]);
    }

    #[test]
    fn unsupported_yields_nothing() {
        assert!(expand(&Recurrence::Unsupported, date(2024, 1, 1), Horizon::default()).is_empty());
    }

    // --- serialization & validation ---

    #[test]
    fn deserialize_monthly_with_last() {
        let json = r#"{"frequency":"monthly","day_of_week":0,"week_of_month":"last"}"#;
        let rule: Recurrence = serde_json::from_str(json).unwrap();
        assert_eq!(rule, monthly(0, WeekOfMonth::Last));
    }

    #[test]
    fn deserialize_monthly_defaults_to_first_week() {
        let json = r#"{"frequency":"monthly","day_of_week":2}"#;
        let rule: Recurrence = serde_json::from_str(json).unwrap();
        assert_eq!(rule, monthly(2, WeekOfMonth::First));
    }

    #[test]
    fn serialize_week_of_month_as_number_or_last() {
        let json = serde_json::to_value(monthly(4, WeekOfMonth::Third)).unwrap();
        assert_eq!(json["week_of_month"], serde_json::json!(3));
        let json = serde_json::to_value(monthly(4, WeekOfMonth::Last)).unwrap();
        assert_eq!(json["week_of_month"], serde_json::json!("last"));
        assert_eq!(json["frequency"], serde_json::json!("monthly"));
    }

    #[test]
    fn deserialize_unknown_frequency_as_unsupported() {
        let rule: Recurrence = serde_json::from_str(r#"{"frequency":"yearly"}"#).unwrap();
        assert_eq!(rule, Recurrence::Unsupported);
    }

    #[test]
    fn reject_out_of_range_week_of_month() {
        let json = r#"{"frequency":"monthly","day_of_week":2,"week_of_month":5}"#;
        assert!(serde_json::from_str::<Recurrence>(json).is_err());
    }

    #[test]
    fn week_of_month_from_str() {
        assert_eq!("2nd".parse::<WeekOfMonth>().unwrap(), WeekOfMonth::Second);
        assert_eq!("LAST".parse::<WeekOfMonth>().unwrap(), WeekOfMonth::Last);
        assert_eq!("3".parse::<WeekOfMonth>().unwrap(), WeekOfMonth::Third);
        assert!("5th".parse::<WeekOfMonth>().is_err());
    }

    #[test]
    fn validate_rules() {
        assert!(weekly(&[]).validate().is_err());
        assert!(weekly(&[7]).validate().is_err());
        assert!(weekly(&[0, 6]).validate().is_ok());
        assert!(monthly(7, WeekOfMonth::First).validate().is_err());
        assert!(custom(&["2024-01-01"]).validate().is_ok());
        assert!(custom(&["01/02/2024"]).validate().is_err());
        assert!(Recurrence::Unsupported.validate().is_err());
    }

    #[test]
    fn display_summaries() {
        assert_eq!(weekly(&[3, 0]).to_string(), "Weekly on Sun, Wed");
        assert_eq!(monthly(0, WeekOfMonth::Last).to_string(), "Monthly on Last Sun");
        assert_eq!(monthly(2, WeekOfMonth::First).to_string(), "Monthly on 1st Tue");
        assert_eq!(custom(&["2024-01-01", "2024-02-01"]).to_string(), "2 custom dates");
    }
}
