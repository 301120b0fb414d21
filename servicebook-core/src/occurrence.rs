//! Upcoming responsibility occurrences across all responsibilities.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::assignment::resolve;
use crate::member::Member;
use crate::recurrence::{Horizon, expand};
use crate::responsibility::Responsibility;

/// One concrete date a responsibility falls due. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsibilityOccurrence {
    pub responsibility_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub assigned_member_id: Option<String>,
    /// Name of the assigned member, when they are still on the roster
    pub assigned_member_name: Option<String>,
}

/// Expand every responsibility and merge the results into one list,
/// ascending by date and capped at `limit`.
///
/// The sort is stable: occurrences on the same date keep responsibility
/// iteration order, then expansion order. Responsibilities sharing a date
/// all appear.
pub fn upcoming<'a>(
    responsibilities: impl IntoIterator<Item = &'a Responsibility>,
    members: &[Member],
    today: NaiveDate,
    horizon: Horizon,
    limit: usize,
) -> Vec<ResponsibilityOccurrence> {
    let names: HashMap<&str, &str> = members
        .iter()
        .map(|m| (m.id.as_str(), m.name.as_str()))
        .collect();
    let names = &names;

    let mut occurrences: Vec<ResponsibilityOccurrence> = responsibilities
        .into_iter()
        .flat_map(|resp| {
            let dates = expand(&resp.recurrence, today, horizon);
            tracing::debug!(
                responsibility = %resp.id,
                frequency = resp.recurrence.frequency(),
                count = dates.len(),
                "expanded responsibility"
            );
            dates.into_iter().map(move |date| {
                let assigned = resolve(date, &resp.assignments);
                ResponsibilityOccurrence {
                    responsibility_id: resp.id.clone(),
                    title: resp.title.clone(),
                    date,
                    assigned_member_id: assigned.map(str::to_string),
                    assigned_member_name: assigned
                        .and_then(|id| names.get(id))
                        .map(|name| name.to_string()),
                }
            })
        })
        .collect();

    occurrences.sort_by_key(|o| o.date);
    occurrences.truncate(limit);
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::ResponsibilityAssignment;
    use crate::constants::DEFAULT_UPCOMING_LIMIT;
    use crate::recurrence::{Recurrence, WeekOfMonth};
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn responsibility(id: &str, title: &str, recurrence: Recurrence) -> Responsibility {
        Responsibility {
            id: id.to_string(),
            title: title.to_string(),
            recurrence,
            assignments: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            birthday: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn merges_and_sorts_by_date() {
        let today = date(2024, 1, 1);
        let resps = vec![
            responsibility(
                "custom",
                "Potluck",
                Recurrence::Custom {
                    dates: vec!["2024-01-05".into(), "2024-01-02".into()],
                },
            ),
            responsibility(
                "weekly",
                "Songleader",
                Recurrence::Weekly {
                    days_of_week: vec![3],
                },
            ),
        ];

        let result = upcoming(&resps, &[], today, Horizon::default(), 4);
        let got: Vec<(&str, NaiveDate)> = result
            .iter()
            .map(|o| (o.responsibility_id.as_str(), o.date))
            .collect();

        assert_eq!(
            got,
            vec![
                ("custom", date(2024, 1, 2)),
                ("weekly", date(2024, 1, 3)),
                ("custom", date(2024, 1, 5)),
                ("weekly", date(2024, 1, 10)),
            ]
        );
    }

    #[test]
    fn same_date_keeps_iteration_order_without_dedup() {
        let today = date(2024, 1, 1);
        let resps = vec![
            responsibility(
                "a",
                "Ushers",
                Recurrence::Custom {
                    dates: vec!["2024-01-07".into()],
                },
            ),
            responsibility(
                "b",
                "Greeters",
                Recurrence::Monthly {
                    day_of_week: 0,
                    week_of_month: WeekOfMonth::First,
                },
            ),
        ];

        let result = upcoming(&resps, &[], today, Horizon::default(), 2);
        assert_eq!(result[0].responsibility_id, "a");
        assert_eq!(result[1].responsibility_id, "b");
        assert_eq!(result[0].date, result[1].date);
    }

    #[test]
    fn caps_at_limit_in_ascending_order() {
        let today = date(2024, 1, 1);
        // Every day for 151 days: well over 50 occurrences
        let resps = vec![responsibility(
            "daily",
            "Prayer list",
            Recurrence::Weekly {
                days_of_week: (0..7).collect(),
            },
        )];

        let result = upcoming(&resps, &[], today, Horizon::default(), DEFAULT_UPCOMING_LIMIT);
        assert_eq!(result.len(), 50);
        assert!(result.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(result[0].date, today);
    }

    #[test]
    fn attaches_assignee_and_name() {
        let today = date(2024, 1, 1);
        let mut resp = responsibility(
            "r1",
            "Songleader",
            Recurrence::Weekly {
                days_of_week: vec![3],
            },
        );
        resp.assignments
            .push(ResponsibilityAssignment::new(date(2024, 1, 3), Some("m1".into())));
        resp.assignments
            .push(ResponsibilityAssignment::new(date(2024, 1, 10), Some("gone".into())));

        let members = vec![member("m1", "Alice")];
        let result = upcoming(&[resp], &members, today, Horizon::default(), 3);

        assert_eq!(result[0].assigned_member_id.as_deref(), Some("m1"));
        assert_eq!(result[0].assigned_member_name.as_deref(), Some("Alice"));
        assert_eq!(result[1].assigned_member_id.as_deref(), Some("gone"));
        assert_eq!(result[1].assigned_member_name, None);
        assert_eq!(result[2].assigned_member_id, None);
    }

    #[test]
    fn assignments_outside_expansion_are_ignored() {
        let today = date(2024, 1, 1);
        let mut resp = responsibility(
            "r1",
            "Songleader",
            Recurrence::Weekly {
                days_of_week: vec![3],
            },
        );
        // A Thursday never produced by the rule
        resp.assignments
            .push(ResponsibilityAssignment::new(date(2024, 1, 4), Some("m1".into())));

        let result = upcoming(&[resp], &[], today, Horizon::default(), 50);
        assert!(result.iter().all(|o| o.date != date(2024, 1, 4)));
        assert!(result.iter().all(|o| o.assigned_member_id.is_none()));
    }

    #[test]
    fn malformed_custom_date_skips_only_that_occurrence() {
        let today = date(2024, 1, 1);
        let resps = vec![
            responsibility(
                "bad",
                "Broken",
                Recurrence::Custom {
                    dates: vec!["garbage".into(), "2024-01-09".into()],
                },
            ),
            responsibility("unknown", "Future rule", Recurrence::Unsupported),
        ];

        let result = upcoming(&resps, &[], today, Horizon::default(), 50);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].date, date(2024, 1, 9));
    }
}
