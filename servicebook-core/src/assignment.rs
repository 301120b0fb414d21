//! Per-occurrence assignments of members to responsibilities.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A member chosen to cover one occurrence of a responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsibilityAssignment {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

impl ResponsibilityAssignment {
    pub fn new(date: NaiveDate, member_id: Option<String>) -> Self {
        ResponsibilityAssignment {
            id: Uuid::new_v4().to_string(),
            date,
            member_id,
        }
    }
}

/// Deserialize an assignment list, dropping entries that do not parse
/// instead of rejecting the whole list.
pub(crate) fn deserialize_lenient<'de, D>(
    deserializer: D,
) -> Result<Vec<ResponsibilityAssignment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(assignment) => Some(assignment),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed assignment");
                None
            }
        })
        .collect())
}

/// The member assigned to `date`, if any.
pub fn resolve(date: NaiveDate, assignments: &[ResponsibilityAssignment]) -> Option<&str> {
    assignments
        .iter()
        .find(|a| a.date == date)
        .and_then(|a| a.member_id.as_deref())
}

/// Replace whatever is assigned to `date`.
///
/// Existing entries for the date are dropped; a new one is added only when a
/// member is given, so `None` clears the slot.
pub fn set_assignment(
    assignments: &mut Vec<ResponsibilityAssignment>,
    date: NaiveDate,
    member_id: Option<String>,
) {
    assignments.retain(|a| a.date != date);

    if let Some(member_id) = member_id {
        assignments.push(ResponsibilityAssignment::new(date, Some(member_id)));
    }
}

/// Clear every reference to a removed member, keeping the assignment records.
pub fn clear_member(assignments: &mut [ResponsibilityAssignment], member_id: &str) {
    for assignment in assignments
        .iter_mut()
        .filter(|a| a.member_id.as_deref() == Some(member_id))
    {
        assignment.member_id = None;
    }
}
