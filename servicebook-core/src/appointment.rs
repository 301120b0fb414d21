//! Appointments (visits, meetings, studies).

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceBookError, ServiceBookResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub title: String,
    /// Local wall-clock time
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User-editable appointment fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentInput {
    pub title: String,
    pub date: NaiveDateTime,
    pub location: Option<String>,
    pub leader: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentInput {
    pub fn validate(&self) -> ServiceBookResult<()> {
        if self.title.trim().is_empty() {
            return Err(ServiceBookError::Validation(
                "Appointment title is required".into(),
            ));
        }
        Ok(())
    }
}

impl Appointment {
    pub fn new(input: AppointmentInput) -> Self {
        Appointment {
            id: Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            date: input.date,
            location: input.location,
            leader: input.leader,
            notes: input.notes,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: AppointmentInput) {
        self.title = input.title.trim().to_string();
        self.date = input.date;
        self.location = input.location;
        self.leader = input.leader;
        self.notes = input.notes;
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
