//! Recurring duties and their assignment lists.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::{self, ResponsibilityAssignment};
use crate::error::{ServiceBookError, ServiceBookResult};
use crate::recurrence::Recurrence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responsibility {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub recurrence: Recurrence,
    #[serde(default, deserialize_with = "assignment::deserialize_lenient")]
    pub assignments: Vec<ResponsibilityAssignment>,
    pub created_at: DateTime<Utc>,
}

/// User-editable responsibility fields. Assignments are managed separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsibilityInput {
    pub title: String,
    pub recurrence: Recurrence,
}

impl ResponsibilityInput {
    pub fn validate(&self) -> ServiceBookResult<()> {
        if self.title.trim().is_empty() {
            return Err(ServiceBookError::Validation(
                "Responsibility title is required".into(),
            ));
        }
        self.recurrence.validate()
    }
}

impl Responsibility {
    pub fn new(input: ResponsibilityInput) -> Self {
        Responsibility {
            id: Uuid::new_v4().to_string(),
            title: input.title.trim().to_string(),
            recurrence: input.recurrence,
            assignments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Replace title and recurrence wholesale; assignments are kept.
    pub fn apply(&mut self, input: ResponsibilityInput) {
        self.title = input.title.trim().to_string();
        self.recurrence = input.recurrence;
    }
}

impl fmt::Display for Responsibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
