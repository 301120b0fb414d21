//! Roster members.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceBookError, ServiceBookResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// User-editable member fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberInput {
    pub name: String,
    pub birthday: Option<NaiveDate>,
}

impl MemberInput {
    pub fn validate(&self) -> ServiceBookResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceBookError::Validation("Member name is required".into()));
        }
        Ok(())
    }
}

impl Member {
    pub fn new(input: MemberInput) -> Self {
        Member {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            birthday: input.birthday,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: MemberInput) {
        self.name = input.name.trim().to_string();
        self.birthday = input.birthday;
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
