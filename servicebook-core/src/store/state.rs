//! The persisted application state.

use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::constants::DEFAULT_PIN;
use crate::member::Member;
use crate::responsibility::Responsibility;
use crate::service::Service;

fn default_pin() -> String {
    DEFAULT_PIN.to_string()
}

/// Everything the app persists, saved as one JSON blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default = "default_pin")]
    pub pin: String,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub responsibilities: Vec<Responsibility>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            pin: default_pin(),
            services: Vec::new(),
            appointments: Vec::new(),
            members: Vec::new(),
            responsibilities: Vec::new(),
        }
    }
}

impl AppState {
    /// Parse a stored blob. Missing collections load empty and a blank PIN
    /// falls back to the default.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut state: AppState = serde_json::from_str(raw)?;
        if state.pin.trim().is_empty() {
            state.pin = default_pin();
        }
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_loads_defaults() {
        let state = AppState::from_json("{}").unwrap();
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn blank_pin_falls_back_to_default() {
        let state = AppState::from_json(r#"{"pin":""}"#).unwrap();
        assert_eq!(state.pin, DEFAULT_PIN);
    }

    #[test]
    fn custom_pin_is_kept() {
        let state = AppState::from_json(r#"{"pin":"1234","members":[]}"#).unwrap();
        assert_eq!(state.pin, "1234");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(AppState::from_json("{not json").is_err());
        assert!(AppState::from_json(r#"{"members": 3}"#).is_err());
    }

    #[test]
    fn bad_assignment_is_dropped_without_losing_records() {
        let raw = r#"{
            "members": [
                {"id": "m1", "name": "Alice", "created_at": "2024-01-01T00:00:00Z"}
            ],
            "responsibilities": [{
                "id": "r1",
                "title": "Wednesday Songleader",
                "frequency": "weekly",
                "days_of_week": [3],
                "assignments": [
                    {"id": "a1", "date": "garbage", "member_id": "m1"},
                    {"id": "a2", "date": "2024-01-03", "member_id": "m1"}
                ],
                "created_at": "2024-01-01T00:00:00Z"
            }]
        }"#;

        let state = AppState::from_json(raw).unwrap();

        assert_eq!(state.members.len(), 1);
        assert_eq!(state.responsibilities.len(), 1);
        let assignments = &state.responsibilities[0].assignments;
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].id, "a2");
    }
}
