//! Logged church services.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub sunday_school_songleader: String,
    #[serde(default)]
    pub sunday_school_songs: Vec<String>,
    #[serde(default)]
    pub church_songleader: String,
    #[serde(default)]
    pub church_songs: Vec<String>,
    #[serde(default)]
    pub message_title: String,
    #[serde(default)]
    pub preacher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User-editable service fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInput {
    pub date: NaiveDate,
    pub sunday_school_songleader: String,
    pub sunday_school_songs: Vec<String>,
    pub church_songleader: String,
    pub church_songs: Vec<String>,
    pub message_title: String,
    pub preacher: String,
    pub notes: Option<String>,
    pub recording_link: Option<String>,
}

/// Drop blank song entries.
fn clean_songs(songs: Vec<String>) -> Vec<String> {
    songs
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect()
}

impl Service {
    pub fn new(input: ServiceInput) -> Self {
        let mut service = Service {
            id: Uuid::new_v4().to_string(),
            date: input.date,
            sunday_school_songleader: String::new(),
            sunday_school_songs: Vec::new(),
            church_songleader: String::new(),
            church_songs: Vec::new(),
            message_title: String::new(),
            preacher: String::new(),
            notes: None,
            recording_link: None,
            created_at: Utc::now(),
        };
        service.apply(input);
        service
    }

    pub fn apply(&mut self, input: ServiceInput) {
        self.date = input.date;
        self.sunday_school_songleader = input.sunday_school_songleader;
        self.sunday_school_songs = clean_songs(input.sunday_school_songs);
        self.church_songleader = input.church_songleader;
        self.church_songs = clean_songs(input.church_songs);
        self.message_title = input.message_title;
        self.preacher = input.preacher;
        self.notes = input.notes;
        self.recording_link = input.recording_link;
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.message_title.is_empty() {
            write!(f, "Service on {}", self.date)
        } else {
            write!(f, "{}", self.message_title)
        }
    }
}
