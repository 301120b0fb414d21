//! Terminal rendering for servicebook records.
//!
//! Extension traits that add colored output to servicebook-core types
//! using owo_colors.

use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use servicebook_core::appointment::Appointment;
use servicebook_core::member::Member;
use servicebook_core::occurrence::ResponsibilityOccurrence;
use servicebook_core::responsibility::Responsibility;
use servicebook_core::service::Service;

pub trait Render {
    fn render(&self) -> String;
}

/// Placeholder for empty fields
fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "—" } else { s }
}

fn song_list(songs: &[String]) -> String {
    if songs.is_empty() {
        "—".to_string()
    } else {
        songs.join(", ")
    }
}

/// "Today", "Tomorrow", or e.g. "Wed Jan 3, 2024"
pub fn date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d, %Y").to_string(),
    }
}

impl Render for Service {
    fn render(&self) -> String {
        let mut lines = vec![
            format!(
                "{} {}",
                self.date.format("%a, %b %-d, %Y").to_string().bold(),
                format!("[{}]", self.id).dimmed()
            ),
            format!("  {}", or_dash(&self.message_title)),
            format!("  Preacher: {}", or_dash(&self.preacher)),
            format!(
                "  Sunday School: {} — {}",
                or_dash(&self.sunday_school_songleader),
                song_list(&self.sunday_school_songs)
            ),
            format!(
                "  Church: {} — {}",
                or_dash(&self.church_songleader),
                song_list(&self.church_songs)
            ),
        ];
        if let Some(notes) = &self.notes {
            lines.push(format!("  Notes: {}", notes).dimmed().to_string());
        }
        if let Some(link) = &self.recording_link {
            lines.push(format!("  Recording: {}", link.underline()));
        }
        lines.join("\n")
    }
}

impl Render for Appointment {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {}",
            self.date.format("%a %b %-d, %Y %H:%M").to_string().bold(),
            self.title
        );
        line.push_str(&format!(
            " @ {}",
            self.location.as_deref().unwrap_or("Location TBD")
        ));
        if let Some(leader) = &self.leader {
            line.push_str(&format!(" (lead: {})", leader));
        }
        format!("{} {}", line, format!("[{}]", self.id).dimmed())
    }
}

impl Render for Member {
    fn render(&self) -> String {
        let birthday = self
            .birthday
            .map(|d| format!(" (born {})", d.format("%b %-d, %Y")))
            .unwrap_or_default();
        format!("{}{} {}", self.name, birthday.dimmed(), format!("[{}]", self.id).dimmed())
    }
}

impl Render for Responsibility {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.title.bold(),
            self.recurrence.to_string().cyan(),
            format!("[{}]", self.id).dimmed()
        )
    }
}

impl Render for ResponsibilityOccurrence {
    fn render(&self) -> String {
        let assignee = match (&self.assigned_member_name, &self.assigned_member_id) {
            (Some(name), _) => name.green().to_string(),
            (None, Some(id)) => format!("unknown member {}", id).red().to_string(),
            (None, None) => "Unassigned".yellow().to_string(),
        };
        format!(
            "  {:<20} {} {}",
            self.title,
            assignee,
            format!("[{}]", self.responsibility_id).dimmed()
        )
    }
}
