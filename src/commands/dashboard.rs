use anyhow::Result;
use owo_colors::OwoColorize;
use servicebook_core::store::{BlobStore, RecordStore};

use crate::render::Render;

/// Recent services, upcoming appointments and record counts.
pub fn run<B: BlobStore>(store: &RecordStore<B>) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    let state = store.state();

    println!(
        "{} services · {} appointments · {} members · {} responsibilities",
        state.services.len(),
        state.appointments.len(),
        state.members.len(),
        state.responsibilities.len()
    );
    println!();

    println!("{}", "Recent services".bold());
    let recent = store.recent_services();
    if recent.is_empty() {
        println!("  {}", "No services logged yet".dimmed());
    }
    for service in recent {
        let title = if service.message_title.trim().is_empty() {
            "Untitled message"
        } else {
            service.message_title.as_str()
        };
        println!(
            "  {} {} {}",
            service.date.format("%b %-d, %Y"),
            title,
            format!("[{}]", service.id).dimmed()
        );
    }
    println!();

    println!("{}", "Upcoming appointments".bold());
    let upcoming = store.upcoming_appointments(now);
    if upcoming.is_empty() {
        println!("  {}", "Nothing in the next three months".dimmed());
    }
    for appointment in upcoming {
        println!("  {}", appointment.render());
    }

    Ok(())
}
