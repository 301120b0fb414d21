use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::Select;
use owo_colors::OwoColorize;
use servicebook_core::recurrence::Horizon;
use servicebook_core::store::{BlobStore, RecordStore};

use crate::render::{Render, date_label};

pub fn run<B: BlobStore>(
    store: &RecordStore<B>,
    today: NaiveDate,
    horizon: Horizon,
    limit: usize,
    json: bool,
) -> Result<()> {
    let occurrences = store.upcoming_responsibilities(today, horizon, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
        return Ok(());
    }

    if occurrences.is_empty() {
        println!("{}", "No upcoming responsibilities".dimmed());
        return Ok(());
    }

    // Group occurrences by day
    let mut current: Option<NaiveDate> = None;
    for occurrence in &occurrences {
        if current != Some(occurrence.date) {
            if current.is_some() {
                println!();
            }
            println!("{}", date_label(occurrence.date).bold());
            current = Some(occurrence.date);
        }
        println!("{}", occurrence.render());
    }

    Ok(())
}

pub fn assign<B: BlobStore>(
    store: &mut RecordStore<B>,
    responsibility_id: &str,
    date: NaiveDate,
    member_id: Option<String>,
    clear: bool,
) -> Result<()> {
    let title = store.responsibility(responsibility_id)?.title.clone();

    let member_id = if clear {
        None
    } else {
        match member_id {
            Some(id) => Some(id),
            None => pick_member(store)?,
        }
    };

    let assignee = match &member_id {
        Some(id) => store.member(id)?.name.clone(),
        None => "Unassigned".to_string(),
    };

    tracing::debug!(
        responsibility = responsibility_id,
        %date,
        member = member_id.as_deref().unwrap_or("-"),
        "setting assignment"
    );
    store.set_assignment(responsibility_id, date, member_id)?;

    println!(
        "{} {} on {} → {}",
        "Assigned".green(),
        title,
        date.format("%a %b %-d, %Y"),
        assignee
    );
    Ok(())
}

/// Interactive member picker. The first entry leaves the occurrence unassigned.
fn pick_member<B: BlobStore>(store: &RecordStore<B>) -> Result<Option<String>> {
    let members = store.members();
    if members.is_empty() {
        anyhow::bail!(
            "No members to assign.\n\
            Add one with: servicebook members add <name>"
        );
    }

    let mut items = vec!["Unassigned".to_string()];
    items.extend(members.iter().map(|m| m.name.clone()));

    let selection = Select::new()
        .with_prompt("  Who?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(selection
        .checked_sub(1)
        .and_then(|i| members.get(i))
        .map(|m| m.id.clone()))
}
