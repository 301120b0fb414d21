use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use servicebook_core::appointment::AppointmentInput;
use servicebook_core::date::parse_datetime_arg;
use servicebook_core::store::{BlobStore, RecordStore};

use super::non_empty;
use crate::render::{Render, date_label};

#[derive(Subcommand)]
pub enum AppointmentCommand {
    /// List appointments by date
    List {
        /// Only those within the next three months
        #[arg(long)]
        upcoming: bool,
    },
    /// Schedule an appointment
    Add {
        title: String,
        /// YYYY-MM-DDTHH:MM (a bare date means midnight)
        #[arg(value_parser = parse_datetime_arg)]
        date: NaiveDateTime,
        #[command(flatten)]
        details: AppointmentArgs,
    },
    /// Change fields of an appointment
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = parse_datetime_arg)]
        date: Option<NaiveDateTime>,
        #[command(flatten)]
        details: AppointmentArgs,
    },
    /// Delete an appointment
    Remove {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Optional fields. Pass an empty value to clear one when editing.
#[derive(Args)]
pub struct AppointmentArgs {
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    leader: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

fn overlay(flag: Option<String>, current: Option<String>) -> Option<String> {
    match flag {
        Some(value) => non_empty(Some(value)),
        None => current,
    }
}

pub fn run<B: BlobStore>(store: &mut RecordStore<B>, cmd: AppointmentCommand) -> Result<()> {
    match cmd {
        AppointmentCommand::List { upcoming } => {
            let appointments = if upcoming {
                store.upcoming_appointments(chrono::Local::now().naive_local())
            } else {
                store.appointments()
            };

            if appointments.is_empty() {
                println!("{}", "No appointments found".dimmed());
                return Ok(());
            }

            // Group by day, like a calendar agenda
            let mut current: Option<String> = None;
            for appointment in appointments {
                let label = date_label(appointment.date.date());
                if current.as_ref() != Some(&label) {
                    if current.is_some() {
                        println!();
                    }
                    println!("{}", label.bold());
                    current = Some(label);
                }
                println!("  {}", appointment.render());
            }
        }
        AppointmentCommand::Add {
            title,
            date,
            details,
        } => {
            let appointment = store.add_appointment(AppointmentInput {
                title,
                date,
                location: non_empty(details.location),
                leader: non_empty(details.leader),
                notes: non_empty(details.notes),
            })?;
            println!("{} {}", "Scheduled".green(), appointment.render());
        }
        AppointmentCommand::Edit {
            id,
            title,
            date,
            details,
        } => {
            let existing = store.appointment(&id)?;
            let input = AppointmentInput {
                title: title.unwrap_or_else(|| existing.title.clone()),
                date: date.unwrap_or(existing.date),
                location: overlay(details.location, existing.location.clone()),
                leader: overlay(details.leader, existing.leader.clone()),
                notes: overlay(details.notes, existing.notes.clone()),
            };
            store.update_appointment(&id, input)?;
            println!("{} {}", "Updated".green(), store.appointment(&id)?.render());
        }
        AppointmentCommand::Remove { id, force } => {
            let label = store.appointment(&id)?.to_string();
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete {}?", label))
                    .default(false)
                    .interact()?
            {
                return Ok(());
            }
            store.remove_appointment(&id)?;
            println!("{} {}", "Deleted".green(), label);
        }
    }

    Ok(())
}
