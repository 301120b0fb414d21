use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use servicebook_core::date::parse_date_arg;
use servicebook_core::service::{Service, ServiceInput};
use servicebook_core::store::{BlobStore, RecordStore};

use super::non_empty;
use crate::render::Render;

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// List logged services, newest first
    List {
        /// Only the five most recent
        #[arg(long)]
        recent: bool,
    },
    /// Log a service
    Add(ServiceArgs),
    /// Change fields of a logged service
    Edit {
        id: String,
        #[command(flatten)]
        fields: ServiceArgs,
    },
    /// Delete a logged service
    Remove {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct ServiceArgs {
    /// Service date, YYYY-MM-DD (defaults to today when adding)
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    #[arg(long)]
    sunday_school_songleader: Option<String>,

    /// Comma-separated song list
    #[arg(long, value_delimiter = ',')]
    sunday_school_songs: Option<Vec<String>>,

    #[arg(long)]
    church_songleader: Option<String>,

    /// Comma-separated song list
    #[arg(long, value_delimiter = ',')]
    church_songs: Option<Vec<String>>,

    #[arg(long)]
    message_title: Option<String>,

    #[arg(long)]
    preacher: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    #[arg(long)]
    recording_link: Option<String>,
}

impl ServiceArgs {
    /// Overlay the given flags on `existing`, or on a blank service dated `today`.
    fn into_input(self, existing: Option<&Service>, today: NaiveDate) -> ServiceInput {
        let base = existing.map(|s| ServiceInput {
            date: s.date,
            sunday_school_songleader: s.sunday_school_songleader.clone(),
            sunday_school_songs: s.sunday_school_songs.clone(),
            church_songleader: s.church_songleader.clone(),
            church_songs: s.church_songs.clone(),
            message_title: s.message_title.clone(),
            preacher: s.preacher.clone(),
            notes: s.notes.clone(),
            recording_link: s.recording_link.clone(),
        });

        let base = base.unwrap_or(ServiceInput {
            date: today,
            sunday_school_songleader: String::new(),
            sunday_school_songs: Vec::new(),
            church_songleader: String::new(),
            church_songs: Vec::new(),
            message_title: String::new(),
            preacher: String::new(),
            notes: None,
            recording_link: None,
        });

        ServiceInput {
            date: self.date.unwrap_or(base.date),
            sunday_school_songleader: self
                .sunday_school_songleader
                .unwrap_or(base.sunday_school_songleader),
            sunday_school_songs: self.sunday_school_songs.unwrap_or(base.sunday_school_songs),
            church_songleader: self.church_songleader.unwrap_or(base.church_songleader),
            church_songs: self.church_songs.unwrap_or(base.church_songs),
            message_title: self.message_title.unwrap_or(base.message_title),
            preacher: self.preacher.unwrap_or(base.preacher),
            notes: match self.notes {
                Some(n) => non_empty(Some(n)),
                None => base.notes,
            },
            recording_link: match self.recording_link {
                Some(l) => non_empty(Some(l)),
                None => base.recording_link,
            },
        }
    }
}

pub fn run<B: BlobStore>(store: &mut RecordStore<B>, cmd: ServiceCommand) -> Result<()> {
    let today = chrono::Local::now().date_naive();

    match cmd {
        ServiceCommand::List { recent } => {
            let services = if recent {
                store.recent_services()
            } else {
                store.services()
            };
            if services.is_empty() {
                println!("{}", "No services logged yet".dimmed());
            }
            for (i, service) in services.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", service.render());
            }
        }
        ServiceCommand::Add(fields) => {
            let service = store.add_service(fields.into_input(None, today))?;
            println!("{} {}", "Logged".green(), service);
        }
        ServiceCommand::Edit { id, fields } => {
            let input = fields.into_input(Some(store.service(&id)?), today);
            store.update_service(&id, input)?;
            println!("{} {}", "Updated".green(), store.service(&id)?);
        }
        ServiceCommand::Remove { id, force } => {
            let label = store.service(&id)?.to_string();
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete {}?", label))
                    .default(false)
                    .interact()?
            {
                return Ok(());
            }
            store.remove_service(&id)?;
            println!("{} {}", "Deleted".green(), label);
        }
    }

    Ok(())
}
