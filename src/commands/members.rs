use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use servicebook_core::date::parse_date_arg;
use servicebook_core::member::MemberInput;
use servicebook_core::store::{BlobStore, RecordStore};

use crate::render::Render;

#[derive(Subcommand)]
pub enum MemberCommand {
    /// List members alphabetically
    List,
    /// Add a member
    Add {
        name: String,
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date_arg)]
        birthday: Option<NaiveDate>,
    },
    /// Rename a member or change their birthday
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_date_arg, conflicts_with = "clear_birthday")]
        birthday: Option<NaiveDate>,
        #[arg(long)]
        clear_birthday: bool,
    },
    /// Remove a member and clear their responsibility assignments
    Remove {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run<B: BlobStore>(store: &mut RecordStore<B>, cmd: MemberCommand) -> Result<()> {
    match cmd {
        MemberCommand::List => {
            let members = store.members();
            if members.is_empty() {
                println!("{}", "No members yet".dimmed());
            }
            for member in members {
                println!("{}", member.render());
            }
        }
        MemberCommand::Add { name, birthday } => {
            let member = store.add_member(MemberInput { name, birthday })?;
            println!("{} {}", "Added".green(), member.render());
        }
        MemberCommand::Edit {
            id,
            name,
            birthday,
            clear_birthday,
        } => {
            let existing = store.member(&id)?;
            let birthday = if clear_birthday {
                None
            } else {
                birthday.or(existing.birthday)
            };
            let input = MemberInput {
                name: name.unwrap_or_else(|| existing.name.clone()),
                birthday,
            };
            store.update_member(&id, input)?;
            println!("{} {}", "Updated".green(), store.member(&id)?.render());
        }
        MemberCommand::Remove { id, force } => {
            let name = store.member(&id)?.name.clone();
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Remove {} and clear their assignments?", name))
                    .default(false)
                    .interact()?
            {
                return Ok(());
            }
            store.remove_member(&id)?;
            println!("{} {}", "Removed".green(), name);
        }
    }

    Ok(())
}
