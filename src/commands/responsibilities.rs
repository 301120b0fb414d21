use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use servicebook_core::assignment::resolve;
use servicebook_core::date::parse_weekday;
use servicebook_core::recurrence::{Horizon, Recurrence, WeekOfMonth, expand};
use servicebook_core::responsibility::ResponsibilityInput;
use servicebook_core::store::{BlobStore, RecordStore};

use crate::render::{Render, date_label};

#[derive(Subcommand)]
pub enum ResponsibilityCommand {
    /// List responsibilities, newest first
    List,
    /// Show one responsibility with its upcoming dates and assignees
    Show { id: String },
    /// Create a recurring responsibility
    Add {
        title: String,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// Rename a responsibility or replace its schedule
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        schedule: ScheduleArgs,
    },
    /// Delete a responsibility and its assignments
    Remove {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// At most one of --weekly, --monthly or --dates.
#[derive(Args)]
pub struct ScheduleArgs {
    /// Weekdays, comma-separated (e.g. "sun,wed" or "0,3")
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_weekday_arg,
        conflicts_with_all = ["monthly", "dates"]
    )]
    weekly: Option<Vec<u8>>,

    /// Weekday for a monthly schedule (combine with --week)
    #[arg(long, value_parser = parse_weekday_arg, conflicts_with = "dates")]
    monthly: Option<u8>,

    /// Explicit dates, comma-separated YYYY-MM-DD
    #[arg(long, value_delimiter = ',')]
    dates: Option<Vec<String>>,

    /// Which week of the month: 1st, 2nd, 3rd, 4th or last
    #[arg(long, default_value = "1st", requires = "monthly")]
    week: WeekOfMonth,
}

fn parse_weekday_arg(s: &str) -> Result<u8, String> {
    parse_weekday(s).ok_or_else(|| format!("Invalid weekday '{s}'. Use sun..sat or 0-6"))
}

impl ScheduleArgs {
    fn into_recurrence(self) -> Option<Recurrence> {
        if let Some(days_of_week) = self.weekly {
            Some(Recurrence::Weekly { days_of_week })
        } else if let Some(day_of_week) = self.monthly {
            Some(Recurrence::Monthly {
                day_of_week,
                week_of_month: self.week,
            })
        } else {
            self.dates.map(|dates| Recurrence::Custom {
                dates: dates.into_iter().map(|d| d.trim().to_string()).collect(),
            })
        }
    }
}

#[derive(Debug, PartialEq)]
enum Assignee {
    Member(String),
    Unknown(String),
    Nobody,
}

/// Dates of one responsibility within `horizon`, with who covers each.
fn agenda<B: BlobStore>(
    store: &RecordStore<B>,
    id: &str,
    today: NaiveDate,
    horizon: Horizon,
) -> Result<Vec<(NaiveDate, Assignee)>> {
    let responsibility = store.responsibility(id)?;

    Ok(expand(&responsibility.recurrence, today, horizon)
        .into_iter()
        .map(|date| {
            let assignee = match resolve(date, &responsibility.assignments) {
                Some(member_id) => match store.member(member_id) {
                    Ok(member) => Assignee::Member(member.name.clone()),
                    Err(_) => Assignee::Unknown(member_id.to_string()),
                },
                None => Assignee::Nobody,
            };
            (date, assignee)
        })
        .collect())
}

pub fn run<B: BlobStore>(
    store: &mut RecordStore<B>,
    cmd: ResponsibilityCommand,
    horizon: Horizon,
) -> Result<()> {
    match cmd {
        ResponsibilityCommand::List => {
            let responsibilities = store.responsibilities();
            if responsibilities.is_empty() {
                println!("{}", "No responsibilities yet".dimmed());
            }
            for responsibility in responsibilities {
                println!("{}", responsibility.render());
            }
        }
        ResponsibilityCommand::Show { id } => {
            println!("{}", store.responsibility(&id)?.render());

            let today = chrono::Local::now().date_naive();
            let dates = agenda(store, &id, today, horizon)?;
            if dates.is_empty() {
                println!("  {}", "No upcoming dates".dimmed());
            }
            for (date, assignee) in dates {
                let assignee = match assignee {
                    Assignee::Member(name) => name.green().to_string(),
                    Assignee::Unknown(member_id) => {
                        format!("unknown member {}", member_id).red().to_string()
                    }
                    Assignee::Nobody => "Unassigned".yellow().to_string(),
                };
                println!("  {:<18} {}", date_label(date), assignee);
            }
        }
        ResponsibilityCommand::Add { title, schedule } => {
            let Some(recurrence) = schedule.into_recurrence() else {
                anyhow::bail!(
                    "A schedule is required.\n\
                    Use --weekly <days>, --monthly <day> [--week <n>] or --dates <dates>"
                );
            };
            let responsibility = store.add_responsibility(ResponsibilityInput { title, recurrence })?;
            println!("{} {}", "Created".green(), responsibility.render());
        }
        ResponsibilityCommand::Edit {
            id,
            title,
            schedule,
        } => {
            let existing = store.responsibility(&id)?;
            let input = ResponsibilityInput {
                title: title.unwrap_or_else(|| existing.title.clone()),
                recurrence: schedule
                    .into_recurrence()
                    .unwrap_or_else(|| existing.recurrence.clone()),
            };
            store.update_responsibility(&id, input)?;
            println!("{} {}", "Updated".green(), store.responsibility(&id)?.render());
        }
        ResponsibilityCommand::Remove { id, force } => {
            let title = store.responsibility(&id)?.title.clone();
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete {} and all its assignments?", title))
                    .default(false)
                    .interact()?
            {
                return Ok(());
            }
            store.remove_responsibility(&id)?;
            println!("{} {}", "Deleted".green(), title);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(weekly: Option<Vec<u8>>, monthly: Option<u8>, dates: Option<Vec<&str>>) -> ScheduleArgs {
        ScheduleArgs {
            weekly,
            monthly,
            dates: dates.map(|d| d.into_iter().map(String::from).collect()),
            week: WeekOfMonth::Last,
        }
    }

    #[test]
    fn weekly_flags_build_weekly_rule() {
        let rule = args(Some(vec![0, 3]), None, None).into_recurrence();
        assert_eq!(
            rule,
            Some(Recurrence::Weekly {
                days_of_week: vec![0, 3]
            })
        );
    }

    #[test]
    fn monthly_flags_use_week() {
        let rule = args(None, Some(0), None).into_recurrence();
        assert_eq!(
            rule,
            Some(Recurrence::Monthly {
                day_of_week: 0,
                week_of_month: WeekOfMonth::Last
            })
        );
    }

    #[test]
    fn dates_are_trimmed() {
        let rule = args(None, None, Some(vec![" 2024-03-10", "2024-04-14 "])).into_recurrence();
        assert_eq!(
            rule,
            Some(Recurrence::Custom {
                dates: vec!["2024-03-10".into(), "2024-04-14".into()]
            })
        );
    }

    #[test]
    fn no_flags_means_no_schedule() {
        assert_eq!(args(None, None, None).into_recurrence(), None);
    }

    #[test]
    fn weekday_arg_accepts_names_and_indices() {
        assert_eq!(parse_weekday_arg("wed"), Ok(3));
        assert_eq!(parse_weekday_arg("6"), Ok(6));
        assert!(parse_weekday_arg("7").is_err());
    }

    #[test]
    fn agenda_follows_given_horizon() {
        use servicebook_core::member::MemberInput;
        use servicebook_core::store::MemoryBlobStore;

        let mut store = RecordStore::open(MemoryBlobStore::new()).unwrap();
        let alice = store
            .add_member(MemberInput {
                name: "Alice".into(),
                birthday: None,
            })
            .unwrap();
        let resp = store
            .add_responsibility(ResponsibilityInput {
                title: "Wednesday Songleader".into(),
                recurrence: Recurrence::Weekly {
                    days_of_week: vec![3],
                },
            })
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let first = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        store
            .set_assignment(&resp.id, first, Some(alice.id.clone()))
            .unwrap();

        let horizon = Horizon { days: 14, months: 1 };
        let dates = agenda(&store, &resp.id, today, horizon).unwrap();

        assert_eq!(
            dates,
            vec![
                (first, Assignee::Member("Alice".into())),
                (NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), Assignee::Nobody),
            ]
        );
    }
}
