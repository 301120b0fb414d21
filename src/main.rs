mod commands;
mod render;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use servicebook_core::config::ServiceBookConfig;
use servicebook_core::date::parse_date_arg;
use servicebook_core::store::{FileBlobStore, RecordStore};
use tracing_subscriber::EnvFilter;

use commands::appointments::AppointmentCommand;
use commands::members::MemberCommand;
use commands::responsibilities::ResponsibilityCommand;
use commands::services::ServiceCommand;

#[derive(Parser)]
#[command(name = "servicebook")]
#[command(about = "Log church services, appointments and members, and rotate responsibilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unlock with the shared 4-digit PIN
    Unlock {
        /// PIN (prompted for when omitted)
        #[arg(long)]
        pin: Option<String>,
    },
    /// Lock again
    Lock,
    /// Overview of services and appointments
    Dashboard,
    /// Logged services
    #[command(subcommand)]
    Services(ServiceCommand),
    /// Appointments
    #[command(subcommand)]
    Appointments(AppointmentCommand),
    /// Member roster
    #[command(subcommand)]
    Members(MemberCommand),
    /// Recurring responsibilities
    #[command(subcommand)]
    Responsibilities(ResponsibilityCommand),
    /// Upcoming responsibility occurrences and who is assigned
    Upcoming {
        /// Start from this date instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        /// Show at most this many occurrences
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Assign a member to one occurrence of a responsibility
    Assign {
        responsibility_id: String,

        /// Occurrence date (YYYY-MM-DD)
        #[arg(value_parser = parse_date_arg)]
        date: NaiveDate,

        /// Member to assign (picked interactively when omitted)
        member_id: Option<String>,

        /// Leave the occurrence unassigned
        #[arg(long, conflicts_with = "member_id")]
        clear: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ServiceBookConfig::load().context("Failed to load config")?;
    tracing::debug!(
        data_dir = %config.data_path().display(),
        horizon_days = config.horizon_days,
        horizon_months = config.horizon_months,
        "loaded config"
    );

    let mut store = config
        .open_store()
        .with_context(|| format!("Failed to open records in {}", config.data_path().display()))?;
    tracing::debug!(
        unlocked = store.is_unlocked(),
        members = store.state().members.len(),
        responsibilities = store.state().responsibilities.len(),
        "opened record store"
    );

    match cli.command {
        Commands::Unlock { pin } => commands::unlock::unlock(&mut store, pin),
        Commands::Lock => commands::unlock::lock(&mut store),
        Commands::Dashboard => {
            require_unlocked(&store)?;
            commands::dashboard::run(&store)
        }
        Commands::Services(cmd) => {
            require_unlocked(&store)?;
            commands::services::run(&mut store, cmd)
        }
        Commands::Appointments(cmd) => {
            require_unlocked(&store)?;
            commands::appointments::run(&mut store, cmd)
        }
        Commands::Members(cmd) => {
            require_unlocked(&store)?;
            commands::members::run(&mut store, cmd)
        }
        Commands::Responsibilities(cmd) => {
            require_unlocked(&store)?;
            commands::responsibilities::run(&mut store, cmd, config.horizon())
        }
        Commands::Upcoming { from, limit, json } => {
            require_unlocked(&store)?;
            let today = from.unwrap_or_else(|| chrono::Local::now().date_naive());
            let limit = limit.unwrap_or(config.upcoming_limit);
            commands::upcoming::run(&store, today, config.horizon(), limit, json)
        }
        Commands::Assign {
            responsibility_id,
            date,
            member_id,
            clear,
        } => {
            require_unlocked(&store)?;
            commands::upcoming::assign(&mut store, &responsibility_id, date, member_id, clear)
        }
    }
}

/// Log to stderr, filtered by RUST_LOG (warnings only by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn require_unlocked(store: &RecordStore<FileBlobStore>) -> Result<()> {
    if store.ensure_unlocked().is_err() {
        anyhow::bail!(
            "servicebook is locked.\n\n\
            Unlock it with the shared PIN:\n  \
            servicebook unlock"
        );
    }
    Ok(())
}
