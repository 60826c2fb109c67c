//! Command-line front end for the roll store and statistics engine.
//!
//! # Responsibility
//! - Parse commands and map them onto core services.
//! - Map core failures onto distinct exit codes.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::error;
use rollstat_core::db::{open_db, DbError};
use rollstat_core::logging;
use rollstat_core::{
    CoreConfig, LogSettings, NewRoll, RepoError, RollId, RollListQuery, RollService,
    SqliteRollRepository, StatsError, StatsService, SystemDateProvider,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rollstat", version, about = "Track material rolls and stock statistics")]
struct Cli {
    /// SQLite database file; overrides ROLLSTAT_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a roll to stock.
    Add {
        #[arg(long)]
        length: f64,
        #[arg(long)]
        weight: f64,
        /// Defaults to a random day of the reference year.
        #[arg(long)]
        date_added: Option<NaiveDate>,
    },
    /// Mark a roll as removed from stock.
    Remove {
        id: RollId,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List rolls matching inclusive range filters.
    List(ListArgs),
    /// Compute statistics for an inclusive date window.
    Stats {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Print the human-readable rendering instead of JSON.
        #[arg(long)]
        text: bool,
    },
    /// Delete every roll.
    Clear,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    id_min: Option<RollId>,
    #[arg(long)]
    id_max: Option<RollId>,
    #[arg(long)]
    weight_min: Option<f64>,
    #[arg(long)]
    weight_max: Option<f64>,
    #[arg(long)]
    length_min: Option<f64>,
    #[arg(long)]
    length_max: Option<f64>,
    #[arg(long)]
    date_added_min: Option<NaiveDate>,
    #[arg(long)]
    date_added_max: Option<NaiveDate>,
    #[arg(long)]
    date_removed_min: Option<NaiveDate>,
    #[arg(long)]
    date_removed_max: Option<NaiveDate>,
}

impl From<ListArgs> for RollListQuery {
    fn from(args: ListArgs) -> Self {
        Self {
            id_min: args.id_min,
            id_max: args.id_max,
            weight_min: args.weight_min,
            weight_max: args.weight_max,
            length_min: args.length_min,
            length_max: args.length_max,
            date_added_min: args.date_added_min,
            date_added_max: args.date_added_max,
            date_removed_min: args.date_removed_min,
            date_removed_max: args.date_removed_max,
        }
    }
}

/// Failure surfaced to the shell, carrying its exit code.
struct CliFailure {
    code: u8,
    message: String,
}

impl From<DbError> for CliFailure {
    fn from(err: DbError) -> Self {
        Self {
            code: 1,
            message: err.to_string(),
        }
    }
}

impl From<RepoError> for CliFailure {
    fn from(err: RepoError) -> Self {
        let code = match err {
            RepoError::Validation(_) | RepoError::AlreadyRemoved { .. } => 2,
            RepoError::NotFound(_) => 4,
            RepoError::Db(_) | RepoError::InvalidData(_) => 1,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

impl From<StatsError> for CliFailure {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Repo(inner) => inner.into(),
            StatsError::InvalidWindow(_) => Self {
                code: 2,
                message: err.to_string(),
            },
            StatsError::InsufficientData { .. } => Self {
                code: 3,
                message: err.to_string(),
            },
            StatsError::NoData { .. } => Self {
                code: 4,
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for CliFailure {
    fn from(err: serde_json::Error) -> Self {
        Self {
            code: 1,
            message: err.to_string(),
        }
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    if let Some(settings) = LogSettings::from_config(&config) {
        if let Err(err) = settings.and_then(logging::start) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli.command, &config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            error!(
                "event=cli_command module=cli status=error exit_code={} error={}",
                failure.code, failure.message
            );
            eprintln!("error: {}", failure.message);
            ExitCode::from(failure.code)
        }
    }
}

fn run(command: Command, config: &CoreConfig) -> Result<String, CliFailure> {
    let conn = open_db(&config.db_path)?;
    let repo = SqliteRollRepository::new(&conn);
    let rolls = RollService::new(&repo, SystemDateProvider::new(config.reference_year));

    let output = match command {
        Command::Add {
            length,
            weight,
            date_added,
        } => {
            let new_roll = NewRoll {
                length,
                weight,
                date_added,
            };
            serde_json::to_string_pretty(&rolls.create_roll(&new_roll)?)?
        }
        Command::Remove { id, date } => serde_json::to_string_pretty(&rolls.remove_roll(id, date)?)?,
        Command::List(args) => serde_json::to_string_pretty(&rolls.list_rolls(&args.into())?)?,
        Command::Stats { start, end, text } => {
            let report = StatsService::new(&repo).stats(start, end)?;
            if text {
                report.to_string()
            } else {
                serde_json::to_string_pretty(&report)?
            }
        }
        Command::Clear => {
            let deleted = rolls.clear_rolls()?;
            format!("deleted {deleted} roll(s)")
        }
    };
    Ok(output)
}
