//! Roll store bootstrap.
//!
//! A usable connection always carries the full `rolls` schema: opening goes
//! through [`open_db`] / [`open_db_in_memory`], which migrate before returning.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The store was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// A schema step failed; nothing from that step was kept.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "roll store error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "roll store schema v{found} is newer than this build (v{supported}); upgrade rollstat"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "schema step v{version} ({name}) failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
