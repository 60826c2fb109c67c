//! Opening roll store connections.

use super::migrations::{apply_migrations, schema_version};
use super::DbResult;
use log::{info, warn};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a writer waits on a locked store before failing.
const LOCK_WAIT: Duration = Duration::from_secs(5);

enum Location {
    File(PathBuf),
    Memory,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(":memory:"),
        }
    }
}

/// Opens (creating if needed) the store at `path`, migrated to the latest schema.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_at(Location::File(path.as_ref().to_path_buf()))
}

/// Opens a private, empty in-memory store. Used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_at(Location::Memory)
}

fn open_at(location: Location) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect(&location);
    let elapsed_ms = started_at.elapsed().as_millis();

    match &result {
        Ok(conn) => info!(
            "event=db_open module=db status=ok location={location} schema_version={} duration_ms={elapsed_ms}",
            schema_version(conn).unwrap_or_default()
        ),
        Err(err) => warn!(
            "event=db_open module=db status=error location={location} duration_ms={elapsed_ms} error={err}"
        ),
    }
    result
}

fn connect(location: &Location) -> DbResult<Connection> {
    let mut conn = match location {
        Location::File(path) => Connection::open(path)?,
        Location::Memory => Connection::open_in_memory()?,
    };
    conn.busy_timeout(LOCK_WAIT)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}
