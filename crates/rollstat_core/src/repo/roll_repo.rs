//! Roll repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/remove/clear APIs over the `rolls` table.
//! - Provide the window queries consumed by the statistics engine.
//!
//! # Invariants
//! - Write paths validate before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Dates are stored as ISO `YYYY-MM-DD` text so SQL comparisons order
//!   them chronologically.

use crate::db::DbError;
use crate::model::roll::{validate_removal, NewRoll, Roll, RollId, RollValidationError};
use crate::model::window::DateWindow;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ROLL_SELECT_SQL: &str = "SELECT
    id,
    length,
    weight,
    date_added,
    date_removed
FROM rolls";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for roll persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RollValidationError),
    Db(DbError),
    NotFound(RollId),
    /// Removal was requested for a roll that already left stock.
    AlreadyRemoved {
        id: RollId,
        date_removed: NaiveDate,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "roll not found: {id}"),
            Self::AlreadyRemoved { id, date_removed } => {
                write!(f, "roll {id} was already removed on {date_removed}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted roll data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RollValidationError> for RepoError {
    fn from(value: RollValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Inclusive range filters for listing rolls. Unset bounds are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollListQuery {
    pub id_min: Option<RollId>,
    pub id_max: Option<RollId>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub length_min: Option<f64>,
    pub length_max: Option<f64>,
    pub date_added_min: Option<NaiveDate>,
    pub date_added_max: Option<NaiveDate>,
    pub date_removed_min: Option<NaiveDate>,
    pub date_removed_max: Option<NaiveDate>,
}

/// Roll store contract.
///
/// The three `query_*` methods are the only reads the statistics engine
/// depends on.
pub trait RollRepository {
    /// Persists a roll added on `date_added` and returns the stored record.
    fn create_roll(&self, roll: &NewRoll, date_added: NaiveDate) -> RepoResult<Roll>;
    fn get_roll(&self, id: RollId) -> RepoResult<Option<Roll>>;
    fn list_rolls(&self, query: &RollListQuery) -> RepoResult<Vec<Roll>>;
    /// Sets the removal date once. A second call fails with `AlreadyRemoved`.
    fn mark_removed(&self, id: RollId, date_removed: NaiveDate) -> RepoResult<Roll>;
    /// Deletes every roll and returns how many were deleted.
    fn clear_rolls(&self) -> RepoResult<usize>;

    /// Rolls present at any point of `window`.
    fn query_overlapping(&self, window: &DateWindow) -> RepoResult<Vec<Roll>>;
    /// Add dates falling inside `window`, one per roll.
    fn query_added_in(&self, window: &DateWindow) -> RepoResult<Vec<NaiveDate>>;
    /// Removal dates falling inside `window`, one per roll.
    fn query_removed_in(&self, window: &DateWindow) -> RepoResult<Vec<NaiveDate>>;
}

impl<R: RollRepository + ?Sized> RollRepository for &R {
    fn create_roll(&self, roll: &NewRoll, date_added: NaiveDate) -> RepoResult<Roll> {
        (**self).create_roll(roll, date_added)
    }

    fn get_roll(&self, id: RollId) -> RepoResult<Option<Roll>> {
        (**self).get_roll(id)
    }

    fn list_rolls(&self, query: &RollListQuery) -> RepoResult<Vec<Roll>> {
        (**self).list_rolls(query)
    }

    fn mark_removed(&self, id: RollId, date_removed: NaiveDate) -> RepoResult<Roll> {
        (**self).mark_removed(id, date_removed)
    }

    fn clear_rolls(&self) -> RepoResult<usize> {
        (**self).clear_rolls()
    }

    fn query_overlapping(&self, window: &DateWindow) -> RepoResult<Vec<Roll>> {
        (**self).query_overlapping(window)
    }

    fn query_added_in(&self, window: &DateWindow) -> RepoResult<Vec<NaiveDate>> {
        (**self).query_added_in(window)
    }

    fn query_removed_in(&self, window: &DateWindow) -> RepoResult<Vec<NaiveDate>> {
        (**self).query_removed_in(window)
    }
}

/// SQLite-backed roll repository.
pub struct SqliteRollRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRollRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_dates(&self, sql: &str, window: &DateWindow) -> RepoResult<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![
            date_to_db(window.start()),
            date_to_db(window.end())
        ])?;
        let mut dates = Vec::new();

        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            dates.push(parse_date(&text, "date")?);
        }

        Ok(dates)
    }
}

impl RollRepository for SqliteRollRepository<'_> {
    fn create_roll(&self, roll: &NewRoll, date_added: NaiveDate) -> RepoResult<Roll> {
        roll.validate()?;

        self.conn.execute(
            "INSERT INTO rolls (
                length,
                weight,
                date_added
            ) VALUES (?1, ?2, ?3);",
            params![roll.length, roll.weight, date_to_db(date_added)],
        )?;

        Ok(Roll {
            id: self.conn.last_insert_rowid(),
            length: roll.length,
            weight: roll.weight,
            date_added,
            date_removed: None,
        })
    }

    fn get_roll(&self, id: RollId) -> RepoResult<Option<Roll>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROLL_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_roll_row(row)?));
        }

        Ok(None)
    }

    fn list_rolls(&self, query: &RollListQuery) -> RepoResult<Vec<Roll>> {
        let mut sql = format!("{ROLL_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        let mut bound = |clause: &str, value: Option<Value>| {
            if let Some(value) = value {
                sql.push_str(clause);
                bind_values.push(value);
            }
        };
        bound(" AND id >= ?", query.id_min.map(Value::Integer));
        bound(" AND id <= ?", query.id_max.map(Value::Integer));
        bound(" AND weight >= ?", query.weight_min.map(Value::Real));
        bound(" AND weight <= ?", query.weight_max.map(Value::Real));
        bound(" AND length >= ?", query.length_min.map(Value::Real));
        bound(" AND length <= ?", query.length_max.map(Value::Real));
        bound(" AND date_added >= ?", query.date_added_min.map(date_value));
        bound(" AND date_added <= ?", query.date_added_max.map(date_value));
        bound(" AND date_removed >= ?", query.date_removed_min.map(date_value));
        bound(" AND date_removed <= ?", query.date_removed_max.map(date_value));

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut rolls = Vec::new();

        while let Some(row) = rows.next()? {
            rolls.push(parse_roll_row(row)?);
        }

        Ok(rolls)
    }

    fn mark_removed(&self, id: RollId, date_removed: NaiveDate) -> RepoResult<Roll> {
        let mut roll = self.get_roll(id)?.ok_or(RepoError::NotFound(id))?;
        if let Some(existing) = roll.date_removed {
            return Err(RepoError::AlreadyRemoved {
                id,
                date_removed: existing,
            });
        }
        validate_removal(roll.date_added, date_removed)?;

        // Guard on NULL so a concurrent removal cannot be overwritten.
        let changed = self.conn.execute(
            "UPDATE rolls
             SET date_removed = ?1
             WHERE id = ?2 AND date_removed IS NULL;",
            params![date_to_db(date_removed), id],
        )?;

        if changed == 0 {
            return match self.get_roll(id)? {
                Some(Roll {
                    date_removed: Some(existing),
                    ..
                }) => Err(RepoError::AlreadyRemoved {
                    id,
                    date_removed: existing,
                }),
                _ => Err(RepoError::NotFound(id)),
            };
        }

        roll.date_removed = Some(date_removed);
        Ok(roll)
    }

    fn clear_rolls(&self) -> RepoResult<usize> {
        let deleted = self.conn.execute("DELETE FROM rolls;", [])?;
        Ok(deleted)
    }

    fn query_overlapping(&self, window: &DateWindow) -> RepoResult<Vec<Roll>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROLL_SELECT_SQL}
             WHERE date_added <= ?2
               AND (date_removed IS NULL OR date_removed >= ?1)
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![
            date_to_db(window.start()),
            date_to_db(window.end())
        ])?;
        let mut rolls = Vec::new();

        while let Some(row) = rows.next()? {
            rolls.push(parse_roll_row(row)?);
        }

        Ok(rolls)
    }

    fn query_added_in(&self, window: &DateWindow) -> RepoResult<Vec<NaiveDate>> {
        self.query_dates(
            "SELECT date_added FROM rolls
             WHERE date_added >= ?1 AND date_added <= ?2
             ORDER BY id ASC;",
            window,
        )
    }

    fn query_removed_in(&self, window: &DateWindow) -> RepoResult<Vec<NaiveDate>> {
        self.query_dates(
            "SELECT date_removed FROM rolls
             WHERE date_removed IS NOT NULL
               AND date_removed >= ?1 AND date_removed <= ?2
             ORDER BY id ASC;",
            window,
        )
    }
}

fn parse_roll_row(row: &Row<'_>) -> RepoResult<Roll> {
    let added_text: String = row.get("date_added")?;
    let date_added = parse_date(&added_text, "rolls.date_added")?;

    let date_removed = match row.get::<_, Option<String>>("date_removed")? {
        Some(text) => Some(parse_date(&text, "rolls.date_removed")?),
        None => None,
    };

    let roll = Roll {
        id: row.get("id")?,
        length: row.get("length")?,
        weight: row.get("weight")?,
        date_added,
        date_removed,
    };
    roll.validate()
        .map_err(|err| RepoError::InvalidData(format!("roll {}: {err}", roll.id)))?;
    Ok(roll)
}

fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date_to_db(date))
}
