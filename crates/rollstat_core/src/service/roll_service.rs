//! Roll use-case service.
//!
//! # Responsibility
//! - Provide create/list/remove/clear entry points for core callers.
//! - Resolve default dates through the injected `DateProvider`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Removal is one-way; a removed roll cannot be removed again.

use crate::model::roll::{NewRoll, Roll, RollId};
use crate::repo::roll_repo::{RepoResult, RollListQuery, RollRepository};
use crate::service::date_provider::DateProvider;
use chrono::NaiveDate;
use log::{info, warn};

/// Use-case service wrapper for roll lifecycle operations.
pub struct RollService<R: RollRepository, D: DateProvider> {
    repo: R,
    dates: D,
}

impl<R: RollRepository, D: DateProvider> RollService<R, D> {
    /// Creates a service using the provided repository and date source.
    pub fn new(repo: R, dates: D) -> Self {
        Self { repo, dates }
    }

    /// Adds a roll to stock.
    ///
    /// # Contract
    /// - Uses `roll.date_added` when set, otherwise the provider default.
    /// - Returns the stored record with its assigned id.
    pub fn create_roll(&self, roll: &NewRoll) -> RepoResult<Roll> {
        let date_added = roll
            .date_added
            .unwrap_or_else(|| self.dates.default_added_date());
        let created = self.repo.create_roll(roll, date_added).map_err(|err| {
            warn!("event=roll_create module=service status=error error={err}");
            err
        })?;
        info!(
            "event=roll_create module=service status=ok roll_id={} date_added={} defaulted={}",
            created.id,
            created.date_added,
            roll.date_added.is_none()
        );
        Ok(created)
    }

    /// Marks a roll as removed from stock.
    ///
    /// # Contract
    /// - `date_removed = None` means today, per the date provider.
    /// - Fails with `Validation` when the date precedes the add date, and
    ///   with `AlreadyRemoved` on a second removal.
    pub fn remove_roll(&self, id: RollId, date_removed: Option<NaiveDate>) -> RepoResult<Roll> {
        let date_removed = date_removed.unwrap_or_else(|| self.dates.today());
        let removed = self.repo.mark_removed(id, date_removed).map_err(|err| {
            warn!("event=roll_remove module=service status=error roll_id={id} error={err}");
            err
        })?;
        info!(
            "event=roll_remove module=service status=ok roll_id={id} date_removed={date_removed}"
        );
        Ok(removed)
    }

    /// Gets one roll by id.
    pub fn get_roll(&self, id: RollId) -> RepoResult<Option<Roll>> {
        self.repo.get_roll(id)
    }

    /// Lists rolls matching the range filters, ordered by id.
    pub fn list_rolls(&self, query: &RollListQuery) -> RepoResult<Vec<Roll>> {
        self.repo.list_rolls(query)
    }

    /// Deletes every roll. Returns the number deleted.
    pub fn clear_rolls(&self) -> RepoResult<usize> {
        let deleted = self.repo.clear_rolls()?;
        info!("event=roll_clear module=service status=ok deleted={deleted}");
        Ok(deleted)
    }
}
