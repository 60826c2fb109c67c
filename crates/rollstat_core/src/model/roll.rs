//! Roll domain model.
//!
//! # Responsibility
//! - Define the stored roll record and its creation payload.
//! - Validate dimensional and lifecycle invariants.
//!
//! # Invariants
//! - `length` and `weight` are finite and strictly positive.
//! - `date_removed`, when set, is not earlier than `date_added`.
//! - A roll without `date_removed` is still in stock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned roll identifier.
pub type RollId = i64;

/// Validation failures for roll records and payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum RollValidationError {
    /// Length is zero, negative, or not a finite number.
    InvalidLength(f64),
    /// Weight is zero, negative, or not a finite number.
    InvalidWeight(f64),
    /// Removal date precedes the add date.
    RemovedBeforeAdded {
        date_added: NaiveDate,
        date_removed: NaiveDate,
    },
}

impl Display for RollValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength(value) => {
                write!(f, "length must be a positive number, got {value}")
            }
            Self::InvalidWeight(value) => {
                write!(f, "weight must be a positive number, got {value}")
            }
            Self::RemovedBeforeAdded {
                date_added,
                date_removed,
            } => write!(
                f,
                "date_removed ({date_removed}) must be >= date_added ({date_added})"
            ),
        }
    }
}

impl Error for RollValidationError {}

/// Canonical stored roll record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    pub id: RollId,
    pub length: f64,
    pub weight: f64,
    pub date_added: NaiveDate,
    pub date_removed: Option<NaiveDate>,
}

impl Roll {
    /// Validates dimensions and the add/remove ordering.
    pub fn validate(&self) -> Result<(), RollValidationError> {
        validate_dimensions(self.length, self.weight)?;
        if let Some(date_removed) = self.date_removed {
            validate_removal(self.date_added, date_removed)?;
        }
        Ok(())
    }

    /// Returns whether the roll was in stock on `date`.
    ///
    /// Both boundary days count as present.
    pub fn is_present_on(&self, date: NaiveDate) -> bool {
        self.date_added <= date && self.date_removed.map_or(true, |removed| removed >= date)
    }

    /// Days between add and removal, when removed.
    pub fn dwell_days(&self) -> Option<i64> {
        self.date_removed
            .map(|removed| (removed - self.date_added).num_days())
    }
}

/// Creation payload. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoll {
    pub length: f64,
    pub weight: f64,
    /// `None` lets the service pick a default date.
    pub date_added: Option<NaiveDate>,
}

impl NewRoll {
    pub fn new(length: f64, weight: f64) -> Self {
        Self {
            length,
            weight,
            date_added: None,
        }
    }

    pub fn added_on(mut self, date_added: NaiveDate) -> Self {
        self.date_added = Some(date_added);
        self
    }

    pub fn validate(&self) -> Result<(), RollValidationError> {
        validate_dimensions(self.length, self.weight)
    }
}

/// Checks that a removal date is acceptable for a roll added on `date_added`.
pub fn validate_removal(
    date_added: NaiveDate,
    date_removed: NaiveDate,
) -> Result<(), RollValidationError> {
    if date_removed < date_added {
        return Err(RollValidationError::RemovedBeforeAdded {
            date_added,
            date_removed,
        });
    }
    Ok(())
}

fn validate_dimensions(length: f64, weight: f64) -> Result<(), RollValidationError> {
    if !(length.is_finite() && length > 0.0) {
        return Err(RollValidationError::InvalidLength(length));
    }
    if !(weight.is_finite() && weight > 0.0) {
        return Err(RollValidationError::InvalidWeight(weight));
    }
    Ok(())
}
