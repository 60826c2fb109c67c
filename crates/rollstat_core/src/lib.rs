//! Core domain logic for RollStat.
//! This crate is the single source of truth for roll lifecycle invariants
//! and windowed stock statistics.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::roll::{NewRoll, Roll, RollId, RollValidationError};
pub use model::window::{DateWindow, InvalidWindowError};
pub use repo::roll_repo::{
    RepoError, RepoResult, RollListQuery, RollRepository, SqliteRollRepository,
};
pub use service::date_provider::{DateProvider, FixedDateProvider, SystemDateProvider};
pub use service::roll_service::RollService;
pub use service::stats_service::StatsService;
pub use stats::report::StatsReport;
pub use stats::sweep::IntervalExtremum;
pub use stats::{compute_report, StatsError, StatsInput, StatsResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
