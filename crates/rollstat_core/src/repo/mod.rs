//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the roll store contract used by services and the stats engine.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must validate rolls before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `AlreadyRemoved`)
//!   in addition to DB transport errors.

pub mod roll_repo;
