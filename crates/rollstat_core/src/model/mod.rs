//! Domain model for tracked material rolls.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the validation rules every persisted roll must satisfy.
//!
//! # Invariants
//! - Every roll is identified by a store-assigned `RollId`.
//! - Removal is a one-way transition; rolls are only deleted by bulk clear.

pub mod roll;
pub mod window;
