//! Cadence Core - Domain entities, policies, and traits.
//!
//! This crate contains the check-in domain for Cadence: the tracked records a
//! check-in reads (activity types, entries, voice notes, goals, achievements),
//! the pure policy functions that shape a run (data-state assessment, context
//! compilation, cooldown, partial diffing), and the repository traits that the
//! `storage-sqlite` crate implements. It performs no I/O of its own.

pub mod activities;
pub mod checkins;
pub mod errors;
pub mod goals;
pub mod voice_notes;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
