//! SQLite storage implementation for Cadence.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `cadence-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the records a check-in reads and writes
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The `core` and `ai` crates are database-agnostic and work with traits.
//!
//! ```text
//! core (domain)          ai (orchestration)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Every query takes a `user_id` and filters on it.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod activities;
pub mod checkins;
pub mod goals;
pub mod voice_notes;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from cadence-core for convenience
pub use cadence_core::errors::{DatabaseError, Error, Result};

#[cfg(test)]
mod test_support;
