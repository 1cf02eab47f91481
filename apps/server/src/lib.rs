//! Cadence HTTP server: check-in generation over server-sent events plus
//! history reads, behind an optional bearer-token boundary.

pub mod api;
pub mod auth;
pub mod config;
pub mod environment;
pub mod error;
mod main_lib;

pub use main_lib::{build_state, build_state_with, init_tracing, AppState, StateOverrides};
