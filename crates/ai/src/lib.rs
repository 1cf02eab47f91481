//! Cadence AI - check-in generation using rig-core.
//!
//! This crate runs the check-in pipeline: cooldown check, concurrent data
//! aggregation, context compilation, best-effort resource search, streamed
//! generation and the single persist, emitting `CheckInStreamEvent`s that the
//! Axum server forwards as server-sent events.
//!
//! # Architecture
//!
//! - `service`: Orchestrator state machine and history queries
//! - `env`: Environment abstraction for repositories, clients and the clock
//! - `generator`: LLM-backed generator plus scripted and offline generators
//! - `providers`: Provider settings and rig-core client factory
//! - `resources`: Resource search (Brave) and the disabled fallback
//! - `partial_json`: Repairs truncated JSON into partial analyses
//! - `prompt`: System prompt and context serialization
//! - `run_guard`: Per-user single-flight guard
//! - `types`: Status events shared with the server
//!
//! # Example
//!
//! ```ignore
//! use cadence_ai::{CheckInService, GenerationStatus};
//!
//! // The server implements CheckInEnvironment over its SQLite repositories.
//! let service = CheckInService::new(Arc::new(env));
//!
//! let mut stream = service.generate(Some(user_id));
//! while let Some(event) = stream.next().await {
//!     match event.status {
//!         GenerationStatus::StreamingContent => render(event.partial_analysis),
//!         GenerationStatus::Complete | GenerationStatus::Error => break,
//!         _ => show_progress(&event.message),
//!     }
//! }
//! ```

mod channel;
pub mod env;
pub mod error;
pub mod generator;
pub mod partial_json;
pub mod prompt;
pub mod providers;
pub mod resources;
pub mod run_guard;
pub mod service;
pub mod types;


// Re-export main types
pub use channel::PartialRelay;
pub use env::CheckInEnvironment;
pub use error::CheckInError;
pub use generator::{
    CheckInGeneratorTrait, FakeCheckInGenerator, GenerationRequest, OfflineCheckInGenerator,
    RigCheckInGenerator,
};
pub use providers::ProviderSettings;
pub use resources::{BraveResourceSearcher, DisabledResourceSearcher, ResourceSearcherTrait};
pub use service::{CheckInService, DEFAULT_HISTORY_LIMIT};
pub use types::{CheckInStreamEvent, GenerationStatus};
