//! Check-ins module - the generated report, and the pure policy that feeds it.
//!
//! A check-in run reads 30 days of tracked data, classifies how much signal it
//! holds ([`assess_data_state`]), compiles a bounded analytical context
//! ([`compile_context`]), and is gated by a cooldown measured from the user's
//! last completed check-in ([`check_rate_limit`]). While the report streams in,
//! [`is_meaningful_update`] decides which partial snapshots are worth relaying.
//!
//! Everything here is deterministic and free of I/O; the orchestration that
//! calls it lives in the `cadence-ai` crate.

mod assessment;
mod checkins_model;
mod checkins_policy;
mod checkins_traits;
mod context_compiler;
mod context_model;
mod partial_diff;
mod rate_limit;
mod window;

#[cfg(test)]
mod context_compiler_tests;

pub use assessment::{assess_data_state, classify_data_state, DataState, DataStateAssessment};
pub use checkins_model::{
    CheckIn, CheckInAnalysis, CheckInDataSummary, CheckInResource, CheckInStatus, NewCheckIn,
    PartialCheckInAnalysis,
};
pub use checkins_policy::{
    CheckInPolicy, ContextLimits, DataStateThresholds, HighlightPolicy, TrendPolicy,
};
pub use checkins_traits::CheckInRepositoryTrait;
pub use context_compiler::compile_context;
pub use context_model::{
    ActivityAnalysis, CheckInContext, CheckInSources, GoalProgress, Highlight, TrendDirection,
    TrendSignal, VoiceNoteExcerpt, VoiceNoteSuggestion, VoiceNoteSummary,
};
pub use partial_diff::is_meaningful_update;
pub use rate_limit::{check_rate_limit, CheckInEligibility, RateLimitDecision};
pub use window::CheckInWindow;
