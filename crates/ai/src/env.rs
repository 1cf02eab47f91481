//! Environment abstraction for check-in generation.
//!
//! This module provides the `CheckInEnvironment` trait that abstracts runtime
//! dependencies like repositories, the generation client and the clock. The
//! Axum backend implements this trait with its SQLite repositories.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use cadence_core::{
    activities::{ActivityEntryRepositoryTrait, ActivityTypeRepositoryTrait},
    checkins::{CheckInPolicy, CheckInRepositoryTrait},
    goals::{AchievementRepositoryTrait, GoalRepositoryTrait},
    voice_notes::VoiceNoteRepositoryTrait,
};

use crate::generator::CheckInGeneratorTrait;
use crate::resources::ResourceSearcherTrait;

/// Environment abstraction for the check-in pipeline.
///
/// Implementations provide access to:
/// - Read repositories for the five data sources
/// - The check-in repository (cooldown lookup and the single insert)
/// - The generation client and the resource searcher
/// - Policy and the current time
pub trait CheckInEnvironment: Send + Sync {
    /// Thresholds, window and cooldown.
    fn policy(&self) -> CheckInPolicy;

    /// Current time. Overridable so runs can be replayed at a fixed instant.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn activity_type_repository(&self) -> Arc<dyn ActivityTypeRepositoryTrait>;

    fn activity_entry_repository(&self) -> Arc<dyn ActivityEntryRepositoryTrait>;

    fn voice_note_repository(&self) -> Arc<dyn VoiceNoteRepositoryTrait>;

    fn goal_repository(&self) -> Arc<dyn GoalRepositoryTrait>;

    fn achievement_repository(&self) -> Arc<dyn AchievementRepositoryTrait>;

    fn check_in_repository(&self) -> Arc<dyn CheckInRepositoryTrait>;

    fn generator(&self) -> Arc<dyn CheckInGeneratorTrait>;

    fn resource_searcher(&self) -> Arc<dyn ResourceSearcherTrait>;
}
