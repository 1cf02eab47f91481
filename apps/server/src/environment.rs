//! Server-side implementation of CheckInEnvironment.
//!
//! Hands the SQLite repositories and the configured generation and search
//! clients to the check-in pipeline.

use std::sync::Arc;

use cadence_ai::{CheckInEnvironment, CheckInGeneratorTrait, ResourceSearcherTrait};
use cadence_core::{
    activities::{ActivityEntryRepositoryTrait, ActivityTypeRepositoryTrait},
    checkins::{CheckInPolicy, CheckInRepositoryTrait},
    goals::{AchievementRepositoryTrait, GoalRepositoryTrait},
    voice_notes::VoiceNoteRepositoryTrait,
};
use cadence_storage_sqlite::{
    activities::{ActivityEntryRepository, ActivityTypeRepository},
    checkins::CheckInRepository,
    goals::{AchievementRepository, GoalRepository},
    voice_notes::VoiceNoteRepository,
    DbPool, WriteHandle,
};

pub struct ServerCheckInEnvironment {
    policy: CheckInPolicy,
    activity_types: Arc<dyn ActivityTypeRepositoryTrait>,
    activity_entries: Arc<dyn ActivityEntryRepositoryTrait>,
    voice_notes: Arc<dyn VoiceNoteRepositoryTrait>,
    goals: Arc<dyn GoalRepositoryTrait>,
    achievements: Arc<dyn AchievementRepositoryTrait>,
    check_ins: Arc<dyn CheckInRepositoryTrait>,
    generator: Arc<dyn CheckInGeneratorTrait>,
    resource_searcher: Arc<dyn ResourceSearcherTrait>,
}

impl ServerCheckInEnvironment {
    pub fn new(
        pool: Arc<DbPool>,
        writer: WriteHandle,
        policy: CheckInPolicy,
        generator: Arc<dyn CheckInGeneratorTrait>,
        resource_searcher: Arc<dyn ResourceSearcherTrait>,
    ) -> Self {
        Self {
            policy,
            activity_types: Arc::new(ActivityTypeRepository::new(pool.clone())),
            activity_entries: Arc::new(ActivityEntryRepository::new(pool.clone())),
            voice_notes: Arc::new(VoiceNoteRepository::new(pool.clone())),
            goals: Arc::new(GoalRepository::new(pool.clone())),
            achievements: Arc::new(AchievementRepository::new(pool.clone())),
            check_ins: Arc::new(CheckInRepository::new(pool, writer)),
            generator,
            resource_searcher,
        }
    }
}

impl CheckInEnvironment for ServerCheckInEnvironment {
    fn policy(&self) -> CheckInPolicy {
        self.policy.clone()
    }

    fn activity_type_repository(&self) -> Arc<dyn ActivityTypeRepositoryTrait> {
        self.activity_types.clone()
    }

    fn activity_entry_repository(&self) -> Arc<dyn ActivityEntryRepositoryTrait> {
        self.activity_entries.clone()
    }

    fn voice_note_repository(&self) -> Arc<dyn VoiceNoteRepositoryTrait> {
        self.voice_notes.clone()
    }

    fn goal_repository(&self) -> Arc<dyn GoalRepositoryTrait> {
        self.goals.clone()
    }

    fn achievement_repository(&self) -> Arc<dyn AchievementRepositoryTrait> {
        self.achievements.clone()
    }

    fn check_in_repository(&self) -> Arc<dyn CheckInRepositoryTrait> {
        self.check_ins.clone()
    }

    fn generator(&self) -> Arc<dyn CheckInGeneratorTrait> {
        self.generator.clone()
    }

    fn resource_searcher(&self) -> Arc<dyn ResourceSearcherTrait> {
        self.resource_searcher.clone()
    }
}
