use chrono::NaiveDate;

use crate::activities::activities_model::{ActivityEntry, ActivityType};
use crate::errors::Result;

/// Read access to a user's activity type definitions.
pub trait ActivityTypeRepositoryTrait: Send + Sync {
    /// Loads every non-deleted activity type owned by `user_id`, in display order.
    fn load_active_activity_types(&self, user_id: &str) -> Result<Vec<ActivityType>>;
}

/// Read access to a user's activity entries.
pub trait ActivityEntryRepositoryTrait: Send + Sync {
    /// Loads the entries owned by `user_id` whose date lies in `[start, end]`.
    fn load_entries_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ActivityEntry>>;
}
