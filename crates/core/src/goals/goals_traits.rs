use chrono::NaiveDate;

use crate::errors::Result;
use crate::goals::goals_model::{Achievement, Goal};

/// Trait for goal repository operations
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
}

/// Trait for achievement repository operations
pub trait AchievementRepositoryTrait: Send + Sync {
    /// Loads achievements whose period overlaps `[start, end]`.
    fn load_achievements_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Achievement>>;
}
