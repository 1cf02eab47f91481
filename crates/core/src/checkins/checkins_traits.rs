use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::checkins::checkins_model::{CheckIn, NewCheckIn};
use crate::errors::Result;

/// Trait for check-in repository operations
///
/// Every query is scoped to `user_id`; a user never observes another user's rows.
#[async_trait]
pub trait CheckInRepositoryTrait: Send + Sync {
    /// `created_at` of the most recent check-in with status `completed`.
    ///
    /// This timestamp is the only input to the cooldown.
    fn get_latest_completed_at(&self, user_id: &str) -> Result<Option<DateTime<Utc>>>;

    /// Most recent check-ins first.
    fn list_check_ins(&self, user_id: &str, limit: i64) -> Result<Vec<CheckIn>>;

    fn get_check_in(&self, user_id: &str, check_in_id: &str) -> Result<Option<CheckIn>>;

    /// Inserts exactly one completed check-in row.
    async fn insert_check_in(&self, new_check_in: NewCheckIn) -> Result<CheckIn>;
}
