use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use cadence_core::checkins::{CheckIn, CheckInRepositoryTrait, CheckInStatus, NewCheckIn};
use cadence_core::{Error, Result};

use super::model::CheckInDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::check_ins;
use crate::utils::parse_timestamp;

pub struct CheckInRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CheckInRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CheckInRepositoryTrait for CheckInRepository {
    fn get_latest_completed_at(&self, user_id: &str) -> Result<Option<DateTime<Utc>>> {
        let mut conn = get_connection(&self.pool)?;
        let latest = check_ins::table
            .filter(check_ins::user_id.eq(user_id))
            .filter(check_ins::status.eq(CheckInStatus::Completed.as_str()))
            .order(check_ins::created_at.desc())
            .select(check_ins::created_at)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        latest
            .map(|value| parse_timestamp(&value, "created_at").map_err(Error::from))
            .transpose()
    }

    fn list_check_ins(&self, user_id: &str, limit: i64) -> Result<Vec<CheckIn>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = check_ins::table
            .filter(check_ins::user_id.eq(user_id))
            .order((check_ins::created_at.desc(), check_ins::id.desc()))
            .limit(limit)
            .select(CheckInDB::as_select())
            .load::<CheckInDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| CheckIn::try_from(row).map_err(Error::from))
            .collect()
    }

    fn get_check_in(&self, user_id: &str, check_in_id: &str) -> Result<Option<CheckIn>> {
        let mut conn = get_connection(&self.pool)?;
        let row = check_ins::table
            .filter(check_ins::user_id.eq(user_id))
            .filter(check_ins::id.eq(check_in_id))
            .select(CheckInDB::as_select())
            .first::<CheckInDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(|row| CheckIn::try_from(row).map_err(Error::from))
            .transpose()
    }

    async fn insert_check_in(&self, new_check_in: NewCheckIn) -> Result<CheckIn> {
        let row = CheckInDB::try_from(new_check_in)?;
        debug!("Persisting check-in {} for user {}", row.id, row.user_id);

        let inserted = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CheckInDB> {
                let inserted = diesel::insert_into(check_ins::table)
                    .values(&row)
                    .returning(CheckInDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted)
            })
            .await?;

        Ok(CheckIn::try_from(inserted)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::spawn_writer;
    use crate::test_support::create_test_pool;
    use cadence_core::checkins::{CheckInAnalysis, CheckInDataSummary, DataState};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn repository() -> (CheckInRepository, tempfile::TempDir) {
        let (pool, dir) = create_test_pool();
        let writer = spawn_writer((*pool).clone());
        (CheckInRepository::new(pool, writer), dir)
    }

    fn new_check_in(user_id: &str, created_at: DateTime<Utc>) -> NewCheckIn {
        NewCheckIn {
            id: None,
            user_id: user_id.to_string(),
            period_start: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
            analysis: CheckInAnalysis {
                overall_summary: "A steady month.".to_string(),
                celebrations: vec!["Walked 20 days".to_string()],
                weekly_focus: "Sleep earlier".to_string(),
                ..Default::default()
            },
            data_summary: CheckInDataSummary {
                data_state: DataState::Sufficient,
                active_type_count: 2,
                days_with_entries: 20,
                total_entries: 35,
                voice_note_count: 1,
                goal_count: 1,
                achievement_count: 0,
                resource_count: 0,
            },
            created_at,
        }
    }

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_round_trips_analysis() {
        let (repo, _dir) = repository();

        let saved = repo.insert_check_in(new_check_in("user-1", ts(1, 9))).await.unwrap();

        assert!(!saved.id.is_empty());
        assert_eq!(saved.status, CheckInStatus::Completed);
        let loaded = repo.get_check_in("user-1", &saved.id).unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.analysis.celebrations, vec!["Walked 20 days".to_string()]);
    }

    #[tokio::test]
    async fn latest_completed_is_most_recent_for_user() {
        let (repo, _dir) = repository();
        assert_eq!(repo.get_latest_completed_at("user-1").unwrap(), None);

        repo.insert_check_in(new_check_in("user-1", ts(1, 9))).await.unwrap();
        repo.insert_check_in(new_check_in("user-1", ts(8, 10))).await.unwrap();
        repo.insert_check_in(new_check_in("user-2", ts(20, 10))).await.unwrap();

        assert_eq!(repo.get_latest_completed_at("user-1").unwrap(), Some(ts(8, 10)));
        assert_eq!(repo.get_latest_completed_at("user-2").unwrap(), Some(ts(20, 10)));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_limited() {
        let (repo, _dir) = repository();
        for day in 1..=4 {
            repo.insert_check_in(new_check_in("user-1", ts(day, 9) + Duration::minutes(1)))
                .await
                .unwrap();
        }

        let listed = repo.list_check_ins("user-1", 3).unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].created_at > listed[1].created_at);
        assert!(repo.list_check_ins("user-2", 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_users_check_in_is_not_visible() {
        let (repo, _dir) = repository();
        let saved = repo.insert_check_in(new_check_in("user-1", ts(1, 9))).await.unwrap();

        assert!(repo.get_check_in("user-2", &saved.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let (repo, _dir) = repository();
        let mut first = new_check_in("user-1", ts(1, 9));
        first.id = Some("fixed-id".to_string());
        repo.insert_check_in(first.clone()).await.unwrap();

        assert!(repo.insert_check_in(first).await.is_err());
        assert_eq!(repo.list_check_ins("user-1", 10).unwrap().len(), 1);
    }
}
