use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use cadence_core::activities::{
    ActivityEntry, ActivityEntryRepositoryTrait, ActivityType, ActivityTypeRepositoryTrait,
};
use cadence_core::{Error, Result};

use super::model::{ActivityEntryDB, ActivityTypeDB};
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::{activity_entries, activity_types};
use crate::utils::format_date;

pub struct ActivityTypeRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl ActivityTypeRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl ActivityTypeRepositoryTrait for ActivityTypeRepository {
    fn load_active_activity_types(&self, user_id: &str) -> Result<Vec<ActivityType>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = activity_types::table
            .filter(activity_types::user_id.eq(user_id))
            .filter(activity_types::is_deleted.eq(false))
            .order((activity_types::display_order.asc(), activity_types::name.asc()))
            .select(ActivityTypeDB::as_select())
            .load::<ActivityTypeDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| ActivityType::try_from(row).map_err(Error::from))
            .collect()
    }
}

pub struct ActivityEntryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl ActivityEntryRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl ActivityEntryRepositoryTrait for ActivityEntryRepository {
    fn load_entries_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ActivityEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = activity_entries::table
            .filter(activity_entries::user_id.eq(user_id))
            .filter(activity_entries::date.ge(format_date(start)))
            .filter(activity_entries::date.le(format_date(end)))
            .order((activity_entries::date.asc(), activity_entries::id.asc()))
            .select(ActivityEntryDB::as_select())
            .load::<ActivityEntryDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| ActivityEntry::try_from(row).map_err(Error::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_pool, insert_activity_type, insert_entry};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    #[test]
    fn loads_only_active_types_for_user() {
        let (pool, _dir) = create_test_pool();
        insert_activity_type(&pool, "t-walk", "user-1", "Walk", false, 1);
        insert_activity_type(&pool, "t-old", "user-1", "Old", true, 0);
        insert_activity_type(&pool, "t-other", "user-2", "Other", false, 0);

        let repo = ActivityTypeRepository::new(pool);
        let types = repo.load_active_activity_types("user-1").unwrap();

        assert_eq!(types.len(), 1);
        assert_eq!(types[0].id, "t-walk");
        assert!(types[0].is_active());
    }

    #[test]
    fn entry_range_is_inclusive_and_user_scoped() {
        let (pool, _dir) = create_test_pool();
        insert_activity_type(&pool, "t-walk", "user-1", "Walk", false, 0);
        insert_activity_type(&pool, "t-walk-2", "user-2", "Walk", false, 0);
        insert_entry(&pool, "e1", "user-1", "t-walk", day(1), 3.0);
        insert_entry(&pool, "e2", "user-1", "t-walk", day(10), 4.0);
        insert_entry(&pool, "e3", "user-1", "t-walk", day(11), 5.0);
        insert_entry(&pool, "e4", "user-2", "t-walk-2", day(5), 9.0);

        let repo = ActivityEntryRepository::new(pool);
        let entries = repo.load_entries_in_range("user-1", day(1), day(10)).unwrap();

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
        assert_eq!(entries[1].date, day(10));
        assert_eq!(entries[1].value, 4.0);
    }
}
