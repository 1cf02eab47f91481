use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use cadence_core::goals::{Achievement, AchievementRepositoryTrait, Goal, GoalRepositoryTrait};
use cadence_core::{Error, Result};

use super::model::{AchievementDB, GoalDB};
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::{achievements, goals};
use crate::utils::format_date;

pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl GoalRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl GoalRepositoryTrait for GoalRepository {
    fn load_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::user_id.eq(user_id))
            .order((goals::created_at.asc(), goals::id.asc()))
            .select(GoalDB::as_select())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| Goal::try_from(row).map_err(Error::from))
            .collect()
    }
}

pub struct AchievementRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl AchievementRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl AchievementRepositoryTrait for AchievementRepository {
    /// Achievements whose period overlaps `[start, end]`.
    fn load_achievements_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Achievement>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = achievements::table
            .filter(achievements::user_id.eq(user_id))
            .filter(achievements::period_end.ge(format_date(start)))
            .filter(achievements::period_start.le(format_date(end)))
            .order(achievements::achieved_at.desc())
            .select(AchievementDB::as_select())
            .load::<AchievementDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| Achievement::try_from(row).map_err(Error::from))
            .collect()
    }
}
