//! Database models for goals and achievements.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use cadence_core::goals::{Achievement, Goal, GoalDateType, TrackingType};

use crate::errors::StorageError;
use crate::utils::{parse_date, parse_optional_date, parse_tag, parse_timestamp};

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub activity_type_id: String,
    pub name: String,
    pub target_value: f64,
    pub icon: Option<String>,
    pub date_type: String,
    pub tracking_type: String,
    pub target_date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AchievementDB {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub period_start: String,
    pub period_end: String,
    pub achieved_value: f64,
    pub target_value: f64,
    pub achieved_at: String,
}

impl TryFrom<GoalDB> for Goal {
    type Error = StorageError;

    fn try_from(db: GoalDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date_type: parse_tag(&db.date_type, "date_type", GoalDateType::parse)?,
            tracking_type: parse_tag(&db.tracking_type, "tracking_type", TrackingType::parse)?,
            target_date: parse_optional_date(db.target_date.as_deref(), "target_date")?,
            start_date: parse_optional_date(db.start_date.as_deref(), "start_date")?,
            end_date: parse_optional_date(db.end_date.as_deref(), "end_date")?,
            created_at: parse_timestamp(&db.created_at, "created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "updated_at")?,
            id: db.id,
            user_id: db.user_id,
            activity_type_id: db.activity_type_id,
            name: db.name,
            target_value: db.target_value,
            icon: db.icon,
        })
    }
}

impl TryFrom<AchievementDB> for Achievement {
    type Error = StorageError;

    fn try_from(db: AchievementDB) -> Result<Self, Self::Error> {
        Ok(Self {
            period_start: parse_date(&db.period_start, "period_start")?,
            period_end: parse_date(&db.period_end, "period_end")?,
            achieved_at: parse_timestamp(&db.achieved_at, "achieved_at")?,
            id: db.id,
            user_id: db.user_id,
            goal_id: db.goal_id,
            achieved_value: db.achieved_value,
            target_value: db.target_value,
        })
    }
}
