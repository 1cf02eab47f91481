//! Database models for activity types and entries.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use cadence_core::activities::{ActivityEntry, ActivityType, GoalPolarity, UiType};

use crate::errors::StorageError;
use crate::utils::{parse_date, parse_tag, parse_timestamp};

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
#[diesel(table_name = crate::schema::activity_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityTypeDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub unit: Option<String>,
    pub ui_type: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub step: Option<f64>,
    pub is_negative: bool,
    pub goal_polarity: String,
    pub is_deleted: bool,
    pub display_order: i32,
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
#[diesel(table_name = crate::schema::activity_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityEntryDB {
    pub id: String,
    pub user_id: String,
    pub activity_type_id: String,
    pub date: String,
    pub value: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ActivityTypeDB> for ActivityType {
    type Error = StorageError;

    fn try_from(db: ActivityTypeDB) -> Result<Self, Self::Error> {
        Ok(Self {
            ui_type: parse_tag(&db.ui_type, "ui_type", UiType::parse)?,
            goal_polarity: parse_tag(&db.goal_polarity, "goal_polarity", GoalPolarity::parse)?,
            created_at: parse_timestamp(&db.created_at, "created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "updated_at")?,
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            unit: db.unit,
            min_value: db.min_value,
            max_value: db.max_value,
            step: db.step,
            is_negative: db.is_negative,
            is_deleted: db.is_deleted,
            display_order: db.display_order,
        })
    }
}

impl TryFrom<ActivityEntryDB> for ActivityEntry {
    type Error = StorageError;

    fn try_from(db: ActivityEntryDB) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date(&db.date, "date")?,
            created_at: parse_timestamp(&db.created_at, "created_at")?,
            updated_at: parse_timestamp(&db.updated_at, "updated_at")?,
            id: db.id,
            user_id: db.user_id,
            activity_type_id: db.activity_type_id,
            value: db.value,
        })
    }
}
