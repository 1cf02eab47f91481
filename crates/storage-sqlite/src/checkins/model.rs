//! Database model for check-ins.
//!
//! The analysis and the data summary are stored as JSON text.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use cadence_core::checkins::{CheckIn, CheckInStatus, NewCheckIn};

use crate::errors::StorageError;
use crate::utils::{format_date, format_timestamp, parse_date, parse_tag, parse_timestamp};

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
#[diesel(table_name = crate::schema::check_ins)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CheckInDB {
    pub id: String,
    pub user_id: String,
    pub period_start: String,
    pub period_end: String,
    pub analysis: String,
    pub data_summary: String,
    pub status: String,
    pub created_at: String,
}

impl TryFrom<CheckInDB> for CheckIn {
    type Error = StorageError;

    fn try_from(db: CheckInDB) -> Result<Self, Self::Error> {
        Ok(Self {
            period_start: parse_date(&db.period_start, "period_start")?,
            period_end: parse_date(&db.period_end, "period_end")?,
            analysis: serde_json::from_str(&db.analysis)?,
            data_summary: serde_json::from_str(&db.data_summary)?,
            status: parse_tag(&db.status, "status", CheckInStatus::parse)?,
            created_at: parse_timestamp(&db.created_at, "created_at")?,
            id: db.id,
            user_id: db.user_id,
        })
    }
}

impl TryFrom<NewCheckIn> for CheckInDB {
    type Error = StorageError;

    fn try_from(domain: NewCheckIn) -> Result<Self, Self::Error> {
        Ok(Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::now_v7().to_string()),
            analysis: serde_json::to_string(&domain.analysis)?,
            data_summary: serde_json::to_string(&domain.data_summary)?,
            period_start: format_date(domain.period_start),
            period_end: format_date(domain.period_end),
            status: CheckInStatus::Completed.as_str().to_string(),
            created_at: format_timestamp(domain.created_at),
            user_id: domain.user_id,
        })
    }
}
