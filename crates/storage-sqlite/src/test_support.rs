//! Shared fixtures for repository tests.

use chrono::NaiveDate;
use diesel::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

use crate::activities::{ActivityEntryDB, ActivityTypeDB};
use crate::db::{create_pool, get_connection, init, run_migrations, DbPool};
use crate::goals::{AchievementDB, GoalDB};
use crate::schema::{achievements, activity_entries, activity_types, goals, voice_notes};
use crate::utils::format_date;
use crate::voice_notes::VoiceNoteDB;

const TS: &str = "2026-01-01T00:00:00.000Z";

pub fn create_test_pool() -> (Arc<DbPool>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.db");
    let db_path = init(db_path.to_str().expect("utf-8 path")).expect("init db");
    let pool = create_pool(&db_path).expect("create pool");
    run_migrations(&pool).expect("run migrations");
    (pool, dir)
}

pub fn insert_activity_type(
    pool: &DbPool,
    id: &str,
    user_id: &str,
    name: &str,
    is_deleted: bool,
    display_order: i32,
) {
    let row = ActivityTypeDB {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        unit: Some("km".to_string()),
        ui_type: "slider".to_string(),
        min_value: Some(0.0),
        max_value: Some(20.0),
        step: Some(0.5),
        is_negative: false,
        goal_polarity: "at_least".to_string(),
        is_deleted,
        display_order,
        created_at: TS.to_string(),
        updated_at: TS.to_string(),
    };
    let mut conn = get_connection(pool).expect("connection");
    diesel::insert_into(activity_types::table)
        .values(&row)
        .execute(&mut conn)
        .expect("insert activity type");
}

pub fn insert_entry(
    pool: &DbPool,
    id: &str,
    user_id: &str,
    activity_type_id: &str,
    date: NaiveDate,
    value: f64,
) {
    let row = ActivityEntryDB {
        id: id.to_string(),
        user_id: user_id.to_string(),
        activity_type_id: activity_type_id.to_string(),
        date: format_date(date),
        value,
        created_at: TS.to_string(),
        updated_at: TS.to_string(),
    };
    let mut conn = get_connection(pool).expect("connection");
    diesel::insert_into(activity_entries::table)
        .values(&row)
        .execute(&mut conn)
        .expect("insert entry");
}

pub fn insert_voice_note(
    pool: &DbPool,
    id: &str,
    user_id: &str,
    date: NaiveDate,
    transcription: Option<&str>,
    extracted_activities: Option<&str>,
) {
    let row = VoiceNoteDB {
        id: id.to_string(),
        user_id: user_id.to_string(),
        date: format_date(date),
        audio_url: format!("https://cdn.example.com/{}.m4a", id),
        duration_seconds: 42.0,
        transcription: transcription.map(str::to_string),
        extracted_activities: extracted_activities.map(str::to_string),
        created_at: TS.to_string(),
    };
    let mut conn = get_connection(pool).expect("connection");
    diesel::insert_into(voice_notes::table)
        .values(&row)
        .execute(&mut conn)
        .expect("insert voice note");
}

pub fn insert_goal(pool: &DbPool, id: &str, user_id: &str, activity_type_id: &str, date_type: &str) {
    let row = GoalDB {
        id: id.to_string(),
        user_id: user_id.to_string(),
        activity_type_id: activity_type_id.to_string(),
        name: format!("Goal {}", id),
        target_value: 5.0,
        icon: Some("🏃".to_string()),
        date_type: date_type.to_string(),
        tracking_type: "absolute".to_string(),
        target_date: None,
        start_date: None,
        end_date: None,
        created_at: TS.to_string(),
        updated_at: TS.to_string(),
    };
    let mut conn = get_connection(pool).expect("connection");
    diesel::insert_into(goals::table)
        .values(&row)
        .execute(&mut conn)
        .expect("insert goal");
}

pub fn insert_achievement(
    pool: &DbPool,
    id: &str,
    user_id: &str,
    goal_id: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
) {
    let row = AchievementDB {
        id: id.to_string(),
        user_id: user_id.to_string(),
        goal_id: goal_id.to_string(),
        period_start: format_date(period_start),
        period_end: format_date(period_end),
        achieved_value: 6.0,
        target_value: 5.0,
        achieved_at: format!("{}T12:00:00.000Z", format_date(period_end)),
    };
    let mut conn = get_connection(pool).expect("connection");
    diesel::insert_into(achievements::table)
        .values(&row)
        .execute(&mut conn)
        .expect("insert achievement");
}
