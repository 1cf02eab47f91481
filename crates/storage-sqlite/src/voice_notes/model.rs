//! Database model for voice notes.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use cadence_core::voice_notes::{ExtractedActivity, VoiceNote};

use crate::errors::StorageError;
use crate::utils::{parse_date, parse_timestamp};

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
#[diesel(table_name = crate::schema::voice_notes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VoiceNoteDB {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub audio_url: String,
    pub duration_seconds: f64,
    pub transcription: Option<String>,
    /// JSON array of extracted activities.
    pub extracted_activities: Option<String>,
    pub created_at: String,
}

impl TryFrom<VoiceNoteDB> for VoiceNote {
    type Error = StorageError;

    fn try_from(db: VoiceNoteDB) -> Result<Self, Self::Error> {
        let extracted_activities = match db.extracted_activities.as_deref() {
            None | Some("") => None,
            Some(json) => Some(serde_json::from_str::<Vec<ExtractedActivity>>(json)?),
        };

        Ok(Self {
            date: parse_date(&db.date, "date")?,
            created_at: parse_timestamp(&db.created_at, "created_at")?,
            extracted_activities,
            id: db.id,
            user_id: db.user_id,
            audio_url: db.audio_url,
            duration_seconds: db.duration_seconds,
            transcription: db.transcription,
        })
    }
}
