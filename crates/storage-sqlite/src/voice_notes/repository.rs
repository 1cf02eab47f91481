use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use cadence_core::voice_notes::{VoiceNote, VoiceNoteRepositoryTrait};
use cadence_core::{Error, Result};

use super::model::VoiceNoteDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::voice_notes;
use crate::utils::format_date;

pub struct VoiceNoteRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl VoiceNoteRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl VoiceNoteRepositoryTrait for VoiceNoteRepository {
    fn load_voice_notes_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VoiceNote>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = voice_notes::table
            .filter(voice_notes::user_id.eq(user_id))
            .filter(voice_notes::date.ge(format_date(start)))
            .filter(voice_notes::date.le(format_date(end)))
            .order(voice_notes::date.asc())
            .select(VoiceNoteDB::as_select())
            .load::<VoiceNoteDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| VoiceNote::try_from(row).map_err(Error::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_pool, insert_voice_note};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    #[test]
    fn parses_extracted_activities_json() {
        let (pool, _dir) = create_test_pool();
        insert_voice_note(
            &pool,
            "vn-1",
            "user-1",
            day(3),
            Some("Walked to the park"),
            Some(r#"[{"activityName":"Walk","value":2.5,"confidence":0.9}]"#),
        );
        insert_voice_note(&pool, "vn-2", "user-1", day(4), None, None);
        insert_voice_note(&pool, "vn-3", "user-2", day(4), Some("hidden"), None);

        let repo = VoiceNoteRepository::new(pool);
        let notes = repo.load_voice_notes_in_range("user-1", day(1), day(30)).unwrap();

        assert_eq!(notes.len(), 2);
        let extracted = notes[0].extracted_activities.as_ref().unwrap();
        assert_eq!(extracted[0].activity_name, "Walk");
        assert_eq!(extracted[0].value, Some(2.5));
        assert_eq!(extracted[0].activity_type_id, None);
        assert!(notes[1].extracted_activities.is_none());
    }

    #[test]
    fn malformed_extraction_is_an_error() {
        let (pool, _dir) = create_test_pool();
        insert_voice_note(&pool, "vn-1", "user-1", day(3), None, Some("{not json"));

        let repo = VoiceNoteRepository::new(pool);
        assert!(repo.load_voice_notes_in_range("user-1", day(1), day(30)).is_err());
    }
}
