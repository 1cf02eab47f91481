use chrono::NaiveDate;

use crate::errors::Result;
use crate::voice_notes::voice_notes_model::VoiceNote;

/// Trait for voice note repository operations
pub trait VoiceNoteRepositoryTrait: Send + Sync {
    fn load_voice_notes_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VoiceNote>>;
}
