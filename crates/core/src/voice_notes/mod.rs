//! Voice notes module - dated recordings with optional transcription.

mod voice_notes_model;
mod voice_notes_traits;

pub use voice_notes_model::{ExtractedActivity, VoiceNote};
pub use voice_notes_traits::VoiceNoteRepositoryTrait;
