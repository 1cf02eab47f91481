//! Voice note storage.

pub mod model;
pub mod repository;

pub use model::VoiceNoteDB;
pub use repository::VoiceNoteRepository;
