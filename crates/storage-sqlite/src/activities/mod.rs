//! Activity type and activity entry storage.

pub mod model;
pub mod repository;

pub use model::{ActivityEntryDB, ActivityTypeDB};
pub use repository::{ActivityEntryRepository, ActivityTypeRepository};
